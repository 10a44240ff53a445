//! # Charts Crate
//!
//! Leaderboard construction over catalog segments.
//!
//! ## Components
//!
//! - **weighted**: The Bayesian weighted-rating chart builder (genre charts)
//! - **segments**: Genre/actor/director segment resolution and the raw
//!   vote-count ranking used for people charts
//! - **cache**: The two-tier segment cache (in-process map over an optional
//!   durable snapshot)
//! - **snapshot**: The snapshot persistence seam and its directory-backed
//!   implementation
//!
//! ## Example Usage
//!
//! ```ignore
//! use charts::{ChartBuilder, SegmentCache, segments};
//!
//! let cache = SegmentCache::new();
//! let builder = ChartBuilder::new();
//!
//! let key = segments::genre_key("drama");
//! let chart = cache.get_or_compute(&key, || {
//!     Ok::<_, std::convert::Infallible>(builder.build(&segments::genre_segment(&store, &key)))
//! })?;
//! ```

pub mod cache;
pub mod segments;
pub mod snapshot;
pub mod weighted;

pub use cache::SegmentCache;
pub use snapshot::{DirSnapshotStore, SnapshotStore};
pub use weighted::{Chart, ChartBuilder, ChartRow};
