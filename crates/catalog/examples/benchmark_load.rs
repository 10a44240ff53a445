use catalog::load_catalog;
use std::path::Path;
use std::time::Instant;

fn main() {
    let artifact = Path::new("model/catalog.json");

    println!("Loading catalog artifact...\n");

    let start = Instant::now();
    let store = load_catalog(artifact).expect("Failed to load catalog");
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", store.len());
    println!("\nPerformance: {:.0} rows/second",
             store.len() as f64 / elapsed.as_secs_f64());
}
