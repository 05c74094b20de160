//! Print the generators of all 17 plane groups.
//!
//! Run: `cargo run -p symgen --example plane_groups`

use std::time::Instant;

use symgen::api::{catalogue, generate, GenerateCfg};

fn main() {
    let cfg = GenerateCfg::default();
    let start = Instant::now();
    for name in catalogue::names(2) {
        let group = catalogue::lookup(2, name).expect("catalogue entry");
        let set = generate(&group, &cfg).expect("generation verifies");
        let symbols: Vec<String> = set.operators().iter().map(|op| op.symbol()).collect();
        println!("{:<5} order {:>2}  {}", name, group.order(), symbols.join("; "));
    }
    println!("elapsed: {:.1} ms", start.elapsed().as_secs_f64() * 1e3);
}
