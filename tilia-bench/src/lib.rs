//! Benchmark harness for the Tilia signature crates.
//!
//! The benchmarks live in `benches/`; run them with `cargo bench -p tilia-bench`
//! and add `--features parallel` to measure Rayon leaf generation.
