/// Numerical discrepancy of the accelerated algorithms against the direct reference.
pub mod precision;
/// Declarative benchmark table and a fixed-iteration timer.
pub mod benchmark;

pub use precision::{candidates, compare_precision, compare_precision_typed, DiscrepancyReport};
pub use benchmark::{run_benchmark, BenchCase, BenchTiming, BENCH_CASES};
