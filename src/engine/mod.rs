mod interval;
pub mod kernel;
mod parallel;

pub use interval::{partition, Interval, IntervalSet};
pub use parallel::{aggregate, sequential_total, Aggregation, ParallelExecutor};
