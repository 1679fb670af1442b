pub mod config;
pub mod engine;
pub mod error;
pub mod report;

// Re-export main types for easier access
pub use config::{Config, RunConfig, ExecutorConfig};
pub use engine::{
    aggregate,
    partition,
    sequential_total,
    Aggregation,
    Interval,
    IntervalSet,
    ParallelExecutor,
};
pub use error::{KempnerError, KempnerResult};
pub use report::RunReport;
