// src/engine/parallel.rs
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{info, debug, warn, error};

use crate::config::ExecutorConfig;
use crate::error::{KempnerResult, KempnerError};
use super::interval::{Interval, IntervalSet};
use super::kernel;

/// Outcome of one aggregation: the partial sums in interval order and
/// their left-to-right total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub total: f64,
    pub partials: Vec<f64>,
}

impl Aggregation {
    fn from_partials(partials: Vec<f64>) -> Self {
        Self {
            total: reduce(&partials),
            partials,
        }
    }
}

/// Executor evaluating intervals on the blocking pool with bounded concurrency
pub struct ParallelExecutor {
    max_workers: usize,
    semaphore: Arc<Semaphore>,
    timeout: Option<Duration>,
    cancellation: CancellationToken,
}

impl ParallelExecutor {
    /// Create a new parallel executor running at most `max_workers` intervals at once
    pub fn new(max_workers: usize) -> KempnerResult<Self> {
        if max_workers < 1 {
            return Err(KempnerError::InvalidConfiguration("max_workers must be at least 1".to_string()));
        }

        Ok(Self {
            max_workers,
            semaphore: Arc::new(Semaphore::new(max_workers)),
            timeout: None,
            cancellation: CancellationToken::new(),
        })
    }

    /// Create an executor from configuration; no worker count means one per logical CPU
    pub fn from_config(config: &ExecutorConfig) -> KempnerResult<Self> {
        let executor = Self::new(config.worker_count())?;

        match config.timeout_seconds {
            Some(0) => Err(KempnerError::InvalidConfiguration("timeout_seconds must be at least 1".to_string())),
            Some(seconds) => Ok(executor.with_timeout(Duration::from_secs(seconds))),
            None => Ok(executor),
        }
    }

    /// Fail the whole aggregation once `timeout` has elapsed
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use an externally owned token to cancel aggregations
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Evaluate the digit-filtered reciprocal sum over every interval and reduce it
    pub async fn aggregate(&self, intervals: IntervalSet) -> KempnerResult<Aggregation> {
        self.evaluate_with(intervals, |interval| Ok(kernel::evaluate(interval))).await
    }

    /// Run `kernel` once per interval and sum the results in interval order.
    ///
    /// Any failing or panicking evaluation stops further dispatch and fails
    /// the aggregation once the already running evaluations have finished.
    pub async fn evaluate_with<F>(&self, intervals: IntervalSet, kernel: F) -> KempnerResult<Aggregation>
    where
        F: Fn(&Interval) -> KempnerResult<f64> + Send + Sync + 'static,
    {
        let halt = self.cancellation.child_token();
        let run = self.run(intervals, Arc::new(kernel), halt.clone());

        match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, run).await {
                Ok(result) => result,
                Err(_) => {
                    halt.cancel();
                    error!("Aggregation timed out after {:?}", timeout);
                    Err(KempnerError::Timeout { timeout })
                }
            },
            None => run.await,
        }
    }

    async fn run<F>(&self, intervals: IntervalSet, kernel: Arc<F>, halt: CancellationToken) -> KempnerResult<Aggregation>
    where
        F: Fn(&Interval) -> KempnerResult<f64> + Send + Sync + 'static,
    {
        let count = intervals.len();
        info!("Aggregating {} intervals with max concurrency {}", count, self.max_workers);

        let mut handles = Vec::with_capacity(count);

        for (index, interval) in intervals.into_iter().enumerate() {
            let permit = tokio::select! {
                biased;
                _ = halt.cancelled() => {
                    warn!("Dispatch halted after {} of {} intervals", index, count);
                    break;
                }
                permit = self.semaphore.clone().acquire_owned() => {
                    permit.map_err(|_| KempnerError::Cancelled)?
                }
            };

            debug!("Dispatching interval {} {}", index, interval);

            let kernel_clone = kernel.clone();
            let halt_clone = halt.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let result = match panic::catch_unwind(AssertUnwindSafe(|| kernel_clone(&interval))) {
                    Ok(result) => result,
                    Err(payload) => Err(KempnerError::KernelFailure {
                        start: interval.start,
                        end: interval.end,
                        message: panic_message(payload.as_ref()),
                    }),
                };

                if result.is_err() {
                    halt_clone.cancel();
                }

                drop(permit);
                result
            });

            handles.push((interval, handle));
        }

        // Wait for everything dispatched so far, keeping results in interval order
        let dispatched = handles.len();
        let mut partials = Vec::with_capacity(dispatched);
        let mut failure = None;

        for (interval, handle) in handles {
            match handle.await {
                Ok(Ok(partial)) => partials.push(partial),
                Ok(Err(e)) => {
                    failure.get_or_insert(e);
                }
                Err(e) => {
                    failure.get_or_insert(KempnerError::KernelFailure {
                        start: interval.start,
                        end: interval.end,
                        message: format!("worker task failed: {}", e),
                    });
                }
            }
        }

        if let Some(e) = failure {
            error!("Aggregation failed: {}", e);
            return Err(e);
        }

        if dispatched < count || self.cancellation.is_cancelled() {
            warn!("Aggregation cancelled with {} of {} intervals evaluated", dispatched, count);
            return Err(KempnerError::Cancelled);
        }

        let aggregation = Aggregation::from_partials(partials);
        info!("Aggregated {} partial sums, total = {}", count, aggregation.total);

        Ok(aggregation)
    }
}

/// Aggregate `intervals` with a fresh executor of `max_workers` slots
pub async fn aggregate(intervals: IntervalSet, max_workers: usize) -> KempnerResult<f64> {
    let executor = ParallelExecutor::new(max_workers)?;
    Ok(executor.aggregate(intervals).await?.total)
}

/// Single-worker baseline computed on the calling thread
pub fn sequential_total(intervals: &IntervalSet) -> f64 {
    let partials: Vec<f64> = intervals.iter().map(kernel::evaluate).collect();
    reduce(&partials)
}

fn reduce(partials: &[f64]) -> f64 {
    partials.iter().fold(0.0, |total, partial| total + partial)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "kernel panicked".to_string()
    }
}
