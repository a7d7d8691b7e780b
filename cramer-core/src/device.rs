use crate::error::CramerCoreError;
use std::sync::Arc;

/// Marker trait for execution devices.
/// Needs Debug so solver metadata and logs can describe where work ran.
pub trait Device: std::fmt::Debug {}

/// Represents a CPU execution device backed by a bounded worker pool.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct CpuDevice {
    pool: Arc<rayon::ThreadPool>,
}

impl CpuDevice {
    /// Creates a CpuDevice with one worker per available CPU.
    pub fn new() -> Result<Self, CramerCoreError> {
        Self::build(rayon::ThreadPoolBuilder::new())
    }

    /// Creates a CpuDevice with exactly `threads` workers.
    /// `0` falls back to one worker per available CPU.
    pub fn with_threads(threads: usize) -> Result<Self, CramerCoreError> {
        Self::build(rayon::ThreadPoolBuilder::new().num_threads(threads))
    }

    fn build(builder: rayon::ThreadPoolBuilder) -> Result<Self, CramerCoreError> {
        let pool = builder
            .thread_name(|index| format!("cramer-worker-{index}"))
            .build()?;
        log::info!(
            "CpuDevice created with {} worker threads",
            pool.current_num_threads()
        );
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Number of worker threads in the pool.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `op` inside the pool and blocks until it returns.
    /// Parallel iterators used within `op` are scheduled on this pool only.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Queues `op` on the pool without waiting for it.
    pub fn spawn<OP>(&self, op: OP)
    where
        OP: FnOnce() + Send + 'static,
    {
        self.pool.spawn(op)
    }
}

impl Device for CpuDevice {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_threads_bounds_pool() {
        let device = CpuDevice::with_threads(2).unwrap();
        assert_eq!(device.workers(), 2);
        assert_eq!(device.clone().workers(), 2);
    }

    #[test]
    fn test_install_runs_on_pool() {
        let device = CpuDevice::with_threads(1).unwrap();
        let name = device.install(|| std::thread::current().name().map(str::to_string));
        assert_eq!(name.as_deref(), Some("cramer-worker-0"));
    }
}
