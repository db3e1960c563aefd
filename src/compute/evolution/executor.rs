//! Fixed-size worker pool used for parallel generation evaluation.

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Worker pool that runs one task per population partition.
pub struct TaskExecutor {
    pool: ThreadPool,
}

impl TaskExecutor {
    /// Create a pool with `worker_threads` threads. Zero uses the number of
    /// available cores.
    pub fn new(worker_threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .thread_name(|i| format!("genepool-worker-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    /// Number of worker threads in the pool.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `task` once per partition on the pool and block until every task
    /// has returned. Results are in partition order.
    pub fn run_partitions<T, R, F>(&self, partitions: Vec<&mut [T]>, task: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(&mut [T]) -> R + Sync,
    {
        let mut results: Vec<Option<R>> = partitions.iter().map(|_| None).collect();
        let task = &task;

        self.pool.scope(|scope| {
            for (partition, slot) in partitions.into_iter().zip(results.iter_mut()) {
                scope.spawn(move |_| *slot = Some(task(partition)));
            }
        });

        // The scope only returns after every spawned task completed.
        results.into_iter().flatten().collect()
    }
}

impl std::fmt::Debug for TaskExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskExecutor")
            .field("worker_count", &self.worker_count())
            .finish()
    }
}

/// Contiguous partition length for spreading `len` items over `workers`.
///
/// Uses `min(workers, len)` partitions of `ceil(len / partitions)` items each;
/// the final partition may be shorter.
pub fn partition_size(len: usize, workers: usize) -> usize {
    let thread_count = workers.min(len).max(1);
    len.div_ceil(thread_count).max(1)
}
