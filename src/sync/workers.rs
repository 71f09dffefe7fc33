//! Worker pool sizing.

const PER_CORE: usize = 5;
const MIN_WORKERS: usize = 5;
const MAX_WORKERS: usize = 20;

/// Number of concurrent item workers for a configured value.
/// `0` means auto-size from the machine's logical core count.
pub fn worker_count(configured: u32) -> usize {
    match configured {
        0 => {
            let cores = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            auto_worker_count(cores)
        }
        n => n as usize,
    }
}

fn auto_worker_count(cores: usize) -> usize {
    (cores * PER_CORE).clamp(MIN_WORKERS, MAX_WORKERS)
}
