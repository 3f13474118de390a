//! Thread pool setup for batch rendering

use skyreport_core::{ReportError, ReportResult};

/// Configure the global rayon pool used by `ReportEngine::generate_batch`.
/// Zero means one thread per core.
pub fn configure_thread_pool(threads: usize) -> ReportResult<()> {
    let threads = if threads == 0 {
        num_cpus::get()
    } else {
        threads
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| ReportError::Configuration(format!("thread pool: {}", e)))?;

    Ok(())
}

/// Get the number of available CPU cores
pub fn get_available_cores() -> usize {
    num_cpus::get()
}

/// A batch is worth fanning out only with more than one request and more
/// than one worker
pub fn should_parallelize(batch_len: usize) -> bool {
    batch_len > 1 && rayon::current_num_threads() > 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_available_cores() {
        let cores = get_available_cores();
        assert!(cores > 0, "Should detect at least one CPU core");
        assert!(cores <= 1024, "Unrealistic number of cores detected");
    }

    #[test]
    fn test_single_request_runs_inline() {
        assert!(!should_parallelize(0));
        assert!(!should_parallelize(1));
    }

    #[test]
    fn test_configure_twice_is_configuration_error() {
        // The global pool can be built once per process; whichever call
        // comes second must fail cleanly
        let first = configure_thread_pool(2);
        let second = configure_thread_pool(2);
        assert!(first.is_err() || matches!(second, Err(ReportError::Configuration(_))));
    }
}
