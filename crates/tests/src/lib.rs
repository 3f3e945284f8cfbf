//! # Integration Tests
//!
//! End-to-end tests for the buffered metrics pipeline:
//! - Size-triggered and timer-triggered batch writes
//! - Adaptive threshold behavior against a degraded backend
//! - Bounded data loss at the buffer cap
//! - Service tag propagation and shutdown flushing

#[cfg(test)]
mod support {
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Arc, Mutex, Once};
    use std::time::Duration;

    use contracts::{MetricPoint, MetricsBackend, MonitorError};
    use observability::{LogFormat, ObservabilityConfig};

    /// Shared state of the mock backend, observable from the test body
    #[derive(Default)]
    pub struct BackendState {
        batches: Mutex<Vec<Vec<MetricPoint>>>,
        fail: AtomicBool,
        pings: AtomicU64,
    }

    impl BackendState {
        pub fn batch_sizes(&self) -> Vec<usize> {
            self.batches.lock().unwrap().iter().map(Vec::len).collect()
        }

        pub fn batch(&self, index: usize) -> Vec<MetricPoint> {
            self.batches.lock().unwrap()[index].clone()
        }

        pub fn set_failing(&self, failing: bool) {
            self.fail.store(failing, Ordering::Relaxed);
        }

        pub fn ping_count(&self) -> u64 {
            self.pings.load(Ordering::Relaxed)
        }
    }

    /// Mock backend recording every write call
    #[derive(Clone, Default)]
    pub struct MockBackend {
        pub state: Arc<BackendState>,
    }

    impl MetricsBackend for MockBackend {
        async fn write(&self, batch: &[MetricPoint]) -> Result<(), MonitorError> {
            self.state.batches.lock().unwrap().push(batch.to_vec());
            if self.state.fail.load(Ordering::Relaxed) {
                return Err(MonitorError::backend_write("test_database", "write error"));
            }
            Ok(())
        }

        async fn ping(&self, _timeout: Duration) -> Result<(), MonitorError> {
            self.state.pings.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    /// Install a compact tracing subscriber once for the whole test binary
    pub fn init_tracing() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = observability::init_with_config(ObservabilityConfig {
                log_format: LogFormat::Compact,
                default_log_level: "warn".to_string(),
            });
        });
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use chrono::Utc;
    use contracts::{Monitor, MonitorConfig, MonitorError, Tags};
    use monitor::{create_monitor, BufferedMonitor, MonitorHandle, QUEUE_LENGTH_MEASUREMENT};
    use tokio::time::sleep;

    use crate::support::{init_tracing, MockBackend};

    fn config(base: usize, max: usize, service_name: Option<&str>) -> MonitorConfig {
        let mut config = MonitorConfig::new("http://localhost:8086", "test_database");
        config.base_buffer_size = base;
        config.max_buffer_size = max;
        config.service_name = service_name.map(str::to_string);
        // Keep the timer out of size-trigger tests.
        config.batch_write_interval = Duration::from_secs(60);
        config
    }

    fn start(config: MonitorConfig) -> (BufferedMonitor, MonitorHandle, MockBackend) {
        init_tracing();
        let backend = MockBackend::default();
        let (monitor, handle) = create_monitor(config, backend.clone()).unwrap();
        (monitor, handle, backend)
    }

    async fn insert_records(monitor: &BufferedMonitor, count: usize) {
        for _ in 0..count {
            monitor
                .insert_record("measurement", 1.0.into(), None, None, Utc::now())
                .await;
        }
        // Let the daemon drain the channel.
        sleep(Duration::from_millis(100)).await;
    }

    #[tokio::test]
    async fn test_size_trigger_exactness() {
        let (monitor, handle, backend) = start(config(5000, 10000, None));

        insert_records(&monitor, 4000).await;
        // below threshold, nothing written
        assert_eq!(backend.state.batch_sizes(), Vec::<usize>::new());

        insert_records(&monitor, 1000).await;
        // threshold reached: 5000 user points + 1 queue-length point
        assert_eq!(backend.state.batch_sizes(), vec![5001]);

        handle.close().await;
    }

    #[tokio::test]
    async fn test_timer_trigger_flushes_below_threshold() {
        let mut config = config(5000, 10000, None);
        config.batch_write_interval = Duration::from_millis(200);
        let (monitor, handle, backend) = start(config);

        insert_records(&monitor, 3).await;
        sleep(Duration::from_millis(400)).await;

        // one timer flush with no size minimum; later ticks see an empty
        // buffer and write nothing
        assert_eq!(backend.state.batch_sizes(), vec![4]);

        handle.close().await;
    }

    #[tokio::test]
    async fn test_degraded_backend_bounded_loss() {
        let (monitor, handle, backend) = start(config(5000, 10000, None));
        backend.state.set_failing(true);

        insert_records(&monitor, 9000).await;
        // one failed attempt at the base threshold; points kept
        assert_eq!(backend.state.batch_sizes(), vec![5001]);

        insert_records(&monitor, 2000).await;
        // threshold escalated to 10000; the failed attempt at the cap
        // discarded those 10000 points even though the write failed, and
        // the last 1000 points start over from an empty buffer
        assert_eq!(backend.state.batch_sizes(), vec![5001, 10001]);

        // terminal flush still attempts the remaining 1000 points
        handle.close().await;
        assert_eq!(backend.state.batch_sizes(), vec![5001, 10001, 1001]);
    }

    #[tokio::test]
    async fn test_recovery_collapses_threshold() {
        let (monitor, handle, backend) = start(config(2, 10, None));
        backend.state.set_failing(true);

        insert_records(&monitor, 2).await;
        // failed at threshold 2, kept; threshold now 4
        assert_eq!(backend.state.batch_sizes(), vec![3]);

        insert_records(&monitor, 2).await;
        // failed at threshold 4, kept; threshold now 6
        assert_eq!(backend.state.batch_sizes(), vec![3, 5]);

        backend.state.set_failing(false);

        insert_records(&monitor, 2).await;
        // backlog of 6 goes out in one oversized batch
        assert_eq!(backend.state.batch_sizes(), vec![3, 5, 7]);

        insert_records(&monitor, 2).await;
        // threshold collapsed straight back to the base size
        assert_eq!(backend.state.batch_sizes(), vec![3, 5, 7, 3]);

        handle.close().await;
    }

    #[tokio::test]
    async fn test_service_tag_propagation() {
        let (monitor, handle, backend) = start(config(1, 1, Some("api")));

        let tags = Tags::from([("tag1".to_string(), "value1".to_string())]);
        monitor
            .insert_record("request", 100.0.into(), Some(tags), None, Utc::now())
            .await;
        handle.close().await;

        let batch = backend.state.batch(0);
        assert_eq!(batch.len(), 2);

        assert_eq!(batch[0].measurement, "request");
        assert_eq!(batch[0].tags.get("service"), Some(&"api".to_string()));
        assert_eq!(batch[0].tags.get("tag1"), Some(&"value1".to_string()));

        assert_eq!(batch[1].measurement, QUEUE_LENGTH_MEASUREMENT);
        assert_eq!(batch[1].tags.get("service"), Some(&"api".to_string()));
    }

    #[tokio::test]
    async fn test_no_service_tag_when_unset() {
        let (monitor, handle, backend) = start(config(1, 1, None));

        monitor
            .insert_record("request", 100.0.into(), None, None, Utc::now())
            .await;
        handle.close().await;

        let batch = backend.state.batch(0);
        assert_eq!(batch.len(), 2);
        for point in &batch {
            assert!(!point.tags.contains_key("service"));
        }
    }

    #[tokio::test]
    async fn test_shutdown_flushes_buffered_points() {
        let (monitor, handle, backend) = start(config(5000, 10000, None));

        insert_records(&monitor, 3).await;
        assert_eq!(backend.state.batch_sizes(), Vec::<usize>::new());

        handle.close().await;
        assert_eq!(backend.state.batch_sizes(), vec![4]);
    }

    #[tokio::test]
    async fn test_insert_after_close_is_silent() {
        let (monitor, handle, backend) = start(config(5000, 10000, None));

        handle.close().await;

        // the pipeline is gone; submission never errors or panics
        monitor.count_simple("late", 1.0).await;
        monitor.count("late", 1.0, None, None).await;
        assert_eq!(backend.state.batch_sizes(), Vec::<usize>::new());
    }

    #[tokio::test]
    async fn test_count_error_adds_error_tag() {
        let (monitor, handle, backend) = start(config(1, 1, None));

        let error: MonitorError = MonitorError::backend_ping("backend down");
        monitor.count_error("request_errors", 1.0, &error).await;
        handle.close().await;

        let batch = backend.state.batch(0);
        let tag = batch[0].tags.get("error").unwrap();
        assert!(tag.contains("backend down"));
    }

    #[tokio::test]
    async fn test_probe_pings_at_startup() {
        let (_monitor, handle, backend) = start(config(5000, 10000, None));

        sleep(Duration::from_millis(100)).await;
        assert!(backend.state.ping_count() >= 1);

        handle.close().await;
    }

    #[tokio::test]
    async fn test_invalid_config_fails_fast() {
        init_tracing();
        let bad = config(1001, 1000, None);

        let result = create_monitor(bad, MockBackend::default());
        assert!(matches!(
            result.err(),
            Some(MonitorError::ConfigValidation { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_producers() {
        let (monitor, handle, backend) = start(config(100, 200, None));

        let mut tasks = Vec::new();
        for _ in 0..4 {
            let monitor = monitor.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..50 {
                    monitor.count_simple("measurement", 1.0).await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        sleep(Duration::from_millis(100)).await;

        // 200 points: two size-triggered flushes of 100 user points each
        assert_eq!(backend.state.batch_sizes(), vec![101, 101]);

        handle.close().await;
    }
}
