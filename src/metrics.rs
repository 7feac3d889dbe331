//! Metrics collection and export for client pools

use std::collections::HashMap;

/// Metrics data for a pool
///
/// Counters are monotonic over the pool's lifetime; occupancy fields are a
/// snapshot taken at collection time.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PoolMetrics {
    /// Requests dispatched inline to a ready client
    pub total_dispatched: u64,

    /// Requests accepted into the wait queue
    pub total_queued: u64,

    /// Requests rejected because the wait queue was full
    pub total_rejected: u64,

    /// Queued requests resumed by a release hand-off
    pub total_handoffs: u64,

    /// Release notifications that found the queue empty
    pub total_idle_releases: u64,

    /// Requests currently waiting
    pub queued_requests: usize,

    /// Clients currently reporting ready
    pub ready_clients: usize,

    /// Total client slots
    pub client_count: usize,

    /// Configured wait queue bound
    pub max_queue_depth: usize,

    /// Busy fraction of the client set (0.0 to 1.0)
    pub utilization: f64,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_dispatched".to_string(), self.total_dispatched.to_string());
        metrics.insert("total_queued".to_string(), self.total_queued.to_string());
        metrics.insert("total_rejected".to_string(), self.total_rejected.to_string());
        metrics.insert("total_handoffs".to_string(), self.total_handoffs.to_string());
        metrics.insert("total_idle_releases".to_string(), self.total_idle_releases.to_string());
        metrics.insert("queued_requests".to_string(), self.queued_requests.to_string());
        metrics.insert("ready_clients".to_string(), self.ready_clients.to_string());
        metrics.insert("client_count".to_string(), self.client_count.to_string());
        metrics.insert("max_queue_depth".to_string(), self.max_queue_depth.to_string());
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use clientpool::{MetricsExporter, PoolMetrics};
    /// use std::collections::HashMap;
    ///
    /// let metrics = PoolMetrics {
    ///     total_dispatched: 10,
    ///     total_queued: 3,
    ///     total_rejected: 1,
    ///     total_handoffs: 3,
    ///     total_idle_releases: 7,
    ///     queued_requests: 0,
    ///     ready_clients: 2,
    ///     client_count: 4,
    ///     max_queue_depth: 100,
    ///     utilization: 0.5,
    /// };
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = MetricsExporter::export_prometheus(&metrics, "my_pool", Some(&tags));
    /// assert!(output.contains("clientpool_clients_ready"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        // Gauge metrics
        output.push_str("# HELP clientpool_clients_ready Clients currently ready\n");
        output.push_str("# TYPE clientpool_clients_ready gauge\n");
        output.push_str(&format!("clientpool_clients_ready{{{}}} {}\n", labels, metrics.ready_clients));

        output.push_str("# HELP clientpool_requests_queued Requests currently waiting\n");
        output.push_str("# TYPE clientpool_requests_queued gauge\n");
        output.push_str(&format!("clientpool_requests_queued{{{}}} {}\n", labels, metrics.queued_requests));

        output.push_str("# HELP clientpool_utilization Busy fraction of the client set\n");
        output.push_str("# TYPE clientpool_utilization gauge\n");
        output.push_str(&format!("clientpool_utilization{{{}}} {:.2}\n", labels, metrics.utilization));

        // Counter metrics
        output.push_str("# HELP clientpool_dispatched_total Requests dispatched inline\n");
        output.push_str("# TYPE clientpool_dispatched_total counter\n");
        output.push_str(&format!("clientpool_dispatched_total{{{}}} {}\n", labels, metrics.total_dispatched));

        output.push_str("# HELP clientpool_queued_total Requests accepted into the queue\n");
        output.push_str("# TYPE clientpool_queued_total counter\n");
        output.push_str(&format!("clientpool_queued_total{{{}}} {}\n", labels, metrics.total_queued));

        output.push_str("# HELP clientpool_rejected_total Requests rejected for saturation\n");
        output.push_str("# TYPE clientpool_rejected_total counter\n");
        output.push_str(&format!("clientpool_rejected_total{{{}}} {}\n", labels, metrics.total_rejected));

        output.push_str("# HELP clientpool_handoffs_total Queued requests resumed by a release\n");
        output.push_str("# TYPE clientpool_handoffs_total counter\n");
        output.push_str(&format!("clientpool_handoffs_total{{{}}} {}\n", labels, metrics.total_handoffs));

        output.push_str("# HELP clientpool_idle_releases_total Releases that found the queue empty\n");
        output.push_str("# TYPE clientpool_idle_releases_total counter\n");
        output.push_str(&format!("clientpool_idle_releases_total{{{}}} {}\n", labels, metrics.total_idle_releases));

        output
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            for (key, value) in tags {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal dispatch counters
///
/// Plain integers: the pool serializes every mutation behind `&mut self`,
/// so there is nothing for atomics to protect.
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    pub dispatched_immediate: u64,
    pub enqueued: u64,
    pub rejected_saturated: u64,
    pub handoffs: u64,
    pub idle_releases: u64,
}

impl PoolCounters {
    pub fn snapshot(
        &self,
        ready: usize,
        client_count: usize,
        queued: usize,
        max_queue_depth: usize,
    ) -> PoolMetrics {
        let utilization = if client_count > 0 {
            (client_count - ready) as f64 / client_count as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_dispatched: self.dispatched_immediate,
            total_queued: self.enqueued,
            total_rejected: self.rejected_saturated,
            total_handoffs: self.handoffs,
            total_idle_releases: self.idle_releases,
            queued_requests: queued,
            ready_clients: ready,
            client_count,
            max_queue_depth,
            utilization,
        }
    }
}
