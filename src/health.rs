//! Health monitoring for client pools

/// Health status of a client pool
///
/// # Examples
///
/// ```
/// use clientpool::HealthStatus;
///
/// let health = HealthStatus::new(2, 3, 0, 100);
/// assert!(health.is_healthy());
/// assert_eq!(health.ready_clients, 2);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Number of warnings detected
    pub warning_count: usize,

    /// Busy fraction of the client set (0.0 to 1.0)
    pub utilization: f64,

    /// Clients currently reporting ready
    pub ready_clients: usize,

    /// Clients currently busy
    pub busy_clients: usize,

    /// Total client slots
    pub client_count: usize,

    /// Requests currently waiting in the queue
    pub queued_requests: usize,

    /// Configured wait queue bound
    pub max_queue_depth: usize,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Create a new health status
    pub fn new(ready: usize, client_count: usize, queued: usize, max_queue_depth: usize) -> Self {
        let busy = client_count.saturating_sub(ready);
        let utilization = if client_count > 0 {
            busy as f64 / client_count as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        // Check for high utilization
        if utilization > 0.9 {
            warnings.push(format!("High utilization: {:.1}%", utilization * 100.0));
            is_healthy = false;
        }

        // Check for queue saturation
        if max_queue_depth > 0 && queued >= max_queue_depth {
            warnings.push(format!("Wait queue is full: {}/{}", queued, max_queue_depth));
            is_healthy = false;
        } else if queued > 0 && ready == 0 {
            warnings.push(format!("{} requests waiting, no client ready", queued));
        }

        Self {
            is_healthy,
            warning_count: warnings.len(),
            utilization,
            ready_clients: ready,
            busy_clients: busy,
            client_count,
            queued_requests: queued,
            max_queue_depth,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}
