//! Pool configuration options

/// Configuration for client pool behavior
///
/// # Examples
///
/// ```
/// use clientpool::PoolConfiguration;
///
/// let config = PoolConfiguration::new()
///     .with_max_queue_depth(50);
///
/// assert_eq!(config.max_queue_depth, 50);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfiguration {
    /// Maximum number of requests that may wait in the queue at once.
    /// Admission rejects with a saturation error once this bound is reached.
    pub max_queue_depth: usize,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            max_queue_depth: 100,
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum wait queue depth
    pub fn with_max_queue_depth(mut self, depth: usize) -> Self {
        self.max_queue_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_queue_depth() {
        let config = PoolConfiguration::default();
        assert_eq!(config.max_queue_depth, 100);
    }

    #[test]
    fn test_builder() {
        let config = PoolConfiguration::new().with_max_queue_depth(1);
        assert_eq!(config.max_queue_depth, 1);
    }
}
