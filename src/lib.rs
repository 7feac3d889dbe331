//! # clientpool
//!
//! Bounded pool of reusable network clients for event-driven applications:
//! many logical requests are multiplexed onto a fixed set of clients, with a
//! bounded FIFO wait queue providing backpressure when every client is busy.
//!
//! ## Features
//!
//! - Fixed client set created once at construction, destroyed at teardown
//! - Inline dispatch: a ready client is handed to the caller's callback
//!   before `get_client` returns
//! - Bounded FIFO wait queue with strict first-come-first-served hand-off
//! - Saturation rejection as the sole backpressure signal
//! - Single-threaded cooperative execution, enforced by `&mut self`
//! - Read-only diagnostics: task list, metrics snapshot, health projection
//! - Prometheus-format metrics export
//!
//! ## Quick Start
//!
//! ```rust
//! use clientpool::{ClientInfo, ClientPool, Dispatch, PoolConfiguration, Poolable};
//!
//! struct Echo {
//!     ready: bool,
//! }
//!
//! impl Poolable for Echo {
//!     fn check_ready(&self) -> bool {
//!         self.ready
//!     }
//!     fn info(&self) -> ClientInfo {
//!         ClientInfo::new("echo", "idle")
//!     }
//!     fn destroy(self) {}
//! }
//!
//! let mut pool = ClientPool::new(2, PoolConfiguration::default(), |_id| {
//!     Ok(Echo { ready: true })
//! })?;
//!
//! let outcome = pool.get_client(|client, ()| assert!(client.ready), ())?;
//! assert_eq!(outcome, Dispatch::Immediate);
//! # Ok::<(), clientpool::PoolError>(())
//! ```

mod client;
mod config;
mod errors;
mod health;
mod metrics;
mod pool;

pub use client::{ClientId, ClientInfo, Poolable};
pub use config::PoolConfiguration;
pub use errors::{PoolError, PoolResult};
pub use health::HealthStatus;
pub use metrics::{MetricsExporter, PoolMetrics};
pub use pool::{ClientPool, Dispatch};
