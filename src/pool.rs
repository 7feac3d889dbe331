//! Core client pool: admission control and release hand-off

use crate::client::{ClientId, ClientInfo, Poolable, PooledClient};
use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::health::HealthStatus;
use crate::metrics::{PoolCounters, PoolMetrics};

use std::collections::VecDeque;
use tracing::{debug, warn};

/// Outcome of a successful admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A ready client was found; the callback already ran inline.
    Immediate,

    /// All clients were busy; the request waits for the next release.
    Queued,
}

/// A pending request: the continuation to resume once a client is assigned,
/// plus the caller-supplied context it is resumed with.
struct WaitQueueEntry<C, X> {
    on_client_ready: Box<dyn FnOnce(&mut C, X)>,
    context: X,
}

/// Fixed-size pool of reusable clients with a bounded FIFO wait queue
///
/// The pool multiplexes many logical requests onto `client_count` clients
/// created once at construction. A request either wins a ready client
/// immediately (its callback runs inline, before [`get_client`] returns),
/// waits in the queue for the next release, or is rejected when the queue is
/// at its configured bound - the pool's sole backpressure mechanism.
///
/// All operations take `&mut self`: admission, hand-off, and teardown can
/// never overlap, which is what makes the lock-free single-threaded dispatch
/// protocol sound.
///
/// `C` is the client type, `X` the caller context type passed through to
/// callbacks unchanged.
///
/// [`get_client`]: ClientPool::get_client
pub struct ClientPool<C: Poolable, X = ()> {
    clients: Vec<PooledClient<C>>,
    wait_queue: VecDeque<WaitQueueEntry<C, X>>,
    config: PoolConfiguration,
    counters: PoolCounters,
}

impl<C: Poolable, X> ClientPool<C, X> {
    /// Create a pool of `client_count` clients using the supplied factory
    ///
    /// The factory receives each slot's [`ClientId`]; the client keeps it and
    /// passes it back to [`client_released`](ClientPool::client_released)
    /// whenever it transitions from busy back to idle. A factory error aborts
    /// construction; clients already created are destroyed before the error
    /// is returned.
    pub fn new<F>(client_count: usize, config: PoolConfiguration, mut create: F) -> PoolResult<Self>
    where
        F: FnMut(ClientId) -> PoolResult<C>,
    {
        let mut clients = Vec::with_capacity(client_count);
        for index in 0..client_count {
            let id = ClientId::new(index);
            match create(id) {
                Ok(client) => clients.push(PooledClient::new(id, client)),
                Err(err) => {
                    for pc in clients.drain(..) {
                        pc.into_inner().destroy();
                    }
                    return Err(err);
                }
            }
        }

        Ok(Self {
            clients,
            wait_queue: VecDeque::new(),
            config,
            counters: PoolCounters::default(),
        })
    }

    /// Request a client, resuming `on_client_ready` once one is assigned
    ///
    /// Admission runs in three steps:
    ///
    /// 1. If the wait queue is at its bound, the request is rejected with
    ///    [`PoolError::Saturated`] and no state is mutated. The bound is
    ///    checked before the readiness scan.
    /// 2. Otherwise the clients are scanned in construction order; the first
    ///    one whose readiness check passes is handed to the callback inline,
    ///    in the calling stack. The scan is not round-robin: the first ready
    ///    client always wins, so this policy alone does not spread load.
    /// 3. With no ready client, the continuation is appended to the tail of
    ///    the wait queue and resumed by a later release event.
    ///
    /// Queued requests are served in strict FIFO order by queue-join time.
    /// There is no ordering guarantee between an immediate winner and older
    /// queued entries - immediate dispatch never consults the queue.
    pub fn get_client<F>(&mut self, on_client_ready: F, context: X) -> PoolResult<Dispatch>
    where
        F: FnOnce(&mut C, X) + 'static,
    {
        if self.wait_queue.len() >= self.config.max_queue_depth {
            self.counters.rejected_saturated += 1;
            debug!(queued = self.wait_queue.len(), "wait queue is full, rejecting request");
            return Err(PoolError::Saturated);
        }

        if let Some(index) = self.clients.iter().position(|pc| pc.check_ready()) {
            on_client_ready(self.clients[index].client_mut(), context);
            self.counters.dispatched_immediate += 1;
            return Ok(Dispatch::Immediate);
        }

        debug!(queued = self.wait_queue.len(), "all clients busy, queueing request");
        self.wait_queue.push_back(WaitQueueEntry {
            on_client_ready: Box::new(on_client_ready),
            context,
        });
        self.counters.enqueued += 1;

        Ok(Dispatch::Queued)
    }

    /// Notify the pool that a client finished its current work
    ///
    /// Invoked by the client's event source with the token it received at
    /// construction. The oldest queued request, if any, is resumed inline
    /// with the released client - readiness is not re-checked on this path,
    /// the client just announced it. With an empty queue this is a no-op;
    /// the client simply becomes discoverable on the next admission scan.
    ///
    /// Each release resumes at most one queued request.
    pub fn client_released(&mut self, id: ClientId) {
        if id.index() >= self.clients.len() {
            warn!(client = id.index(), "release notification for unknown client");
            return;
        }

        let Some(entry) = self.wait_queue.pop_front() else {
            self.counters.idle_releases += 1;
            return;
        };

        debug!(client = id.index(), "handing released client to oldest queued request");
        (entry.on_client_ready)(self.clients[id.index()].client_mut(), entry.context);
        self.counters.handoffs += 1;
    }

    /// Tear the pool down, destroying every client
    ///
    /// Requests still queued at this point are discarded without their
    /// callbacks firing; callers waiting at teardown receive no notification.
    /// Dropping the pool has the same effect.
    pub fn shutdown(self) {}

    /// Append each client's info, tagged with `pool_name`, to `tasks`
    ///
    /// Read-only projection for diagnostics collectors; has no effect on
    /// dispatch state.
    pub fn collect_task_list(&self, tasks: &mut Vec<ClientInfo>, pool_name: &str) {
        for pc in &self.clients {
            tasks.push(pc.tagged_info(pool_name));
        }
    }

    /// Number of client slots (fixed at construction)
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Number of clients currently reporting ready
    pub fn ready_count(&self) -> usize {
        self.clients.iter().filter(|pc| pc.check_ready()).count()
    }

    /// Number of requests currently waiting in the queue
    pub fn queued_count(&self) -> usize {
        self.wait_queue.len()
    }

    /// Snapshot of the pool's dispatch counters and current occupancy
    pub fn metrics(&self) -> PoolMetrics {
        self.counters.snapshot(
            self.ready_count(),
            self.clients.len(),
            self.wait_queue.len(),
            self.config.max_queue_depth,
        )
    }

    /// Current health projection
    pub fn health_status(&self) -> HealthStatus {
        HealthStatus::new(
            self.ready_count(),
            self.clients.len(),
            self.wait_queue.len(),
            self.config.max_queue_depth,
        )
    }
}

impl<C: Poolable, X> Drop for ClientPool<C, X> {
    fn drop(&mut self) {
        if !self.wait_queue.is_empty() {
            debug!(
                dropped = self.wait_queue.len(),
                "discarding queued requests at pool teardown"
            );
        }
        self.wait_queue.clear();

        for pc in self.clients.drain(..) {
            pc.into_inner().destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct MockClient {
        name: String,
        ready: Rc<Cell<bool>>,
        destroyed: Rc<Cell<usize>>,
    }

    impl Poolable for MockClient {
        fn check_ready(&self) -> bool {
            self.ready.get()
        }

        fn info(&self) -> ClientInfo {
            let status = if self.ready.get() { "idle" } else { "busy" };
            ClientInfo::new(self.name.clone(), status)
        }

        fn destroy(self) {
            self.destroyed.set(self.destroyed.get() + 1);
        }
    }

    type Recorder = Rc<RefCell<Vec<(String, &'static str)>>>;

    struct Harness {
        pool: ClientPool<MockClient, &'static str>,
        ready: Vec<Rc<Cell<bool>>>,
        destroyed: Rc<Cell<usize>>,
        recorder: Recorder,
    }

    impl Harness {
        fn new(client_count: usize, max_queue_depth: usize, initially_ready: bool) -> Self {
            let ready: Vec<_> = (0..client_count)
                .map(|_| Rc::new(Cell::new(initially_ready)))
                .collect();
            let destroyed = Rc::new(Cell::new(0));

            let config = PoolConfiguration::new().with_max_queue_depth(max_queue_depth);
            let pool = {
                let ready = ready.clone();
                let destroyed = Rc::clone(&destroyed);
                ClientPool::new(client_count, config, move |id| {
                    Ok(MockClient {
                        name: format!("client-{}", id.index()),
                        ready: Rc::clone(&ready[id.index()]),
                        destroyed: Rc::clone(&destroyed),
                    })
                })
                .unwrap()
            };

            Self {
                pool,
                ready,
                destroyed,
                recorder: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn request(&mut self, tag: &'static str) -> PoolResult<Dispatch> {
            let recorder = Rc::clone(&self.recorder);
            self.pool.get_client(
                move |client, ctx| recorder.borrow_mut().push((client.name.clone(), ctx)),
                tag,
            )
        }

        fn recorded(&self) -> Vec<(String, &'static str)> {
            self.recorder.borrow().clone()
        }
    }

    #[test]
    fn test_dispatches_first_ready_in_construction_order() {
        let mut h = Harness::new(3, 10, true);

        assert_eq!(h.request("a").unwrap(), Dispatch::Immediate);
        assert_eq!(h.request("b").unwrap(), Dispatch::Immediate);

        // Not round-robin: client-0 stays ready, so it wins both times.
        assert_eq!(
            h.recorded(),
            vec![
                ("client-0".to_string(), "a"),
                ("client-0".to_string(), "b"),
            ]
        );
    }

    #[test]
    fn test_skips_busy_clients_in_scan() {
        let mut h = Harness::new(3, 10, true);
        h.ready[0].set(false);

        assert_eq!(h.request("a").unwrap(), Dispatch::Immediate);
        assert_eq!(h.recorded(), vec![("client-1".to_string(), "a")]);
    }

    #[test]
    fn test_queues_when_all_busy() {
        let mut h = Harness::new(2, 10, false);

        assert_eq!(h.request("a").unwrap(), Dispatch::Queued);
        assert!(h.recorded().is_empty());
        assert_eq!(h.pool.queued_count(), 1);
    }

    #[test]
    fn test_rejects_when_queue_full() {
        let mut h = Harness::new(2, 2, false);

        assert_eq!(h.request("a").unwrap(), Dispatch::Queued);
        assert_eq!(h.request("b").unwrap(), Dispatch::Queued);
        assert!(matches!(h.request("c"), Err(PoolError::Saturated)));

        // Rejection mutates nothing.
        assert_eq!(h.pool.queued_count(), 2);
        assert!(h.recorded().is_empty());
    }

    #[test]
    fn test_fifo_fairness_across_releases() {
        let mut h = Harness::new(2, 10, false);

        h.request("a").unwrap();
        h.request("b").unwrap();
        h.request("c").unwrap();

        h.pool.client_released(ClientId::new(0));
        h.pool.client_released(ClientId::new(1));
        h.pool.client_released(ClientId::new(0));

        assert_eq!(
            h.recorded(),
            vec![
                ("client-0".to_string(), "a"),
                ("client-1".to_string(), "b"),
                ("client-0".to_string(), "c"),
            ]
        );
        assert_eq!(h.pool.queued_count(), 0);
    }

    #[test]
    fn test_at_most_one_handoff_per_release() {
        let mut h = Harness::new(1, 10, false);

        h.request("a").unwrap();
        h.request("b").unwrap();

        h.pool.client_released(ClientId::new(0));
        assert_eq!(h.recorded().len(), 1);
        assert_eq!(h.recorded()[0].1, "a");
        assert_eq!(h.pool.queued_count(), 1);
    }

    #[test]
    fn test_handoff_does_not_recheck_readiness() {
        let mut h = Harness::new(1, 10, false);
        h.request("a").unwrap();

        // The client still reports busy, but it just announced release, so
        // the hand-off trusts the notification.
        h.pool.client_released(ClientId::new(0));
        assert_eq!(h.recorded(), vec![("client-0".to_string(), "a")]);
    }

    #[test]
    fn test_release_with_empty_queue_is_noop() {
        let mut h = Harness::new(1, 10, false);

        h.pool.client_released(ClientId::new(0));
        assert!(h.recorded().is_empty());

        // The client becomes discoverable on the next admission scan.
        h.ready[0].set(true);
        assert_eq!(h.request("a").unwrap(), Dispatch::Immediate);
    }

    #[test]
    fn test_release_for_unknown_client_is_ignored() {
        let mut h = Harness::new(1, 10, false);
        h.request("a").unwrap();

        h.pool.client_released(ClientId::new(99));
        assert!(h.recorded().is_empty());
        assert_eq!(h.pool.queued_count(), 1);
    }

    #[test]
    fn test_teardown_discards_queued_without_firing() {
        let mut h = Harness::new(2, 10, false);
        h.request("a").unwrap();
        h.request("b").unwrap();

        let destroyed = Rc::clone(&h.destroyed);
        let recorder = Rc::clone(&h.recorder);
        h.pool.shutdown();

        assert!(recorder.borrow().is_empty());
        assert_eq!(destroyed.get(), 2);
    }

    #[test]
    fn test_drop_destroys_each_client_once() {
        let h = Harness::new(3, 10, true);
        let destroyed = Rc::clone(&h.destroyed);

        drop(h);
        assert_eq!(destroyed.get(), 3);
    }

    #[test]
    fn test_construction_failure_destroys_partial() {
        let destroyed = Rc::new(Cell::new(0));
        let config = PoolConfiguration::default();

        let result: PoolResult<ClientPool<MockClient>> = {
            let destroyed = Rc::clone(&destroyed);
            ClientPool::new(4, config, move |id| {
                if id.index() == 2 {
                    return Err(PoolError::Construction {
                        index: id.index(),
                        reason: "connect refused".to_string(),
                    });
                }
                Ok(MockClient {
                    name: format!("client-{}", id.index()),
                    ready: Rc::new(Cell::new(true)),
                    destroyed: Rc::clone(&destroyed),
                })
            })
        };

        assert!(matches!(result, Err(PoolError::Construction { index: 2, .. })));
        assert_eq!(destroyed.get(), 2);
    }

    #[test]
    fn test_saturation_scenario_two_clients_depth_one() {
        // Pool of 2 clients, queue depth 1, both busy.
        let mut h = Harness::new(2, 1, false);

        assert_eq!(h.request("x").unwrap(), Dispatch::Queued);
        assert!(matches!(h.request("y"), Err(PoolError::Saturated)));

        // Client 0 releases: x is resumed with it, queue drains.
        h.pool.client_released(ClientId::new(0));
        assert_eq!(h.recorded(), vec![("client-0".to_string(), "x")]);
        assert_eq!(h.pool.queued_count(), 0);

        // Client 0 now reports ready: z wins immediate dispatch.
        h.ready[0].set(true);
        assert_eq!(h.request("z").unwrap(), Dispatch::Immediate);
        assert_eq!(h.recorded().last().unwrap(), &("client-0".to_string(), "z"));
    }

    #[test]
    fn test_task_list_appends_tagged_infos() {
        let h = Harness::new(2, 10, true);

        let mut tasks = vec![ClientInfo::new("pre-existing", "idle")];
        h.pool.collect_task_list(&mut tasks, "main");

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].name, "pre-existing");
        assert_eq!(tasks[1].name, "client-0");
        assert_eq!(tasks[1].pool_name, "main");
        assert_eq!(tasks[2].name, "client-1");
        assert_eq!(tasks[2].pool_name, "main");
    }

    #[test]
    fn test_metrics_snapshot() {
        let mut h = Harness::new(2, 1, false);

        h.request("a").unwrap();
        let _ = h.request("b");
        h.pool.client_released(ClientId::new(0));
        h.pool.client_released(ClientId::new(1));

        let metrics = h.pool.metrics();
        assert_eq!(metrics.total_queued, 1);
        assert_eq!(metrics.total_rejected, 1);
        assert_eq!(metrics.total_handoffs, 1);
        assert_eq!(metrics.total_idle_releases, 1);
        assert_eq!(metrics.total_dispatched, 0);
        assert_eq!(metrics.queued_requests, 0);
        assert_eq!(metrics.client_count, 2);
    }

    #[test]
    fn test_health_status_reflects_saturation() {
        let h = Harness::new(2, 1, false);

        let health = h.pool.health_status();
        assert!(!health.is_healthy());

        h.ready[0].set(true);
        h.ready[1].set(true);
        let health = h.pool.health_status();
        assert!(health.is_healthy());
        assert_eq!(health.ready_clients, 2);
    }

    #[tokio::test]
    async fn test_release_events_from_channel() {
        // Models the event-driven integration: completion events arrive over
        // a channel and are applied to the pool one at a time.
        let mut h = Harness::new(1, 10, false);
        h.request("a").unwrap();
        h.request("b").unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.send(ClientId::new(0)).unwrap();
        tx.send(ClientId::new(0)).unwrap();
        drop(tx);

        while let Some(id) = rx.recv().await {
            h.pool.client_released(id);
        }

        assert_eq!(
            h.recorded(),
            vec![
                ("client-0".to_string(), "a"),
                ("client-0".to_string(), "b"),
            ]
        );
    }
}
