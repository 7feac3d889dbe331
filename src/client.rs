//! Client capability trait and per-client bookkeeping

/// Opaque token identifying one client slot within its pool.
///
/// The pool hands a `ClientId` to the client factory at construction time;
/// the client's event source passes it back to
/// [`ClientPool::client_released`](crate::ClientPool::client_released) each
/// time the client transitions from busy back to idle. The token is a
/// non-owning association - the pool owns the client, the client only knows
/// its own identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(usize);

impl ClientId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Capability set every pooled client must supply
///
/// The pool never inspects the client beyond these three capabilities:
/// readiness is re-derived by calling [`check_ready`](Poolable::check_ready)
/// on every admission scan, diagnostics go through
/// [`info`](Poolable::info), and [`destroy`](Poolable::destroy) runs exactly
/// once at pool teardown.
pub trait Poolable {
    /// True iff the client can accept new work right now.
    ///
    /// Must be side-effect-free and cheap: it runs synchronously on every
    /// dispatch attempt.
    fn check_ready(&self) -> bool;

    /// Diagnostics snapshot. Must not mutate client state.
    fn info(&self) -> ClientInfo;

    /// Release the client's resources. Called exactly once, at teardown.
    fn destroy(self);
}

/// Read-only snapshot of one client, used for external introspection
///
/// The identity and status fields are owned by the client implementation;
/// `pool_name` is filled in by the pool when the snapshot is collected.
/// Never consulted for dispatch decisions.
///
/// # Examples
///
/// ```
/// use clientpool::ClientInfo;
///
/// let info = ClientInfo::new("http-1", "idle");
/// assert_eq!(info.name, "http-1");
/// assert!(info.pool_name.is_empty());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClientInfo {
    /// Client identity as reported by the implementation
    pub name: String,

    /// Implementation-reported state, e.g. the request currently in flight
    pub status: String,

    /// Name of the owning pool, set during collection
    pub pool_name: String,
}

impl ClientInfo {
    /// Create a new snapshot with an empty pool name
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            pool_name: String::new(),
        }
    }
}

/// One slot in the pool: a client plus its identity.
///
/// The pool holds no busy/idle flag here; readiness always comes from the
/// client itself at decision time.
pub(crate) struct PooledClient<C> {
    id: ClientId,
    inner: C,
}

impl<C: Poolable> PooledClient<C> {
    pub(crate) fn new(id: ClientId, inner: C) -> Self {
        Self { id, inner }
    }

    #[allow(dead_code)]
    pub(crate) fn id(&self) -> ClientId {
        self.id
    }

    pub(crate) fn check_ready(&self) -> bool {
        self.inner.check_ready()
    }

    pub(crate) fn client_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    pub(crate) fn tagged_info(&self, pool_name: &str) -> ClientInfo {
        let mut info = self.inner.info();
        info.pool_name = pool_name.to_string();
        info
    }

    pub(crate) fn into_inner(self) -> C {
        self.inner
    }
}
