//! Event-loop integration example
//!
//! Runs the pool inside a single-threaded tokio runtime: simulated work
//! completes on timers and reports back over a channel, and the driver task
//! applies each completion to the pool as a release event.

use clientpool::{ClientId, ClientInfo, ClientPool, Dispatch, PoolConfiguration, Poolable};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;

struct Worker {
    id: ClientId,
    name: String,
    busy: Rc<Cell<bool>>,
    done_tx: mpsc::UnboundedSender<ClientId>,
}

impl Worker {
    /// Start one unit of simulated work; completion is reported over the
    /// channel once the timer fires.
    fn begin_request(&mut self, request: u32) {
        println!("   {} starts request {}", self.name, request);
        self.busy.set(true);

        let id = self.id;
        let busy = Rc::clone(&self.busy);
        let done_tx = self.done_tx.clone();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            busy.set(false);
            let _ = done_tx.send(id);
        });
    }
}

impl Poolable for Worker {
    fn check_ready(&self) -> bool {
        !self.busy.get()
    }

    fn info(&self) -> ClientInfo {
        ClientInfo::new(
            self.name.clone(),
            if self.busy.get() { "busy" } else { "idle" },
        )
    }

    fn destroy(self) {
        println!("   Closing {}", self.name);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let local = tokio::task::LocalSet::new();
    local.run_until(run()).await;
}

async fn run() {
    println!("=== clientpool - Event Loop Example ===\n");

    let (done_tx, mut done_rx) = mpsc::unbounded_channel();

    let mut pool = {
        let done_tx = done_tx.clone();
        let mut next = 0;
        ClientPool::new(
            2,
            PoolConfiguration::new().with_max_queue_depth(4),
            move |id| {
                let name = format!("worker-{}", next);
                next += 1;
                Ok(Worker {
                    id,
                    name,
                    busy: Rc::new(Cell::new(false)),
                    done_tx: done_tx.clone(),
                })
            },
        )
        .unwrap()
    };

    // Submit a burst of requests: two win clients immediately, four wait,
    // anything beyond the queue bound would be rejected.
    let mut accepted = 0;
    for request in 0..6u32 {
        match pool.get_client(
            |worker: &mut Worker, request| worker.begin_request(request),
            request,
        ) {
            Ok(Dispatch::Immediate) => {
                accepted += 1;
                println!("   request {} dispatched", request);
            }
            Ok(Dispatch::Queued) => {
                accepted += 1;
                println!("   request {} queued", request);
            }
            Err(e) => println!("   request {} rejected: {}", request, e),
        }
    }

    // Drive the pool: each completion releases a client, which resumes the
    // oldest queued request inline.
    let mut finished = 0;
    while finished < accepted {
        let id = done_rx.recv().await.expect("completion channel closed");
        finished += 1;
        pool.client_released(id);
    }

    let metrics = pool.metrics();
    println!("\n   dispatched={} queued={} handoffs={}",
        metrics.total_dispatched, metrics.total_queued, metrics.total_handoffs);
}
