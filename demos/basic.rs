//! Basic usage examples for ClientPool

use clientpool::{
    ClientId, ClientInfo, ClientPool, MetricsExporter, PoolConfiguration, Poolable,
};
use std::cell::Cell;
use std::rc::Rc;

/// A stand-in for a network client whose busy state is flipped by the driver.
struct HttpClient {
    name: String,
    busy: Rc<Cell<bool>>,
}

impl Poolable for HttpClient {
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

fn build_pool(
    client_count: usize,
    max_queue_depth: usize,
) -> (
    ClientPool<HttpClient, u32>,
    Vec<Rc<Cell<bool>>>,
    Vec<ClientId>,
) {
    let busy: Vec<_> = (0..client_count)
        .map(|_| Rc::new(Cell::new(false)))
        .collect();
    let mut ids = Vec::new();

    let pool = {
        let busy = busy.clone();
        let ids = &mut ids;
        ClientPool::new(
            client_count,
            PoolConfiguration::new().with_max_queue_depth(max_queue_depth),
            |id| {
                ids.push(id);
                Ok(HttpClient {
                    name: format!("http-{}", ids.len() - 1),
                    busy: Rc::clone(&busy[ids.len() - 1]),
                })
            },
        )
        .unwrap()
    };

    (pool, busy, ids)
}

fn main() {
    println!("=== clientpool - Basic Examples ===\n");

    // Example 1: Immediate dispatch
    immediate_dispatch();

    // Example 2: Queueing and hand-off
    queueing_and_handoff();

    // Example 3: Saturation
    saturation();

    // Example 4: Diagnostics
    diagnostics();
}

fn immediate_dispatch() {
    println!("1. Immediate Dispatch:");
    let (mut pool, _busy, _ids) = build_pool(3, 10);

    let outcome = pool
        .get_client(|client, req| println!("   Request {} served by {}", req, client.name), 1)
        .unwrap();

    println!("   Outcome: {:?}\n", outcome);
}

fn queueing_and_handoff() {
    println!("2. Queueing and Hand-off:");
    let (mut pool, busy, ids) = build_pool(2, 10);

    // Mark every client busy, then submit two requests.
    for flag in &busy {
        flag.set(true);
    }

    for req in [1u32, 2] {
        let outcome = pool
            .get_client(
                move |client, req| println!("   Request {} resumed with {}", req, client.name),
                req,
            )
            .unwrap();
        println!("   Request {}: {:?}", req, outcome);
    }

    // Two release events drain the queue in FIFO order.
    pool.client_released(ids[0]);
    pool.client_released(ids[1]);
    println!();
}

fn saturation() {
    println!("3. Saturation:");
    let (mut pool, busy, _ids) = build_pool(1, 1);
    busy[0].set(true);

    let first = pool.get_client(|_client, _req| {}, 1).unwrap();
    println!("   First request: {:?}", first);

    match pool.get_client(|_client, _req| {}, 2) {
        Ok(outcome) => println!("   Second request: {:?}", outcome),
        Err(e) => println!("   Second request rejected: {}", e),
    }
    println!();
}

fn diagnostics() {
    println!("4. Diagnostics:");
    let (mut pool, busy, _ids) = build_pool(3, 10);
    busy[0].set(true);

    let _ = pool.get_client(|_client, _req| {}, 1);

    let mut tasks = Vec::new();
    pool.collect_task_list(&mut tasks, "demo");
    for info in &tasks {
        println!("   [{}] {} is {}", info.pool_name, info.name, info.status);
    }

    let health = pool.health_status();
    println!(
        "   Health: {}",
        if health.is_healthy() { "Healthy" } else { "Unhealthy" }
    );
    println!("   Utilization: {:.1}%", health.utilization * 100.0);

    println!("\n   Prometheus export:");
    let output = MetricsExporter::export_prometheus(&pool.metrics(), "demo", None);
    for line in output.lines().filter(|l| !l.starts_with('#')) {
        println!("     {}", line);
    }
}
