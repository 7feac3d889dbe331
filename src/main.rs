// clientpool - bounded pool of reusable network clients

// This is just a binary wrapper - the actual library is in lib.rs
// Run examples with: cargo run --example basic

use clientpool::{ClientInfo, ClientPool, PoolConfiguration, Poolable};

struct DemoClient {
    ready: bool,
}

impl Poolable for DemoClient {
    fn check_ready(&self) -> bool {
        self.ready
    }

    fn info(&self) -> ClientInfo {
        ClientInfo::new("demo", if self.ready { "idle" } else { "busy" })
    }

    fn destroy(self) {}
}

fn main() {
    println!("=== clientpool ===");
    println!("See demos/ directory for usage examples");
    println!("Run: cargo run --example basic");
    println!();

    // Quick demo
    println!("Quick Demo:");
    let mut pool = ClientPool::new(3, PoolConfiguration::default(), |_id| {
        Ok(DemoClient { ready: true })
    })
    .unwrap();

    let outcome = pool
        .get_client(|_client, ()| println!("  Got a ready client"), ())
        .unwrap();

    println!("  Dispatch outcome: {:?}", outcome);
    println!("  Ready clients: {}", pool.ready_count());
}
