//! # Example: patterns
//!
//! Runs one thread of each execution pattern and prints its status feed.
//!
//! ## Run
//! ```bash
//! cargo run --example patterns --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use grr::{LogWriter, Thread};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let simple = Thread::builder()
        .with_name("simple")
        .simple(|| async { println!("[work] simple ran") });

    let n = Arc::new(AtomicU64::new(0));
    let iterator = {
        let n = n.clone();
        Thread::builder().with_name("iterator").iterator(
            move || {
                let n = n.clone();
                async move {
                    let this = n.fetch_add(1, Ordering::Relaxed) + 1;
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    println!("[work] iterator pass #{this}");
                }
            },
            3,
        )
    };

    let ticker = Thread::builder().with_name("ticker").ticker(
        || async { println!("[work] tick") },
        Duration::from_millis(500),
        3,
    );

    for thread in [simple, iterator, ticker] {
        let mut status = thread.take_status().expect("fresh thread has its feed");
        let writer = LogWriter::labeled(thread.name().unwrap_or("thread"));

        let runner = thread.clone();
        let handle = tokio::spawn(async move { runner.start().await });

        writer.follow(&mut status).await;
        handle.await??;
    }

    println!("iterator ran {} times", n.load(Ordering::Relaxed));
    Ok(())
}
