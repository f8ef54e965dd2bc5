//! # Example: cancel
//!
//! Stops a ticker after its first pass and a long-running iterator from a timer.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► ticker(5 × 1s): stop() on first Iterate ─► Finished{ stopped }
//!   └─► iterator(unbounded): timer task calls stop() after 1s
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example cancel
//! ```

use std::time::{Duration, Instant};

use grr::{StatusKind, Thread};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== cancel example ===\n");

    // 1. Stop from the drain loop.
    let ticker = Thread::ticker(
        || async { println!("[ticker] tick") },
        Duration::from_secs(1),
        5,
    );
    let mut status = ticker.take_status().expect("fresh thread has its feed");
    let runner = ticker.clone();
    let begin = Instant::now();
    let handle = tokio::spawn(async move { runner.start().await });

    while let Some(ev) = status.recv().await {
        println!("[ticker] {:?} remaining={:?}", ev.kind, ev.remaining);
        if ev.kind == StatusKind::Iterate {
            ticker.stop();
        }
    }
    handle.await??;
    println!("[ticker] done in {:?}\n", begin.elapsed());

    // 2. Deadline: stop from a separately scheduled timer.
    let worker = Thread::iterator(
        || async { tokio::time::sleep(Duration::from_millis(100)).await },
        0,
    );
    let mut status = worker.take_status().expect("fresh thread has its feed");
    let runner = worker.clone();
    let handle = tokio::spawn(async move { runner.start().await });

    let timer = worker.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        timer.stop();
    });

    let mut passes = 0;
    while let Some(ev) = status.recv().await {
        match ev.kind {
            StatusKind::Iterate => passes += 1,
            StatusKind::Finished => println!("[worker] finished: {:?}", ev.reason),
            _ => {}
        }
    }
    handle.await??;
    println!("[worker] observed {passes} passes");

    Ok(())
}
