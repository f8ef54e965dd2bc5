//! # Example: capture
//!
//! Shows the two failure policies for work that panics.
//!
//! ## Run
//! ```bash
//! cargo run --example capture
//! ```

use grr::{FailurePolicy, Thread};

async fn flaky() {
    panic!("database unreachable");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Capture: the panic becomes a Finished reason and a ThreadError.
    let captured = Thread::builder()
        .with_name("captured")
        .with_failure_policy(FailurePolicy::Capture)
        .iterator(flaky, 3);
    let mut status = captured.take_status().expect("fresh thread has its feed");

    let runner = captured.clone();
    let res = tokio::spawn(async move { runner.start().await }).await?;
    for ev in status.until_finished().await {
        println!("[captured] {:?} reason={:?}", ev.kind, ev.reason);
    }
    if let Err(e) = res {
        println!("[captured] start returned {} ({})", e.as_label(), e);
    }

    // Propagate (default): the panic tears down the enclosing task.
    let propagated = Thread::simple(flaky);
    let mut status = propagated.take_status().expect("fresh thread has its feed");
    let runner = propagated.clone();
    let join = tokio::spawn(async move { runner.start().await }).await;
    drop(propagated);

    while let Some(ev) = status.recv().await {
        println!("[propagated] {:?}", ev.kind);
    }
    println!("[propagated] task panicked: {}", join.is_err());
    Ok(())
}
