//! # LogWriter - simple status printer
//!
//! Prints [`StatusEvent`]s to stdout, one line per event.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [pending] seq=0
//! [started] seq=1
//! [iterate] seq=2 pass=1 remaining=Some(2)
//! [finished] seq=5 reason="completed"
//! ```

use crate::status::{Status, StatusEvent, StatusKind};

/// Status event printer.
#[derive(Default)]
pub struct LogWriter {
    label: Option<String>,
}

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a writer that prefixes every line with `label`.
    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }

    /// Formats one event.
    pub fn line(&self, e: &StatusEvent) -> String {
        let body = match e.kind {
            StatusKind::Pending | StatusKind::Started => format!("[{}] seq={}", e.kind, e.seq),
            StatusKind::Iterate => format!(
                "[iterate] seq={} pass={} remaining={:?}",
                e.seq,
                e.pass.unwrap_or_default(),
                e.remaining
            ),
            StatusKind::Finished => format!(
                "[finished] seq={} reason={:?}",
                e.seq,
                e.reason.as_deref().unwrap_or("unknown")
            ),
        };
        match &self.label {
            Some(label) => format!("{label} {body}"),
            None => body,
        }
    }

    /// Prints one event.
    pub fn write(&self, e: &StatusEvent) {
        println!("{}", self.line(e));
    }

    /// Prints events until `Finished` (inclusive) or until the feed closes.
    pub async fn follow(&self, status: &mut Status) {
        while let Some(e) = status.recv().await {
            self.write(&e);
            if e.is_terminal() {
                break;
            }
        }
    }
}
