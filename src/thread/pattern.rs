use std::fmt;

/// Execution pattern of a thread, fixed at construction.
///
/// ```text
/// Simple   → work()                                   (once)
/// Iterator → work() × N                               (N <= 0: until stopped)
/// Ticker   → work(), sleep, work(), ..., sleep, work() (no sleep after the last pass)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Invoke the work exactly once.
    Simple,
    /// Invoke the work up to N times back to back.
    Iterator,
    /// Invoke the work up to N times with a fixed delay between passes.
    Ticker,
}

impl Pattern {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Pattern::Simple => "simple",
            Pattern::Iterator => "iterator",
            Pattern::Ticker => "ticker",
        }
    }

    /// `true` for patterns that run a pass loop and emit `Iterate` events.
    #[inline]
    pub fn is_looping(&self) -> bool {
        !matches!(self, Pattern::Simple)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
