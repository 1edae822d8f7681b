//! Error types for registry operations.

/// Error type for timer registry operations.
///
/// Caller contract violations (tic/toc imbalance, double toc on a known
/// timer) are *not* represented here; they silently produce meaningless
/// statistics. Only the conditions the registry can detect cheaply are
/// surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// `toc` was called with a name that was never passed to `tic`.
    UnknownTimer(String),
    /// The default window size cannot change once timers exist, because the
    /// resulting histories would not be statistically comparable.
    WindowLocked {
        /// Number of timers already registered.
        active_timers: usize,
    },
    /// A dispatch name did not end in a recognized `_tic`/`_toc` suffix.
    UnknownDispatch(String),
    /// A scope exit did not match the most recently entered scope name.
    ScopeMismatch {
        /// Name on top of the context stack (or `<empty>`).
        expected: String,
        /// Name the caller tried to exit.
        found: String,
    },
}

impl std::fmt::Display for TimerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerError::UnknownTimer(name) => {
                write!(f, "trying to toc a non-existent timer named '{}'", name)
            }
            TimerError::WindowLocked { active_timers } => {
                write!(
                    f,
                    "cannot change window size while {} timer(s) exist",
                    active_timers
                )
            }
            TimerError::UnknownDispatch(call) => {
                write!(
                    f,
                    "'{}' does not end in a recognized timer suffix (_tic/_toc)",
                    call
                )
            }
            TimerError::ScopeMismatch { expected, found } => {
                write!(
                    f,
                    "scope exit out of order: expected '{}', got '{}'",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for TimerError {}
