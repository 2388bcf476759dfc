#![forbid(unsafe_code)]

//! Structured logging hooks.
//!
//! Gesture code logs through the `debug!`, `trace!` and `warn!` macros at the
//! crate root. With the `tracing` feature they are the `tracing` macros, so
//! every state transition, tag change, deferred task and settle decision is a
//! structured event. Without the feature they expand to nothing and their
//! arguments are never evaluated.
//!
//! | Level | Emitted for |
//! |-------|-------------|
//! | `warn` | malformed pointer sequences (move or release without a down) |
//! | `debug` | state transitions, scroll start/finish, cancellation, settle decisions |
//! | `trace` | tag changes, cycle boundaries, deferred task scheduling |

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Discards a debug event when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards a trace event when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Discards a warning when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

/// Install a global JSON subscriber filtered by `RUST_LOG`.
///
/// Fails if another global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn install_json_subscriber() -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn macros_accept_structured_fields() {
        let offset = 12;
        let state = crate::gesture::GestureState::Flinging;
        crate::debug!(offset, state = ?state, "structured");
        crate::trace!(tag = true, "flag");
        crate::warn!(action = ?state, "warned");
    }

    #[cfg(feature = "tracing-json")]
    #[test]
    fn second_install_fails() {
        let _ = super::install_json_subscriber();
        assert!(super::install_json_subscriber().is_err());
    }
}
