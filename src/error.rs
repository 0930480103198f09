//! Error types shared across the crate.
//!
//! Domain failures travel as data in `Err`/`None` and never appear here.
//! These types cover the two exceptional paths: a panic caught at a
//! `try_map`/`attempt` boundary, and a fault inside a replayed source.

use std::any::Any;

/// A panic captured at a panic-catching boundary.
///
/// Created by [`attempt`](crate::result::attempt),
/// [`ResultExt::try_map`](crate::result::ResultExt::try_map) and the replay
/// buffer. Only the panic message is kept; the original payload is not
/// `Clone` and is dropped after inspection.
///
/// # Examples
///
/// ```rust
/// use railyard::CaughtPanic;
///
/// let caught = CaughtPanic::new("boom");
/// assert_eq!(caught.message(), "boom");
/// assert_eq!(format!("{caught}"), "panicked: boom");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("panicked: {message}")]
pub struct CaughtPanic {
    message: String,
}

impl CaughtPanic {
    /// Creates a caught panic carrying `message`.
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extracts the message from a panic payload.
    ///
    /// `panic!` payloads are either `&'static str` or `String`; anything else
    /// is reported as a non-string payload.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&'static str>()
            .map(|message| (*message).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self { message }
    }

    /// Returns the panic message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors reported by a [`Replayable`](crate::replay::Replayable) source.
///
/// A replay error is terminal: once a reader observes one at index `n`, every
/// reader asking for `n` or later observes the same error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// The underlying iterator panicked while producing the element at `index`.
    #[error("replayed source panicked while producing element {index}")]
    SourcePanicked {
        /// Index of the element whose production panicked.
        index: usize,
        /// The captured panic.
        #[source]
        panic: CaughtPanic,
    },
    /// The buffer would have to grow past its configured maximum.
    #[error("replay buffer cannot hold more than {max_capacity} elements")]
    CapacityExceeded {
        /// The configured maximum number of buffered elements.
        max_capacity: usize,
    },
}
