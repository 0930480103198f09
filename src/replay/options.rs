/// The largest number of elements a replay buffer can ever hold.
///
/// The buffer's published count shares its word with a completion flag, so
/// one bit of `usize` is unavailable.
pub const MAX_REPLAY_CAPACITY: usize = usize::MAX >> 1;

/// Sizing of a [`Replayable`](super::Replayable) buffer.
///
/// # Examples
///
/// ```rust
/// use railyard::replay::ReplayOptions;
///
/// let options = ReplayOptions::default().with_initial_capacity(16).with_max_capacity(1024);
/// assert_eq!(options.initial_capacity(), 16);
/// assert_eq!(options.max_capacity(), 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplayOptions {
    initial_capacity: usize,
    max_capacity: usize,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 4,
            max_capacity: MAX_REPLAY_CAPACITY,
        }
    }
}

impl ReplayOptions {
    /// Sets how many elements are reserved up front.
    ///
    /// Clamped to the maximum capacity.
    #[must_use]
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self.clamp()
    }

    /// Sets the most elements the buffer may hold.
    ///
    /// Clamped to [`MAX_REPLAY_CAPACITY`]; the initial capacity is lowered to
    /// match if needed.
    #[must_use]
    pub const fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = if max_capacity > MAX_REPLAY_CAPACITY {
            MAX_REPLAY_CAPACITY
        } else {
            max_capacity
        };
        self.clamp()
    }

    /// Elements reserved up front.
    #[inline]
    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// The most elements the buffer may hold.
    #[inline]
    pub const fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    const fn clamp(mut self) -> Self {
        if self.initial_capacity > self.max_capacity {
            self.initial_capacity = self.max_capacity;
        }
        self
    }
}
