//! Appending a single trailing element to a lazy iterator.

use std::iter::FusedIterator;

/// Progress of an [`Append`] adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppendState {
    /// Forwarding upstream elements.
    Draining,
    /// Upstream is exhausted; the appended element is next.
    Appending,
    /// Everything has been yielded.
    Done,
}

/// Yields every upstream element, then exactly one appended element.
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Append<I, T> {
    source: Option<I>,
    element: Option<T>,
    state: AppendState,
}

impl<I, T> Append<I, T> {
    pub(crate) const fn new(source: I, element: T) -> Self {
        Self {
            source: Some(source),
            element: Some(element),
            state: AppendState::Draining,
        }
    }

    /// The current state.
    pub const fn state(&self) -> AppendState {
        self.state
    }
}

impl<I, T> Iterator for Append<I, T>
where
    I: Iterator<Item = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                AppendState::Draining => match self.source.as_mut().and_then(Iterator::next) {
                    Some(item) => return Some(item),
                    None => {
                        self.source = None;
                        self.state = AppendState::Appending;
                    }
                },
                AppendState::Appending => {
                    self.state = AppendState::Done;
                    return self.element.take();
                }
                AppendState::Done => return None,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let trailing = usize::from(self.element.is_some());
        match (&self.source, self.state) {
            (Some(source), AppendState::Draining) => {
                let (lower, upper) = source.size_hint();
                (
                    lower.saturating_add(trailing),
                    upper.and_then(|upper| upper.checked_add(trailing)),
                )
            }
            _ => (trailing, Some(trailing)),
        }
    }
}

impl<I, T> FusedIterator for Append<I, T> where I: Iterator<Item = T> {}
