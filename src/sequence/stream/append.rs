//! One trailing element after a stream ends.
//!
//! The upstream is dropped as soon as it reports exhaustion; the appended
//! element is yielded exactly once.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;

use crate::sequence::AppendState;

pin_project! {
    /// Yields every upstream element, then exactly one appended element.
    #[must_use = "streams do nothing unless polled"]
    pub struct AppendStream<S, T> {
        #[pin]
        source: Option<S>,
        element: Option<T>,
        state: AppendState,
    }
}

impl<S, T> AppendStream<S, T> {
    pub(crate) const fn new(source: S, element: T) -> Self {
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

impl<S, T> Stream for AppendStream<S, T>
where
    S: Stream<Item = T>,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let mut this = self.project();
        if *this.state == AppendState::Draining {
            if let Some(source) = this.source.as_mut().as_pin_mut()
                && let Some(item) = ready!(source.poll_next(cx))
            {
                return Poll::Ready(Some(item));
            }
            this.source.set(None);
            *this.state = AppendState::Appending;
        }
        if *this.state == AppendState::Appending {
            *this.state = AppendState::Done;
            return Poll::Ready(this.element.take());
        }
        Poll::Ready(None)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            AppendState::Draining => {
                let (lower, upper) = self.source.as_ref().map_or((0, Some(0)), Stream::size_hint);
                (lower.saturating_add(1), upper.and_then(|upper| upper.checked_add(1)))
            }
            AppendState::Appending => (1, Some(1)),
            AppendState::Done => (0, Some(0)),
        }
    }
}

impl<S, T> FusedStream for AppendStream<S, T>
where
    S: Stream<Item = T>,
{
    fn is_terminated(&self) -> bool {
        self.state == AppendState::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use futures::executor::block_on;
    use futures::stream;

    #[test]
    fn appends_after_exhaustion_exactly_once() {
        let mut appended = AppendStream::new(stream::iter(vec![1, 2]), 3);
        let values: Vec<i32> = block_on((&mut appended).collect());
        assert_eq!(values, vec![1, 2, 3]);
        assert!(appended.is_terminated());
        assert_eq!(block_on(appended.next()), None);
    }

    #[test]
    fn exhausted_source_is_released_before_the_element() {
        struct Flag(std::rc::Rc<std::cell::Cell<bool>>);
        impl Drop for Flag {
            fn drop(&mut self) {
                self.0.set(true);
            }
        }

        let dropped = std::rc::Rc::new(std::cell::Cell::new(false));
        let flag = Flag(std::rc::Rc::clone(&dropped));
        let source = stream::iter(vec![1]).map(move |value| {
            let _alive = &flag;
            value
        });
        let mut appended = AppendStream::new(source, 2);

        assert_eq!(block_on(appended.next()), Some(1));
        assert!(!dropped.get());
        assert_eq!(block_on(appended.next()), Some(2));
        assert!(dropped.get());
        assert_eq!(appended.state(), AppendState::Done);
    }
}
