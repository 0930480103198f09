//! Per-element validation into `Result` or `Option`.
//!
//! A validation returns `Result<(), F>` (or `Option<()>`); the element is kept
//! on `Ok(())` / `Some(())` and replaced by the failure otherwise. Sources
//! that already carry `Result`/`Option` elements validate only their
//! successes and pass failures through untouched.

use std::iter::FusedIterator;

/// Maps every element to `Ok(element)` or the failure its validation produced.
///
/// Returned by [`where_valid`](crate::sequence::SequenceExt::where_valid).
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct WhereValid<I, Validate> {
    source: I,
    validate: Validate,
}

impl<I, Validate> WhereValid<I, Validate> {
    pub(crate) const fn new(source: I, validate: Validate) -> Self {
        Self { source, validate }
    }
}

impl<I, Validate, F> Iterator for WhereValid<I, Validate>
where
    I: Iterator,
    Validate: FnMut(&I::Item) -> Result<(), F>,
{
    type Item = Result<I::Item, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.source.next()?;
        Some((self.validate)(&item).map(|()| item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<I, Validate, F> FusedIterator for WhereValid<I, Validate>
where
    I: FusedIterator,
    Validate: FnMut(&I::Item) -> Result<(), F>,
{
}

/// Validates the successes of a `Result` iterator; failures pass through.
///
/// Returned by [`where_valid_ok`](crate::sequence::ResultSequenceExt::where_valid_ok).
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct WhereValidOk<I, Validate> {
    source: I,
    validate: Validate,
}

impl<I, Validate> WhereValidOk<I, Validate> {
    pub(crate) const fn new(source: I, validate: Validate) -> Self {
        Self { source, validate }
    }
}

impl<I, Validate, T, F> Iterator for WhereValidOk<I, Validate>
where
    I: Iterator<Item = Result<T, F>>,
    Validate: FnMut(&T) -> Result<(), F>,
{
    type Item = Result<T, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.source.next()?;
        Some(item.and_then(|value| (self.validate)(&value).map(|()| value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<I, Validate, T, F> FusedIterator for WhereValidOk<I, Validate>
where
    I: FusedIterator<Item = Result<T, F>>,
    Validate: FnMut(&T) -> Result<(), F>,
{
}

/// Maps every element to `Some(element)` or `None` when its check fails.
///
/// Returned by [`where_present`](crate::sequence::SequenceExt::where_present).
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct WherePresent<I, Check> {
    source: I,
    check: Check,
}

impl<I, Check> WherePresent<I, Check> {
    pub(crate) const fn new(source: I, check: Check) -> Self {
        Self { source, check }
    }
}

impl<I, Check> Iterator for WherePresent<I, Check>
where
    I: Iterator,
    Check: FnMut(&I::Item) -> Option<()>,
{
    type Item = Option<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.source.next()?;
        Some((self.check)(&item).map(|()| item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

/// Checks the present values of an `Option` iterator; `None` passes through.
///
/// Returned by [`where_some`](crate::sequence::OptionSequenceExt::where_some).
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct WhereSome<I, Check> {
    source: I,
    check: Check,
}

impl<I, Check> WhereSome<I, Check> {
    pub(crate) const fn new(source: I, check: Check) -> Self {
        Self { source, check }
    }
}

impl<I, Check, T> Iterator for WhereSome<I, Check>
where
    I: Iterator<Item = Option<T>>,
    Check: FnMut(&T) -> Option<()>,
{
    type Item = Option<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.source.next()?;
        Some(item.and_then(|value| (self.check)(&value).map(|()| value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}
