//! The `Option` algebra.
//!
//! `Option` is the payload-free sibling of `Result`: `Some` is the success
//! channel and `None` carries no failure value. [`OptionExt`] gives it the
//! same vocabulary as [`ResultExt`](crate::result::ResultExt) so both read the
//! same in a pipeline.
//!
//! # Examples
//!
//! ```rust
//! use railyard::option::{self, OptionExt};
//!
//! let port = option::some("8080")
//!     .bind(|text| text.parse::<u16>().ok())
//!     .where_or_none(|port| *port >= 1024)
//!     .ok_or_failure(|| "privileged or missing port");
//! assert_eq!(port, Ok(8080));
//! ```

use crate::error::CaughtPanic;
use crate::result::attempt;

/// Creates a present value.
#[inline]
pub const fn some<T>(value: T) -> Option<T> {
    Some(value)
}

/// Creates an absent value.
#[inline]
pub const fn none<T>() -> Option<T> {
    None
}

/// Creates `Some(value)` when `is_some` holds, otherwise `None`.
#[inline]
pub fn create<T>(is_some: bool, value: T) -> Option<T> {
    is_some.then_some(value)
}

/// Railway-oriented combinators for `Option`.
pub trait OptionExt<T>: Sized {
    /// Eliminates the option by applying exactly one of two functions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::option::OptionExt;
    ///
    /// assert_eq!(Some(2).fold(|value| value * 10, || -1), 20);
    /// assert_eq!(None::<i32>.fold(|value| value * 10, || -1), -1);
    /// ```
    fn fold<R, OnSome, OnNone>(self, on_some: OnSome, on_none: OnNone) -> R
    where
        OnSome: FnOnce(T) -> R,
        OnNone: FnOnce() -> R;

    /// Splits the option into a presence flag and the value slot.
    fn try_get_value(self) -> (bool, Option<T>);

    /// Passes the value to `bind`, which itself returns an option.
    fn bind<U, Bind>(self, bind: Bind) -> Option<U>
    where
        Bind: FnOnce(T) -> Option<U>;

    /// Keeps the value only if it satisfies `predicate`.
    fn where_or_none<Predicate>(self, predicate: Predicate) -> Self
    where
        Predicate: FnOnce(&T) -> bool;

    /// Runs a side effect on a present value.
    fn tap<OnSome>(self, on_some: OnSome) -> Self
    where
        OnSome: FnOnce(&T);

    /// Runs a side effect when the value is absent.
    fn tap_none<OnNone>(self, on_none: OnNone) -> Self
    where
        OnNone: FnOnce();

    /// Converts into a `Result`, building the failure only when absent.
    fn ok_or_failure<F, FailureFactory>(self, failure_factory: FailureFactory) -> Result<T, F>
    where
        FailureFactory: FnOnce() -> F;

    /// LINQ-style bind that combines the outer and the bound values.
    fn select_many<B, R, Bind, Selector>(self, bind: Bind, selector: Selector) -> Option<R>
    where
        Bind: FnOnce(&T) -> Option<B>,
        Selector: FnOnce(T, B) -> R;

    /// Maps the value inside a panic-catching boundary.
    ///
    /// A panic in `map` yields `None`; the caught panic is handed to
    /// `on_panic` for inspection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::option::OptionExt;
    ///
    /// let mut seen = None;
    /// let value = Some(0).try_map(|divisor: i32| 10 / divisor, |panic| seen = Some(panic));
    /// assert_eq!(value, None);
    /// assert!(seen.is_some());
    /// ```
    fn try_map<U, Map, OnPanic>(self, map: Map, on_panic: OnPanic) -> Option<U>
    where
        Map: FnOnce(T) -> U,
        OnPanic: FnOnce(CaughtPanic);
}

impl<T> OptionExt<T> for Option<T> {
    #[inline]
    fn fold<R, OnSome, OnNone>(self, on_some: OnSome, on_none: OnNone) -> R
    where
        OnSome: FnOnce(T) -> R,
        OnNone: FnOnce() -> R,
    {
        match self {
            Some(value) => on_some(value),
            None => on_none(),
        }
    }

    #[inline]
    fn try_get_value(self) -> (bool, Option<T>) {
        (self.is_some(), self)
    }

    #[inline]
    fn bind<U, Bind>(self, bind: Bind) -> Option<U>
    where
        Bind: FnOnce(T) -> Option<U>,
    {
        self.fold(bind, || None)
    }

    #[inline]
    fn where_or_none<Predicate>(self, predicate: Predicate) -> Self
    where
        Predicate: FnOnce(&T) -> bool,
    {
        self.filter(predicate)
    }

    #[inline]
    fn tap<OnSome>(self, on_some: OnSome) -> Self
    where
        OnSome: FnOnce(&T),
    {
        if let Some(value) = &self {
            on_some(value);
        }
        self
    }

    #[inline]
    fn tap_none<OnNone>(self, on_none: OnNone) -> Self
    where
        OnNone: FnOnce(),
    {
        if self.is_none() {
            on_none();
        }
        self
    }

    #[inline]
    fn ok_or_failure<F, FailureFactory>(self, failure_factory: FailureFactory) -> Result<T, F>
    where
        FailureFactory: FnOnce() -> F,
    {
        self.fold(Ok, || Err(failure_factory()))
    }

    #[inline]
    fn select_many<B, R, Bind, Selector>(self, bind: Bind, selector: Selector) -> Option<R>
    where
        Bind: FnOnce(&T) -> Option<B>,
        Selector: FnOnce(T, B) -> R,
    {
        self.bind(|value| bind(&value).map(|bound| selector(value, bound)))
    }

    fn try_map<U, Map, OnPanic>(self, map: Map, on_panic: OnPanic) -> Option<U>
    where
        Map: FnOnce(T) -> U,
        OnPanic: FnOnce(CaughtPanic),
    {
        self.bind(|value| match attempt(|| map(value)) {
            Ok(mapped) => Some(mapped),
            Err(panic) => {
                on_panic(panic);
                None
            }
        })
    }
}
