//! The `Result` algebra.
//!
//! `std::result::Result` already is the closed two-variant union this crate
//! builds on: `Ok` is the success channel and `Err` the failure channel.
//! This module adds the vocabulary of railway-oriented programming on top:
//!
//! - factories: [`success`], [`failure`], [`create`], [`create_with`],
//!   [`create_async`], [`unit`], [`ensure`], [`ensure_with`]
//! - panic boundaries: [`attempt`], [`attempt_with`], [`attempt_as`]
//! - aggregation: [`zip2`] … [`zip9`] and the [`zip!`](crate::zip) macro,
//!   which collect *every* failure instead of stopping at the first
//! - the [`ResultExt`] extension trait: `fold`, `bind`, the failure-channel
//!   mirrors, `where_or`, `tap`, `try_map`, `select_many`, `swap`
//!
//! # Laws
//!
//! `bind` is monadic sequencing and short-circuits:
//!
//! ```text
//! failure(e).bind(f) == failure(e)        // f is never invoked
//! success(a).bind(f) == f(a)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use railyard::result::{self, ResultExt};
//!
//! fn parse(input: &str) -> Result<i32, String> {
//!     input.parse::<i32>().map_err(|error| error.to_string())
//! }
//!
//! let outcome = parse("21")
//!     .bind(|value| result::success(value * 2))
//!     .where_or(|value| *value % 2 == 0, |value| format!("{value} is odd"))
//!     .fold(|value| format!("ok: {value}"), |error| format!("error: {error}"));
//! assert_eq!(outcome, "ok: 42");
//! ```

mod attempt;
mod zip;

#[cfg(feature = "async")]
pub mod future;

pub use attempt::{attempt, attempt_as, attempt_with};
pub use zip::{zip2, zip3, zip4, zip5, zip6, zip7, zip8, zip9};

use std::any::Any;
use std::future::Future;

use crate::error::CaughtPanic;

// =============================================================================
// Factories
// =============================================================================

/// Creates a result holding a success value.
///
/// # Examples
///
/// ```rust
/// let value: Result<i32, String> = railyard::result::success(42);
/// assert_eq!(value, Ok(42));
/// ```
#[inline]
pub fn success<S, F>(value: S) -> Result<S, F> {
    Ok(value)
}

/// Creates a result holding a failure value.
///
/// # Examples
///
/// ```rust
/// let value: Result<i32, &str> = railyard::result::failure("missing");
/// assert_eq!(value, Err("missing"));
/// ```
#[inline]
pub fn failure<S, F>(error: F) -> Result<S, F> {
    Err(error)
}

/// Creates a result from a discriminating flag.
///
/// Holds `success` when `is_success` is `true`, otherwise `failure`. The
/// unused value is dropped.
///
/// # Examples
///
/// ```rust
/// use railyard::result::create;
///
/// assert_eq!(create(true, 1, "no"), Ok(1));
/// assert_eq!(create(false, 1, "no"), Err("no"));
/// ```
#[inline]
pub fn create<S, F>(is_success: bool, success: S, failure: F) -> Result<S, F> {
    if is_success { Ok(success) } else { Err(failure) }
}

/// Creates a result from a discriminating flag, producing only the needed value.
///
/// Exactly one of the two factories is invoked.
///
/// # Examples
///
/// ```rust
/// use railyard::result::create_with;
///
/// let value: Result<String, String> =
///     create_with(false, || unreachable!(), || "rejected".to_string());
/// assert_eq!(value, Err("rejected".to_string()));
/// ```
#[inline]
pub fn create_with<S, F, SuccessFactory, FailureFactory>(
    is_success: bool,
    success_factory: SuccessFactory,
    failure_factory: FailureFactory,
) -> Result<S, F>
where
    SuccessFactory: FnOnce() -> S,
    FailureFactory: FnOnce() -> F,
{
    if is_success {
        Ok(success_factory())
    } else {
        Err(failure_factory())
    }
}

/// Asynchronous form of [`create_with`]: exactly one factory future is
/// created and awaited.
pub async fn create_async<S, F, SuccessFactory, SuccessFuture, FailureFactory, FailureFuture>(
    is_success: bool,
    success_factory: SuccessFactory,
    failure_factory: FailureFactory,
) -> Result<S, F>
where
    SuccessFactory: FnOnce() -> SuccessFuture,
    SuccessFuture: Future<Output = S>,
    FailureFactory: FnOnce() -> FailureFuture,
    FailureFuture: Future<Output = F>,
{
    if is_success {
        Ok(success_factory().await)
    } else {
        Err(failure_factory().await)
    }
}

/// A successful result carrying no value.
#[inline]
pub const fn unit<F>() -> Result<(), F> {
    Ok(())
}

/// Succeeds with `()` when `condition` holds, otherwise fails with `failure`.
///
/// # Examples
///
/// ```rust
/// use railyard::result::ensure;
///
/// assert_eq!(ensure(3 > 2, "math is broken"), Ok(()));
/// assert_eq!(ensure(2 > 3, "math is broken"), Err("math is broken"));
/// ```
#[inline]
pub fn ensure<F>(condition: bool, failure: F) -> Result<(), F> {
    if condition { Ok(()) } else { Err(failure) }
}

/// Succeeds with `()` when `condition` holds, otherwise fails with the value
/// produced by `failure_factory`. The factory runs only on failure.
#[inline]
pub fn ensure_with<F, FailureFactory>(condition: bool, failure_factory: FailureFactory) -> Result<(), F>
where
    FailureFactory: FnOnce() -> F,
{
    if condition {
        Ok(())
    } else {
        Err(failure_factory())
    }
}

// =============================================================================
// ResultExt
// =============================================================================

/// Railway-oriented combinators for `Result`.
///
/// Every method consumes the result and returns a new one, so chains read
/// top to bottom. Callbacks for the inactive channel are never invoked.
///
/// `Map` itself is the inherent [`Result::map`]; this trait only adds what
/// the standard library spells differently or lacks.
pub trait ResultExt<S, F>: Sized {
    /// Eliminates the result by applying exactly one of two functions.
    ///
    /// This is the universal elimination form; every other operation could be
    /// written in terms of it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::result::ResultExt;
    ///
    /// let value: Result<i32, String> = Ok(7);
    /// assert_eq!(value.fold(|success| success * 2, |_| 0), 14);
    /// ```
    fn fold<T, OnSuccess, OnFailure>(self, on_success: OnSuccess, on_failure: OnFailure) -> T
    where
        OnSuccess: FnOnce(S) -> T,
        OnFailure: FnOnce(F) -> T;

    /// Splits the result into a success flag and two payload slots.
    ///
    /// Exactly one slot is populated: the success slot when the flag is
    /// `true`, the failure slot otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::result::ResultExt;
    ///
    /// let (is_success, success, failure) = Err::<i32, &str>("bad").try_get_value();
    /// assert!(!is_success);
    /// assert_eq!(success, None);
    /// assert_eq!(failure, Some("bad"));
    /// ```
    fn try_get_value(self) -> (bool, Option<S>, Option<F>);

    /// Returns `true` if the result holds a success value.
    fn is_success(&self) -> bool;

    /// Returns `true` if the result holds a failure value.
    fn is_failure(&self) -> bool;

    /// Converts into an `Option` of the success value.
    fn success(self) -> Option<S>;

    /// Converts into an `Option` of the failure value.
    fn failure(self) -> Option<F>;

    /// Passes the success value to `bind`, which itself returns a result.
    ///
    /// A failure is passed through and `bind` is never invoked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::result::ResultExt;
    ///
    /// let halve = |value: i32| if value % 2 == 0 { Ok(value / 2) } else { Err("odd") };
    /// assert_eq!(Ok(8).bind(halve).bind(halve), Ok(2));
    /// assert_eq!(Ok(6).bind(halve).bind(halve), Err("odd"));
    /// ```
    fn bind<T, Bind>(self, bind: Bind) -> Result<T, F>
    where
        Bind: FnOnce(S) -> Result<T, F>;

    /// Transforms the failure value; a success is passed through.
    fn map_on_failure<G, Map>(self, map: Map) -> Result<S, G>
    where
        Map: FnOnce(F) -> G;

    /// Passes the failure value to `bind`, which may recover into a success.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::result::ResultExt;
    ///
    /// let recovered: Result<i32, String> =
    ///     Err::<i32, &str>("missing").bind_on_failure(|_| Ok(0));
    /// assert_eq!(recovered, Ok(0));
    /// ```
    fn bind_on_failure<G, Bind>(self, bind: Bind) -> Result<S, G>
    where
        Bind: FnOnce(F) -> Result<S, G>;

    /// Re-tests a success value; failing the predicate turns it into a failure
    /// built from the original success value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::result::ResultExt;
    ///
    /// let checked = Ok::<i32, String>(3).where_or(|value| *value > 5, |value| format!("{value} <= 5"));
    /// assert_eq!(checked, Err("3 <= 5".to_string()));
    /// ```
    fn where_or<Predicate, FailureFactory>(
        self,
        predicate: Predicate,
        failure_factory: FailureFactory,
    ) -> Self
    where
        Predicate: FnOnce(&S) -> bool,
        FailureFactory: FnOnce(S) -> F;

    /// Runs a side effect on the success value and returns the result unchanged.
    fn tap<OnSuccess>(self, on_success: OnSuccess) -> Self
    where
        OnSuccess: FnOnce(&S);

    /// Runs a side effect on the failure value and returns the result unchanged.
    fn tap_failure<OnFailure>(self, on_failure: OnFailure) -> Self
    where
        OnFailure: FnOnce(&F);

    /// Runs the side effect for whichever channel is active and returns the
    /// result unchanged.
    fn tap_either<OnSuccess, OnFailure>(self, on_success: OnSuccess, on_failure: OnFailure) -> Self
    where
        OnSuccess: FnOnce(&S),
        OnFailure: FnOnce(&F);

    /// Consumes the result, handing the active payload to its callback.
    fn apply<OnSuccess, OnFailure>(self, on_success: OnSuccess, on_failure: OnFailure)
    where
        OnSuccess: FnOnce(S),
        OnFailure: FnOnce(F);

    /// Maps the success value inside a panic-catching boundary.
    ///
    /// A panic raised by `success_factory` is caught and converted into a
    /// failure by `failure_factory`; it never propagates. A failure input is
    /// passed through and neither function runs.
    ///
    /// The process-wide panic hook still runs for the caught panic.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::result::ResultExt;
    ///
    /// let value: Result<i32, String> = Ok::<i32, String>(0)
    ///     .try_map(|divisor| 10 / divisor, |panic| panic.message().to_string());
    /// assert!(value.is_err());
    /// ```
    fn try_map<T, SuccessFactory, FailureFactory>(
        self,
        success_factory: SuccessFactory,
        failure_factory: FailureFactory,
    ) -> Result<T, F>
    where
        SuccessFactory: FnOnce(S) -> T,
        FailureFactory: FnOnce(CaughtPanic) -> F;

    /// Like [`try_map`](Self::try_map) but only catches panics whose payload
    /// is an `X`; any other panic keeps unwinding.
    fn try_map_as<X, T, SuccessFactory, FailureFactory>(
        self,
        success_factory: SuccessFactory,
        failure_factory: FailureFactory,
    ) -> Result<T, F>
    where
        X: Any + Send,
        SuccessFactory: FnOnce(S) -> T,
        FailureFactory: FnOnce(X) -> F;

    /// LINQ-style bind that combines the outer and the bound success values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::result::ResultExt;
    ///
    /// let pair = Ok::<i32, &str>(2).select_many(|value| Ok(value * 10), |outer, inner| (outer, inner));
    /// assert_eq!(pair, Ok((2, 20)));
    /// ```
    fn select_many<B, R, Bind, Selector>(self, bind: Bind, selector: Selector) -> Result<R, F>
    where
        Bind: FnOnce(&S) -> Result<B, F>,
        Selector: FnOnce(S, B) -> R;

    /// Swaps the channels: a success becomes a failure and vice versa.
    fn swap(self) -> Result<F, S>;

    /// Returns the success value, or panics with the message built from the
    /// failure.
    ///
    /// # Panics
    ///
    /// Panics when the result holds a failure.
    fn success_or_panic<Message, MessageFactory>(self, message_factory: MessageFactory) -> S
    where
        Message: std::fmt::Display,
        MessageFactory: FnOnce(F) -> Message;

    /// Asynchronous bind: awaits the future produced from the success value.
    fn bind_async<T, Bind, BindFuture>(self, bind: Bind) -> impl Future<Output = Result<T, F>>
    where
        Bind: FnOnce(S) -> BindFuture,
        BindFuture: Future<Output = Result<T, F>>;

    /// Asynchronous map: awaits the future produced from the success value.
    fn map_async<T, Map, MapFuture>(self, map: Map) -> impl Future<Output = Result<T, F>>
    where
        Map: FnOnce(S) -> MapFuture,
        MapFuture: Future<Output = T>;
}

impl<S, F> ResultExt<S, F> for Result<S, F> {
    #[inline]
    fn fold<T, OnSuccess, OnFailure>(self, on_success: OnSuccess, on_failure: OnFailure) -> T
    where
        OnSuccess: FnOnce(S) -> T,
        OnFailure: FnOnce(F) -> T,
    {
        match self {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
    }

    #[inline]
    fn try_get_value(self) -> (bool, Option<S>, Option<F>) {
        self.fold(
            |value| (true, Some(value), None),
            |error| (false, None, Some(error)),
        )
    }

    #[inline]
    fn is_success(&self) -> bool {
        self.is_ok()
    }

    #[inline]
    fn is_failure(&self) -> bool {
        self.is_err()
    }

    #[inline]
    fn success(self) -> Option<S> {
        self.ok()
    }

    #[inline]
    fn failure(self) -> Option<F> {
        self.err()
    }

    #[inline]
    fn bind<T, Bind>(self, bind: Bind) -> Result<T, F>
    where
        Bind: FnOnce(S) -> Result<T, F>,
    {
        self.fold(bind, Err)
    }

    #[inline]
    fn map_on_failure<G, Map>(self, map: Map) -> Result<S, G>
    where
        Map: FnOnce(F) -> G,
    {
        self.fold(Ok, |error| Err(map(error)))
    }

    #[inline]
    fn bind_on_failure<G, Bind>(self, bind: Bind) -> Result<S, G>
    where
        Bind: FnOnce(F) -> Result<S, G>,
    {
        self.fold(Ok, bind)
    }

    #[inline]
    fn where_or<Predicate, FailureFactory>(
        self,
        predicate: Predicate,
        failure_factory: FailureFactory,
    ) -> Self
    where
        Predicate: FnOnce(&S) -> bool,
        FailureFactory: FnOnce(S) -> F,
    {
        self.bind(|value| {
            if predicate(&value) {
                Ok(value)
            } else {
                Err(failure_factory(value))
            }
        })
    }

    #[inline]
    fn tap<OnSuccess>(self, on_success: OnSuccess) -> Self
    where
        OnSuccess: FnOnce(&S),
    {
        self.tap_either(on_success, |_| {})
    }

    #[inline]
    fn tap_failure<OnFailure>(self, on_failure: OnFailure) -> Self
    where
        OnFailure: FnOnce(&F),
    {
        self.tap_either(|_| {}, on_failure)
    }

    #[inline]
    fn tap_either<OnSuccess, OnFailure>(self, on_success: OnSuccess, on_failure: OnFailure) -> Self
    where
        OnSuccess: FnOnce(&S),
        OnFailure: FnOnce(&F),
    {
        match &self {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
        self
    }

    #[inline]
    fn apply<OnSuccess, OnFailure>(self, on_success: OnSuccess, on_failure: OnFailure)
    where
        OnSuccess: FnOnce(S),
        OnFailure: FnOnce(F),
    {
        self.fold(on_success, on_failure);
    }

    fn try_map<T, SuccessFactory, FailureFactory>(
        self,
        success_factory: SuccessFactory,
        failure_factory: FailureFactory,
    ) -> Result<T, F>
    where
        SuccessFactory: FnOnce(S) -> T,
        FailureFactory: FnOnce(CaughtPanic) -> F,
    {
        self.bind(|value| attempt_with(|| success_factory(value), failure_factory))
    }

    fn try_map_as<X, T, SuccessFactory, FailureFactory>(
        self,
        success_factory: SuccessFactory,
        failure_factory: FailureFactory,
    ) -> Result<T, F>
    where
        X: Any + Send,
        SuccessFactory: FnOnce(S) -> T,
        FailureFactory: FnOnce(X) -> F,
    {
        self.bind(|value| attempt_as::<X, T, _>(|| success_factory(value)).map_on_failure(failure_factory))
    }

    #[inline]
    fn select_many<B, R, Bind, Selector>(self, bind: Bind, selector: Selector) -> Result<R, F>
    where
        Bind: FnOnce(&S) -> Result<B, F>,
        Selector: FnOnce(S, B) -> R,
    {
        self.bind(|value| bind(&value).map(|bound| selector(value, bound)))
    }

    #[inline]
    fn swap(self) -> Result<F, S> {
        self.fold(Err, Ok)
    }

    #[track_caller]
    fn success_or_panic<Message, MessageFactory>(self, message_factory: MessageFactory) -> S
    where
        Message: std::fmt::Display,
        MessageFactory: FnOnce(F) -> Message,
    {
        match self {
            Ok(value) => value,
            Err(error) => panic!("{}", message_factory(error)),
        }
    }

    fn bind_async<T, Bind, BindFuture>(self, bind: Bind) -> impl Future<Output = Result<T, F>>
    where
        Bind: FnOnce(S) -> BindFuture,
        BindFuture: Future<Output = Result<T, F>>,
    {
        async move {
            match self {
                Ok(value) => bind(value).await,
                Err(error) => Err(error),
            }
        }
    }

    fn map_async<T, Map, MapFuture>(self, map: Map) -> impl Future<Output = Result<T, F>>
    where
        Map: FnOnce(S) -> MapFuture,
        MapFuture: Future<Output = T>,
    {
        async move {
            match self {
                Ok(value) => Ok(map(value).await),
                Err(error) => Err(error),
            }
        }
    }
}
