//! The `Result` algebra over deferred results.
//!
//! [`ResultFutureExt`] is implemented for every `Future<Output = Result<S, F>>`.
//! Each combinator awaits the deferred result exactly once and then applies
//! the synchronous logic from [`ResultExt`]; callbacks may themselves be
//! synchronous or, for the `_async` forms, return futures.
//!
//! Nothing runs until the returned future is polled, and dropping it cancels
//! the whole chain.
//!
//! # Examples
//!
//! ```rust
//! use railyard::result::future::ResultFutureExt;
//!
//! # futures::executor::block_on(async {
//! let fetched = async { Ok::<i32, String>(20) };
//! let value = fetched
//!     .map_success(|value| value + 1)
//!     .bind(|value| if value > 10 { Ok(value * 2) } else { Err("small".to_string()) })
//!     .await;
//! assert_eq!(value, Ok(42));
//! # });
//! ```

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::CaughtPanic;
use crate::result::ResultExt;

/// Railway-oriented combinators for futures that resolve to a `Result`.
pub trait ResultFutureExt<S, F>: Future<Output = Result<S, F>> + Sized {
    /// Transforms the success value once the result is available.
    fn map_success<T, Map>(self, map: Map) -> impl Future<Output = Result<T, F>>
    where
        Map: FnOnce(S) -> T,
    {
        async move { self.await.map(map) }
    }

    /// Transforms the failure value once the result is available.
    fn map_on_failure<G, Map>(self, map: Map) -> impl Future<Output = Result<S, G>>
    where
        Map: FnOnce(F) -> G,
    {
        async move { self.await.map_on_failure(map) }
    }

    /// Sequences a synchronous bind after the deferred result.
    fn bind<T, Bind>(self, bind: Bind) -> impl Future<Output = Result<T, F>>
    where
        Bind: FnOnce(S) -> Result<T, F>,
    {
        async move { ResultExt::bind(self.await, bind) }
    }

    /// Sequences an asynchronous bind after the deferred result.
    ///
    /// The bound future is only created, and only awaited, for a success.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use railyard::result::future::ResultFutureExt;
    ///
    /// # futures::executor::block_on(async {
    /// let value = async { Err::<i32, &str>("offline") }
    ///     .bind_async(|value| async move { Ok(value + 1) })
    ///     .await;
    /// assert_eq!(value, Err("offline"));
    /// # });
    /// ```
    fn bind_async<T, Bind, BindFuture>(self, bind: Bind) -> impl Future<Output = Result<T, F>>
    where
        Bind: FnOnce(S) -> BindFuture,
        BindFuture: Future<Output = Result<T, F>>,
    {
        async move { self.await.bind_async(bind).await }
    }

    /// Sequences a recovering bind on the failure channel.
    fn bind_on_failure<G, Bind>(self, bind: Bind) -> impl Future<Output = Result<S, G>>
    where
        Bind: FnOnce(F) -> Result<S, G>,
    {
        async move { self.await.bind_on_failure(bind) }
    }

    /// Re-tests the success value once the result is available.
    fn where_or<Predicate, FailureFactory>(
        self,
        predicate: Predicate,
        failure_factory: FailureFactory,
    ) -> impl Future<Output = Result<S, F>>
    where
        Predicate: FnOnce(&S) -> bool,
        FailureFactory: FnOnce(S) -> F,
    {
        async move { self.await.where_or(predicate, failure_factory) }
    }

    /// Runs a side effect on the success value.
    fn tap<OnSuccess>(self, on_success: OnSuccess) -> impl Future<Output = Result<S, F>>
    where
        OnSuccess: FnOnce(&S),
    {
        async move { ResultExt::tap(self.await, on_success) }
    }

    /// Runs a side effect on the failure value.
    fn tap_failure<OnFailure>(self, on_failure: OnFailure) -> impl Future<Output = Result<S, F>>
    where
        OnFailure: FnOnce(&F),
    {
        async move { self.await.tap_failure(on_failure) }
    }

    /// Maps the success value inside a panic-catching boundary.
    fn try_map<T, SuccessFactory, FailureFactory>(
        self,
        success_factory: SuccessFactory,
        failure_factory: FailureFactory,
    ) -> impl Future<Output = Result<T, F>>
    where
        SuccessFactory: FnOnce(S) -> T,
        FailureFactory: FnOnce(CaughtPanic) -> F,
    {
        async move { ResultExt::try_map(self.await, success_factory, failure_factory) }
    }

    /// Eliminates the deferred result with exactly one of two functions.
    fn fold<T, OnSuccess, OnFailure>(
        self,
        on_success: OnSuccess,
        on_failure: OnFailure,
    ) -> impl Future<Output = T>
    where
        OnSuccess: FnOnce(S) -> T,
        OnFailure: FnOnce(F) -> T,
    {
        async move { ResultExt::fold(self.await, on_success, on_failure) }
    }

    /// Resolves to `true` when the deferred result is a success.
    fn is_success(self) -> impl Future<Output = bool> {
        async move { self.await.is_ok() }
    }

    /// Resolves to the success value, if any.
    fn success(self) -> impl Future<Output = Option<S>> {
        async move { self.await.ok() }
    }

    /// Resolves to the failure value, if any.
    fn failure(self) -> impl Future<Output = Option<F>> {
        async move { self.await.err() }
    }

    /// LINQ-style bind that combines the outer and the bound success values.
    fn select_many<B, R, Bind, Selector>(
        self,
        bind: Bind,
        selector: Selector,
    ) -> impl Future<Output = Result<R, F>>
    where
        Bind: FnOnce(&S) -> Result<B, F>,
        Selector: FnOnce(S, B) -> R,
    {
        async move { ResultExt::select_many(self.await, bind, selector) }
    }
}

impl<S, F, Deferred> ResultFutureExt<S, F> for Deferred where Deferred: Future<Output = Result<S, F>> {}

/// Awaits `future`, capturing a panic raised while polling it.
///
/// # Examples
///
/// ```rust
/// use railyard::result::future::attempt_async;
///
/// # futures::executor::block_on(async {
/// let connected = false;
/// let value = attempt_async(async move {
///     if !connected {
///         panic!("lost connection");
///     }
/// })
/// .await;
/// assert_eq!(value.unwrap_err().message(), "lost connection");
/// # });
/// ```
pub async fn attempt_async<T, Attempt>(future: Attempt) -> Result<T, CaughtPanic>
where
    Attempt: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|payload| CaughtPanic::from_payload(payload.as_ref()))
}

/// Awaits `future`, converting a panic into a failure with `catch`.
pub async fn attempt_async_with<T, F, Attempt, Catch>(future: Attempt, catch: Catch) -> Result<T, F>
where
    Attempt: Future<Output = T>,
    Catch: FnOnce(CaughtPanic) -> F,
{
    attempt_async(future).await.map_err(catch)
}

/// Awaits `future`, catching only panics whose payload is an `X`.
pub async fn attempt_async_as<X, T, Attempt>(future: Attempt) -> Result<T, X>
where
    X: Any + Send,
    Attempt: Future<Output = T>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<X>() {
            Ok(caught) => Err(*caught),
            Err(payload) => std::panic::resume_unwind(payload),
        },
    }
}
