//! Panic-catching boundaries that lift panicking code into `Result`.
//!
//! A panic is Rust's analogue of an unexpected exception. These helpers are
//! the single place where one is caught and turned into data; everything
//! downstream sees an ordinary failure.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

use crate::error::CaughtPanic;

/// Runs `success_factory`, capturing a panic as [`CaughtPanic`].
///
/// # Examples
///
/// ```rust
/// use railyard::result::attempt;
///
/// assert_eq!(attempt(|| 1 + 1), Ok(2));
///
/// let failed = attempt(|| -> i32 { panic!("exploded") });
/// assert_eq!(failed.unwrap_err().message(), "exploded");
/// ```
pub fn attempt<T, SuccessFactory>(success_factory: SuccessFactory) -> Result<T, CaughtPanic>
where
    SuccessFactory: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(success_factory))
        .map_err(|payload| CaughtPanic::from_payload(payload.as_ref()))
}

/// Runs `success_factory`, converting a panic into a failure with `catch`.
///
/// # Examples
///
/// ```rust
/// use railyard::result::attempt_with;
///
/// let value: Result<i32, String> =
///     attempt_with(|| panic!("no disk"), |panic| format!("io: {}", panic.message()));
/// assert_eq!(value, Err("io: no disk".to_string()));
/// ```
pub fn attempt_with<T, F, SuccessFactory, Catch>(
    success_factory: SuccessFactory,
    catch: Catch,
) -> Result<T, F>
where
    SuccessFactory: FnOnce() -> T,
    Catch: FnOnce(CaughtPanic) -> F,
{
    attempt(success_factory).map_err(catch)
}

/// Runs `success_factory`, catching only panics whose payload is an `X`.
///
/// Panics carrying any other payload type resume unwinding unchanged, so a
/// caller can narrow the boundary to the failures it expects.
///
/// # Examples
///
/// ```rust
/// use railyard::result::attempt_as;
///
/// #[derive(Debug, PartialEq)]
/// struct Timeout(u32);
///
/// let value: Result<(), Timeout> =
///     attempt_as::<Timeout, _, _>(|| std::panic::panic_any(Timeout(30)));
/// assert_eq!(value, Err(Timeout(30)));
/// ```
pub fn attempt_as<X, T, SuccessFactory>(success_factory: SuccessFactory) -> Result<T, X>
where
    X: Any + Send,
    SuccessFactory: FnOnce() -> T,
{
    match catch_unwind(AssertUnwindSafe(success_factory)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<X>() {
            Ok(caught) => Err(*caught),
            Err(payload) => resume_unwind(payload),
        },
    }
}
