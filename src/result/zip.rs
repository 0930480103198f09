//! All-or-nothing aggregation of independent results.
//!
//! Unlike `bind`, which stops at the first failure, `zip` inspects every
//! input: the output is a success only when every input succeeded, and
//! otherwise carries the failures of *all* failing inputs, in input order.
//! This suits independent validations where the caller wants every problem
//! reported at once.

macro_rules! define_zip {
    ($arity:literal; $($success:ident $result:ident),+) => {
        paste::paste! {
            #[doc = concat!("Combines ", stringify!($arity), " results sharing a failure type.")]
            ///
            /// Returns a success holding the tuple of every success value when all
            /// inputs succeed; otherwise a failure holding every failure value in
            /// input order.
            #[allow(clippy::too_many_arguments, clippy::type_complexity)]
            pub fn [<zip $arity>]<$($success,)+ F>(
                $($result: Result<$success, F>),+
            ) -> Result<($($success,)+), Vec<F>> {
                match ($($result,)+) {
                    ($(Ok($result),)+) => Ok(($($result,)+)),
                    ($($result,)+) => {
                        let mut failures = Vec::with_capacity($arity);
                        $(
                            if let Err(failure) = $result {
                                failures.push(failure);
                            }
                        )+
                        Err(failures)
                    }
                }
            }
        }
    };
}

define_zip!(2; S1 r1, S2 r2);
define_zip!(3; S1 r1, S2 r2, S3 r3);
define_zip!(4; S1 r1, S2 r2, S3 r3, S4 r4);
define_zip!(5; S1 r1, S2 r2, S3 r3, S4 r4, S5 r5);
define_zip!(6; S1 r1, S2 r2, S3 r3, S4 r4, S5 r5, S6 r6);
define_zip!(7; S1 r1, S2 r2, S3 r3, S4 r4, S5 r5, S6 r6, S7 r7);
define_zip!(8; S1 r1, S2 r2, S3 r3, S4 r4, S5 r5, S6 r6, S7 r7, S8 r8);
define_zip!(9; S1 r1, S2 r2, S3 r3, S4 r4, S5 r5, S6 r6, S7 r7, S8 r8, S9 r9);

/// Zips two to nine results, collecting every failure.
///
/// Dispatches to [`zip2`](crate::result::zip2) … [`zip9`](crate::result::zip9)
/// by argument count.
///
/// # Examples
///
/// ```rust
/// use railyard::zip;
///
/// let all: Result<(i32, &str, bool), Vec<String>> = zip!(Ok(1), Ok("two"), Ok(true));
/// assert_eq!(all, Ok((1, "two", true)));
///
/// let some: Result<(i32, i32, i32), Vec<&str>> = zip!(Err("a"), Ok(2), Err("c"));
/// assert_eq!(some, Err(vec!["a", "c"]));
/// ```
#[macro_export]
macro_rules! zip {
    ($r1:expr, $r2:expr $(,)?) => {
        $crate::result::zip2($r1, $r2)
    };
    ($r1:expr, $r2:expr, $r3:expr $(,)?) => {
        $crate::result::zip3($r1, $r2, $r3)
    };
    ($r1:expr, $r2:expr, $r3:expr, $r4:expr $(,)?) => {
        $crate::result::zip4($r1, $r2, $r3, $r4)
    };
    ($r1:expr, $r2:expr, $r3:expr, $r4:expr, $r5:expr $(,)?) => {
        $crate::result::zip5($r1, $r2, $r3, $r4, $r5)
    };
    ($r1:expr, $r2:expr, $r3:expr, $r4:expr, $r5:expr, $r6:expr $(,)?) => {
        $crate::result::zip6($r1, $r2, $r3, $r4, $r5, $r6)
    };
    ($r1:expr, $r2:expr, $r3:expr, $r4:expr, $r5:expr, $r6:expr, $r7:expr $(,)?) => {
        $crate::result::zip7($r1, $r2, $r3, $r4, $r5, $r6, $r7)
    };
    ($r1:expr, $r2:expr, $r3:expr, $r4:expr, $r5:expr, $r6:expr, $r7:expr, $r8:expr $(,)?) => {
        $crate::result::zip8($r1, $r2, $r3, $r4, $r5, $r6, $r7, $r8)
    };
    ($r1:expr, $r2:expr, $r3:expr, $r4:expr, $r5:expr, $r6:expr, $r7:expr, $r8:expr, $r9:expr $(,)?) => {
        $crate::result::zip9($r1, $r2, $r3, $r4, $r5, $r6, $r7, $r8, $r9)
    };
}
