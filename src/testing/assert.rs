//! Early-return assertion macros for test actions.
//!
//! Unlike `assert!`, these return [`Outcome::Failed`](crate::testing::Outcome)
//! from the enclosing action instead of panicking, so the reason carries the
//! expected and actual values without going through the panic hook.

/// Fail the enclosing action unless `cond` holds.
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        if !$cond {
            return $crate::testing::Outcome::Failed(format!(
                "check failed: {}",
                stringify!($cond)
            ));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return $crate::testing::Outcome::Failed(format!($($arg)+));
        }
    };
}

/// Fail the enclosing action unless `expected == actual`.
#[macro_export]
macro_rules! check_eq {
    ($expected:expr, $actual:expr $(,)?) => {
        match (&$expected, &$actual) {
            (expected, actual) => {
                if *expected != *actual {
                    return $crate::testing::Outcome::Failed(format!(
                        "{} == {}: expected {:?}, got {:?}",
                        stringify!($expected),
                        stringify!($actual),
                        expected,
                        actual
                    ));
                }
            }
        }
    };
    ($expected:expr, $actual:expr, $($arg:tt)+) => {
        match (&$expected, &$actual) {
            (expected, actual) => {
                if *expected != *actual {
                    return $crate::testing::Outcome::Failed(format!(
                        "{}: expected {:?}, got {:?}",
                        format_args!($($arg)+),
                        expected,
                        actual
                    ));
                }
            }
        }
    };
}

/// Fail the enclosing action if `left == right`.
#[macro_export]
macro_rules! check_ne {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left, right) => {
                if *left == *right {
                    return $crate::testing::Outcome::Failed(format!(
                        "{} != {}: both are {:?}",
                        stringify!($left),
                        stringify!($right),
                        left
                    ));
                }
            }
        }
    };
}

/// Unwrap a `Result` inside an action, turning `Err` into
/// [`Outcome::Errored`](crate::testing::Outcome).
#[macro_export]
macro_rules! check_ok {
    ($result:expr $(,)?) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                return $crate::testing::Outcome::Errored(format!(
                    "{}: {}",
                    stringify!($result),
                    err
                ));
            }
        }
    };
}
