//! Unwrap helpers with good error messages.
//!
//! These replace `unwrap()` and `expect()` in test code. `#[track_caller]`
//! keeps the panic location pointing at the test.

/// Unwrap an `Option`, panicking with `msg` if `None`.
///
/// ```rust
/// use openracing_test_helpers::must_some;
///
/// let angles = [-90.0, 0.0, 90.0];
/// assert_eq!(must_some(angles.first(), "first angle"), &-90.0);
/// ```
///
/// # Panics
///
/// Panics if the option is `None`.
#[track_caller]
pub fn must_some<T>(option: Option<T>, msg: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: {msg}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_must_some_value() {
        assert_eq!(must_some(Some(3), "gear"), 3);
    }

    #[test]
    #[should_panic(expected = "must_some: expected value")]
    fn test_must_some_none() {
        let option: Option<i32> = None;
        let _ = must_some(option, "expected value");
    }
}
