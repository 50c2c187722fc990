//! Common test macros.

/// Check that a floating-point value is within a tolerance of the expected one.
///
/// # Usage
/// ```ignore
/// assert_approx_eq!(actual, expected);
/// assert_approx_eq!(actual, expected, epsilon);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr) => {
        assert_approx_eq!($actual, $expected, 1e-9)
    };
    ($actual:expr, $expected:expr, $epsilon:expr) => {
        let actual: f64 = $actual;
        let expected: f64 = $expected;
        let epsilon: f64 = $epsilon;
        let diff = (actual - expected).abs();
        assert!(
            diff <= epsilon,
            "assertion failed: `(left ≈ right)`\n  left: `{actual:?}`,\n right: `{expected:?}`,\n  diff: `{diff:?}`,\n   eps: `{epsilon:?}`"
        );
    };
}

/// Read a numeric field of a collected row as `f64`.
#[macro_export]
macro_rules! num {
    ($row:expr, $field:expr) => {
        $row[$field]
            .as_f64()
            .unwrap_or_else(|| panic!("field `{}` is not a number in {:?}", $field, $row))
    };
}
