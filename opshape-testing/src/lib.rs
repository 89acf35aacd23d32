//! Internal testing utilities for the opshape crates.

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe};

/// Run a table of test cases, collecting every failure before reporting.
///
/// Shape inference tests are mostly tables of input shapes, operator
/// attributes and the expected output shape or error. Writing these as a loop
/// of `assert_eq!` calls stops at the first failure, which hides whether a
/// broken rule fails one case or all of them. `TestCases` runs each case under
/// [`catch_unwind`](std::panic::catch_unwind) and panics at the end with the
/// debug representation of every failing case.
///
/// ```
/// use opshape_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     lhs: Vec<usize>,
///     rhs: Vec<usize>,
///     expected: usize,
/// }
///
/// let cases = [
///     Case { lhs: vec![2, 3], rhs: vec![2, 5], expected: 8 },
///     Case { lhs: vec![4, 0], rhs: vec![4, 1], expected: 1 },
/// ];
///
/// cases.test_each(|case| {
///     assert_eq!(case.lhs[1] + case.rhs[1], case.expected);
/// });
/// ```
///
/// Cases and any values captured by the test closure must be unwind safe.
/// Build values with interior mutability (eg. a graph under construction)
/// inside the closure rather than capturing them.
pub trait TestCases {
    /// The data for a single test case.
    type Case;

    /// Call `test` with a reference to each case.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;

    /// Call `test` with an owned clone of each case.
    ///
    /// Useful when the test consumes parts of the case, such as moving a
    /// vector of shapes into an operator.
    fn test_each_clone(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + Clone + UnwindSafe;
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let failures: Vec<I::Item> = self
            .into_iter()
            .filter(|case| std::panic::catch_unwind(|| test(case)).is_err())
            .collect();
        report_failures(&failures);
    }

    fn test_each_clone(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + Clone + UnwindSafe,
    {
        let test = &test;
        let failures: Vec<I::Item> = self
            .into_iter()
            .filter(|case| {
                let owned = case.clone();
                std::panic::catch_unwind(move || test(owned)).is_err()
            })
            .collect();
        report_failures(&failures);
    }
}

fn report_failures<T: Debug>(failures: &[T]) {
    assert!(
        failures.is_empty(),
        "{} test cases failed: {:?}",
        failures.len(),
        failures
    );
}
