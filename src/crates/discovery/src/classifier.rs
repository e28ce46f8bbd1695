//! Partition scanned packages by existing test coverage.

use crate::package::Package;

/// Packages split by whether they already carry `*_test.go` files.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub with_tests: Vec<Package>,
    pub without_tests: Vec<Package>,
}

/// Partition packages into "has existing tests" and "needs tests".
///
/// Pure and total: every input package lands in exactly one bucket.
pub fn classify(packages: Vec<Package>) -> Classification {
    let mut outcome = Classification::default();
    for package in packages {
        if package.has_tests() {
            outcome.with_tests.push(package);
        } else {
            outcome.without_tests.push(package);
        }
    }
    outcome
}
