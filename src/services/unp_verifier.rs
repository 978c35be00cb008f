//! UNP verification collaborator.

use crate::domain::validation::is_valid_unp_format;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Decides whether a registration number is acceptable.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait UnpVerifier: Send + Sync {
    fn verify(&self, unp: &str) -> bool;
}

/// Accepts exactly nine ASCII digits.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatUnpVerifier;

impl UnpVerifier for FormatUnpVerifier {
    fn verify(&self, unp: &str) -> bool {
        is_valid_unp_format(unp)
    }
}
