//! Assertion helpers for registration results

use crate::{TestError, TestResult};
use std::time::Duration;
use warden_core::{HealthCheckRegistration, RegistrationError, RegistrationErrorKind};

/// Collection of test assertions
pub struct TestAssertions;

impl TestAssertions {
    /// Assert that a registration failed with the expected kind
    pub fn assert_error_kind<T: std::fmt::Debug>(
        result: &Result<T, RegistrationError>,
        expected: RegistrationErrorKind,
    ) -> TestResult<()> {
        match result {
            Err(error) if error.kind() == expected => Ok(()),
            Err(error) => Err(TestError::Assertion {
                message: format!("Expected {:?} but got {:?}: {}", expected, error.kind(), error),
            }),
            Ok(value) => Err(TestError::Assertion {
                message: format!("Expected {:?} but registration succeeded: {:?}", expected, value),
            }),
        }
    }

    /// Assert the tag list of a health registration, in order
    pub fn assert_tags(registration: &HealthCheckRegistration, expected: &[&str]) -> TestResult<()> {
        if registration.tags != expected {
            return Err(TestError::Assertion {
                message: format!(
                    "Health check '{}' has tags {:?}, expected {:?}",
                    registration.name, registration.tags, expected
                ),
            });
        }
        Ok(())
    }

    /// Assert the timeout forwarded with a health registration
    pub fn assert_timeout(
        registration: &HealthCheckRegistration,
        expected: Option<Duration>,
    ) -> TestResult<()> {
        if registration.timeout != expected {
            return Err(TestError::Assertion {
                message: format!(
                    "Health check '{}' has timeout {:?}, expected {:?}",
                    registration.name, registration.timeout, expected
                ),
            });
        }
        Ok(())
    }
}
