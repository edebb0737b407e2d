//! Shared cryptographic helpers for the learning platform.
//!
//! Currently this is RS256 JWT issuing and validation for access tokens.

pub mod jwt;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
