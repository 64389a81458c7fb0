//! Error types for freqcache.
//!
//! Cache operations never fail: a missing key is reported through `Option`
//! or `bool`. Errors only show up in two places:
//!
//! - [`ConfigError`]: the facade builder rejected its configuration (zero
//!   capacity, or a policy with no engine behind it).
//! - [`InvariantError`]: `check_invariants` found the frequency chain and
//!   the lookup index out of sync.
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::builder::{CacheBuilder, CachePolicy};
//! use freqcache::error::ConfigError;
//!
//! let err: ConfigError = CacheBuilder::new(0)
//!     .try_build::<u64, String>()
//!     .unwrap_err();
//! assert!(err.to_string().contains("capacity"));
//!
//! let err = CacheBuilder::new(16)
//!     .policy(CachePolicy::TinyLfu)
//!     .try_build::<u64, String>()
//!     .unwrap_err();
//! assert!(err.message().contains("tiny-lfu"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// The frequency chain, its buckets, or the lookup index disagree.
///
/// Returned by [`FrequencyChain::check_invariants`](crate::ds::FrequencyChain::check_invariants)
/// and [`LfuCache::check_invariants`](crate::policy::lfu::LfuCache::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Cache configuration was rejected by
/// [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
