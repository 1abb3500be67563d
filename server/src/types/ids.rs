//! ID types for users and applications.
//!
//! Newtype wrappers keep user and application identifiers from being mixed
//! up at call sites. Both are assigned by the stores; zero is never a valid
//! identifier on the wire.

use std::fmt;

/// Identifier of a registered user.
///
/// # Invariants
///
/// - Ids handed out by a store are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    /// Get the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Identifier of a tenant application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId(pub i32);

impl AppId {
    /// Get the raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for AppId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<AppId> for i32 {
    fn from(id: AppId) -> Self {
        id.0
    }
}
