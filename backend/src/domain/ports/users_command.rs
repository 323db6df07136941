//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Raw user fields supplied by a caller. Any field may be missing; the
/// service decides which absences are errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

impl UserFields {
    /// Fields for a fully specified user.
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: Option<i32>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            age,
        }
    }
}

/// Domain use-case port for creating, updating and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate `fields` and persist a new user.
    ///
    /// Name and email are required; email must be well formed and unused;
    /// age, when given, must be non-negative.
    async fn create_user(&self, fields: UserFields) -> Result<User, Error>;

    /// Apply the present, non-blank `fields` to the user with `id`.
    async fn update_user(&self, id: UserId, fields: UserFields) -> Result<User, Error>;

    /// Remove the user with `id`.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}
