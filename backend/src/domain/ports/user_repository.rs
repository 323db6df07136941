//! Port abstraction for user persistence adapters and their errors.
//!
//! Adapters own ordering and matching semantics: every list is ordered by id
//! ascending, name matching is a case-insensitive substring test, and age
//! filters never match users whose age is unknown.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The store's unique index rejected an email already in use.
        DuplicateEmail { email: String } => "email {email} is already stored",
        /// The row targeted by an update no longer exists.
        NotFound { id: i64 } => "user {id} is not stored",
    }
}

/// Driven port for user storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored user.
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Users whose name contains `fragment`, ignoring case. `%`, `_` and `\`
    /// are matched literally.
    async fn find_by_name_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<User>, UserPersistenceError>;

    /// Users with `min <= age <= max`.
    async fn find_by_age_range(&self, min: i32, max: i32)
    -> Result<Vec<User>, UserPersistenceError>;

    /// Total number of stored users.
    async fn count(&self) -> Result<u64, UserPersistenceError>;

    /// Number of users strictly older than `age`.
    async fn count_by_age_greater_than(&self, age: i32) -> Result<u64, UserPersistenceError>;

    /// Persist a new user and return it with its assigned id.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email is
    /// already stored.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Overwrite the name, email and age of `user.id()`.
    async fn update(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Whether a user with `id` is stored.
    async fn exists_by_id(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Remove the user with `id`, returning whether a row was deleted.
    async fn delete_by_id(&self, id: UserId) -> Result<bool, UserPersistenceError>;
}

impl UserPersistenceError {
    /// Duplicate-email error for a validated address.
    pub fn duplicate(email: &EmailAddress) -> Self {
        Self::duplicate_email(email.as_ref())
    }
}
