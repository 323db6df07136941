//! Driving port for user reads.
//!
//! Inbound adapters use this port to look users up without importing
//! persistence concerns. [`crate::domain::UserService`] is the production
//! implementation.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Aggregate counts reported by [`UsersQuery::user_statistics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStatistics {
    pub total: u64,
    pub adults: u64,
    pub minors: u64,
}

impl std::fmt::Display for UserStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total Users: {}, Adults (18+): {}, Minors: {}",
            self.total, self.adults, self.minors
        )
    }
}

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every stored user.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// The user with `id`, if stored.
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, Error>;

    /// The user with exactly `email`. Blank input is an invalid request.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error>;

    /// Users whose name contains `name`, ignoring case; every user when
    /// `name` is absent or blank.
    async fn search_users_by_name(&self, name: Option<String>) -> Result<Vec<User>, Error>;

    /// Users aged within `[min_age, max_age]`. Both bounds are required and
    /// must be non-negative with `min_age <= max_age`.
    async fn get_users_by_age_range(
        &self,
        min_age: Option<i32>,
        max_age: Option<i32>,
    ) -> Result<Vec<User>, Error>;

    /// Number of users aged 18 or over.
    async fn get_adult_user_count(&self) -> Result<u64, Error>;

    /// Total, adult and minor counts. Users without an age count as minors.
    async fn user_statistics(&self) -> Result<UserStatistics, Error>;

    /// [`UsersQuery::user_statistics`] rendered as a summary line.
    async fn get_user_statistics(&self) -> Result<String, Error> {
        Ok(self.user_statistics().await?.to_string())
    }
}
