//! User domain service.
//!
//! Implements the [`UsersQuery`] and [`UsersCommand`] driving ports on top of
//! a [`UserRepository`]. Every rule violation surfaces as
//! [`crate::domain::ErrorCode::InvalidRequest`] with a `details.code` naming
//! the rule; repository outages surface as service-unavailable or internal
//! errors.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    UserFields, UserPersistenceError, UserRepository, UserStatistics, UsersCommand, UsersQuery,
};
use crate::domain::user::mask_email;
use crate::domain::{
    Age, EmailAddress, Error, NewUser, User, UserId, UserName, UserValidationError,
};

/// Users older than this are adults.
const ADULT_AGE_THRESHOLD: i32 = 17;

/// User service implementing the driving ports.
#[derive(Clone)]
pub struct UserService<R> {
    repository: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a new service backed by `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn validation_error(error: UserValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

fn user_not_found(id: UserId) -> Error {
    Error::invalid_request(format!("User with id {id} not found")).with_details(json!({
        "id": id.get(),
        "code": "user_not_found",
    }))
}

fn email_already_exists(email: &str) -> Error {
    Error::invalid_request(format!("User with email {email} already exists")).with_details(json!({
        "field": "email",
        "code": "email_taken",
    }))
}

fn email_already_taken(email: &str) -> Error {
    Error::invalid_request(format!("Email {email} is already taken")).with_details(json!({
        "field": "email",
        "code": "email_taken",
    }))
}

fn age_range_error(message: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "code": code }))
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => email_already_exists(&email),
        UserPersistenceError::NotFound { id } => user_not_found(UserId::new(id)),
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|raw| raw.trim().is_empty())
}

/// Validate the fields required to create a user, in the order callers
/// expect failures to be reported.
fn parse_new_user(fields: UserFields) -> Result<NewUser, UserValidationError> {
    let UserFields { name, email, age } = fields;
    let name = UserName::new(name.unwrap_or_default())?;
    let email = EmailAddress::new(email.unwrap_or_default())?;
    let age = age.map(Age::new).transpose()?;
    Ok(NewUser { name, email, age })
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    async fn require_user(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn ensure_email_unclaimed(&self, id: UserId, email: &EmailAddress) -> Result<(), Error> {
        let owner = self
            .repository
            .find_by_email(email.as_ref())
            .await
            .map_err(map_persistence_error)?;
        match owner {
            Some(other) if other.id() != id => Err(email_already_taken(email.as_ref())),
            _ => Ok(()),
        }
    }

    async fn apply_update(&self, user: User, fields: UserFields) -> Result<User, Error> {
        let UserFields { name, email, age } = fields;
        let mut updated = user;

        if let Some(raw) = name.filter(|raw| !raw.trim().is_empty()) {
            updated = updated.with_name(UserName::new(raw).map_err(validation_error)?);
        }
        if let Some(raw) = email.filter(|raw| !raw.trim().is_empty()) {
            let email = EmailAddress::new(raw).map_err(validation_error)?;
            self.ensure_email_unclaimed(updated.id(), &email).await?;
            updated = updated.with_email(email);
        }
        if let Some(raw) = age {
            updated = updated.with_age(Age::new(raw).map_err(validation_error)?);
        }
        Ok(updated)
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repository
            .find_all()
            .await
            .map_err(map_persistence_error)
    }

    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        debug!(user_id = %id, "looking up user by id");
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        if is_blank(Some(email)) {
            warn!("rejected email lookup with blank email");
            return Err(validation_error(UserValidationError::EmptyEmail));
        }
        debug!(email = %mask_email(email), "looking up user by email");
        self.repository
            .find_by_email(email)
            .await
            .map_err(map_persistence_error)
    }

    async fn search_users_by_name(&self, name: Option<String>) -> Result<Vec<User>, Error> {
        match name {
            Some(fragment) if !fragment.trim().is_empty() => self
                .repository
                .find_by_name_containing(&fragment)
                .await
                .map_err(map_persistence_error),
            _ => self.list_users().await,
        }
    }

    async fn get_users_by_age_range(
        &self,
        min_age: Option<i32>,
        max_age: Option<i32>,
    ) -> Result<Vec<User>, Error> {
        let (Some(min), Some(max)) = (min_age, max_age) else {
            return Err(age_range_error(
                "Age range cannot be null",
                "missing_age_bound",
            ));
        };
        if min < 0 || max < 0 {
            return Err(age_range_error(
                "Age values cannot be negative",
                "negative_age_bound",
            ));
        }
        if min > max {
            return Err(age_range_error(
                "Minimum age cannot be greater than maximum age",
                "inverted_age_range",
            ));
        }
        self.repository
            .find_by_age_range(min, max)
            .await
            .map_err(map_persistence_error)
    }

    async fn get_adult_user_count(&self) -> Result<u64, Error> {
        self.repository
            .count_by_age_greater_than(ADULT_AGE_THRESHOLD)
            .await
            .map_err(map_persistence_error)
    }

    async fn user_statistics(&self) -> Result<UserStatistics, Error> {
        let total = self
            .repository
            .count()
            .await
            .map_err(map_persistence_error)?;
        let adults = self.get_adult_user_count().await?;
        Ok(UserStatistics {
            total,
            adults,
            minors: total.saturating_sub(adults),
        })
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, fields: UserFields) -> Result<User, Error> {
        let new_user = parse_new_user(fields).map_err(|err| {
            warn!(reason = err.code(), "rejected user creation");
            validation_error(err)
        })?;

        let existing = self
            .repository
            .find_by_email(new_user.email.as_ref())
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            warn!(email = %new_user.email.masked(), "rejected user creation: email in use");
            return Err(email_already_exists(new_user.email.as_ref()));
        }

        let user = self
            .repository
            .insert(&new_user)
            .await
            .map_err(map_persistence_error)?;
        info!(user_id = %user.id(), email = %user.email().masked(), "created user");
        Ok(user)
    }

    async fn update_user(&self, id: UserId, fields: UserFields) -> Result<User, Error> {
        let current = self.require_user(id).await?;
        let candidate = self.apply_update(current, fields).await.inspect_err(|err| {
            warn!(user_id = %id, reason = err.reason().unwrap_or("unknown"), "rejected user update");
        })?;

        let user = self
            .repository
            .update(&candidate)
            .await
            .map_err(|err| match err {
                UserPersistenceError::DuplicateEmail { email } => email_already_taken(&email),
                other => map_persistence_error(other),
            })?;
        info!(user_id = %id, "updated user");
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        let exists = self
            .repository
            .exists_by_id(id)
            .await
            .map_err(map_persistence_error)?;
        if !exists {
            return Err(user_not_found(id));
        }

        let deleted = self
            .repository
            .delete_by_id(id)
            .await
            .map_err(map_persistence_error)?;
        if !deleted {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "deleted user");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
