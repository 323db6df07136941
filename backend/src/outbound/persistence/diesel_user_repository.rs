//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Email uniqueness is enforced by the `users_email_key` index; violations
//! surface as [`UserPersistenceError::DuplicateEmail`] so the service can
//! report them like its own pre-check.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Age, NewUser, User, UserId};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Like [`map_diesel_error`], but reports a unique-email violation for the
/// address being written.
fn map_write_error(email: &str, error: DieselError) -> UserPersistenceError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        if info.constraint_name() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            debug!(constraint = EMAIL_UNIQUE_CONSTRAINT, "unique email rejected");
            return UserPersistenceError::duplicate_email(email);
        }
    }
    map_diesel_error(error)
}

fn map_count(count: i64) -> Result<u64, UserPersistenceError> {
    u64::try_from(count)
        .map_err(|_| UserPersistenceError::query(format!("negative row count {count}")))
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        name,
        email,
        age,
    } = row;
    User::try_from_parts(id, name, email, age).map_err(|err| {
        UserPersistenceError::query(format!("stored user {id} is invalid: {err}"))
    })
}

fn rows_to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserPersistenceError> {
    rows.into_iter().map(row_to_user).collect()
}

/// Build an `ILIKE` pattern that matches `fragment` literally anywhere.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_users(rows)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_name_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // PostgreSQL treats backslash as the default LIKE escape character.
        let rows: Vec<UserRow> = users::table
            .filter(users::name.ilike(contains_pattern(fragment)))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_users(rows)
    }

    async fn find_by_age_range(
        &self,
        min: i32,
        max: i32,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::age.between(min, max))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_users(rows)
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        map_count(count)
    }

    async fn count_by_age_greater_than(&self, age: i32) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = users::table
            .filter(users::age.gt(age))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        map_count(count)
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            age: user.age.map(Age::get),
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(new_row.email, err))?;

        row_to_user(row)
    }

    async fn update(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = UserChangeset {
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            age: user.age().map(Age::get),
        };

        let row: Option<UserRow> = diesel::update(users::table.find(user.id().get()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(changeset.email, err))?;

        match row {
            Some(row) => row_to_user(row),
            None => Err(UserPersistenceError::not_found(user.id().get())),
        }
    }

    async fn exists_by_id(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(users::table.find(id.get())))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete_by_id(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct UniqueViolation {
        constraint: Option<&'static str>,
    }

    impl diesel::result::DatabaseErrorInformation for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("users")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique_violation(constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(UniqueViolation { constraint }),
        )
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, UserPersistenceError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let repo_err = map_diesel_error(DieselError::NotFound);

        assert_eq!(repo_err, UserPersistenceError::query("record not found"));
    }

    #[rstest]
    fn email_constraint_maps_to_duplicate() {
        let repo_err = map_write_error(
            "alice@example.com",
            unique_violation(Some(EMAIL_UNIQUE_CONSTRAINT)),
        );

        assert_eq!(
            repo_err,
            UserPersistenceError::duplicate_email("alice@example.com")
        );
    }

    #[rstest]
    fn other_unique_constraints_stay_query_errors() {
        let repo_err = map_write_error("alice@example.com", unique_violation(Some("users_pkey")));

        assert!(matches!(repo_err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn reads_never_report_duplicates() {
        let repo_err = map_diesel_error(unique_violation(Some(EMAIL_UNIQUE_CONSTRAINT)));

        assert!(matches!(repo_err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    #[case("ali", "%ali%")]
    #[case("100%", "%100\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn contains_pattern_escapes_wildcards(#[case] fragment: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(fragment), expected);
    }

    #[rstest]
    fn invalid_rows_surface_as_query_errors() {
        let row = UserRow {
            id: 4,
            name: "   ".to_owned(),
            email: "x@example.com".to_owned(),
            age: None,
        };

        let err = row_to_user(row).expect_err("blank name rejected");
        assert!(err.to_string().contains("stored user 4 is invalid"));
    }

    #[rstest]
    fn negative_counts_are_rejected() {
        assert_eq!(map_count(3), Ok(3));
        assert!(map_count(-1).is_err());
    }
}
