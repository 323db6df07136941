//! Integration tests for the Diesel user repository.
//!
//! These run against a real PostgreSQL database named by
//! `USERBASE_TEST_DATABASE_URL`. The `users` table is truncated first, so
//! point it at a disposable database. Without the variable the test is
//! skipped.

use diesel::pg::PgConnection;
use diesel::{Connection, RunQueryDsl};
use rstest::rstest;
use userbase::domain::ports::{UserPersistenceError, UserRepository};
use userbase::domain::{Age, EmailAddress, NewUser, User, UserId, UserName};
use userbase::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, apply_pending,
};

const DATABASE_URL_ENV: &str = "USERBASE_TEST_DATABASE_URL";

fn reset_database(database_url: &str) {
    let mut conn = PgConnection::establish(database_url).expect("connect to test database");
    apply_pending(&mut conn).expect("apply migrations");
    diesel::sql_query("TRUNCATE TABLE users RESTART IDENTITY")
        .execute(&mut conn)
        .expect("truncate users");
}

fn new_user(name: &str, email: &str, age: Option<i32>) -> NewUser {
    NewUser {
        name: UserName::new(name).expect("valid name"),
        email: EmailAddress::new(email).expect("valid email"),
        age: age.map(|value| Age::new(value).expect("valid age")),
    }
}

fn names(users: &[User]) -> Vec<&str> {
    users.iter().map(|user| user.name().as_ref()).collect()
}

#[rstest]
#[tokio::test]
async fn repository_round_trips_users_through_postgres() {
    let Ok(database_url) = std::env::var(DATABASE_URL_ENV) else {
        eprintln!("skipping: {DATABASE_URL_ENV} is not set");
        return;
    };
    reset_database(&database_url);
    let pool = DbPool::new(PoolConfig::new(database_url.as_str()).with_min_idle(Some(1)))
        .await
        .expect("build pool");
    let repo = DieselUserRepository::new(pool);

    let alice = repo
        .insert(&new_user("Alice Smith", "alice@example.com", Some(30)))
        .await
        .expect("insert alice");
    let bob = repo
        .insert(&new_user("Bob Jones", "bob@example.com", Some(17)))
        .await
        .expect("insert bob");
    repo.insert(&new_user("100% Real_Name", "odd@example.com", None))
        .await
        .expect("insert odd name");
    assert_eq!(alice.id(), UserId::new(1));
    assert_eq!(bob.id(), UserId::new(2));

    let err = repo
        .insert(&new_user("Eve", "alice@example.com", None))
        .await
        .expect_err("duplicate email");
    assert!(
        matches!(err, UserPersistenceError::DuplicateEmail { .. }),
        "unexpected error: {err:?}"
    );

    let all = repo.find_all().await.expect("find all");
    assert_eq!(names(&all), ["Alice Smith", "Bob Jones", "100% Real_Name"]);

    let by_email = repo
        .find_by_email("bob@example.com")
        .await
        .expect("find by email");
    assert_eq!(by_email.as_ref(), Some(&bob));
    assert_eq!(repo.find_by_id(UserId::new(99)).await.expect("find by id"), None);

    let matched = repo.find_by_name_containing("SMITH").await.expect("search");
    assert_eq!(names(&matched), ["Alice Smith"]);
    let literal = repo.find_by_name_containing("0% r").await.expect("search");
    assert_eq!(names(&literal), ["100% Real_Name"]);
    let wildcard = repo.find_by_name_containing("_").await.expect("search");
    assert_eq!(names(&wildcard), ["100% Real_Name"]);

    let adults = repo.find_by_age_range(18, 65).await.expect("age range");
    assert_eq!(names(&adults), ["Alice Smith"]);
    assert_eq!(repo.count().await.expect("count"), 3);
    assert_eq!(repo.count_by_age_greater_than(17).await.expect("count adults"), 1);

    let older_bob = bob
        .clone()
        .with_age(Age::new(18).expect("valid age"));
    let updated = repo.update(&older_bob).await.expect("update bob");
    assert_eq!(updated, older_bob);
    assert_eq!(repo.count_by_age_greater_than(17).await.expect("count adults"), 2);

    let taken = bob
        .clone()
        .with_email(EmailAddress::new("alice@example.com").expect("valid email"));
    let err = repo.update(&taken).await.expect_err("email taken");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));

    let ghost = User::new(
        UserId::new(42),
        UserName::new("Ghost").expect("valid name"),
        EmailAddress::new("ghost@example.com").expect("valid email"),
        None,
    );
    let err = repo.update(&ghost).await.expect_err("missing row");
    assert!(matches!(err, UserPersistenceError::NotFound { id: 42 }));

    assert!(repo.exists_by_id(alice.id()).await.expect("exists"));
    assert!(repo.delete_by_id(alice.id()).await.expect("delete"));
    assert!(!repo.delete_by_id(alice.id()).await.expect("delete again"));
    assert!(!repo.exists_by_id(alice.id()).await.expect("exists"));
    assert_eq!(repo.count().await.expect("count"), 2);
}
