//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn alice() -> User {
    User::new(
        UserId::new(1),
        UserName::new("Alice").expect("valid name"),
        EmailAddress::new("alice@example.com").expect("valid email"),
        Some(Age::new(30).expect("valid age")),
    )
}

#[rstest]
#[case("alice@example.com")]
#[case("first.last+tag@sub.example.co")]
#[case("A_B-c@EXAMPLE.ORG")]
#[case("x@y.io")]
fn accepts_well_formed_emails(#[case] email: &str) {
    assert!(is_valid_email(email));
}

#[rstest]
#[case("")]
#[case("alice.example.com")]
#[case("alice@example")]
#[case("alice@example.c")]
#[case("@example.com")]
#[case("alice@.com.")]
#[case("alice smith@example.com")]
#[case("alice@example.c0m")]
fn rejects_malformed_emails(#[case] email: &str) {
    assert!(!is_valid_email(email));
}

#[rstest]
#[case("", UserValidationError::EmptyName)]
#[case("   ", UserValidationError::EmptyName)]
fn user_name_rejects_blank(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserName::new(raw), Err(expected));
}

#[rstest]
fn user_name_keeps_surrounding_whitespace() {
    let name = UserName::new("  Ada ").expect("non-blank name");
    assert_eq!(name.as_ref(), "  Ada ");
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case(" \t", UserValidationError::EmptyEmail)]
#[case("not-an-email", UserValidationError::InvalidEmail)]
fn email_address_reports_first_failure(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw), Err(expected));
}

#[rstest]
fn email_address_preserves_case() {
    let email = EmailAddress::new("Alice@Example.COM").expect("valid email");
    assert_eq!(email.as_ref(), "Alice@Example.COM");
}

#[rstest]
#[case(0)]
#[case(17)]
#[case(18)]
#[case(i32::MAX)]
fn age_accepts_non_negative(#[case] raw: i32) {
    assert_eq!(Age::new(raw).map(Age::get), Ok(raw));
}

#[rstest]
#[case(-1)]
#[case(i32::MIN)]
fn age_rejects_negative(#[case] raw: i32) {
    assert_eq!(Age::new(raw), Err(UserValidationError::NegativeAge { age: raw }));
}

#[rstest]
#[case(UserValidationError::EmptyName, "Name cannot be null or empty", "empty_name", "name")]
#[case(UserValidationError::EmptyEmail, "Email cannot be null or empty", "empty_email", "email")]
#[case(UserValidationError::InvalidEmail, "Invalid email format", "invalid_email", "email")]
#[case(UserValidationError::NegativeAge { age: -3 }, "Age cannot be negative", "negative_age", "age")]
fn validation_errors_describe_themselves(
    #[case] error: UserValidationError,
    #[case] message: &str,
    #[case] code: &str,
    #[case] field: &str,
) {
    assert_eq!(error.to_string(), message);
    assert_eq!(error.code(), code);
    assert_eq!(error.field(), field);
}

#[rstest]
fn masked_email_hides_local_part() {
    assert_eq!(mask_email("bob@example.com"), "b***@example.com");
    assert_eq!(mask_email("no-at-sign"), "***");
    assert_eq!(mask_email("@example.com"), "***@example.com");
}

#[rstest]
fn user_serialises_flat_shape(alice: User) {
    let value = serde_json::to_value(&alice).expect("user serialises");
    assert_eq!(
        value,
        json!({ "id": 1, "name": "Alice", "email": "alice@example.com", "age": 30 })
    );
}

#[rstest]
fn user_without_age_serialises_null() {
    let user = User::try_from_parts(2, "Bob".into(), "bob@example.com".into(), None)
        .expect("valid parts");
    let value = serde_json::to_value(&user).expect("user serialises");
    assert_eq!(value.get("age"), Some(&serde_json::Value::Null));
}

#[rstest]
fn user_deserialisation_validates_fields() {
    let result = serde_json::from_value::<User>(json!({
        "id": 3,
        "name": "Eve",
        "email": "eve-at-example.com",
        "age": null,
    }));
    assert!(result.is_err());
}

#[rstest]
fn with_methods_replace_single_fields(alice: User) {
    let renamed = alice
        .clone()
        .with_name(UserName::new("Alicia").expect("valid name"));
    assert_eq!(renamed.name().as_ref(), "Alicia");
    assert_eq!(renamed.email(), alice.email());
    assert_eq!(renamed.age(), alice.age());
    assert_eq!(renamed.id(), alice.id());

    let older = alice.with_age(Age::new(31).expect("valid age"));
    assert_eq!(older.age().map(Age::get), Some(31));
}

#[rstest]
fn from_new_attaches_id() {
    let new_user = NewUser {
        name: UserName::new("Carol").expect("valid name"),
        email: EmailAddress::new("carol@example.com").expect("valid email"),
        age: None,
    };
    let user = User::from_new(UserId::new(42), new_user);
    assert_eq!(user.id().get(), 42);
    assert_eq!(user.email().as_ref(), "carol@example.com");
}
