//! User data model.
//!
//! Raw strings from adapters are validated into the newtypes below before the
//! service touches the repository. A [`User`] is always a persisted record;
//! [`NewUser`] is the insert payload that has not been assigned an id yet.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyEmail,
    InvalidEmail,
    NegativeAge { age: i32 },
}

impl UserValidationError {
    /// Machine-readable reason code for adapters.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::NegativeAge { .. } => "negative_age",
        }
    }

    /// Request field the failure relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::NegativeAge { .. } => "age",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be null or empty"),
            Self::EmptyEmail => write!(f, "Email cannot be null or empty"),
            Self::InvalidEmail => write!(f, "Invalid email format"),
            Self::NegativeAge { .. } => write!(f, "Age cannot be negative"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-blank user name, stored exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Return `true` when `email` has the `local@domain.tld` shape accepted by
/// the service.
///
/// # Examples
/// ```
/// use userbase::domain::is_valid_email;
///
/// assert!(is_valid_email("alice@example.com"));
/// assert!(!is_valid_email("alice@example"));
/// assert!(!is_valid_email("alice@example.c"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Syntactically valid email address, stored exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !is_valid_email(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }

    /// Log-safe rendering that keeps the first character of the local part
    /// and the domain.
    ///
    /// # Examples
    /// ```
    /// use userbase::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("alice@example.com").expect("valid email");
    /// assert_eq!(email.masked(), "a***@example.com");
    /// ```
    #[must_use]
    pub fn masked(&self) -> String {
        mask_email(&self.0)
    }
}

/// Mask an arbitrary (possibly invalid) email for logging.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => "***".to_owned(),
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Non-negative age in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Age(i32);

impl Age {
    /// Validate and construct an [`Age`].
    pub const fn new(age: i32) -> Result<Self, UserValidationError> {
        if age < 0 {
            return Err(UserValidationError::NegativeAge { age });
        }
        Ok(Self(age))
    }

    /// Access the raw value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<Age> for i32 {
    fn from(value: Age) -> Self {
        value.0
    }
}

impl TryFrom<i32> for Age {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated payload for inserting a user that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub age: Option<Age>,
}

/// Persisted user record.
///
/// ## Invariants
/// - `id` was assigned by the store and never changes.
/// - `name` is non-blank, `email` is well formed, `age` is non-negative.
///
/// Serialises as `{"id", "name", "email", "age"}` with `age` set to `null`
/// when unknown.
///
/// # Examples
/// ```
/// use userbase::domain::{EmailAddress, User, UserId, UserName};
///
/// let user = User::new(
///     UserId::new(1),
///     UserName::new("Alice").expect("valid name"),
///     EmailAddress::new("alice@example.com").expect("valid email"),
///     None,
/// );
/// assert_eq!(user.name().as_ref(), "Alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    age: Option<Age>,
}

impl User {
    /// Build a user from validated components.
    #[must_use]
    pub const fn new(id: UserId, name: UserName, email: EmailAddress, age: Option<Age>) -> Self {
        Self {
            id,
            name,
            email,
            age,
        }
    }

    /// Attach a store-assigned id to an insert payload.
    #[must_use]
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        let NewUser { name, email, age } = new_user;
        Self::new(id, name, email, age)
    }

    /// Validate raw column values loaded from a store.
    pub fn try_from_parts(
        id: i64,
        name: String,
        email: String,
        age: Option<i32>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(
            UserId::new(id),
            UserName::new(name)?,
            EmailAddress::new(email)?,
            age.map(Age::new).transpose()?,
        ))
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// User name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Unique email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Age in years when known.
    #[must_use]
    pub const fn age(&self) -> Option<Age> {
        self.age
    }

    /// Replace the name.
    #[must_use]
    pub fn with_name(mut self, name: UserName) -> Self {
        self.name = name;
        self
    }

    /// Replace the email address.
    #[must_use]
    pub fn with_email(mut self, email: EmailAddress) -> Self {
        self.email = email;
        self
    }

    /// Replace the age.
    #[must_use]
    pub fn with_age(mut self, age: Age) -> Self {
        self.age = Some(age);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDto {
    id: i64,
    name: String,
    email: String,
    age: Option<i32>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            name,
            email,
            age,
        } = value;
        Self {
            id: id.get(),
            name: name.into(),
            email: email.into(),
            age: age.map(Age::get),
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let UserDto {
            id,
            name,
            email,
            age,
        } = value;
        Self::try_from_parts(id, name, email, age)
    }
}

#[cfg(test)]
mod tests;
