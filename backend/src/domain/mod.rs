//! Domain primitives, services and ports.
//!
//! Purpose: hold the user model, its validation rules and the service that
//! enforces them. Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - `User`, `NewUser` and the validated newtypes (`UserId`, `UserName`,
//!   `EmailAddress`, `Age`).
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `UserService`: implementation of the `UsersQuery` and `UsersCommand`
//!   driving ports.
//! - `TraceId`: request correlation identifier.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Age, EmailAddress, NewUser, User, UserId, UserName, UserValidationError, is_valid_email,
};
pub use self::user_service::UserService;
