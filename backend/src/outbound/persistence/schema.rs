//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations`. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// User records served by the CRUD API.
    users (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Display name; never blank.
        name -> Varchar,
        /// Unique email address (`users_email_key`).
        email -> Varchar,
        /// Optional age, constrained to be non-negative.
        age -> Nullable<Int4>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (maintained by trigger).
        updated_at -> Timestamptz,
    }
}
