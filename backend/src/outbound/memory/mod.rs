//! Process-local adapters.
//!
//! Used when the server starts without a database URL and by tests that need
//! real repository semantics without PostgreSQL.

mod in_memory_user_repository;

pub use in_memory_user_repository::InMemoryUserRepository;
