//! Userbase library modules.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the user
//! model and service, [`inbound`] exposes it over HTTP and [`outbound`]
//! stores users in PostgreSQL or in memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
