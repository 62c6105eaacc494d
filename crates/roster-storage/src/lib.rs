//! Storage layer for the roster service.
//!
//! Repositories return plain row structs; API-facing response shapes live
//! in `roster-contracts` and are assembled by the service layer.

mod backend;
mod memory;
mod models;
pub mod password;
mod postgres;

pub use backend::Database;
pub use memory::InMemoryStore;
pub use models::*;
pub use postgres::PgDatabase;
