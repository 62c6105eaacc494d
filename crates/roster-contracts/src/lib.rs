// Public contracts for the Roster API
// This crate defines the request/response DTOs shared by the API surface.
// Storage row types live in roster-storage; these types are the wire shapes.

pub mod common;
pub mod education;
pub mod employee;
pub mod experience;
pub mod license;
pub mod role;
pub mod user;

pub use common::*;
pub use education::*;
pub use employee::*;
pub use experience::*;
pub use license::*;
pub use role::*;
pub use user::*;
