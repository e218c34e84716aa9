//! Accounts domain: users, registration, login, profile

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{NewUser, ProfileUpdate, User};

// Re-export repository types
#[cfg(any(test, feature = "test-support"))]
pub use repository::memory::InMemoryUsers;
pub use repository::{PgUserStore, UserStore};

// Re-export API types
pub use api::routes;
pub use api::AccountsState;
