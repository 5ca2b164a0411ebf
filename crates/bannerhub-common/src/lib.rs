//! Bannerhub-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across bannerhub:
//!
//! - **Typed IDs**: A type-safe wrapper for user record identifiers
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use bannerhub_common::{Error, Result, UserId};
//!
//! let id = UserId::from(1);
//! assert_eq!(id.get(), 1);
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("user"))
//! }
//! ```

pub mod error;
pub mod ids;

pub use error::{Error, Result};
pub use ids::UserId;
