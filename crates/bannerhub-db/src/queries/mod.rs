//! Database query operations.

pub mod users;
