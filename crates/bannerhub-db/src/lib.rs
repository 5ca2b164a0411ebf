//! Bannerhub-DB: Database schema, migrations, and query operations
//!
//! This crate provides database functionality for bannerhub using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use bannerhub_db::pool::{init_pool, get_conn};
//! use bannerhub_db::queries::users;
//!
//! let pool = init_pool("/var/lib/bannerhub/db.sqlite").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let id = users::insert_user(&conn, "admin", None).unwrap();
//! println!("Created user: {}", id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
