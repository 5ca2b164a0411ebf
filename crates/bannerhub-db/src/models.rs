//! Database models for bannerhub.
//!
//! These structs mirror the database schema and are used by the
//! query layer.

use bannerhub_common::UserId;
use serde::{Deserialize, Serialize};

/// User record model.
///
/// `banner` is the public-prefixed relative path to the stored banner file
/// ("/uploads/<file>"), or `None` until a banner has been uploaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub banner: Option<String>,
}
