//! Banner storage and upload workflow module.
//!
//! This module provides local banner image storage and the workflow that
//! coordinates filesystem writes with the database layer from
//! `bannerhub_db`, plus the scheduled sweep that reclaims orphaned files.

mod service;
mod storage;
mod sweep;

pub use service::{BannerService, CreatedBanner};
pub use storage::{BannerStorage, StoredBanner, PUBLIC_PREFIX};
pub use sweep::{start_sweep_task, sweep_orphans};
