//! Scheduled reclamation of orphaned banner files.
//!
//! The create/update workflows stage a file before committing the database
//! row, so a failed commit leaves an unreferenced file behind. The sweep
//! walks the upload directory on an interval and unlinks any file no record
//! references, once it is older than a grace period (an in-flight upload
//! whose insert has not landed yet must never be reclaimed).

use std::time::Duration;

use bannerhub_common::Result;
use bannerhub_db::pool::{get_conn, DbPool};
use bannerhub_db::queries::users;

use super::storage::BannerStorage;

/// Remove unreferenced files from the upload directory.
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `storage` - Banner storage whose upload directory is swept
/// * `grace` - Minimum age a file must reach before it may be reclaimed
///
/// # Returns
///
/// * `Ok(usize)` - Number of files removed
/// * `Err(Error)` - If the reference query fails
pub fn sweep_orphans(pool: &DbPool, storage: &BannerStorage, grace: Duration) -> Result<usize> {
    let referenced: std::collections::HashSet<String> = {
        let conn = get_conn(pool)?;
        users::list_banner_refs(&conn)?
            .into_iter()
            .filter_map(|r| r.rsplit('/').next().map(str::to_string))
            .collect()
    };

    let entries = match std::fs::read_dir(storage.upload_dir()) {
        Ok(entries) => entries,
        // Nothing uploaded yet
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if referenced.contains(file_name) {
            continue;
        }

        let old_enough = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|mtime| mtime.elapsed().ok())
            .map(|age| age >= grace)
            .unwrap_or(false);
        if !old_enough {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("sweep removed orphaned banner {}", file_name);
                removed += 1;
            }
            Err(e) => {
                tracing::warn!("sweep failed to remove {}: {}", file_name, e);
            }
        }
    }

    Ok(removed)
}

/// Spawn the periodic orphan sweep.
///
/// Sweep failures are logged and never stop the loop.
pub fn start_sweep_task(
    pool: DbPool,
    storage: BannerStorage,
    interval_secs: u64,
    grace_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let grace = Duration::from_secs(grace_secs);

        loop {
            interval.tick().await;
            match sweep_orphans(&pool, &storage, grace) {
                Ok(0) => {}
                Ok(n) => tracing::info!("sweep reclaimed {} orphaned banner(s)", n),
                Err(e) => tracing::warn!("orphan sweep failed: {}", e),
            }
        }
    })
}
