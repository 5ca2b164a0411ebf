//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a temporary
//! upload directory, and a full [`AppContext`]. The [`with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use bannerhub::banners::{BannerService, BannerStorage};
use bannerhub::config::Config;
use bannerhub::server::{create_router, AppContext};
use bannerhub_db::pool::{get_conn, init_memory_pool, DbPool, PooledConnection};

/// A one-pixel-ish PNG header payload as a Base64 data URL.
pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

/// The bytes [`PNG_DATA_URL`] decodes to.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a temp upload directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    upload_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The upload
    /// directory is always replaced with a fresh temp dir.
    pub fn with_config(mut config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let upload_dir = tempfile::tempdir().expect("failed to create upload dir");
        config.storage.upload_dir = upload_dir.path().to_path_buf();

        let storage = BannerStorage::new(upload_dir.path().to_path_buf());
        let banners = Arc::new(BannerService::new(storage, db.clone()));

        let ctx = AppContext {
            db: db.clone(),
            config: Arc::new(config),
            banners,
        };

        Self {
            ctx,
            db,
            upload_dir,
        }
    }

    /// Start an Axum server on a random port and return the harness
    /// together with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = create_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = create_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> PooledConnection {
        get_conn(&self.db).expect("failed to get db connection")
    }

    /// Files currently present in the upload directory.
    pub fn upload_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| entries.map(|e| e.unwrap().path()).collect())
            .unwrap_or_default()
    }
}

/// POST a name + banner payload to /upload and return the response.
pub async fn post_upload(
    addr: SocketAddr,
    body: &serde_json::Value,
) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .json(body)
        .send()
        .await
        .expect("upload request failed")
}

/// Create a user over HTTP and return the recorded banner path.
pub async fn create_user(addr: SocketAddr, name: &str) -> String {
    let resp = post_upload(
        addr,
        &serde_json::json!({"name": name, "banner": PNG_DATA_URL}),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    body["filePath"].as_str().expect("filePath missing").to_string()
}
