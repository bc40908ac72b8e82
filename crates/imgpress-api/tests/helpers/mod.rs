//! Shared setup for API integration tests.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum_test::TestServer;
use imgpress_api::constants::API_PREFIX;
use imgpress_api::setup::{routes, services};
use imgpress_core::Config;
use tempfile::TempDir;

pub struct TestApp {
    server: TestServer,
    root_dir: TempDir,
    storage_path: PathBuf,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Storage root, nested one level under the temporary directory.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Temporary directory holding the storage root, outside the servable area.
    pub fn root_path(&self) -> &Path {
        self.root_dir.path()
    }
}

/// Build the full router over a temporary storage directory.
///
/// `overrides` are applied on top of the default environment.
pub async fn setup_test_app(overrides: &[(&str, &str)]) -> TestApp {
    let root_dir = TempDir::new().expect("Failed to create temp dir");
    let storage_path = root_dir.path().join("store");

    let mut env: HashMap<String, String> = HashMap::new();
    env.insert(
        "STORAGE_PATH".to_string(),
        storage_path.to_string_lossy().into_owned(),
    );
    env.insert("IMAGE_DEFAULT_FORMAT".to_string(), "jpeg".to_string());
    env.insert("IMAGE_DEFAULT_QUALITY".to_string(), "80".to_string());
    for (key, value) in overrides {
        env.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_lookup(|key| env.get(key).cloned()).expect("Invalid test config");
    config.validate().expect("Test config failed validation");

    let state = services::initialize_services(&config)
        .await
        .expect("Failed to initialize services");
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        root_dir,
        storage_path,
    }
}

pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}
