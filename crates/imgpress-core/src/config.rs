//! Configuration module
//!
//! Configuration is read once from the environment (optionally seeded from a `.env`
//! file) before the compression service is built, and is immutable afterwards.

use std::env;
use std::path::Path;

use crate::constants::{MAX_QUALITY, MIN_QUALITY, SUPPORTED_FORMATS};
use crate::models::Defaults;

const SERVER_PORT: u16 = 3000;
const MAX_UPLOAD_SIZE_MB: usize = 10;
const STORAGE_PATH: &str = "storage";
const COMPRESSED_SUBDIR: &str = "compressed";
const DEFAULT_FORMAT: &str = "jpeg";
const DEFAULT_QUALITY: u32 = 80;
const ALLOWED_FORMATS: &str = "jpeg,png,webp";

/// Storage root and layout
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub path: String,
    pub compressed_subdir: String,
}

/// Image defaults applied when a request leaves an option unset
#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub default_format: String,
    pub default_quality: u32,
    pub max_width: u32,
    pub max_height: u32,
    pub allowed_formats: Vec<String>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    /// Emit logs as JSON lines instead of the compact console format
    pub log_json: bool,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
    pub storage: StorageConfig,
    pub image: ImageConfig,
}

impl Config {
    /// Load from process environment, reading `.env` first when present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build from an arbitrary key lookup. Does not validate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let log_json = lookup("LOG_FORMAT")
            .map(|format| format.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let storage = StorageConfig {
            path: lookup("STORAGE_PATH").unwrap_or_else(|| STORAGE_PATH.to_string()),
            compressed_subdir: lookup("STORAGE_COMPRESSED_SUBDIR")
                .unwrap_or_else(|| COMPRESSED_SUBDIR.to_string()),
        };

        let default_quality = match lookup("IMAGE_DEFAULT_QUALITY") {
            Some(quality) => quality
                .parse()
                .map_err(|_| anyhow::anyhow!("IMAGE_DEFAULT_QUALITY must be a number"))?,
            None => DEFAULT_QUALITY,
        };

        let image = ImageConfig {
            default_format: lookup("IMAGE_DEFAULT_FORMAT")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
            default_quality,
            max_width: lookup("IMAGE_MAX_WIDTH")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            max_height: lookup("IMAGE_MAX_HEIGHT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            allowed_formats: lookup("IMAGE_ALLOWED_FORMATS")
                .unwrap_or_else(|| ALLOWED_FORMATS.to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        Ok(Config {
            environment,
            log_json,
            server_port,
            cors_origins,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            storage,
            image,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|origin| origin == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be at least 1"));
        }

        if self.storage.path.trim().is_empty() {
            return Err(anyhow::anyhow!("STORAGE_PATH must not be empty"));
        }

        let subdir = self.storage.compressed_subdir.trim();
        if subdir.is_empty() || Path::new(subdir).is_absolute() || subdir.contains("..") {
            return Err(anyhow::anyhow!(
                "STORAGE_COMPRESSED_SUBDIR must be a non-empty relative directory name"
            ));
        }

        if self.image.allowed_formats.is_empty() {
            return Err(anyhow::anyhow!("IMAGE_ALLOWED_FORMATS must list at least one format"));
        }

        if let Some(unknown) = self
            .image
            .allowed_formats
            .iter()
            .find(|format| !SUPPORTED_FORMATS.contains(&format.as_str()))
        {
            return Err(anyhow::anyhow!(
                "IMAGE_ALLOWED_FORMATS contains unsupported format '{}' (supported: {})",
                unknown,
                SUPPORTED_FORMATS.join(",")
            ));
        }

        if !self
            .image
            .allowed_formats
            .iter()
            .any(|format| format == &self.image.default_format)
        {
            return Err(anyhow::anyhow!(
                "IMAGE_DEFAULT_FORMAT '{}' must be one of IMAGE_ALLOWED_FORMATS ({})",
                self.image.default_format,
                self.image.allowed_formats.join(",")
            ));
        }

        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.image.default_quality) {
            return Err(anyhow::anyhow!(
                "IMAGE_DEFAULT_QUALITY must be between {} and {}",
                MIN_QUALITY,
                MAX_QUALITY
            ));
        }

        Ok(())
    }

    /// Process-wide option defaults derived from the image section.
    pub fn defaults(&self) -> Defaults {
        Defaults {
            format: self.image.default_format.clone(),
            quality: self.image.default_quality,
            max_width: self.image.max_width,
            max_height: self.image.max_height,
            allowed_formats: self.image.allowed_formats.clone(),
        }
    }
}
