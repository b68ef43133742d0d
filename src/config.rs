// src/config.rs
//
// Storefront configuration
//
// Sourced from WOODWORKS_* environment variables, then overridden by an
// optional JSON file (WOODWORKS_CONFIG, or {CONFIG_DIR}/woodworks/config.json).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:4943";
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_READ_RETRIES: u32 = 1;
pub const DEFAULT_WHATSAPP_NUMBER: &str = "919828288383";
pub const DEFAULT_MAX_DIMENSION: u32 = 1200;
pub const DEFAULT_MAX_SIZE_BYTES: usize = 200 * 1024;

/// Bounds applied to every image before it is attached to a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    /// Longest side in pixels
    pub max_dimension: u32,
    pub max_size_bytes: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub backend_url: String,
    pub auth_token: Option<String>,
    /// Identical on every page request of a listing
    pub page_size: u64,
    /// Upper bound for a single remote call
    pub request_timeout: Duration,
    /// Automatic retries for idempotent reads
    pub read_retries: u32,
    pub whatsapp_number: String,
    pub image_limits: ImageLimits,
}

#[derive(Debug, Default, Deserialize)]
struct StorefrontConfigOverride {
    backend_url: Option<String>,
    auth_token: Option<String>,
    page_size: Option<u64>,
    request_timeout_secs: Option<u64>,
    read_retries: Option<u32>,
    whatsapp_number: Option<String>,
    max_image_dimension: Option<u32>,
    max_image_bytes: Option<usize>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            auth_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            read_retries: DEFAULT_READ_RETRIES,
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            image_limits: ImageLimits::default(),
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = var("WOODWORKS_BACKEND_URL") {
            config.backend_url = url;
        }
        config.auth_token = var("WOODWORKS_AUTH_TOKEN").filter(|t| !t.is_empty());
        if let Some(size) = var("WOODWORKS_PAGE_SIZE") {
            config.page_size = parse_var("WOODWORKS_PAGE_SIZE", &size)?;
        }
        if let Some(secs) = var("WOODWORKS_REQUEST_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_var("WOODWORKS_REQUEST_TIMEOUT_SECS", &secs)?);
        }
        if let Some(retries) = var("WOODWORKS_READ_RETRIES") {
            config.read_retries = parse_var("WOODWORKS_READ_RETRIES", &retries)?;
        }
        if let Some(number) = var("WOODWORKS_WHATSAPP_NUMBER") {
            config.whatsapp_number = number;
        }

        config.validate()?;
        Ok(config)
    }

    /// Environment first, then the JSON override file if one exists
    pub fn load() -> AppResult<Self> {
        let mut config = Self::from_env()?;
        let path = match std::env::var("WOODWORKS_CONFIG") {
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => default_config_path().filter(|p| p.exists()),
        };
        if let Some(path) = path {
            config.apply_file(&path)?;
        }
        Ok(config)
    }

    pub fn apply_file(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("read {}: {}", path.display(), e)))?;
        let overrides: StorefrontConfigOverride = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("parse {}: {}", path.display(), e)))?;
        self.apply(overrides);
        self.validate()
    }

    fn apply(&mut self, overrides: StorefrontConfigOverride) {
        if let Some(value) = overrides.backend_url {
            self.backend_url = value;
        }
        if let Some(value) = overrides.auth_token {
            self.auth_token = Some(value);
        }
        if let Some(value) = overrides.page_size {
            self.page_size = value;
        }
        if let Some(value) = overrides.request_timeout_secs {
            self.request_timeout = Duration::from_secs(value);
        }
        if let Some(value) = overrides.read_retries {
            self.read_retries = value;
        }
        if let Some(value) = overrides.whatsapp_number {
            self.whatsapp_number = value;
        }
        if let Some(value) = overrides.max_image_dimension {
            self.image_limits.max_dimension = value;
        }
        if let Some(value) = overrides.max_image_bytes {
            self.image_limits.max_size_bytes = value;
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.page_size == 0 {
            return Err(AppError::Config("page_size must be greater than zero".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::Config("request timeout must be greater than zero".to_string()));
        }
        if self.image_limits.max_dimension == 0 {
            return Err(AppError::Config("max image dimension must be greater than zero".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("parse {}: {}", key, e)))
}

/// Path structure: {CONFIG_DIR}/woodworks/config.json
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("woodworks").join("config.json"))
}
