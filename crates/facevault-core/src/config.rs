//! Configuration module
//!
//! Settings are read once at startup from the process environment (after loading
//! an optional `.env` file) and passed explicitly to every client that needs them.
//! Nothing below reads the environment after `Config::from_env` returns.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 3000;
const MAX_FILE_SIZE_MB: usize = 10;
const MAX_ARCHIVE_ENTRY_SIZE_MB: usize = 50;
const FACE_MATCH_THRESHOLD: f32 = 90.0;
const MAX_FACES: i32 = 5;
const STORED_NAME_PREFIX: &str = "upload";

/// Static AWS credentials supplied through configuration.
///
/// When absent, clients fall back to the default AWS provider chain
/// (environment, profile, instance metadata).
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Face search settings. Present only when both the collection and the table are configured.
#[derive(Clone, Debug)]
pub struct FaceSearchConfig {
    pub collection_id: String,
    pub table_name: String,
    pub face_match_threshold: f32,
    pub max_faces: i32,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub bucket_name: Option<String>,
    pub aws_region: Option<String>,
    pub aws_credentials: Option<AwsCredentials>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, LocalStack, ...)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload configuration
    pub max_file_size_bytes: usize,
    pub max_archive_entry_size_bytes: usize,
    pub stored_name_prefix: String,
    // Face search configuration
    pub face_search: Option<FaceSearchConfig>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<AppConfig>);

impl Config {
    fn inner(&self) -> &AppConfig {
        &self.0
    }

    /// Load `.env` (if any) and read configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| -> Option<String> {
            names
                .iter()
                .find_map(|name| lookup(name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment =
            first(&["ENVIRONMENT", "APP_ENV"]).unwrap_or_else(|| "development".to_string());

        let cors_origins_str = first(&["CORS_ORIGINS"]).unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match first(&["STORAGE_BACKEND"]) {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let aws_credentials = match (
            first(&["ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"]),
            first(&["SECRET_ACCESS_KEY", "AWS_SECRET_ACCESS_KEY"]),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(AwsCredentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => None,
            _ => {
                return Err(anyhow::anyhow!(
                    "ACCESS_KEY_ID and SECRET_ACCESS_KEY must be set together"
                ))
            }
        };

        let face_search = match (first(&["COLLECTION_ID"]), first(&["DYNAMODB_TABLE"])) {
            (Some(collection_id), Some(table_name)) => Some(FaceSearchConfig {
                collection_id,
                table_name,
                face_match_threshold: parse_or(
                    first(&["FACE_MATCH_THRESHOLD"]),
                    "FACE_MATCH_THRESHOLD",
                    FACE_MATCH_THRESHOLD,
                )?,
                max_faces: parse_or(first(&["MAX_FACES"]), "MAX_FACES", MAX_FACES)?,
            }),
            _ => None,
        };

        let max_file_size_mb: usize =
            parse_or(first(&["MAX_FILE_SIZE_MB"]), "MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB)?;
        let max_entry_size_mb: usize = parse_or(
            first(&["MAX_ARCHIVE_ENTRY_SIZE_MB"]),
            "MAX_ARCHIVE_ENTRY_SIZE_MB",
            MAX_ARCHIVE_ENTRY_SIZE_MB,
        )?;

        let config = AppConfig {
            server_port: parse_or(first(&["PORT"]), "PORT", SERVER_PORT)?,
            environment,
            cors_origins,
            storage_backend,
            bucket_name: first(&["BUCKET_NAME", "S3_BUCKET"]),
            aws_region: first(&["AWS_REGION", "REGION"]),
            aws_credentials,
            s3_endpoint: first(&["S3_ENDPOINT"]),
            local_storage_path: first(&["LOCAL_STORAGE_PATH"]),
            local_storage_base_url: first(&["LOCAL_STORAGE_BASE_URL"]),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_archive_entry_size_bytes: max_entry_size_mb * 1024 * 1024,
            stored_name_prefix: first(&["STORED_NAME_PREFIX"])
                .unwrap_or_else(|| STORED_NAME_PREFIX.to_string()),
            face_search,
        };

        Ok(Config(Box::new(config)))
    }

    /// Fail fast on settings the selected backends cannot run without.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let config = self.inner();

        match config.storage_backend {
            StorageBackend::S3 => {
                if config.bucket_name.is_none() {
                    return Err(anyhow::anyhow!("BUCKET_NAME must be set for S3 storage"));
                }
                if config.aws_region.is_none() {
                    return Err(anyhow::anyhow!("AWS_REGION must be set for S3 storage"));
                }
            }
            StorageBackend::Local => {
                if config.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set for local storage"
                    ));
                }
                if config.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set for local storage"
                    ));
                }
            }
        }

        if config.face_search.is_some() && config.aws_region.is_none() {
            return Err(anyhow::anyhow!("AWS_REGION must be set for face search"));
        }

        if let Some(ref faces) = config.face_search {
            if !(0.0..=100.0).contains(&faces.face_match_threshold) {
                return Err(anyhow::anyhow!(
                    "FACE_MATCH_THRESHOLD must be between 0 and 100"
                ));
            }
            if faces.max_faces < 1 {
                return Err(anyhow::anyhow!("MAX_FACES must be at least 1"));
            }
        }

        if config.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().environment)
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn bucket_name(&self) -> Option<&str> {
        self.inner().bucket_name.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn aws_credentials(&self) -> Option<&AwsCredentials> {
        self.inner().aws_credentials.as_ref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn max_archive_entry_size_bytes(&self) -> usize {
        self.inner().max_archive_entry_size_bytes
    }

    pub fn stored_name_prefix(&self) -> &str {
        &self.inner().stored_name_prefix
    }

    pub fn face_search(&self) -> Option<&FaceSearchConfig> {
        self.inner().face_search.as_ref()
    }
}

fn is_production_name(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn parse_or<T>(value: Option<String>, name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", name, raw)),
        None => Ok(default),
    }
}
