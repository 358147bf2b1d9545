//! Object storage settings loaded from the environment.

use crate::error::StorageError;

/// Default region when `S3_REGION` is unset. MinIO ignores it but the SDK
/// requires one.
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Custom endpoint, e.g. `http://minio:9000`. `None` targets AWS.
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl StorageConfig {
    /// Read `S3_ENDPOINT`, `S3_REGION`, `S3_BUCKET`, `S3_ACCESS_KEY` and
    /// `S3_SECRET_KEY`.
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, StorageError> {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let bucket = non_empty("S3_BUCKET")
            .ok_or_else(|| StorageError::Config("S3_BUCKET must be set".into()))?;

        let access_key = non_empty("S3_ACCESS_KEY");
        let secret_key = non_empty("S3_SECRET_KEY");
        if access_key.is_some() != secret_key.is_some() {
            return Err(StorageError::Config(
                "S3_ACCESS_KEY and S3_SECRET_KEY must be set together".into(),
            ));
        }

        Ok(Self {
            endpoint: non_empty("S3_ENDPOINT"),
            region: non_empty("S3_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            bucket,
            access_key,
            secret_key,
        })
    }
}
