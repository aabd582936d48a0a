use crate::domain::model::ReleaseVersion;
use crate::utils::error::{InstallerError, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://github.com/Requarks/wiki/releases/download/v{0}/wiki-js.tar.gz";

#[derive(Debug, Deserialize)]
struct Manifest {
    version: Option<serde_json::Value>,
}

/// 讀取 package.json 並取出版本
pub async fn read_manifest_version<P: AsRef<Path>>(path: P) -> Result<ReleaseVersion> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await?;
    parse_manifest_version(&content, &path.display().to_string())
}

pub fn parse_manifest_version(content: &str, source: &str) -> Result<ReleaseVersion> {
    let manifest: Manifest =
        serde_json::from_str(content).map_err(|e| InstallerError::ManifestParseError {
            path: source.to_string(),
            message: e.to_string(),
        })?;

    match manifest.version {
        Some(serde_json::Value::String(version)) => {
            Ok(ReleaseVersion::from_manifest_version(&version))
        }
        Some(other) => Err(InstallerError::ManifestParseError {
            path: source.to_string(),
            message: format!("version must be a string, got {}", other),
        }),
        None => Err(InstallerError::MissingVersionError {
            path: source.to_string(),
        }),
    }
}

pub fn release_url(template: &str, version: &ReleaseVersion) -> String {
    template.replacen("{0}", version.as_str(), 1)
}
