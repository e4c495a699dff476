//! Model store backends

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Persistence boundary for serialized model artifacts.
///
/// The pipeline does not distinguish the failure modes of this boundary;
/// a missing key, denied access, and a network fault all surface as the
/// same generic error.
pub trait ModelStore {
    /// Whether an object exists under the key.
    fn exists(&self, key: &str) -> Result<bool>;

    /// Upload a local file to the key. `remove_local` deletes the source
    /// file after a successful upload.
    fn upload(&self, local_path: &Path, key: &str, remove_local: bool) -> Result<()>;

    /// Fetch the object bytes stored under the key.
    fn download(&self, key: &str) -> Result<Vec<u8>>;
}

/// S3-compatible object store spoken to over plain HTTP.
///
/// Objects resolve to `{endpoint}/{bucket}/{key}`: HEAD probes existence,
/// PUT uploads, GET downloads.
pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
    bucket: String,
}

impl HttpObjectStore {
    pub fn new(endpoint: &str, bucket: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }
}

impl ModelStore for HttpObjectStore {
    fn exists(&self, key: &str) -> Result<bool> {
        let url = self.object_url(key);
        let response = self
            .client
            .head(&url)
            .send()
            .with_context(|| format!("existence check failed for {}", url))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => bail!("existence check for {} returned {}", url, status),
        }
    }

    fn upload(&self, local_path: &Path, key: &str, remove_local: bool) -> Result<()> {
        let url = self.object_url(key);
        let body = std::fs::read(local_path)
            .with_context(|| format!("failed to read artifact file {:?}", local_path))?;

        debug!(url = %url, bytes = body.len(), "Uploading model artifact");
        let response = self
            .client
            .put(&url)
            .body(body)
            .send()
            .with_context(|| format!("upload to {} failed", url))?;
        if !response.status().is_success() {
            bail!("upload to {} returned {}", url, response.status());
        }

        if remove_local {
            std::fs::remove_file(local_path)
                .with_context(|| format!("failed to remove local artifact {:?}", local_path))?;
        }

        info!(url = %url, "Model artifact uploaded");
        Ok(())
    }

    fn download(&self, key: &str) -> Result<Vec<u8>> {
        let url = self.object_url(key);
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("download from {} failed", url))?;
        if !response.status().is_success() {
            bail!("download from {} returned {}", url, response.status());
        }

        let bytes = response
            .bytes()
            .with_context(|| format!("failed to read response body from {}", url))?;
        debug!(url = %url, bytes = bytes.len(), "Model artifact downloaded");
        Ok(bytes.to_vec())
    }
}

/// Filesystem-backed store rooted at a directory; keys are relative paths.
pub struct FsModelStore {
    root: PathBuf,
}

impl FsModelStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ModelStore for FsModelStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.key_path(key).exists())
    }

    fn upload(&self, local_path: &Path, key: &str, remove_local: bool) -> Result<()> {
        let target = self.key_path(key);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create store directory {:?}", parent))?;
        }
        std::fs::copy(local_path, &target).with_context(|| {
            format!("failed to copy artifact {:?} to {:?}", local_path, target)
        })?;

        if remove_local {
            std::fs::remove_file(local_path)
                .with_context(|| format!("failed to remove local artifact {:?}", local_path))?;
        }

        info!(path = %target.display(), "Model artifact stored");
        Ok(())
    }

    fn download(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.key_path(key);
        std::fs::read(&path).with_context(|| format!("failed to read model file {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn artifact_file(dir: &Path) -> PathBuf {
        let path = dir.join("trained.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"model-bytes").unwrap();
        path
    }

    #[test]
    fn test_fs_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsModelStore::new(dir.path().join("store"));
        let artifact = artifact_file(dir.path());

        assert!(!store.exists("registry/model.bin").unwrap());
        store.upload(&artifact, "registry/model.bin", false).unwrap();

        assert!(store.exists("registry/model.bin").unwrap());
        assert_eq!(store.download("registry/model.bin").unwrap(), b"model-bytes");
        // Local copy kept by default.
        assert!(artifact.exists());
    }

    #[test]
    fn test_fs_store_upload_removes_local() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsModelStore::new(dir.path().join("store"));
        let artifact = artifact_file(dir.path());

        store.upload(&artifact, "model.bin", true).unwrap();
        assert!(!artifact.exists());
        assert!(store.exists("model.bin").unwrap());
    }

    #[test]
    fn test_fs_store_download_absent_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsModelStore::new(dir.path());
        assert!(store.download("no/such/key.bin").is_err());
    }

    #[test]
    fn test_http_store_url_layout() {
        let store = HttpObjectStore::new("http://localhost:9000/", "fraud-models");
        assert_eq!(
            store.object_url("registry/model.bin"),
            "http://localhost:9000/fraud-models/registry/model.bin"
        );
    }
}
