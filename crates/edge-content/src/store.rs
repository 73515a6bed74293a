//! Build directory enumeration and upload descriptors.

use std::path::{Component, Path, PathBuf};

use edge_cache::CachePolicy;
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ContentError, ContentResult};
use crate::mime::MimeResolver;

/// A file discovered in the build directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAsset {
    /// Path relative to the build directory, `/`-separated.
    pub relative_path: String,
    /// Extension including the leading dot, if the file has one.
    pub extension: Option<String>,
    /// Absolute path of the file on disk.
    pub source: PathBuf,
}

/// Everything the apply engine needs to upload one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectUpload {
    /// Object key.
    pub key: String,
    /// Local file holding the object content.
    pub source: PathBuf,
    /// Content-Type of the object.
    pub content_type: String,
    /// Cache-Control of the object.
    pub cache_control: String,
}

/// Enumerates a local build directory and describes its uploads.
///
/// Enumeration is lazy and restartable: every call walks the directory
/// again, in file-name order, so the same tree always yields the same
/// sequence. Descriptions share no state and can be produced or applied in
/// any order.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    resolver: MimeResolver,
    cache_policy: CachePolicy,
}

impl ContentStore {
    /// Create a store over a build directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            resolver: MimeResolver::default(),
            cache_policy: CachePolicy::spa_objects(),
        }
    }

    /// Use a different content-type resolver.
    pub fn with_resolver(mut self, resolver: MimeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Use a different object cache policy.
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// The build directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The content-type resolver.
    pub fn resolver(&self) -> &MimeResolver {
        &self.resolver
    }

    /// Lazily enumerate the files under the root.
    ///
    /// A missing root yields a single [`ContentError::NotADirectory`].
    /// Unreadable entries yield an error item and enumeration continues.
    pub fn enumerate(&self) -> impl Iterator<Item = ContentResult<FileAsset>> + '_ {
        let missing = (!self.root.is_dir()).then(|| ContentError::NotADirectory(self.root.clone()));
        let skip_walk = missing.is_some();

        let walk = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter(move |_| !skip_walk)
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_dir() => None,
                Ok(entry) => Some(self.asset_for(entry.path())),
                Err(e) => Some(Err(ContentError::from(e))),
            });

        missing.map(Err).into_iter().chain(walk)
    }

    /// Describe the upload of one asset.
    pub fn describe_upload(&self, asset: &FileAsset) -> ObjectUpload {
        let content_type = match asset.extension.as_deref() {
            Some(ext) => self.resolver.resolve(ext),
            None => self.resolver.fallback(),
        };

        if !self.is_mapped(asset) {
            debug!(
                key = %asset.relative_path,
                extension = ?asset.extension,
                content_type,
                "no content type mapping, using fallback"
            );
        }

        ObjectUpload {
            key: asset.relative_path.clone(),
            source: asset.source.clone(),
            content_type: content_type.to_string(),
            cache_control: self.cache_policy.cache_control_header(),
        }
    }

    /// Whether an asset's extension has a content-type mapping.
    pub fn is_mapped(&self, asset: &FileAsset) -> bool {
        asset
            .extension
            .as_deref()
            .map(|ext| self.resolver.is_mapped(ext))
            .unwrap_or(false)
    }

    /// Lazily enumerate and describe every upload.
    pub fn uploads(&self) -> impl Iterator<Item = ContentResult<ObjectUpload>> + '_ {
        self.enumerate()
            .map(move |asset| asset.map(|asset| self.describe_upload(&asset)))
    }

    fn asset_for(&self, path: &Path) -> ContentResult<FileAsset> {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        let mut parts = Vec::new();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                let part = part
                    .to_str()
                    .ok_or_else(|| ContentError::NonUtf8Path(path.to_path_buf()))?;
                parts.push(part);
            }
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e));

        Ok(FileAsset {
            relative_path: parts.join("/"),
            extension,
            source: path.to_path_buf(),
        })
    }
}
