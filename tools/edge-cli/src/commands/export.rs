//! Export the desired state to a directory through the apply seam.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use async_trait::async_trait;
use chrono::Utc;
use dialoguer::Confirm;
use edge_core::{DeployStage, ResourceAddress};
use edge_deploy::{apply_graph, AppliedResource, ApplyEngine, ApplyError, ApplyReport, GraphNode};
use indicatif::ProgressBar;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::ExportArgs;
use crate::context::Context;

/// Apply engine that writes one JSON document per resource.
///
/// Documents land in `<root>/<NN>-<stage>/<kind>/<name>.json`, with the
/// `/`-separated segments of the name mirrored as directories.
pub struct ExportEngine {
    root: PathBuf,
    progress: ProgressBar,
}

impl ExportEngine {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Advance a progress bar for every written resource.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Path a node is written to, relative to the root.
    pub fn relative_path(node: &GraphNode) -> PathBuf {
        Path::new(&stage_dir(node.stage)).join(address_path(&node.address))
    }
}

#[async_trait]
impl ApplyEngine for ExportEngine {
    async fn apply(&self, node: &GraphNode) -> Result<AppliedResource, ApplyError> {
        let address = node.address.to_string();
        let io = |e: std::io::Error| ApplyError::Io {
            address: address.clone(),
            message: e.to_string(),
        };

        let relative = Self::relative_path(node);
        let path = self.root.join(&relative);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(io)?;
        }

        let document = serde_json::to_vec_pretty(node).map_err(|e| ApplyError::Rejected {
            address: address.clone(),
            message: e.to_string(),
        })?;
        tokio::fs::write(&path, document).await.map_err(io)?;
        self.progress.inc(1);

        Ok(AppliedResource::new(node.address.clone())
            .with_attribute("path", relative.to_string_lossy()))
    }
}

fn stage_dir(stage: DeployStage) -> String {
    format!("{:02}-{}", stage.number(), stage.as_str())
}

/// Longest file name segment most filesystems accept, in bytes.
const MAX_SEGMENT: usize = 255;

const DOCUMENT_SUFFIX: &str = ".json";

/// Path of an address below its stage directory.
fn address_path(address: &ResourceAddress) -> PathBuf {
    let mut path = PathBuf::from(address.kind.to_string());
    let segments: Vec<&str> = address.name.split('/').collect();
    let last = segments.len() - 1;

    for (i, segment) in segments.into_iter().enumerate() {
        let mut encoded = encode_segment(segment);
        if i == last {
            encoded.push_str(DOCUMENT_SUFFIX);
        } else if let Some(stem) = encoded.strip_suffix(DOCUMENT_SUFFIX) {
            // a directory must never shadow a sibling document
            encoded = format!("{}%2Ejson", stem);
        }
        path.push(shorten(encoded));
    }
    path
}

/// Escape a segment so it is a plain, unambiguous file name.
fn encode_segment(segment: &str) -> String {
    match segment {
        "" => "%2F".to_string(),
        "." | ".." => segment.replace('.', "%2E"),
        _ => segment.replace('%', "%25"),
    }
}

/// Replace the tail of an over-long segment with a digest of the whole.
fn shorten(segment: String) -> String {
    if segment.len() <= MAX_SEGMENT {
        return segment;
    }

    let digest = format!("{:x}", Sha256::digest(segment.as_bytes()));
    let suffix = format!("~{}{}", &digest[..16], DOCUMENT_SUFFIX);
    let mut cut = MAX_SEGMENT - suffix.len();
    while !segment.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &segment[..cut], suffix)
}

/// Summary written next to the exported documents.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub app: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    pub exported_at: String,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halted_at: Option<DeployStage>,
    pub resources: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub address: String,
    pub stage: DeployStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Manifest {
    pub fn from_report(app: &str, environment: Option<String>, report: &ApplyReport) -> Self {
        let resources = report
            .outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(applied) => ManifestEntry {
                    address: outcome.address.to_string(),
                    stage: outcome.stage,
                    path: applied.attributes.get("path").cloned(),
                    error: None,
                },
                Err(e) => ManifestEntry {
                    address: outcome.address.to_string(),
                    stage: outcome.stage,
                    path: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        Self {
            app: app.to_string(),
            environment,
            exported_at: Utc::now().to_rfc3339(),
            complete: report.is_complete(),
            halted_at: report.halted_at,
            resources,
        }
    }
}

/// Run the export command.
pub async fn run(args: ExportArgs, ctx: &Context) -> Result<()> {
    let spa = ctx.spa_config()?;
    let out = ctx.resolve_path(&args.out.to_string_lossy());

    ctx.output.header(&format!("Exporting {} to {}", spa.name, out.display()));

    ctx.output.step(1, 3, "Composing desired state");
    let composition = super::plan::compose(&spa, ctx)?;

    let occupied = out.is_dir()
        && std::fs::read_dir(&out)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
    if occupied && !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("{} is not empty. Write into it anyway?", out.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Export cancelled");
            return Ok(());
        }
    }

    ctx.output.step(2, 3, "Writing resources");
    let progress = ctx
        .output
        .progress(composition.graph.len() as u64, "resources");
    let engine = ExportEngine::new(&out).with_progress(progress.clone());
    let report = apply_graph(&engine, &composition.graph).await;
    progress.finish_and_clear();

    ctx.output.step(3, 3, "Writing manifest");
    let manifest = Manifest::from_report(&spa.name, ctx.env.clone(), &report);
    let manifest_path = out.join("manifest.json");
    std::fs::create_dir_all(&out)
        .with_context(|| format!("Failed to create {}", out.display()))?;
    std::fs::write(&manifest_path, serde_json::to_vec_pretty(&manifest)?)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    if ctx.output.is_json() {
        ctx.output.json(&manifest);
    }

    if let Some(stage) = report.halted_at {
        for error in report.failures() {
            ctx.output.error(&error.to_string());
        }
        bail!("Export stopped at stage {}", stage);
    }

    ctx.output.success(&format!(
        "Exported {} resources to {}",
        manifest.resources.len(),
        out.display()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use edge_core::{ResourceKind, SeededIdentity, SpaConfig};
    use edge_deploy::Composer;
    use tempfile::TempDir;

    fn object_path(key: &str) -> PathBuf {
        address_path(&ResourceAddress::new(ResourceKind::Object, key))
    }

    #[test]
    fn test_address_path_mirrors_key_directories() {
        assert_eq!(
            object_path("assets/100%.js"),
            PathBuf::from("aws_s3_object/assets/100%25.js.json")
        );
        assert_eq!(
            object_path("data.json/x"),
            PathBuf::from("aws_s3_object/data%2Ejson/x.json")
        );
        assert_eq!(
            object_path("../a"),
            PathBuf::from("aws_s3_object/%2E%2E/a.json")
        );
    }

    #[test]
    fn test_address_path_stays_within_segment_limit() {
        let segment = "a".repeat(250);
        let key = std::iter::repeat(segment.as_str())
            .take(8)
            .collect::<Vec<_>>()
            .join("/");

        let path = object_path(&key);
        let longer = object_path(&format!("{}b", key));
        assert_eq!(path.components().count(), 9);
        for component in path.components().chain(longer.components()) {
            assert!(component.as_os_str().len() <= MAX_SEGMENT);
        }
        assert!(longer.to_string_lossy().ends_with(".json"));
        assert_ne!(longer, path);
    }

    #[tokio::test]
    async fn test_export_writes_stage_directories() {
        let build = TempDir::new().unwrap();
        std::fs::write(build.path().join("index.html"), "<html></html>").unwrap();
        std::fs::create_dir_all(build.path().join("assets")).unwrap();
        std::fs::write(build.path().join("assets/app.js"), "1").unwrap();

        let composition = Composer::new(
            SpaConfig::new("shop", build.path()),
            Arc::new(SeededIdentity::new("seed")),
        )
        .compose()
        .unwrap();

        let out = TempDir::new().unwrap();
        let report = apply_graph(&ExportEngine::new(out.path()), &composition.graph).await;
        assert!(report.is_complete());

        for node in composition.graph.nodes() {
            assert!(out.path().join(ExportEngine::relative_path(node)).is_file());
        }
        assert!(out.path().join("02-store_ready").is_dir());
        assert!(out
            .path()
            .join("02-store_ready/aws_s3_object/assets/app.js.json")
            .is_file());

        let manifest = Manifest::from_report("shop", None, &report);
        assert!(manifest.complete);
        assert_eq!(manifest.resources.len(), composition.graph.len());
    }
}
