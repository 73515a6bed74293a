//! Composition of a single-page app deployment into one desired-state graph.

use std::sync::Arc;
use std::time::Instant;

use edge_content::ContentStore;
use edge_core::{
    DeployStage, Deferred, DistributionIdentity, Expr, FunctionIdentity, IdentityProvider,
    ResourceAddress, ResourceKind, SpaConfig, StageObserver, StorageOrigin,
};
use edge_distribution::{assemble, DistributionRequest, MissingRoutingPrerequisite};
use edge_router::EdgeFunction;
use edge_security::{AccessBinding, BucketPolicy, OriginAccessControl};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{DeployError, DeployResult};
use crate::graph::{DesiredStateGraph, Resource};

/// Graph name of the distribution.
pub const DISTRIBUTION_NAME: &str = "site";

/// Identity purposes, one per generated name.
const FUNCTION_PURPOSE: &str = "rewrite-function";
const BUCKET_PURPOSE: &str = "bucket";
const ACCESS_CONTROL_PURPOSE: &str = "access-control";

/// A non-fatal event recorded during composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    /// A file was given the fallback content type.
    UnmappedExtension {
        key: String,
        extension: Option<String>,
        content_type: String,
    },
    /// DNS records were skipped.
    DnsSkipped(MissingRoutingPrerequisite),
}

/// The output of a finished composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub graph: DesiredStateGraph,
    pub notices: Vec<Notice>,
}

/// Drives the deployment stages in their only valid order.
///
/// ```text
/// NotStarted -> RouterRegistered -> StoreReady -> DistributionReady -> AccessBound -> Complete
/// ```
///
/// Each step checks it follows the current stage. A failing step abandons
/// the composition: every later step returns [`DeployError::Aborted`].
/// Nothing already placed in the graph is undone.
pub struct Composer {
    config: SpaConfig,
    identity: Arc<dyn IdentityProvider>,
    observer: Option<Arc<dyn StageObserver>>,
    stage: DeployStage,
    failed: Option<DeployStage>,
    started: Instant,
    graph: DesiredStateGraph,
    notices: Vec<Notice>,
    function: Deferred<FunctionIdentity>,
    origin: Deferred<StorageOrigin>,
    access_control: Deferred<Expr>,
    distribution: Deferred<DistributionIdentity>,
}

impl Composer {
    pub fn new(config: SpaConfig, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            config,
            identity,
            observer: None,
            stage: DeployStage::NotStarted,
            failed: None,
            started: Instant::now(),
            graph: DesiredStateGraph::new(),
            notices: Vec::new(),
            function: Deferred::pending("function identity"),
            origin: Deferred::pending("storage origin"),
            access_control: Deferred::pending("origin access control"),
            distribution: Deferred::pending("distribution identity"),
        }
    }

    /// Report stage transitions to an observer.
    pub fn with_observer(mut self, observer: Arc<dyn StageObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn stage(&self) -> DeployStage {
        self.stage
    }

    pub fn config(&self) -> &SpaConfig {
        &self.config
    }

    /// Run every stage and return the finished composition.
    pub fn compose(mut self) -> DeployResult<Composition> {
        self.config.validate()?;
        self.register_router()?;
        self.prepare_store()?;
        self.assemble_distribution()?;
        self.bind_access()?;
        self.finish()?;
        self.into_composition()
    }

    /// Register the rewrite function.
    pub fn register_router(&mut self) -> DeployResult<()> {
        self.step(DeployStage::RouterRegistered, |this| {
            let name = this.generated_name(FUNCTION_PURPOSE, |id| {
                format!("rewrite-function-{}", id.b64_url())
            })?;
            let function = EdgeFunction::viewer_request_rewrite(&name);
            let stage = DeployStage::RouterRegistered;
            let node = this.graph.insert(stage, &name, Resource::EdgeFunction(function))?;
            let identity = FunctionIdentity::for_address(&node.address);

            debug!(function = %identity.name, "registered rewrite function");
            this.function.resolve(identity)?;
            Ok(())
        })
    }

    /// Create the origin and describe every object upload.
    pub fn prepare_store(&mut self) -> DeployResult<()> {
        self.step(DeployStage::StoreReady, |this| {
            let stage = DeployStage::StoreReady;
            let prefix = this.config.bucket_prefix();
            let bucket = this.generated_name(BUCKET_PURPOSE, |id| format!("{}-{}", prefix, id.hex()))?;
            let origin = StorageOrigin::new(&bucket, &this.config.region);

            let node = this.graph.insert(
                stage,
                &bucket,
                Resource::Bucket {
                    bucket: bucket.clone(),
                },
            )?;
            let bucket_id = node.address.attr("id");

            let oac_name = this.generated_name(ACCESS_CONTROL_PURPOSE, |id| {
                format!("access-control-{}", id.b64_url())
            })?;
            let oac = OriginAccessControl::for_bucket(&oac_name, &bucket);
            let node = this.graph.insert(stage, &oac_name, Resource::OriginAccessControl(oac))?;
            let oac_id = node.address.attr("id");

            let store = ContentStore::new(&this.config.local_path);
            let mut objects = 0usize;
            for asset in store.enumerate() {
                let asset = asset?;
                let upload = store.describe_upload(&asset);
                if !store.is_mapped(&asset) {
                    this.notices.push(Notice::UnmappedExtension {
                        key: upload.key.clone(),
                        extension: asset.extension.clone(),
                        content_type: upload.content_type.clone(),
                    });
                }
                let key = upload.key.clone();
                this.graph.insert(
                    stage,
                    key,
                    Resource::Object {
                        bucket: bucket_id.clone(),
                        upload,
                    },
                )?;
                objects += 1;
            }

            if objects == 0 {
                warn!(path = %this.config.local_path.display(), "build directory is empty");
            }
            debug!(bucket = %origin.id, objects, "prepared content store");

            this.origin.resolve(origin)?;
            this.access_control.resolve(oac_id)?;
            Ok(())
        })
    }

    /// Assemble the distribution and its DNS records.
    pub fn assemble_distribution(&mut self) -> DeployResult<()> {
        self.step(DeployStage::DistributionReady, |this| {
            let stage = DeployStage::DistributionReady;
            let function = this.function.get()?;

            let mut request = DistributionRequest::new(DISTRIBUTION_NAME, this.origin.get()?.clone())
                .with_origin_access_control(this.access_control.get()?.clone())
                .with_aliases(this.config.domain_aliases.iter().cloned())
                .with_router_function(function.arn.as_str());
            if let Some(certificate) = this.config.certificate() {
                request = request.with_certificate(certificate);
            }
            if let Some(zone) = this.config.hosted_zone() {
                request = request.with_hosted_zone(zone);
            }

            let assembly = assemble(&request)?;
            this.graph
                .insert(stage, DISTRIBUTION_NAME, Resource::Distribution(assembly.config))?;
            for record in assembly.dns_records {
                let name = record.name.clone();
                this.graph.insert(stage, name, Resource::DnsRecord(record))?;
            }
            if let Some(missing) = assembly.missing_routing {
                this.notices.push(Notice::DnsSkipped(missing));
            }

            this.distribution.resolve(assembly.identity)?;
            Ok(())
        })
    }

    /// Bind the origin's access policy to the final distribution identity.
    pub fn bind_access(&mut self) -> DeployResult<()> {
        self.step(DeployStage::AccessBound, |this| {
            let origin = this.origin.get()?;
            let distribution = this.distribution.get()?;

            let policy = AccessBinding::derive(origin, distribution);
            let bucket_policy = BucketPolicy::new(origin, &policy);
            let name = origin.id.clone();
            this.graph.insert(
                DeployStage::AccessBound,
                name,
                Resource::BucketPolicy(bucket_policy),
            )?;
            Ok(())
        })
    }

    /// Enter the terminal stage.
    pub fn finish(&mut self) -> DeployResult<()> {
        self.step(DeployStage::Complete, |_| Ok(()))
    }

    /// Take the finished composition.
    pub fn into_composition(self) -> DeployResult<Composition> {
        if !self.stage.is_terminal() {
            return Err(edge_core::CoreError::StageOrder {
                from: self.stage.to_string(),
                to: DeployStage::Complete.to_string(),
            }
            .into());
        }
        Ok(Composition {
            graph: self.graph,
            notices: self.notices,
        })
    }

    fn step<F>(&mut self, to: DeployStage, run: F) -> DeployResult<()>
    where
        F: FnOnce(&mut Self) -> DeployResult<()>,
    {
        if let Some(stage) = self.failed {
            return Err(DeployError::Aborted(stage));
        }
        self.stage.transition(to)?;

        match run(self) {
            Ok(()) => {
                self.stage = to;
                let elapsed = self.started.elapsed();
                info!(stage = %to, step = to.number(), nodes = self.graph.len(), "stage complete");
                if let Some(observer) = &self.observer {
                    observer.on_stage(to, elapsed);
                }
                Ok(())
            }
            Err(e) => {
                self.failed = Some(to);
                warn!(stage = %to, error = %e, "stage failed, abandoning composition");
                if let Some(observer) = &self.observer {
                    observer.on_failure(to, &e.to_string());
                }
                Err(e)
            }
        }
    }

    fn generated_name(
        &self,
        purpose: &str,
        render: impl FnOnce(&edge_core::UniqueId) -> String,
    ) -> DeployResult<String> {
        let name = render(&self.identity.unique_id(purpose));
        if self.config.reserved_names.contains(&name) {
            return Err(DeployError::IdentityCollision(format!(
                "generated name {} is reserved",
                name
            )));
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use std::time::Duration;

    use edge_core::SeededIdentity;
    use tempfile::TempDir;

    fn build_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/app.js"), "1").unwrap();
        fs::write(dir.path().join("assets/blob.wasm"), [0u8; 2]).unwrap();
        dir
    }

    fn composer(dir: &TempDir) -> Composer {
        let config = SpaConfig::new("Shop", dir.path());
        Composer::new(config, Arc::new(SeededIdentity::new("seed")))
    }

    #[derive(Default)]
    struct Recorder {
        stages: Mutex<Vec<DeployStage>>,
        failures: Mutex<Vec<DeployStage>>,
    }

    impl StageObserver for Recorder {
        fn on_stage(&self, stage: DeployStage, _elapsed: Duration) {
            self.stages.lock().unwrap().push(stage);
        }

        fn on_failure(&self, stage: DeployStage, _error: &str) {
            self.failures.lock().unwrap().push(stage);
        }
    }

    #[test]
    fn test_compose_builds_every_resource() {
        let dir = build_dir();
        let composition = composer(&dir).compose().unwrap();
        let graph = &composition.graph;

        assert_eq!(graph.of_kind(ResourceKind::EdgeFunction).count(), 1);
        assert_eq!(graph.of_kind(ResourceKind::Bucket).count(), 1);
        assert_eq!(graph.of_kind(ResourceKind::OriginAccessControl).count(), 1);
        assert_eq!(graph.of_kind(ResourceKind::Object).count(), 3);
        assert_eq!(graph.of_kind(ResourceKind::Distribution).count(), 1);
        assert_eq!(graph.of_kind(ResourceKind::BucketPolicy).count(), 1);
        assert_eq!(graph.of_kind(ResourceKind::DnsRecord).count(), 0);

        assert_eq!(
            composition.notices,
            vec![Notice::UnmappedExtension {
                key: "assets/blob.wasm".to_string(),
                extension: Some(".wasm".to_string()),
                content_type: "application/octet-stream".to_string(),
            }]
        );
    }

    #[test]
    fn test_generated_names() {
        let dir = build_dir();
        let composition = composer(&dir).compose().unwrap();
        let graph = &composition.graph;

        let function = graph.of_kind(ResourceKind::EdgeFunction).next().unwrap();
        assert!(function.address.name.starts_with("rewrite-function-"));
        let bucket = graph.of_kind(ResourceKind::Bucket).next().unwrap();
        assert!(bucket.address.name.starts_with("shop-"));
        assert_eq!(bucket.address.name.len(), "shop-".len() + 12);
        let oac = graph.of_kind(ResourceKind::OriginAccessControl).next().unwrap();
        assert!(oac.address.name.starts_with("access-control-"));
    }

    #[test]
    fn test_policy_bound_to_distribution() {
        let dir = build_dir();
        let composition = composer(&dir).compose().unwrap();
        let node = composition
            .graph
            .get(&ResourceAddress::new(ResourceKind::Distribution, DISTRIBUTION_NAME))
            .unwrap();
        let arn = node.address.attr("arn");

        let policy = composition.graph.of_kind(ResourceKind::BucketPolicy).next().unwrap();
        assert!(policy.depends_on.contains(&node.address));
        match &policy.resource {
            Resource::BucketPolicy(bp) => {
                assert_eq!(bp.policy.statement[0].source_arn(), &arn);
            }
            other => panic!("unexpected resource {:?}", other),
        }
    }

    #[test]
    fn test_out_of_order_step() {
        let dir = build_dir();
        let mut composer = composer(&dir);
        let err = composer.assemble_distribution().unwrap_err();
        assert!(matches!(err, DeployError::Core(_)));
        assert_eq!(composer.stage(), DeployStage::NotStarted);

        composer.register_router().unwrap();
        assert!(composer.bind_access().is_err());
        assert!(composer.into_composition().is_err());
    }

    #[test]
    fn test_failure_aborts_remaining_stages() {
        let dir = TempDir::new().unwrap();
        let config = SpaConfig::new("shop", dir.path().join("missing"));
        let recorder = Arc::new(Recorder::default());
        let mut composer = Composer::new(config, Arc::new(SeededIdentity::new("seed")))
            .with_observer(recorder.clone());

        composer.register_router().unwrap();
        let err = composer.prepare_store().unwrap_err();
        assert!(matches!(err, DeployError::Content(_)));

        let err = composer.assemble_distribution().unwrap_err();
        assert!(matches!(err, DeployError::Aborted(DeployStage::StoreReady)));

        assert_eq!(*recorder.stages.lock().unwrap(), vec![DeployStage::RouterRegistered]);
        assert_eq!(*recorder.failures.lock().unwrap(), vec![DeployStage::StoreReady]);
    }

    #[test]
    fn test_reserved_name_collides() {
        let dir = build_dir();
        let identity = SeededIdentity::new("seed");
        let taken = format!("rewrite-function-{}", identity.unique_id(FUNCTION_PURPOSE).b64_url());
        let config = SpaConfig::new("shop", dir.path()).with_reserved_name(taken);

        let err = Composer::new(config, Arc::new(identity)).compose().unwrap_err();
        assert!(matches!(err, DeployError::IdentityCollision(_)));
    }

    #[test]
    fn test_observer_sees_every_stage() {
        let dir = build_dir();
        let recorder = Arc::new(Recorder::default());
        composer(&dir).with_observer(recorder.clone()).compose().unwrap();
        assert_eq!(
            *recorder.stages.lock().unwrap(),
            DeployStage::ALL[1..].to_vec()
        );
    }
}
