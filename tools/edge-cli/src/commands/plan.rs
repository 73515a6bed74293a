//! Compose the desired state and summarize it.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use edge_core::{ResourceKind, SpaConfig};
use edge_deploy::{Composer, Composition, Notice, Resource};
use edge_distribution::MissingRoutingPrerequisite;
use edge_observability::StageLogger;

use super::PlanArgs;
use crate::context::Context;
use crate::output::{format_bytes, format_elapsed};

/// Run the plan command.
pub async fn run(args: PlanArgs, ctx: &Context) -> Result<()> {
    let spa = ctx.spa_config()?;
    let composition = compose(&spa, ctx)?;

    if ctx.output.is_json() {
        ctx.output.json(&composition);
        return Ok(());
    }

    print_summary(&spa, &composition, ctx);
    if args.objects {
        print_objects(&composition, ctx);
    }
    print_notices(&composition.notices, ctx);

    Ok(())
}

/// Compose the desired state, reporting stage progress.
pub fn compose(spa: &SpaConfig, ctx: &Context) -> Result<Composition> {
    let logger = Arc::new(StageLogger::new());
    let spinner = ctx.output.spinner("Composing desired state...");

    let result = Composer::new(spa.clone(), ctx.identity()?)
        .with_observer(logger.clone())
        .compose();
    spinner.finish_and_clear();

    for (stage, spent) in logger.durations() {
        ctx.output
            .debug(&format!("{} ({})", stage, format_elapsed(spent)));
    }

    result.context("Composition failed")
}

fn print_summary(spa: &SpaConfig, composition: &Composition, ctx: &Context) {
    let graph = &composition.graph;
    ctx.output.header(&format!("Plan: {}", spa.name));

    if let Some(ref env) = ctx.env {
        ctx.output.kv("environment", env);
    }
    ctx.output.kv("build_dir", &spa.local_path.display().to_string());
    ctx.output.kv("region", &spa.region);
    ctx.output.info("");

    let widths = [40, 8];
    ctx.output.table_row(&["RESOURCE", "COUNT"], &widths);
    for kind in ResourceKind::ALL {
        let count = graph.of_kind(kind).count();
        if count > 0 {
            ctx.output
                .table_row(&[kind.as_str(), &count.to_string()], &widths);
        }
    }

    let upload_bytes: u64 = graph
        .of_kind(ResourceKind::Object)
        .filter_map(|node| match &node.resource {
            Resource::Object { upload, .. } => std::fs::metadata(&upload.source).ok(),
            _ => None,
        })
        .map(|meta| meta.len())
        .sum();

    ctx.output.info("");
    ctx.output.success(&format!(
        "{} resources, {} to upload",
        graph.len(),
        format_bytes(upload_bytes)
    ));
}

fn print_objects(composition: &Composition, ctx: &Context) {
    ctx.output.header("Objects");
    let widths = [48, 28];
    for node in composition.graph.of_kind(ResourceKind::Object) {
        if let Resource::Object { upload, .. } = &node.resource {
            ctx.output
                .table_row(&[&upload.key, &upload.content_type], &widths);
        }
    }
}

fn print_notices(notices: &[Notice], ctx: &Context) {
    for notice in notices {
        match notice {
            Notice::UnmappedExtension {
                key, content_type, ..
            } => ctx
                .output
                .debug(&format!("{}: no content type mapping, using {}", key, content_type)),
            Notice::DnsSkipped(MissingRoutingPrerequisite::NoHostedZone { aliases }) => {
                ctx.output.warn(&format!(
                    "{} alias(es) configured without domain.hosted_zone_id, no DNS records planned",
                    aliases
                ))
            }
            Notice::DnsSkipped(MissingRoutingPrerequisite::NoAliases { zone_id }) => {
                ctx.output.warn(&format!(
                    "hosted zone {} configured without domain.aliases, no DNS records planned",
                    zone_id
                ))
            }
        }
    }

    let unmapped = notices
        .iter()
        .filter(|n| matches!(n, Notice::UnmappedExtension { .. }))
        .count();
    if unmapped > 0 {
        ctx.output.info(&format!(
            "{} file(s) use the default content type (--verbose to list)",
            unmapped
        ));
    }
}
