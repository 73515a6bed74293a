//! Configuration management commands.

use anyhow::{bail, Result};
use edge_distribution::CertificateRef;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    if let Some(ref path) = ctx.config_path {
        ctx.output.kv("file", &path.display().to_string());
    }
    if let Some(ref env) = ctx.env {
        ctx.output.kv("environment", env);
    }

    // App section
    ctx.output.info("");
    ctx.output.info("[app]");
    ctx.output.kv("name", &ctx.config.app.name);
    ctx.output.kv(
        "seed",
        if ctx.config.app.seed.is_some() { "(set)" } else { "(missing)" },
    );
    ctx.output.kv("build_dir", &ctx.config.app.build_dir);
    ctx.output.kv("region", &ctx.config.app.region);

    // Domain section
    let domain = &ctx.config.domain;
    ctx.output.info("");
    ctx.output.info("[domain]");
    ctx.output.kv("aliases", &domain.aliases.join(", "));
    if let Some(ref zone) = domain.hosted_zone_id {
        ctx.output.kv("hosted_zone_id", zone);
    }
    if let Some(ref arn) = domain.certificate_arn {
        ctx.output.kv("certificate_arn", arn);
    }
    if !domain.reserved_names.is_empty() {
        let reserved: Vec<&str> = domain.reserved_names.iter().map(String::as_str).collect();
        ctx.output.kv("reserved_names", &reserved.join(", "));
    }

    // Environments
    if !ctx.config.environments.is_empty() {
        ctx.output.info("");
        ctx.output.info("Environments:");
        let mut names: Vec<&String> = ctx.config.environments.keys().collect();
        names.sort();
        for env in names {
            ctx.output.list_item(env);
        }
    }

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if ctx.config_path.is_none() {
        bail!("No config file found. Run `edge init` to create one.");
    }

    let spa = ctx.config.to_spa_config(&ctx.project_dir());
    if let Err(e) = spa.validate() {
        errors.push(e.to_string());
    }

    if ctx.identity().is_err() {
        errors.push("app.seed is required".to_string());
    }

    if let Some(arn) = spa.certificate() {
        if let Err(e) = CertificateRef::parse(arn) {
            errors.push(e.to_string());
        }
    }

    if !spa.local_path.is_dir() {
        warnings.push(format!(
            "build directory {} does not exist yet",
            spa.local_path.display()
        ));
    }

    match (spa.hosted_zone(), spa.domain_aliases.is_empty()) {
        (None, false) => {
            warnings.push("domain.aliases set without domain.hosted_zone_id: no DNS records".to_string())
        }
        (Some(_), true) => {
            warnings.push("domain.hosted_zone_id set without domain.aliases: no DNS records".to_string())
        }
        _ => {}
    }

    if spa.certificate().is_none() && !spa.domain_aliases.is_empty() {
        warnings.push("domain.aliases set without domain.certificate_arn".to_string());
    }

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
