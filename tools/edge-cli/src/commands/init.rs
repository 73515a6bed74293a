//! Initialize a new single-page app project.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use edge_core::RandomIdentity;

use super::InitArgs;
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the init command.
pub async fn run(args: InitArgs, ctx: &Context) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        // Use current directory name
        None => ctx
            .cwd
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("my-spa")
            .to_string(),
    };

    ctx.output.header(&format!("Initializing app: {}", name));

    let config_path = ctx.cwd.join("edge.toml");
    if config_path.exists() && !args.force {
        ctx.output.warn(&format!(
            "{} exists. A new seed renames every generated resource.",
            config_path.display()
        ));
        let confirmed = Confirm::new()
            .with_prompt("Overwrite it?")
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Init cancelled");
            return Ok(());
        }
    }

    ctx.output.step(1, 2, "Generating identity seed");
    let seed = RandomIdentity::generate_seed();

    ctx.output.step(2, 2, "Writing edge.toml");
    let content = generate_default_config(&name, &seed, &args.build_dir)?;
    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "config": config_path,
            "name": name,
            "build_dir": args.build_dir,
        }));
        return Ok(());
    }

    ctx.output.success(&format!("App '{}' initialized", name));
    ctx.output.info("");
    ctx.output.info("Next steps:");
    ctx.output.list_item(&format!("build your app into {}/", args.build_dir));
    ctx.output.list_item("edge plan");
    ctx.output.list_item("edge export --out state");

    Ok(())
}
