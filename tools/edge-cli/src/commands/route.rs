//! Show how the edge rewrite routes request paths.

use anyhow::Result;
use edge_router::SPA_REWRITE;
use serde::Serialize;

use super::RouteArgs;
use crate::context::Context;

#[derive(Serialize)]
struct RouteDecision<'a> {
    path: &'a str,
    target: &'a str,
    passthrough: bool,
}

/// Run the route command.
pub async fn run(args: RouteArgs, ctx: &Context) -> Result<()> {
    let decisions: Vec<RouteDecision<'_>> = args
        .paths
        .iter()
        .map(|path| RouteDecision {
            path,
            target: SPA_REWRITE.route(path),
            passthrough: SPA_REWRITE.is_passthrough(path),
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&decisions);
        return Ok(());
    }

    let width = decisions.iter().map(|d| d.path.len()).max().unwrap_or(0);
    for decision in &decisions {
        let kind = if decision.passthrough { "passthrough" } else { "rewrite" };
        ctx.output.table_row(
            &[decision.path, "->", decision.target, kind],
            &[width, 2, 12, 11],
        );
    }

    Ok(())
}
