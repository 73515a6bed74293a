//! Print the edge function that implements the rewrite.

use anyhow::Result;
use edge_router::EdgeFunction;

use super::FunctionArgs;
use crate::context::Context;

/// Run the function command.
pub async fn run(args: FunctionArgs, ctx: &Context) -> Result<()> {
    let function = EdgeFunction::viewer_request_rewrite(args.name);

    if ctx.output.is_json() {
        ctx.output.json(&function);
        return Ok(());
    }

    ctx.output.debug(&format!("runtime: {}", function.runtime));
    ctx.output.debug(&function.comment);
    println!("{}", function.code);

    Ok(())
}
