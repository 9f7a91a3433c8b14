//! Initialize a Comerce project directory.

use anyhow::{bail, Context as _, Result};
use comerce_fulfillment::generate_default_config;

use super::InitArgs;
use crate::context::{Context, CONFIG_NAMES};
use crate::state::{State, STATE_FILE};

/// Run the init command.
pub async fn run(args: InitArgs, ctx: &Context) -> Result<()> {
    ctx.output.header(&format!("Initializing Comerce in {}", ctx.cwd.display()));

    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);
    let state_path = ctx.cwd.join(STATE_FILE);

    if !args.force {
        for path in [&config_path, &state_path] {
            if path.exists() {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
        }
    }

    std::fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
    ctx.output.debug(&format!("Wrote {}", config_path.display()));

    if state_path.exists() {
        std::fs::remove_file(&state_path)
            .with_context(|| format!("Failed to remove state file: {}", state_path.display()))?;
    }
    State::load(&state_path)?.save().await?;
    ctx.output.debug(&format!("Wrote {}", state_path.display()));

    ctx.output.success("Comerce initialized");
    ctx.output.info("Next steps:");
    ctx.output.list_item("comerce seed");
    ctx.output.list_item("comerce place --item rice=2 ...");
    ctx.output.list_item("comerce show orders");

    Ok(())
}
