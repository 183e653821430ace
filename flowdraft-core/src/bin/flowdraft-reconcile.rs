//! Startup repair pass over the template store.

use flowdraft_common::FlowdraftConfig;
use flowdraft_core::{builder::build_app_state, TemplateService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -------- log ----------
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flowdraft=info")))
        .init();

    // -------- config ----------
    let cfg = FlowdraftConfig::from_env()?;
    tracing::info!(config = %cfg.summary(), "starting reconcile");

    let state = build_app_state(&cfg).await?;
    let fixed = state.templates.reconcile_all().await?;

    tracing::info!(fixed, "template store consistent");
    Ok(())
}
