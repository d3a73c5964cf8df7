mod cli;
mod commands;
mod errors;
mod snapshot;
mod tracing;

use crate::cli::Commands;
use crate::commands::RenderOptions;
use crate::tracing::TracingConfig;
use kanflow_flowchart::{CONFIG_FILE_NAME, FlowChartConfig, TaskId};
use std::path::Path;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = cli::parse();

    tracing::init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        filter: None,
    })?;

    let config = load_config(cli.config.as_deref())?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Render {
            snapshot,
            focus,
            status,
            format,
        } => {
            let options = RenderOptions {
                snapshot: &snapshot,
                focus: TaskId(focus),
                statuses: &status,
                format,
            };
            commands::run_render(options, config, &mut stdout).await?;
        }
        Commands::Statuses { snapshot, focus } => {
            commands::run_statuses(&snapshot, focus.map(TaskId), &mut stdout).await?;
        }
    }

    Ok(())
}

/// An explicit `--config` must exist; the implicit `./kanflow.toml` is optional.
fn load_config(explicit: Option<&Path>) -> kanflow_flowchart::Result<FlowChartConfig> {
    if let Some(path) = explicit {
        return FlowChartConfig::load(path)?.ok_or_else(|| {
            kanflow_flowchart::Error::configuration(format!(
                "config file {} does not exist",
                path.display()
            ))
        });
    }

    let config = FlowChartConfig::load(Path::new(CONFIG_FILE_NAME))?.unwrap_or_default();
    ::tracing::debug!(?config, "Using flow chart configuration");
    Ok(config)
}
