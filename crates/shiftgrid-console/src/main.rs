use std::sync::Arc;

use clap::{Parser, Subcommand};
use shiftgrid_api::{HttpScheduleApi, ScheduleApi};
use shiftgrid_core::{PeriodId, ShiftgridConfig};
use shiftgrid_editor::ScheduleSession;
use tracing::{info, warn};

mod render;
mod script;

#[derive(Parser)]
#[command(name = "shiftgrid", version, about = "View and hand-edit shift schedule grids")]
struct Cli {
    /// Config file (default: SHIFTGRID_CONFIG, then ~/.shiftgrid/shiftgrid.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List schedule periods
    Periods,
    /// Render a period as a week-aligned grid
    Show { period_id: i64 },
    /// Replay an edit script against a period, then save
    Edit {
        period_id: i64,
        /// Whitespace-separated steps, e.g. "key:1 down:3@2026-03-01 enter:3@2026-03-02 up"
        script: String,
        /// Print the resulting grid without saving
        #[arg(long)]
        dry_run: bool,
    },
    /// Publish a period; it becomes read-only
    Publish { period_id: i64 },
    /// Run the optimizer for a period
    Optimize { period_id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shiftgrid_console=info,shiftgrid_editor=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // explicit flag > SHIFTGRID_CONFIG env > ~/.shiftgrid/shiftgrid.toml
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("SHIFTGRID_CONFIG").ok());
    let config = ShiftgridConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        ShiftgridConfig::default()
    });

    let api: Arc<dyn ScheduleApi> = Arc::new(HttpScheduleApi::new(&config.api)?);
    info!(base_url = %config.api.base_url, "schedule server");

    match cli.command {
        Command::Periods => {
            let periods = api.list_periods().await?;
            if periods.is_empty() {
                println!("No periods.");
            }
            for period in &periods {
                println!("{}", render::period_line(period));
            }
        }
        Command::Show { period_id } => {
            let session = ScheduleSession::open(api, &config, PeriodId(period_id)).await?;
            print!("{}", render::grid(session.editor()));
        }
        Command::Edit {
            period_id,
            script,
            dry_run,
        } => {
            let steps = script::parse(&script)?;
            let mut session = ScheduleSession::open(api, &config, PeriodId(period_id)).await?;
            if !session.editor().is_editable() {
                anyhow::bail!("period {period_id} is published; edits are locked");
            }

            let changed = script::replay(session.editor_mut(), &steps);
            info!(steps = steps.len(), changed, "script replayed");

            if !dry_run {
                let report = session.save_all().await?;
                println!("{}", report.status_message());
            }
            print!("{}", render::grid(session.editor()));
        }
        Command::Publish { period_id } => {
            let mut session = ScheduleSession::open(api, &config, PeriodId(period_id)).await?;
            let period = session.publish().await?;
            println!("{}", render::period_line(&period));
        }
        Command::Optimize { period_id } => {
            let mut session = ScheduleSession::open(api, &config, PeriodId(period_id)).await?;
            let response = session.optimize().await?;
            println!("{}: {}", response.status, response.message);
            if response.is_optimal() {
                print!("{}", render::grid(session.editor()));
            } else if !response.diagnostics.is_empty() {
                println!("{}", render::diagnostics(&response.diagnostics));
            }
        }
    }

    Ok(())
}
