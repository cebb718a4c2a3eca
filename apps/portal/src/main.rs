use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{AccreditFlow, HttpGateway, Portal};
use shared::domain::{RowNumber, SortDirection, SortField, SortSpec};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod shell;

use config::{gateway_config, load_settings};

#[derive(Parser, Debug)]
#[command(name = "portal", about = "Search, sort and accredit event registrants")]
struct Args {
    /// Registrant endpoint URL; overrides config file and environment.
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Path to a TOML config file (defaults to ./portal.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the registrant table.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "name")]
        sort: SortField,
        #[arg(long)]
        desc: bool,
    },
    /// Print roster counters.
    Stats,
    /// Mark one registrant as accredited.
    Accredit {
        row: i64,
        /// Skip the confirmation question.
        #[arg(long)]
        yes: bool,
    },
    /// Interactive session.
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = load_settings(args.config.as_deref())?;
    let gateway = HttpGateway::new(gateway_config(&settings, args.endpoint.as_deref())?)
        .context("failed to build HTTP client")?;
    info!(endpoint = %gateway.endpoint(), "portal starting");

    match args.command {
        Command::List { search, sort, desc } => {
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let mut portal = Portal::new(gateway);
            portal.load().await;
            let controller = portal.controller_mut();
            shell::print_notifications(controller);
            controller.set_sort(SortSpec::new(sort, direction));
            if let Some(search) = search {
                controller.set_query(search);
            }

            let visible = controller.visible();
            print!(
                "{}",
                render::render_table(&visible, controller.sort(), controller.empty_state())
            );
            print!("{}", render::render_footer(visible.len(), &controller.stats()));
        }
        Command::Stats => {
            let mut portal = Portal::new(gateway);
            portal.load().await;
            shell::print_notifications(portal.controller_mut());
            print!("{}", render::render_stats(&portal.controller().stats()));
        }
        Command::Accredit { row, yes } => accredit(gateway, RowNumber(row), yes).await?,
        Command::Shell => shell::run(gateway).await?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn accredit(gateway: HttpGateway, row: RowNumber, assume_yes: bool) -> Result<()> {
    let mut portal = Portal::new(gateway);
    portal.load().await;
    shell::print_notifications(portal.controller_mut());

    portal.controller_mut().request_accredit(row)?;
    if let Some(prompt) = portal.controller().confirmation() {
        print!("{}", render::render_prompt(&prompt));
    }

    if !assume_yes && !ask_yes_no("Accredit this registrant? [y/N] ")? {
        portal.controller_mut().cancel_accredit()?;
        println!("Cancelled.");
        return Ok(());
    }

    portal.confirm_accredit().await?;
    shell::print_notifications(portal.controller_mut());
    if portal.controller().flow() != AccreditFlow::Idle {
        bail!("registrant at row {row} was not accredited");
    }
    Ok(())
}

fn ask_yes_no(question: &str) -> Result<bool> {
    print!("{question}");
    io::stdout().flush().context("failed to flush stdout")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read answer")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
