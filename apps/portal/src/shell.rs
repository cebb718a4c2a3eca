//! Interactive shell. Gateway commands run on a background worker so the
//! prompt keeps accepting search and sort input while a request is out.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use client_core::{
    spawn_worker, GatewayCommand, GatewayEvent, HttpGateway, RegistrantController,
};
use shared::domain::{RowNumber, SortField};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;

use crate::render;

const HELP: &str = "\
Commands:
  list              show the table
  search <text>     filter by name, email, upline or status
  clear             clear the search
  sort <field>      sort by name|email|director|team|status (again to flip)
  stats             roster counters
  accredit <row>    open the confirmation for a registrant
  yes | no          confirm or cancel the open confirmation
  reload            fetch the roster again
  help              this text
  quit              leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Search(String),
    Clear,
    Sort(SortField),
    Stats,
    Accredit(RowNumber),
    Yes,
    No,
    Reload,
    Help,
    Quit,
}

/// `Ok(None)` for blank input.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => ShellCommand::List,
        "search" | "find" => {
            if rest.is_empty() {
                ShellCommand::Clear
            } else {
                ShellCommand::Search(rest.to_string())
            }
        }
        "clear" => ShellCommand::Clear,
        "sort" => ShellCommand::Sort(rest.parse().map_err(|e| format!("{e}"))?),
        "stats" => ShellCommand::Stats,
        "accredit" => {
            let row = rest
                .parse::<i64>()
                .map_err(|_| format!("'{rest}' is not a row number"))?;
            ShellCommand::Accredit(RowNumber(row))
        }
        "yes" | "y" => ShellCommand::Yes,
        "no" | "n" | "cancel" => ShellCommand::No,
        "reload" => ShellCommand::Reload,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

pub async fn run(gateway: HttpGateway) -> anyhow::Result<()> {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let worker = spawn_worker(Arc::new(gateway), cmd_rx, event_tx);

    let mut controller = RegistrantController::new();
    dispatch(&cmd_tx, controller.start())?;
    println!("Loading registrants...");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                on_event(&mut controller, event);
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else { break };
                match parse_command(&line) {
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => handle(&mut controller, &cmd_tx, command)?,
                    Ok(None) => {}
                    Err(message) => eprintln!("{message}"),
                }
            }
        }
    }

    // Requests already sent still run to completion and get reported.
    drop(cmd_tx);
    if controller.is_mutating() {
        println!("Waiting for pending accreditation requests...");
    }
    while let Some(event) = event_rx.recv().await {
        on_event(&mut controller, event);
    }
    worker.await.context("gateway worker panicked")?;
    Ok(())
}

fn dispatch(
    cmd_tx: &mpsc::UnboundedSender<GatewayCommand>,
    command: GatewayCommand,
) -> anyhow::Result<()> {
    debug!(?command, "shell: queued gateway command");
    cmd_tx
        .send(command)
        .map_err(|_| anyhow!("gateway worker stopped unexpectedly"))
}

fn on_event(controller: &mut RegistrantController, event: GatewayEvent) {
    let loaded = matches!(
        event,
        GatewayEvent::RegistrantsLoaded(_) | GatewayEvent::LoadFailed { .. }
    );
    let retry_prompt = matches!(event, GatewayEvent::AccreditFailed { .. });
    controller.apply(event);
    print_notifications(controller);

    if loaded {
        print_table(controller);
    }
    if retry_prompt {
        if let Some(prompt) = controller.confirmation() {
            print!("{}", render::render_prompt(&prompt));
            println!("Type 'yes' to retry or 'no' to cancel.");
        }
    }
}

fn handle(
    controller: &mut RegistrantController,
    cmd_tx: &mpsc::UnboundedSender<GatewayCommand>,
    command: ShellCommand,
) -> anyhow::Result<()> {
    match command {
        ShellCommand::List => print_table(controller),
        ShellCommand::Search(query) => {
            controller.set_query(query);
            print_table(controller);
        }
        ShellCommand::Clear => {
            controller.set_query("");
            print_table(controller);
        }
        ShellCommand::Sort(field) => {
            controller.select_sort_field(field);
            print_table(controller);
        }
        ShellCommand::Stats => print!("{}", render::render_stats(&controller.stats())),
        ShellCommand::Accredit(row) => match controller.request_accredit(row) {
            Ok(()) => {
                if let Some(prompt) = controller.confirmation() {
                    print!("{}", render::render_prompt(&prompt));
                    println!("Type 'yes' to accredit or 'no' to cancel.");
                }
            }
            Err(rejected) => eprintln!("{rejected}"),
        },
        ShellCommand::Yes => match controller.confirm_accredit() {
            Ok(command) => {
                dispatch(cmd_tx, command)?;
                println!("Processing...");
            }
            Err(rejected) => eprintln!("{rejected}"),
        },
        ShellCommand::No => match controller.cancel_accredit() {
            Ok(()) => println!("Cancelled."),
            Err(rejected) => eprintln!("{rejected}"),
        },
        ShellCommand::Reload => {
            dispatch(cmd_tx, controller.start())?;
            println!("Loading registrants...");
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn print_table(controller: &RegistrantController) {
    if controller.is_loading() {
        println!("Loading registrants...");
        return;
    }
    let visible = controller.visible();
    print!(
        "{}",
        render::render_table(&visible, controller.sort(), controller.empty_state())
    );
    print!("{}", render::render_footer(visible.len(), &controller.stats()));
}

pub fn print_notifications(controller: &mut RegistrantController) {
    for notification in controller.drain_notifications() {
        eprintln!("{}", render::render_notification(&notification));
    }
}
