/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

use std::path::PathBuf;

use clap::Parser;
use eyre::WrapErr;
use inventory::Inventory;
use inventory::config::{Config, ConfigError, Defaults};
use inventory::display::{self, OutputFormat};
use tracing::metadata::LevelFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), eyre::Report> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let command = match cli.command {
        Command::DefaultConfig => {
            print!("{}", Config::default().into_annotated_config_file());
            return Ok(());
        }
        command => command,
    };

    let config: Config = cli.config.try_into()?;
    let inventory = Inventory::new(config)?;
    inventory
        .ensure_schema()
        .await
        .wrap_err("Failed to prepare the database")?;

    match command {
        Command::Run(run_command) => run(&inventory, run_command, cli.format).await?,
        Command::Import(import_command) => {
            let source = import_command.source_path(&inventory);
            let count = inventory
                .import_source(&source)
                .await
                .wrap_err_with(|| format!("Failed to import {}", source.display()))?;
            println!("Import complete. Rows processed: {count}");
        }
        Command::Event(EventCommand::Add {
            mac,
            description,
            responsible,
        }) => {
            let event = inventory
                .record_event(&mac, &description, &responsible)
                .await?;
            println!("{}", display::render_events(&[event], cli.format)?);
        }
        Command::Event(EventCommand::List { mac }) => {
            let events = inventory.list_events(&mac).await?;
            println!("{}", display::render_events(&events, cli.format)?);
        }
        Command::Machine(MachineCommand::Show { mac }) => {
            let machine = inventory
                .find_machine(&mac)
                .await?
                .ok_or_else(|| eyre::eyre!("No machine with MAC {mac}"))?;
            println!("{}", display::render_machine(&machine, cli.format)?);
        }
        Command::Machine(MachineCommand::List) => {
            let machines = inventory.list_machines().await?;
            println!("{}", display::render_machines(&machines, cli.format)?);
        }
        Command::Machine(MachineCommand::Delete { mac }) => {
            if inventory.delete_machine(&mac).await? {
                println!("Deleted machine {mac} and its history");
            } else {
                eyre::bail!("No machine with MAC {mac}");
            }
        }
        // Handled before the database is opened.
        Command::DefaultConfig => {}
    }

    Ok(())
}

/// Import the configured source, then, if asked to, record an event for one
/// machine and show its history. A failed import is reported and does not stop
/// the rest of the run.
async fn run(
    inventory: &Inventory,
    run_command: RunCommand,
    format: OutputFormat,
) -> Result<(), eyre::Report> {
    let source = run_command.import.source_path(inventory);
    match inventory.import_source(&source).await {
        Ok(count) => println!("Import complete. Rows processed: {count}"),
        Err(e) => println!("Failed to import {}: {e}", source.display()),
    }

    if let Some(mac) = run_command.mac {
        if let Some(description) = run_command.event {
            let responsible = run_command.responsible.unwrap_or_default();
            inventory
                .record_event(&mac, &description, &responsible)
                .await
                .wrap_err_with(|| format!("Failed to record event for {mac}"))?;
        }
        let events = inventory.list_events(&mac).await?;
        println!("{}", display::render_events(&events, format)?);
    }

    Ok(())
}

#[derive(clap::Parser, Debug)]
#[clap(
    name = "machine-inventory",
    about = "Keep an inventory of machines by MAC address, with a history of events per machine"
)]
struct Cli {
    #[clap(long, short, help = "Turn on debug loggging (same as RUST_LOG=debug)")]
    debug: bool,
    #[clap(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for listings"
    )]
    format: OutputFormat,
    #[clap(flatten)]
    config: ConfigArgs,
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct ConfigArgs {
    #[clap(
        long,
        short,
        global = true,
        env = "MACHINE_INVENTORY_CONFIG",
        help = "Path to TOML configuration file"
    )]
    config: Option<PathBuf>,
    #[clap(
        long,
        global = true,
        env = "MACHINE_INVENTORY_DATABASE",
        help = format!("SQLite database file, overriding configuration file. Default: {}", Defaults::database_path().display())
    )]
    database: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
enum Command {
    #[clap(about = "Import the spreadsheet export, then optionally record and list events for one machine")]
    Run(RunCommand),
    #[clap(about = "Import the spreadsheet export")]
    Import(ImportCommand),
    #[clap(subcommand, about = "Record and list machine events")]
    Event(EventCommand),
    #[clap(subcommand, about = "Inspect and remove machines")]
    Machine(MachineCommand),
    #[clap(about = "Output a default TOML config file for use with -c")]
    DefaultConfig,
}

#[derive(clap::Args, Debug)]
struct ImportCommand {
    #[clap(
        long,
        short,
        env = "MACHINE_INVENTORY_SOURCE",
        help = format!("CSV export to import, overriding configuration file. Default: {}", Defaults::source_path().display())
    )]
    source: Option<PathBuf>,
}

impl ImportCommand {
    fn source_path(&self, inventory: &Inventory) -> PathBuf {
        self.source
            .clone()
            .unwrap_or_else(|| inventory.config().source_path.clone())
    }
}

#[derive(clap::Args, Debug)]
struct RunCommand {
    #[clap(flatten)]
    import: ImportCommand,
    #[clap(long, short, help = "MAC address of a machine to record an event for and list")]
    mac: Option<String>,
    #[clap(long, short, requires = "mac", help = "Description of the event to record")]
    event: Option<String>,
    #[clap(long, short, requires = "event", help = "Who is responsible for the event")]
    responsible: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum EventCommand {
    #[clap(about = "Record an event for a machine")]
    Add {
        #[clap(long, short)]
        mac: String,
        #[clap(long, short)]
        description: String,
        #[clap(long, short)]
        responsible: String,
    },
    #[clap(about = "List the events of a machine, newest first")]
    List {
        #[clap(long, short)]
        mac: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum MachineCommand {
    #[clap(about = "Show one machine")]
    Show {
        #[clap(long, short)]
        mac: String,
    },
    #[clap(about = "List all machines")]
    List,
    #[clap(about = "Delete a machine and its history")]
    Delete {
        #[clap(long, short)]
        mac: String,
    },
}

impl TryFrom<ConfigArgs> for Config {
    type Error = ConfigError;

    // Load the config file, or the default, allowing CLI flags to override the corresponding settings.
    fn try_from(args: ConfigArgs) -> Result<Self, Self::Error> {
        let mut config = if let Some(config_path) = args.config {
            Config::load(&config_path)?
        } else {
            Config::default()
        };

        if let Some(database) = args.database {
            config.database_path = database;
        }

        Ok(config)
    }
}

fn setup_logging(cli: &Cli) -> Result<(), eyre::Report> {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::util::SubscriberInitExt;

    let level = if cli.debug {
        Some(LevelFilter::DEBUG)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::Layer::default()
                .compact()
                .with_writer(std::io::stderr),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(level.map(Into::into).unwrap_or(LevelFilter::INFO.into()))
                .from_env_lossy()
                // sqlx logs every statement at info
                .add_directive("sqlx=warn".parse()?),
        )
        .try_init()
        .wrap_err("Failed to initialize trace logging for machine-inventory")
}
