//! Estate CLI: import, export and browse the portfolio hierarchy, and
//! manage the selected office.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use estate_core::models::Level;
use estate_core::repository::EntityStore;
use estate_db::{DbManager, MemoryEntityStore};
use estate_hierarchy::{
    FileContextStorage, Forest, HierarchyError, HierarchyService, OfficeContext,
    OfficeContextResolver, OfficePath, parse_csv, resolve, template_csv,
};
use tracing_subscriber::EnvFilter;

mod config;

use config::{EstateConfig, StoreKind};

#[derive(Parser)]
#[command(name = "estate", version, about = "Real-estate portfolio hierarchy tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a CSV template (header plus one example row) for a level.
    Template {
        #[arg(value_parser = parse_level)]
        level: Level,
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Import a CSV file into one level and report per-row outcomes.
    Import {
        #[arg(value_parser = parse_level)]
        level: Level,
        file: PathBuf,
    },
    /// Export every record of a level as CSV.
    Export {
        #[arg(value_parser = parse_level)]
        level: Level,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the whole hierarchy.
    Tree {
        /// Print JSON instead of an outline.
        #[arg(long)]
        json: bool,
    },
    /// Search names, codes and cities across the hierarchy.
    Search { query: String },
    /// Manage the selected office.
    Context {
        #[command(subcommand)]
        command: ContextCommand,
    },
}

#[derive(Subcommand)]
enum ContextCommand {
    /// Select an office by its id path.
    Set {
        organization: String,
        portfolio: String,
        campus: String,
        building: String,
        #[arg(long)]
        floor: Option<String>,
    },
    /// Show the selected office and whether it still exists.
    Show,
    /// Forget the selected office.
    Clear,
}

fn parse_level(s: &str) -> Result<Level, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("estate=info")),
        )
        .with_writer(io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = EstateConfig::from_env()?;
    tracing::info!(store = ?config.store, "Starting estate CLI");

    // Templates need no store.
    if let Command::Template { level, out } = &cli.command {
        return emit(out.as_ref(), &template_csv(*level)?);
    }

    match config.store {
        StoreKind::Memory => {
            let service = HierarchyService::new(MemoryEntityStore::new(), config.hierarchy.clone());
            run(&service, &config, cli.command).await
        }
        StoreKind::Surreal => {
            let manager = DbManager::connect(&config.db)
                .await
                .context("open the hierarchy database")?;
            let service = HierarchyService::new(manager.entity_store(), config.hierarchy.clone());
            run(&service, &config, cli.command).await
        }
    }
}

async fn run<S: EntityStore>(
    service: &HierarchyService<S>,
    config: &EstateConfig,
    command: Command,
) -> Result<()> {
    let resolver =
        OfficeContextResolver::new(FileContextStorage::new(&config.hierarchy.context_path));

    match command {
        Command::Template { level, out } => emit(out.as_ref(), &template_csv(level)?),
        Command::Import { level, file } => {
            let reader = File::open(&file).with_context(|| format!("open {}", file.display()))?;
            let rows = parse_csv(reader)?;
            let report = match service.import_with_cancel(level, &rows, ctrl_c()).await {
                Err(HierarchyError::Cancelled) => bail!("import interrupted; no rows were written"),
                other => other?,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            eprintln!("{}", report.summary());
            Ok(())
        }
        Command::Export { level, out } => emit(out.as_ref(), &service.export(level).await?),
        Command::Tree { json } => {
            let forest = service.forest().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&forest)?);
            } else {
                print_outline(&forest, &mut io::stdout().lock())?;
            }
            Ok(())
        }
        Command::Search { query } => {
            let forest = service.forest().await?;
            for hit in forest.search(&query) {
                println!("{:<10} {:<14} {}", hit.level, hit.id, hit.label);
            }
            Ok(())
        }
        Command::Context { command } => match command {
            ContextCommand::Set {
                organization,
                portfolio,
                campus,
                building,
                floor,
            } => {
                let path = OfficePath {
                    organization_id: organization,
                    portfolio_id: portfolio,
                    campus_id: campus,
                    building_id: building,
                    floor_id: floor,
                };
                let forest = service.forest().await?;
                let resolved = resolve(&path, &forest);
                let Some(context) = OfficeContext::from_resolution(path, &resolved) else {
                    bail!(
                        "no office at that path ({} not found)",
                        resolved.stale_at.map(Level::label).unwrap_or("record")
                    );
                };
                resolver.persist(&context)?;
                println!("Selected {}", context.label);
                Ok(())
            }
            ContextCommand::Show => {
                let forest = service.forest().await?;
                match resolver.resolve_current(&forest) {
                    None => println!("No office selected"),
                    Some((_, resolved)) if resolved.valid => println!("{}", resolved.label()),
                    Some((context, _)) => println!(
                        "{} no longer exists; please re-select your office",
                        context.label
                    ),
                }
                Ok(())
            }
            ContextCommand::Clear => {
                resolver.clear()?;
                println!("Office selection cleared");
                Ok(())
            }
        },
    }
}

/// Completes on Ctrl-C; never completes if the handler cannot be installed.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn emit(out: Option<&PathBuf>, contents: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("write {}", path.display()))
        }
        None => {
            io::stdout().write_all(contents.as_bytes())?;
            Ok(())
        }
    }
}

fn print_outline(forest: &Forest, out: &mut impl Write) -> io::Result<()> {
    for org in &forest.organizations {
        writeln!(out, "{} ({})", org.organization.name, org.organization.id)?;
        for pf in &org.portfolios {
            writeln!(out, "  {} ({})", pf.portfolio.name, pf.portfolio.id)?;
            for campus in &pf.campuses {
                let c = &campus.campus;
                writeln!(out, "    {} ({}) {}", c.name, c.id, c.city)?;
                for building in &campus.buildings {
                    let b = &building.building;
                    writeln!(
                        out,
                        "      {} ({}) {} seats",
                        b.name,
                        b.id,
                        building.total_seats()
                    )?;
                    for floor in &building.floors {
                        let f = &floor.floor;
                        writeln!(
                            out,
                            "        Floor {} ({}) {} seats",
                            f.floor_number,
                            f.id,
                            f.total_seats()
                        )?;
                        for zone in &floor.seat_zones {
                            writeln!(
                                out,
                                "          {} ({}) {:?}",
                                zone.name, zone.id, zone.occupancy_status
                            )?;
                        }
                    }
                }
            }
        }
    }
    for warning in &forest.warnings {
        writeln!(out, "warning: {warning}")?;
    }
    Ok(())
}
