use clap::Parser;
use frame_grid::adapters::sheet::SheetExport;
use frame_grid::adapters::store::BatchStore;
use frame_grid::adapters::transfer;
use frame_grid::config::{BatchAction, Command};
use frame_grid::core::adjacency::AnnotatedCell;
use frame_grid::core::grid::Grid;
use frame_grid::core::scheme::classify;
use frame_grid::core::ConfigProvider;
use frame_grid::domain::model::AcquisitionRequest;
use frame_grid::utils::error::ErrorSeverity;
use frame_grid::utils::{logger, validation::Validate};
use frame_grid::{
    AcquisitionEngine, CliConfig, FrameGridEngine, FrameGridError, LocalStorage, Result,
    SheetPipeline, TomlConfig,
};
use std::path::Path;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // classify 不需要配置檔
    let config = match &cli.command {
        Command::Classify { .. } => None,
        _ => Some(TomlConfig::from_file(&cli.config)),
    };

    let json_log = cli.json_log
        || matches!(&config, Some(Ok(config)) if config.json_logging());
    if json_log {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting frame-grid CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match config {
        None => run_classify(&cli.command),
        Some(loaded) => match loaded.and_then(|config| config.validate().map(|_| config)) {
            Ok(config) => run(cli.command, config).await,
            Err(e) => {
                tracing::error!("❌ Configuration validation failed: {}", e);
                Err(e)
            }
        },
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run_classify(command: &Command) -> Result<()> {
    if let Command::Classify { name } = command {
        println!("{}: {}", name, classify(name).convention());
    }
    Ok(())
}

async fn run(command: Command, config: TomlConfig) -> Result<()> {
    let sheet_storage = LocalStorage::new(".");

    match command {
        Command::Classify { .. } => run_classify(&command),

        Command::Pending => {
            let export = SheetExport::load(
                &sheet_storage,
                config.sheet_export_path(),
                config.sheet_columns(),
            )
            .await?;
            let rows = export.assigned_to(config.operator_name());
            tracing::info!("{} rows assigned to {}", rows.len(), config.operator_name());

            for row in rows {
                println!(
                    "{:>5}  {:<8} {:<8} {:<28} done: {:<8} left: {}",
                    row.row_number,
                    row.block.as_deref().unwrap_or("-"),
                    row.part.as_deref().unwrap_or("-"),
                    row.section.as_deref().unwrap_or("-"),
                    row.done.as_deref().unwrap_or("-"),
                    row.left.as_deref().unwrap_or("-"),
                );
            }
            Ok(())
        }

        Command::Grid { block } => {
            let export = SheetExport::load(
                &sheet_storage,
                config.sheet_export_path(),
                config.sheet_columns(),
            )
            .await?;
            let frames = export.block_frames(&block)?;

            let engine = FrameGridEngine::new(config.mosaic_layout());
            match engine.build(&frames) {
                Ok(frame_grid) => {
                    println!("Block {} ({}):", block, frame_grid.convention);
                    print_grid(&frame_grid.grid);
                    Ok(())
                }
                Err(e @ FrameGridError::UnsupportedConvention { .. }) => {
                    tracing::warn!("{}", e.user_friendly_message());
                    println!("Block {}:", block);
                    frames.iter().for_each(|frame| println!("  {}", frame));
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }

        Command::Acquire {
            block,
            taken,
            location,
        } => {
            let frames_location = location.unwrap_or_else(|| {
                Path::new(config.destination_path())
                    .join(&block)
                    .display()
                    .to_string()
            });
            let request = AcquisitionRequest {
                block,
                taken,
                frames_location,
            };

            let store = BatchStore::new(LocalStorage::new(config.store_path()), config.store_file());
            let engine = AcquisitionEngine::new(SheetPipeline::new(sheet_storage, store, config));
            let batch = engine.run(&request).await?;

            println!("✅ Batch {} saved", batch.id);
            if batch.adjacent_schema.is_empty() {
                println!("No adjacent frames");
            } else {
                println!("Adjacent frames: {}", batch.adjacent_frames.join(", "));
                print_display(&batch.adjacent_schema);
            }
            Ok(())
        }

        Command::Copy { block, frames } => {
            let plan = transfer::plan_transfer(&config, &block).await?;
            let mut copied = 0;
            for frame in &frames {
                match transfer::copy_frame(&plan.search_dir, &plan.destination_dir, frame).await {
                    Ok(_) => copied += 1,
                    Err(e @ FrameGridError::FrameAlreadyExists { .. }) => {
                        tracing::warn!("{}", e.user_friendly_message());
                    }
                    Err(e) => return Err(e),
                }
            }

            tracing::info!("Copied {} of {} frames", copied, frames.len());
            println!(
                "📁 {} frames copied to {}",
                copied,
                plan.destination_dir.display()
            );
            Ok(())
        }

        Command::Batches { action } => {
            let store = BatchStore::new(LocalStorage::new(config.store_path()), config.store_file());
            match action {
                BatchAction::List => {
                    for batch in store.list().await? {
                        println!(
                            "{}  {:<8} {:>4} frames  {}",
                            batch.id,
                            batch.block,
                            batch.frames.len(),
                            batch.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
                BatchAction::Delete { id } => {
                    let removed = store.delete(&id).await?;
                    println!("🗑 Batch {} deleted ({} frames)", removed.id, removed.frames.len());
                }
            }
            Ok(())
        }
    }
}

fn print_grid(grid: &Grid) {
    let width = grid
        .rows()
        .iter()
        .flatten()
        .flatten()
        .map(String::len)
        .max()
        .unwrap_or(1);

    for row in grid.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|cell| format!("{:<width$}", cell.as_deref().unwrap_or("."), width = width))
            .collect();
        println!("{}", line.join(" "));
    }
}

// [x] 已取得, [+] 可選, 其餘照常顯示
fn print_display(rows: &[Vec<AnnotatedCell>]) {
    let width = rows
        .iter()
        .flatten()
        .filter_map(|cell| cell.label.as_ref())
        .map(String::len)
        .max()
        .unwrap_or(1);

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .map(|cell| {
                let mark = match (cell.is_taken, cell.is_selectable) {
                    (true, _) => "[x]",
                    (_, true) => "[+]",
                    _ => "   ",
                };
                let label = cell.label.as_deref().unwrap_or(".");
                format!("{}{:<width$}", mark, label, width = width)
            })
            .collect();
        println!("{}", line.join(" "));
    }
}
