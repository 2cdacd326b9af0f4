//! filament-swc CLI: SWC export, import and batch export for scene files.
//!
//! Usage:
//!   filament-swc export --scene scene.json [--output cell.swc] [--combined-only]
//!   filament-swc import --scene scene.json [--input cell.swc] [--save-as out.json]
//!   filament-swc batch [--input-dir in] [--output-dir out] [--timeout secs] [--report r.json]
//!   filament-swc config [--write]

use clap::{Parser, Subcommand};
use filament_swc::boundary::{guarded, user_message};
use filament_swc::config::config_path;
use filament_swc::convert::selected_export_source;
use filament_swc::picker::{default_picker, resolve_path, PathPicker, PathRequest};
use filament_swc::{
    export_filaments, import_swc, logging, run_batch, BatchOptions, Error, ExportOptions,
    SceneFileHost, Settings, VERSION,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "filament-swc",
    version,
    about = "Convert Filaments tracings to and from SWC files"
)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log file, overriding the configured path
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the selected Filaments object to SWC
    Export {
        /// Scene snapshot to read
        #[arg(long)]
        scene: PathBuf,
        /// Combined SWC file to write
        #[arg(long)]
        output: Option<PathBuf>,
        /// Skip the per-filament files
        #[arg(long)]
        combined_only: bool,
    },
    /// Import an SWC file as a new Filaments object
    Import {
        /// Scene snapshot to add the filament to
        #[arg(long)]
        scene: PathBuf,
        /// SWC file to read
        #[arg(long)]
        input: Option<PathBuf>,
        /// Write the updated scene here instead of back to --scene
        #[arg(long)]
        save_as: Option<PathBuf>,
    },
    /// Export the first Filaments object of every file under a folder
    Batch {
        /// Folder searched recursively for input files
        #[arg(long)]
        input_dir: Option<PathBuf>,
        /// Folder receiving the mirrored SWC tree
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Seconds to wait for each dataset to load
        #[arg(long)]
        timeout: Option<u64>,
        /// Write a JSON summary of the run
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print the effective settings
    Config {
        /// Also write them to the settings file
        #[arg(long)]
        write: bool,
    },
}

/// Print the user message; warnings still count as success
fn report_failure(err: &Error, log_path: &Path) -> i32 {
    eprintln!("{}", user_message(err, log_path));
    if err.is_warning() {
        0
    } else {
        1
    }
}

fn cmd_export(
    settings: &Settings,
    picker: &dyn PathPicker,
    log_path: &Path,
    scene: &Path,
    output: Option<&Path>,
    combined_only: bool,
) -> i32 {
    let result = guarded("SWC export", log_path, || {
        let host = SceneFileHost::connect(scene)?;
        let (dataset, filaments) = selected_export_source(&host)?;
        let savename = resolve_path(output, picker, PathRequest::SaveSwc)?;

        let mut options = ExportOptions::from(&settings.export);
        if combined_only {
            options.write_individual = false;
        }
        export_filaments(&dataset, filaments, &savename, &options)
    });

    match result {
        Ok(report) => {
            match &report.combined_path {
                Some(path) => println!(
                    "Exported {} of {} filament(s) ({} nodes) to {}",
                    report.exported_filaments(),
                    report.filament_count,
                    report.combined_nodes,
                    path.display()
                ),
                None => println!("Nothing exported: '{}' has no filament points", report.name),
            }
            println!("Log: {}", log_path.display());
            0
        }
        Err(e) => report_failure(&e, log_path),
    }
}

fn cmd_import(
    picker: &dyn PathPicker,
    log_path: &Path,
    scene: &Path,
    input: Option<&Path>,
    save_as: Option<&Path>,
) -> i32 {
    let result = guarded("SWC import", log_path, || {
        let mut host = SceneFileHost::connect(scene)?;
        let input = resolve_path(input, picker, PathRequest::OpenSwc)?;
        let report = import_swc(&mut host, &input)?;
        match save_as {
            Some(path) => host.save_as(path)?,
            None => host.save()?,
        }
        Ok((report, host.path().to_path_buf()))
    });

    match result {
        Ok((report, scene)) => {
            println!(
                "Imported {} ({} nodes, {} edges) into {}",
                report.name,
                report.nodes,
                report.edges,
                scene.display()
            );
            println!("Log: {}", log_path.display());
            0
        }
        Err(e) => report_failure(&e, log_path),
    }
}

fn cmd_batch(
    settings: &Settings,
    picker: &dyn PathPicker,
    log_path: &Path,
    input_dir: Option<&Path>,
    output_dir: Option<&Path>,
    timeout: Option<u64>,
    report: Option<&Path>,
) -> i32 {
    let result = guarded("batch export", log_path, || {
        let input_root = resolve_path(input_dir, picker, PathRequest::InputFolder)?;
        let output_root = resolve_path(
            output_dir,
            picker,
            PathRequest::OutputFolder {
                initial: Some(input_root.clone()),
            },
        )?;

        let mut options = BatchOptions::new(input_root, output_root, &settings.batch);
        if let Some(secs) = timeout {
            options.dataset_timeout = Duration::from_secs(secs);
        }

        let mut host = SceneFileHost::default();
        let summary = run_batch(&mut host, &options)?;
        if let Some(path) = report {
            summary.save_json(path)?;
        }
        Ok(summary)
    });

    match result {
        Ok(summary) => {
            println!(
                "Exported {} / {} file(s).",
                summary.succeeded(),
                summary.total()
            );
            println!("Output: {}", summary.output_root.display());
            println!("Log: {}", log_path.display());
            0
        }
        Err(e) => report_failure(&e, log_path),
    }
}

fn cmd_config(settings: &Settings, config: Option<&Path>, write: bool) -> i32 {
    let yaml = match settings.to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    print!("{}", yaml);

    if !write {
        return 0;
    }
    let Some(path) = config.map(Path::to_path_buf).or_else(config_path) else {
        eprintln!("Error: could not determine the settings file location");
        return 1;
    };
    match settings.save(&path) {
        Ok(()) => {
            println!("Wrote settings to {}", path.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn run(cli: Cli) -> i32 {
    let mut settings = Settings::load_or_default(cli.config.as_deref());
    if let Some(path) = cli.log_file {
        settings.log.path = path;
    }

    // Held until the command returns so the file writer flushes on exit
    let _guard = match logging::init(&settings.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {}", e);
            None
        }
    };
    tracing::info!("filament-swc {}", VERSION);

    let log_path = settings.log.path.clone();
    let picker = default_picker();
    match cli.command {
        Commands::Export {
            scene,
            output,
            combined_only,
        } => cmd_export(
            &settings,
            picker.as_ref(),
            &log_path,
            &scene,
            output.as_deref(),
            combined_only,
        ),
        Commands::Import {
            scene,
            input,
            save_as,
        } => cmd_import(
            picker.as_ref(),
            &log_path,
            &scene,
            input.as_deref(),
            save_as.as_deref(),
        ),
        Commands::Batch {
            input_dir,
            output_dir,
            timeout,
            report,
        } => cmd_batch(
            &settings,
            picker.as_ref(),
            &log_path,
            input_dir.as_deref(),
            output_dir.as_deref(),
            timeout,
            report.as_deref(),
        ),
        Commands::Config { write } => cmd_config(&settings, cli.config.as_deref(), write),
    }
}

fn main() {
    let code = run(Cli::parse());
    std::process::exit(code);
}
