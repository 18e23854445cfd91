/*
* vgpu-edit command line
* ----------------------
*
* vgpu-edit [--snapshot FILE] [--config DIR]
* ├── catalog --vm VM                  // selectable GPU configurations
* ├── inspect --vm VM                  // current assignment and warnings
* ├── assign --vm VM --choice N        // select, save and apply to the snapshot
* │          [--dry-run]               // print the save command only
* └── init [--force]                   // write config/default.toml
*
* VM is a name label or an opaque reference.
*/

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, Level};

use crate::config::{generate_default_config, PresentationSettings, Settings};
use crate::core::{AssignmentExecutor, GpuEditSession, PoolSnapshot, SnapshotExecutor};
use crate::gpu::{ProfileTuple, WarningState};

#[derive(Parser)]
#[command(name = "vgpu-edit")]
#[command(about = "Pick and assign GPU / vGPU configurations for VMs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pool snapshot (JSON); defaults to snapshot.path from the config
    #[arg(short, long, value_name = "FILE", global = true)]
    snapshot: Option<PathBuf>,

    #[arg(short, long, value_name = "DIR", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the GPU configurations a VM can select
    Catalog {
        #[arg(short, long)]
        vm: String,
    },
    /// Show a VM's current GPU assignment and warnings
    Inspect {
        #[arg(short, long)]
        vm: String,
    },
    /// Select a catalog entry and assign it to the VM
    Assign {
        #[arg(short, long)]
        vm: String,
        #[arg(short = 'n', long)]
        choice: usize,
        #[arg(long)]
        dry_run: bool,
    },
    /// Generate default configuration
    Init {
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(dir) => Settings::new_from_dir(dir)?,
        None => Settings::new()?,
    };

    let level = Level::from_str(&settings.logging.level).unwrap_or(Level::WARN);
    tracing_subscriber::fmt().with_max_level(level).init();
    colored::control::set_override(settings.presentation.color);

    let snapshot_path = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| settings.snapshot.path.clone());

    match cli.command {
        Commands::Catalog { vm } => handle_catalog(&snapshot_path, &vm, &settings.presentation),
        Commands::Inspect { vm } => handle_inspect(&snapshot_path, &vm, &settings.presentation),
        Commands::Assign { vm, choice, dry_run } => {
            handle_assign(&snapshot_path, &vm, choice, dry_run, &settings.presentation).await
        }
        Commands::Init { force } => handle_init_command(cli.config.as_deref(), force),
    }
}

fn open_session(path: &Path, vm: &str) -> anyhow::Result<(PoolSnapshot, GpuEditSession)> {
    let snapshot = PoolSnapshot::load(path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))?;
    let vm_ref = snapshot
        .find_vm(vm)
        .map(|v| v.opaque_ref.clone())
        .ok_or_else(|| anyhow!("VM not found: {}", vm))?;
    let session = GpuEditSession::open(&vm_ref, &snapshot)?;
    Ok((snapshot, session))
}

fn display_label(tuple: &ProfileTuple, presentation: &PresentationSettings) -> String {
    if tuple.is_no_gpu() {
        presentation.none_label.clone()
    } else {
        tuple.label()
    }
}

fn handle_catalog(path: &Path, vm: &str, presentation: &PresentationSettings) -> anyhow::Result<()> {
    let (_, session) = open_session(path, vm)?;

    if let Some(rubric) = session.rubric() {
        println!("{}", rubric.message().yellow());
        return Ok(());
    }

    println!("{} {}", "GPU configurations for".bold(), session.vm().name_label.bold());
    for (index, tuple) in session.catalog().iter().enumerate() {
        let indent = if matches!(tuple, ProfileTuple::GroupSpecific { .. }) {
            "    "
        } else {
            ""
        };
        let label = display_label(tuple, presentation);
        if tuple == session.current() {
            println!("  [{:>2}] {}{} {}", index, indent, label.green(), "(current)".green());
        } else {
            println!("  [{:>2}] {}{}", index, indent, label);
        }
    }
    Ok(())
}

fn handle_inspect(path: &Path, vm: &str, presentation: &PresentationSettings) -> anyhow::Result<()> {
    let (_, session) = open_session(path, vm)?;

    println!("{} {}", "VM:".bold(), session.vm().name_label);
    println!("{} {}", "Power state:".bold(), session.vm().power_state);

    if let Some(rubric) = session.rubric() {
        println!("{}", rubric.message().yellow());
        return Ok(());
    }

    println!("{} {}", "Current GPU:".bold(), display_label(session.current(), presentation));
    match session.selected() {
        Some(tuple) => println!("{} {}", "Selected:".bold(), display_label(tuple, presentation)),
        None => println!("{} {}", "Selected:".bold(), "nothing matches the current assignment".yellow()),
    }
    print_warnings(&session.warnings());
    Ok(())
}

async fn handle_assign(
    path: &Path,
    vm: &str,
    choice: usize,
    dry_run: bool,
    presentation: &PresentationSettings,
) -> anyhow::Result<()> {
    let (snapshot, mut session) = open_session(path, vm)?;

    if let Err(e) = session.select(choice) {
        e.log("select GPU");
        return Err(e.into());
    }
    if let Some(tuple) = session.selected() {
        println!("{} {}", "Selected:".bold(), display_label(tuple, presentation));
    }
    print_warnings(&session.warnings());

    if !session.has_changed() {
        println!("{} GPU assignment unchanged, nothing to save", "✓".green());
        return Ok(());
    }

    let command = session.save_settings();
    if dry_run {
        println!("{}", serde_json::to_string_pretty(&command)?);
        return Ok(());
    }

    let shared = Arc::new(Mutex::new(snapshot));
    let executor = SnapshotExecutor::new(shared.clone());
    let handle = tokio::spawn(async move { executor.execute(command).await });

    match handle.await? {
        Ok(Some(vgpu)) => println!("{} vGPU {} assigned to {}", "✓".green(), vgpu, session.vm().name_label),
        Ok(None) => println!("{} GPU removed from {}", "✓".green(), session.vm().name_label),
        Err(e) => {
            e.log("assign GPU");
            return Err(e.into());
        }
    }

    shared.lock().await.save(path)?;
    Ok(())
}

fn print_warnings(warnings: &WarningState) {
    if warnings.vm_must_be_stopped {
        println!("{} The VM must be shut down before its GPU can be changed.", "!".yellow());
    }
    if warnings.selection_disabled {
        println!("{} GPU selection is disabled.", "!".yellow());
    }
    if warnings.passthrough_rdp_warning {
        println!(
            "{} Remote desktop will be unavailable until GPU drivers and guest tools are installed.",
            "!".yellow()
        );
    }
    if warnings.gpu_unavailable {
        println!("{} The VM will not start unless a GPU from this group is free.", "i".cyan());
    }
    if warnings.driver_required {
        println!("{} Install the vendor's GPU driver inside the guest.", "i".cyan());
    }
}

fn handle_init_command(config_dir: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let config_dir = config_dir.unwrap_or_else(|| Path::new("config"));
    let target = config_dir.join("default.toml");
    if target.exists() && !force {
        error!("Configuration already exists. Use --force to overwrite.");
        return Ok(());
    }

    std::fs::create_dir_all(config_dir)?;
    let config_str = toml::to_string_pretty(&generate_default_config())?;
    std::fs::write(&target, config_str)?;
    info!("Wrote {}", target.display());

    println!("{} Default configuration generated", "✓".green());
    Ok(())
}
