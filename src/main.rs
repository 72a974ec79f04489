//! # boxmenu CLI Entry Point
//!
//! Opens a catalog of items in a bordered terminal menu and applies the one
//! you pick.
//!
//! ## Usage
//!
//! ```bash
//! # Default catalog (~/.config/boxmenu/menu.json)
//! boxmenu
//!
//! # A specific catalog, wrapping at the ends of the list
//! boxmenu --items ./rules.json --wrap
//!
//! # Print the catalog and exit
//! boxmenu --list
//!
//! # Apply one item without opening the menu
//! boxmenu --apply "Firefox"
//!
//! # Keep the current overrides as the new defaults
//! boxmenu --theme ocean --wrap --save-config
//! ```
//!
//! ## Key Bindings
//!
//! - `j` / `Down`, `k` / `Up` - Move selection
//! - `PgDn` / `PgUp` - Move a page
//! - `g` / `Home`, `G` / `End` - First / last item
//! - `Enter` / left click - Apply the item
//! - Mouse wheel - Move selection
//! - `r` - Re-read the catalog
//! - `q` / `Ctrl+c` - Quit

use boxmenu::catalog::{CatalogActions, CatalogSource};
use boxmenu::history::ActivationHistory;
use boxmenu::ui::{
    ActionHandler, Config, EdgePolicy, InputDecoder, Item, ItemSource, MenuModel, Session,
    StdinBytes, TerminalGuard,
};

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// boxmenu - pick an item from a catalog and apply it
#[derive(Parser, Debug)]
#[command(name = "boxmenu")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A keyboard- and mouse-driven list menu for the terminal", long_about = None)]
struct Args {
    /// Catalog file to open (default: ~/.config/boxmenu/menu.json)
    #[arg(short, long, value_name = "FILE")]
    items: Option<PathBuf>,

    /// Configuration file (default: ~/.config/boxmenu/config.json)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Color theme (Default, Ocean, Amber, Mono)
    #[arg(short, long, value_name = "NAME")]
    theme: Option<String>,

    /// Item rows shown at once
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Inner width of the menu box
    #[arg(long, value_name = "N")]
    width: Option<usize>,

    /// Wrap around at the ends of the list
    #[arg(long)]
    wrap: bool,

    /// Log file (default: <data dir>/boxmenu/boxmenu.log)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Log debug details, decoded input included
    #[arg(short, long)]
    verbose: bool,

    /// Print `label<TAB>detail` for every item and exit
    #[arg(long, conflicts_with = "apply")]
    list: bool,

    /// Apply the item with this label and exit
    #[arg(long, value_name = "LABEL")]
    apply: Option<String>,

    /// Write the configuration, command-line overrides included, and exit
    #[arg(long, conflicts_with_all = ["list", "apply"])]
    save_config: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.log.as_deref(), args.verbose);
    log::info!("boxmenu {} starting", env!("CARGO_PKG_VERSION"));

    let result = run_application(&args);
    if let Err(e) = &result {
        log::error!("{:#}", e);
    }

    Ok(if result? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Send log output to a file; the terminal belongs to the menu.
fn init_logging(path: Option<&Path>, verbose: bool) {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Ok(log_file) = File::create(&path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn default_log_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "boxmenu")
        .map(|dirs| dirs.data_local_dir().join("boxmenu.log"))
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(theme) = &args.theme {
        config.theme.clone_from(theme);
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if args.wrap {
        config.edge_policy = EdgePolicy::Wrap;
    }
}

/// Returns whether the run succeeded; `false` only for a failed `--apply`.
fn run_application(args: &Args) -> Result<bool> {
    let mut config = Config::resolve(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    log::info!("config: {:?}", config);

    if args.save_config {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => Config::config_path()?,
        };
        config.save_to(&path)?;
        log::info!("saved config to {}", path.display());
        println!("Saved configuration to {}", path.display());
        return Ok(true);
    }

    let catalog_path = match &args.items {
        Some(path) => path.clone(),
        None => Config::default_catalog_path()?,
    };
    let mut source = CatalogSource::open(&catalog_path)?;
    let items = source.enumerate()?;
    log::info!(
        "catalog {}: {} items",
        source.path().display(),
        items.len()
    );

    if args.list {
        print_list(&items, &mut io::stdout().lock()).context("Failed to print catalog")?;
        return Ok(true);
    }

    let mut actions = CatalogActions::new(config.clipboard_command.clone());
    match ActivationHistory::new(source.path()) {
        Ok(history) => {
            log::info!("history enabled for {}", history.catalog_path().display());
            actions = actions.with_history(history);
        }
        Err(e) => log::warn!("History disabled: {:#}", e),
    }

    if let Some(label) = &args.apply {
        let item = items
            .iter()
            .find(|item| item.label == *label)
            .with_context(|| {
                format!(
                    "No item labelled '{}' in {}",
                    label,
                    source.path().display()
                )
            })?;
        let outcome = actions.apply(item);
        if outcome.success {
            if !outcome.message.is_empty() {
                println!("{}", outcome.message);
            }
        } else {
            eprintln!("{}", outcome.message);
        }
        return Ok(outcome.success);
    }

    actions.preflight(&items)?;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("boxmenu needs an interactive terminal (stdin and stdout must be a TTY)");
    }

    let layout = config.layout();
    let theme = config.theme();
    let title = source.title().to_string();
    let model = MenuModel::new(title, items, layout.page_size, config.edge_policy);

    let guard = TerminalGuard::acquire()?;
    let stdin = StdinBytes::spawn().context("Failed to start input reader")?;
    let mut input = InputDecoder::new(stdin);

    let result = Session::new(model, layout, theme, &mut source, &mut actions)
        .run(&mut input, &mut io::stdout());

    drop(guard);
    result?;
    Ok(true)
}

fn print_list<W: Write>(items: &[Item], out: &mut W) -> io::Result<()> {
    for item in items {
        writeln!(
            out,
            "{}\t{}",
            item.label,
            item.secondary.as_deref().unwrap_or_default()
        )?;
    }
    Ok(())
}
