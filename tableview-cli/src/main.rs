mod demo;
mod paths;

use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use paths::AppDirs;
use simplelog::{Config, LevelFilter, WriteLogger};
use tableview_lib::columns::ColumnKind;
use tableview_lib::columns::ColumnWidth;
use tableview_lib::columns::SyntheticColumn;
use tableview_lib::model::ColumnCatalog;
use tableview_lib::model::Row;
use tableview_lib::prefs::MemoryBackend;
use tableview_lib::prefs::PreferenceBackend;
use tableview_lib::prefs::SqliteBackend;
use tableview_lib::query::InMemoryList;
use tableview_lib::query::QueryConfig;
use tableview_lib::selection::HeaderState;
use tableview_lib::view::TableSnapshot;
use tableview_lib::view::ViewConfig;
use tableview_lib::ViewController;
use thiserror::Error;

use demo::Experiment;

/// Browse a demo experiment listing with persisted column preferences.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Root for the preference database and logs (defaults to the
    /// platform data and cache directories).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Preference database, overriding the one under the data directory.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep preferences in memory only.
    #[arg(long, conflicts_with = "db")]
    memory: bool,

    /// Preference namespace.
    #[arg(long, default_value = "experiments")]
    view: String,

    #[arg(long)]
    search: Option<String>,

    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    size: Option<u32>,

    /// Show or hide a column (repeatable).
    #[arg(long = "toggle", value_name = "COLUMN")]
    toggles: Vec<String>,

    /// Move a column, as COLUMN:INDEX (repeatable).
    #[arg(long = "move", value_name = "COLUMN:INDEX", value_parser = parse_move)]
    moves: Vec<(String, usize)>,

    /// Set a column width, as COLUMN=PX (repeatable).
    #[arg(long = "width", value_name = "COLUMN=PX", value_parser = parse_width)]
    widths: Vec<(String, u32)>,

    /// Select a row by id (repeatable).
    #[arg(long = "select", value_name = "ROW")]
    selected: Vec<String>,

    /// Select or deselect every row on the page.
    #[arg(long)]
    select_all: bool,

    /// Forget stored preferences before applying anything else.
    #[arg(long)]
    reset: bool,

    /// Simulated fetch latency in milliseconds.
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Table(#[from] tableview_lib::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no data directory available; pass --db or --memory")]
    NoDataDir,
}

impl From<tableview_lib::error::PreferenceError> for CliError {
    fn from(e: tableview_lib::error::PreferenceError) -> Self {
        Self::Table(e.into())
    }
}

impl From<tableview_lib::error::CatalogError> for CliError {
    fn from(e: tableview_lib::error::CatalogError) -> Self {
        Self::Table(e.into())
    }
}

fn parse_move(s: &str) -> Result<(String, usize), String> {
    let (id, index) = s.split_once(':').ok_or_else(|| format!("expected COLUMN:INDEX, got {}", s))?;
    let index = index.parse().map_err(|e| format!("bad index {}: {}", index, e))?;
    Ok((id.to_string(), index))
}

fn parse_width(s: &str) -> Result<(String, u32), String> {
    let (id, px) = s.split_once('=').ok_or_else(|| format!("expected COLUMN=PX, got {}", s))?;
    let px = px.parse().map_err(|e| format!("bad width {}: {}", px, e))?;
    Ok((id.to_string(), px))
}

fn init_logging(dirs: &AppDirs, level: LevelFilter) -> Result<PathBuf, CliError> {
    let pruned = dirs.rotate_logs(paths::KEEP_LOGS)?;
    let path = dirs.log_file();
    let log_file = File::create(&path)?;
    if WriteLogger::init(level, Config::default(), log_file).is_err() {
        eprintln!("Logger already initialized");
    }
    if pruned > 0 {
        log::debug!("Pruned {} old log files", pruned);
    }
    Ok(path)
}

fn open_backend(cli: &Cli, dirs: Option<&AppDirs>) -> Result<Arc<dyn PreferenceBackend>, CliError> {
    if cli.memory {
        return Ok(Arc::new(MemoryBackend::new()));
    }
    let path = match (&cli.db, dirs) {
        (Some(db), _) => db.clone(),
        (None, Some(dirs)) => dirs.preferences_db(),
        (None, None) => return Err(CliError::NoDataDir),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    log::info!("Opening preferences at {}", path.display());
    Ok(Arc::new(SqliteBackend::open(&path)?))
}

async fn run(cli: Cli, dirs: Option<AppDirs>) -> Result<(), CliError> {
    let backend = open_backend(&cli, dirs.as_ref())?;
    let remote = InMemoryList::new(demo::experiments(42), demo::matches)
        .with_latency(Duration::from_millis(cli.latency_ms));
    let config = ViewConfig::new(cli.view.clone())
        .with_default_selected(demo::DEFAULT_SELECTED)
        .with_trailing(vec![SyntheticColumn::actions()])
        .with_no_data_message("There are no experiments yet")
        .with_query(QueryConfig::default());

    let mut view = ViewController::with_backend(demo::catalog()?, backend, Arc::new(remote), config);

    if cli.reset {
        view.reset_preferences()?;
    }
    for id in &cli.toggles {
        view.toggle_column(id);
    }
    for (id, index) in &cli.moves {
        view.move_column(id, *index);
    }
    for (id, px) in &cli.widths {
        view.on_column_resize(id, *px);
    }

    view.refresh();
    if let Some(size) = cli.size {
        view.on_size_change(size);
    }
    if let Some(search) = &cli.search {
        view.on_search_change(search.clone());
    }
    if let Some(page) = cli.page {
        view.on_page_change(page);
    }
    view.settle().await;

    for id in &cli.selected {
        view.on_selection_toggle(id);
    }
    if cli.select_all {
        view.toggle_all_rows();
    }

    let snapshot = view.snapshot();
    print_table(view.catalog(), &snapshot);
    Ok(())
}

const AUTO_CHARS: usize = 16;

/// Rough pixel-to-character conversion for terminal output.
fn char_width(width: ColumnWidth) -> usize {
    width.px().map(|px| (px as usize / 8).clamp(3, 48)).unwrap_or(AUTO_CHARS)
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{:<width$}", text, width = width)
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn print_table(catalog: &ColumnCatalog<Experiment>, snapshot: &TableSnapshot<Experiment>) {
    let header: Vec<String> = snapshot
        .columns
        .iter()
        .map(|column| {
            let width = char_width(column.width);
            match column.kind {
                ColumnKind::Selector => fit(
                    match snapshot.header {
                        HeaderState::None => "[ ]",
                        HeaderState::Partial => "[-]",
                        HeaderState::All => "[x]",
                    },
                    width,
                ),
                _ => fit(&column.label, width),
            }
        })
        .collect();
    println!("{}", header.join(" | "));

    for row in &snapshot.rows {
        let id = row.id();
        let cells: Vec<String> = snapshot
            .columns
            .iter()
            .map(|column| {
                let width = char_width(column.width);
                let text = match column.kind {
                    ColumnKind::Selector => {
                        if snapshot.selected.contains(&id) {
                            "[x]".to_string()
                        } else {
                            "[ ]".to_string()
                        }
                    }
                    ColumnKind::Actions => "...".to_string(),
                    ColumnKind::Data(_) | ColumnKind::Pinned(_) => match (catalog.get(&column.id), &column.renderer) {
                        (Some(descriptor), Some(renderer)) => renderer.render(&descriptor.value(row)),
                        _ => String::new(),
                    },
                };
                fit(&text, width)
            })
            .collect();
        println!("{}", cells.join(" | "));
    }

    if let Some(message) = &snapshot.empty_message {
        println!("{}", message);
    }
    if let Some(error) = &snapshot.error {
        println!("Failed to load: {}", error);
    }
    println!(
        "Page {} of {} ({} total, {} per page) | {} selected",
        snapshot.request.page, snapshot.total_pages, snapshot.total, snapshot.request.size, snapshot.selected_count
    );
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let dirs = AppDirs::resolve(cli.data_dir.clone());

    match dirs.as_ref().map(|dirs| init_logging(dirs, cli.log_level)) {
        Some(Ok(path)) => log::debug!("Logging to {}", path.display()),
        Some(Err(e)) => eprintln!("Logging disabled: {}", e),
        None => eprintln!("Logging disabled: {}", CliError::NoDataDir),
    }

    if let Err(e) = run(cli, dirs).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
