//! Interactive appointment agenda.
//!
//! # Responsibility
//! - Resolve store configuration once at startup and hand it to core.
//! - Initialize core logging before any store access.
//! - Run the text menu on stdin/stdout.

mod date_input;
mod menu;
mod table;

use agenda_core::config::{DEFAULT_DATA_DIR, DEFAULT_FILE_NAME};
use agenda_core::{
    default_log_level, init_logging, FieldPolicy, FileAppointmentStore, ScheduleService,
    StoreConfig,
};
use clap::Parser;
use log::info;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Medical appointment scheduling menu", version)]
struct Cli {
    /// Directory holding the appointment file
    #[arg(long, env = "AGENDA_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// Appointment file name inside the data directory
    #[arg(long, env = "AGENDA_FILE_NAME", default_value = DEFAULT_FILE_NAME)]
    file_name: String,
    /// How values containing a comma are treated (strict|permissive)
    #[arg(long, env = "AGENDA_FIELD_POLICY", default_value = "strict")]
    field_policy: FieldPolicy,
    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute log directory (defaults to <data-dir>/logs)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = StoreConfig::new(cli.data_dir, cli.file_name, cli.field_policy)?;
    let log_level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = match cli.log_dir {
        Some(dir) => dir,
        None => absolute(&config.data_dir().join("logs"))?,
    };
    if let Err(err) = init_logging(log_level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    info!(
        "event=cli_start module=cli status=ok file={} field_policy={}",
        config.file_path().display(),
        config.field_policy()
    );

    let service = ScheduleService::new(FileAppointmentStore::new(&config), config.field_policy());
    let stdin = io::stdin();
    let stdout = io::stdout();
    menu::Menu::new(&service, stdin.lock(), BufWriter::new(stdout.lock())).run()?;

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
