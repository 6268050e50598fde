use crate::config::Config;
use crate::storage::global_data_dir;
use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use std::fs;
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "jotter";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Starts the file logger. The TUI owns the terminal, so nothing is logged to
/// stderr. `RUST_LOG` wins over the configured level.
///
/// The returned handle must stay alive for the duration of the process.
pub fn init(config: &Config) -> Result<LoggerHandle> {
    let dir = log_dir(config)?;
    fs::create_dir_all(&dir).with_context(|| format!("creating log directory {:?}", dir))?;

    let handle = Logger::try_with_env_or_str(&config.log_level)
        .with_context(|| format!("invalid log level `{}`", config.log_level))?
        .log_to_file(
            FileSpec::default()
                .directory(dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("starting logger")?;

    log::info!(
        "event=app_start version={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        dir.display()
    );
    Ok(handle)
}

fn log_dir(config: &Config) -> Result<PathBuf> {
    if let Some(dir) = &config.log_dir {
        return Ok(dir.clone());
    }
    let base = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => global_data_dir()?,
    };
    Ok(base.join("logs"))
}
