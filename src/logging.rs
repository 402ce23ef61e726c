use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Result;
use env_logger::{Builder, Env, Target};

/// The terminal belongs to the UI, so log lines go to a file instead.
pub fn log_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join("letterpop.log")
}

/// Install the global logger. `RUST_LOG` still wins over `default_level`.
pub fn init(data_dir: &Path, default_level: &str) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    let path = log_file_path(data_dir);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(path)
}
