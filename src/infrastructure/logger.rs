use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;

/// `env_logger` writing to a file instead of stderr.
///
/// The picker owns the terminal, so nothing may be written to stdout or
/// stderr while it runs.
pub struct FileLogger {
    builder: env_logger::Builder,
}

impl FileLogger {
    pub fn open(path: &Path, level: LevelFilter) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        let mut builder = env_logger::Builder::new();
        builder
            .filter_level(level)
            .write_style(env_logger::WriteStyle::Never)
            .target(env_logger::Target::Pipe(Box::new(file)));
        Ok(Self { builder })
    }

    /// Install as the global logger. Only the first call takes effect.
    pub fn install(mut self) -> Result<()> {
        self.builder
            .try_init()
            .context("A logger is already installed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Record};
    use tempfile::TempDir;

    #[test]
    fn writes_enabled_records_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("calendar.log");
        let mut file_logger = FileLogger::open(&path, LevelFilter::Info).unwrap();
        let logger = file_logger.builder.build();

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("stay_calendar")
                .args(format_args!("range started"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("stay_calendar")
                .args(format_args!("hover moved"))
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("INFO"));
        assert!(content.contains("range started"));
        assert!(!content.contains("hover moved"));
    }
}
