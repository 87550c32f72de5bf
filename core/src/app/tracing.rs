use std::io;
#[cfg(feature = "app_tracing_file")]
use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the console log filter.
pub const CONSOLE_LOG: &str = "OPTRES_LOG";
/// Environment variable holding the file log filter.
pub const FILE_LOG: &str = "OPTRES_FILE_LOG";

#[derive(Default)]
pub struct TracingBuilder {
  console_filter: Option<EnvFilter>,
  #[cfg(feature = "app_tracing_file")]
  log_file_path: Option<PathBuf>,
  #[cfg(feature = "app_tracing_file")]
  file_filter: Option<EnvFilter>,
}
impl TracingBuilder {
  pub fn with_console_filter(mut self, console_filter: EnvFilter) -> Self {
    self.console_filter = Some(console_filter);
    self
  }

  #[cfg(feature = "app_tracing_file")]
  pub fn with_log_file_path(mut self, log_file_path: impl Into<PathBuf>) -> Self {
    self.log_file_path = Some(log_file_path.into());
    self
  }
  #[cfg(feature = "app_tracing_file")]
  pub fn with_log_file_path_opt(mut self, log_file_path: Option<impl Into<PathBuf>>) -> Self {
    self.log_file_path = log_file_path.map(|p| p.into());
    self
  }
  #[cfg(feature = "app_tracing_file")]
  pub fn with_file_filter(mut self, file_filter: EnvFilter) -> Self {
    self.file_filter = Some(file_filter);
    self
  }

  /// Installs the global subscriber. Filters not set explicitly are read from [`CONSOLE_LOG`] and [`FILE_LOG`],
  /// falling back to the default filter.
  ///
  /// # Panics
  ///
  /// Panics if a global subscriber was already installed.
  pub fn build(self) -> AppTracing {
    let console_filter = self.console_filter.unwrap_or_else(|| filter_from_env(CONSOLE_LOG));
    let layered = tracing_subscriber::registry().with(
      tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(console_filter)
    );

    #[cfg(feature = "app_tracing_file")] {
      if let Some(file_path) = self.log_file_path {
        let file_filter = self.file_filter.unwrap_or_else(|| filter_from_env(FILE_LOG));
        return match create_log_file(&file_path) {
          Err(e) => {
            layered.init();
            tracing::warn!("Cannot log to file; could not truncate/create and open log file '{}' for writing: {}", file_path.display(), e);
            AppTracing::default()
          }
          Ok(log_file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(io::BufWriter::new(log_file));
            layered.with(
              tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter)
            ).init();
            AppTracing { _file_guard: Some(guard) }
          }
        };
      }
    }

    layered.init();
    AppTracing::default()
  }
}

/// Keeps file logging alive; buffered log lines are flushed when this is dropped.
#[derive(Default)]
pub struct AppTracing {
  #[cfg(feature = "app_tracing_file")]
  _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

fn filter_from_env(var: &str) -> EnvFilter {
  EnvFilter::try_from_env(var).unwrap_or_default()
}

#[cfg(feature = "app_tracing_file")]
fn create_log_file(file_path: &std::path::Path) -> Result<std::fs::File, io::Error> {
  if let Some(parent) = file_path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::File::create(file_path)
}
