use std::path::PathBuf;

/// Environment variable holding the path of the log file. File logging is off when unset.
pub const LOG_FILE: &str = "OPTRES_LOG_FILE";

/// Loads a `.env` file from the working directory or one of its parents into the process environment. Variables
/// already set are not overridden. Returns the path of the loaded file, or `None` if there is none.
pub fn load_dotenv_into_env() -> Result<Option<PathBuf>, dotenvy::Error> {
  match dotenvy::dotenv() {
    Ok(path) => Ok(Some(path)),
    Err(e) if e.not_found() => Ok(None),
    Err(e) => Err(e),
  }
}

pub fn log_file_path() -> Option<PathBuf> {
  std::env::var_os(LOG_FILE).filter(|p| !p.is_empty()).map(PathBuf::from)
}
