use std::error::Error as StdError;

use thiserror::Error;
use tracing::{debug, info, warn};

use optres_core::app::env;
use optres_core::app::panic_handler::install_panic_handler;
use optres_core::app::tracing::TracingBuilder;
use optres_core::must::must_get;
use optres_core::{Error, Optional, Outcome};

/// Ports below this are reserved.
const FIRST_USER_PORT: u16 = 1024;
const FALLBACK_ADDRESS: &str = "OPTRES_FALLBACK_ADDRESS";

#[derive(Debug, Error)]
enum PortError {
  #[error("port {0} is reserved")]
  Reserved(u16),
  #[error("no usable port among {0} candidates")]
  NoneUsable(usize),
}

fn main() -> Result<(), Box<dyn StdError>> {
  let dotenv_path = env::load_dotenv_into_env()?;
  let _tracing = TracingBuilder::default()
    .with_log_file_path_opt(env::log_file_path())
    .build();
  install_panic_handler();
  if let Some(path) = dotenv_path {
    debug!(path = %path.display(), "loaded .env file");
  }

  let candidates: Vec<String> = std::env::args().skip(1).collect();
  let address = run(&candidates)?;
  println!("{address}");
  Ok(())
}

fn run(candidates: &[String]) -> Result<String, Error> {
  let mut first_usable = Optional::Absent;
  for candidate in candidates {
    let outcome = parse_port(candidate)
      .and_then(check_port)
      .map(|port| format!("127.0.0.1:{port}"))
      .try_with(|address| debug!(%address, "resolved address"))
      .map_error(|cause| Error::msg(format!("rejected `{candidate}`")).joined(cause));
    match &outcome {
      Outcome::Ok(_) => info!(%outcome, "candidate accepted"),
      Outcome::Err(cause) => warn!(%cause, "candidate rejected"),
    }
    first_usable = first_usable.or_else(outcome.to_optional_value());
  }

  // An unset variable makes `must_get` fault; `from_fn` turns that into absent.
  let fallback = Optional::from_fn(|| must_get(std::env::var(FALLBACK_ADDRESS).map_err(Error::new)));
  info!(%fallback, "fallback address");

  first_usable
    .or_else(fallback)
    .to_result(Error::new(PortError::NoneUsable(candidates.len())))
    .into_result()
}

fn parse_port(candidate: &str) -> Outcome<u16> {
  candidate.trim().parse::<u16>().map_err(Error::new).into()
}

fn check_port(port: u16) -> Outcome<u16> {
  if port < FIRST_USER_PORT {
    Outcome::err(Error::new(PortError::Reserved(port)))
  } else {
    Outcome::ok(port)
  }
}
