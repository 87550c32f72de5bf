use std::panic;

use tracing::{debug, error};

use crate::error::Error;
use crate::executor::{describe_payload, will_capture};

/// Installs a panic hook aware of fault payloads.
///
/// Faults that an executor on the panicking thread is about to capture are logged at debug level and not forwarded.
/// Any other panic is logged once at error level and handed to the previously installed hook, which prints the
/// location and backtrace.
pub fn install_panic_handler() {
  let previous = panic::take_hook();
  panic::set_hook(Box::new(move |info| {
    let payload = info.payload();
    let message = describe_payload(payload);
    let location = info.location().map(|l| l.to_string()).unwrap_or_default();
    if will_capture(payload) {
      debug!(%message, %location, "fault raised inside executor callback");
      return;
    }
    if payload.is::<Error>() {
      error!(%message, %location, "unhandled fault");
    } else {
      error!(%message, %location, "panic");
    }
    previous(info);
  }));
}
