//! Unconditional unwrapping for call sites that assert an error cannot happen.
//!
//! Faults raised here carry the [`expected_fault`] sentinel in their cause chain, which is what the [`Optional`]
//! chain combinators are configured to capture.
//!
//! [`Optional`]: crate::optional::Optional

use std::slice;
use std::sync::OnceLock;

use crate::error::Error;
use crate::executor::{raise, safe_call, safe_do};

static EXPECTED_FAULT: OnceLock<Error> = OnceLock::new();

/// Sentinel marking a fault as expected.
pub fn expected_fault() -> &'static Error {
  EXPECTED_FAULT.get_or_init(|| Error::msg("expected panic occurred"))
}

/// Tags `cause` as an expected fault; returns it unchanged if it already is one.
pub fn wrap_must(cause: impl Into<Error>) -> Error {
  let cause = cause.into();
  if cause.is(expected_fault()) {
    cause
  } else {
    expected_fault().clone().joined(cause)
  }
}

/// Returns the value of `result`, or raises an expected fault whose cause chain holds both [`expected_fault`] and the
/// error.
#[track_caller]
pub fn must_get<T, E: Into<Error>>(result: Result<T, E>) -> T {
  match result {
    Ok(value) => value,
    Err(cause) => {
      let cause = cause.into();
      if cause.is(expected_fault()) {
        raise(cause)
      }
      raise(expected_fault().clone().joined("panic in must_get").joined(cause))
    }
  }
}

/// Raises an expected fault if `result` is an error.
#[track_caller]
pub fn must_nil<E: Into<Error>>(result: Result<(), E>) {
  if let Err(cause) = result {
    raise(wrap_must(cause))
  }
}

/// Runs `f`, re-raising any fault it raises as an expected fault.
#[track_caller]
pub fn wrap_panic(f: impl FnOnce()) {
  if let Err(cause) = safe_do(f, &[]) {
    raise(wrap_must(cause))
  }
}

/// Runs `f` and returns its value, re-raising any fault it raises as an expected fault.
#[track_caller]
pub fn wrap_panic_get<T>(f: impl FnOnce() -> T) -> T {
  match safe_call(f, &[]) {
    Ok(value) => value,
    Err(cause) => raise(wrap_must(cause)),
  }
}

/// Runs `f`, capturing only expected faults.
pub fn catch_must_panic(f: impl FnOnce()) -> Result<(), Error> {
  safe_do(f, slice::from_ref(expected_fault()))
}
