//! Runs callbacks and turns faults raised inside them into [`Error`] values.
//!
//! A fault is a panic. Accessors in this crate raise faults with an [`Error`] payload (see [`raise`]) so that the
//! executor can filter them by error-chain identity. Capturing relies on unwinding: with `panic = "abort"` nothing is
//! caught.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace};

use crate::error::Error;

thread_local! {
  /// Expected-fault lists of the executors currently running on this thread, innermost last.
  static FRAMES: RefCell<Vec<Vec<Error>>> = const { RefCell::new(Vec::new()) };
}

struct Frame;
impl Frame {
  fn enter(expected: &[Error]) -> Self {
    FRAMES.with(|frames| frames.borrow_mut().push(expected.to_vec()));
    Self
  }
}
impl Drop for Frame {
  fn drop(&mut self) {
    FRAMES.with(|frames| { frames.borrow_mut().pop(); });
  }
}


/// Raises a fault carrying `cause` as its payload.
#[track_caller]
pub fn raise(cause: impl Into<Error>) -> ! {
  panic::panic_any(cause.into())
}

/// Runs `f`, returning `Ok(())` if it completes normally.
///
/// If `f` faults and `expected` is empty, the fault is converted with [`payload_to_error`] and returned. If `expected`
/// is non-empty, the fault is returned only when its payload is an [`Error`] that [`is`](Error::is) one of `expected`;
/// any other fault is re-raised with its original payload.
#[inline]
pub fn safe_do(f: impl FnOnce(), expected: &[Error]) -> Result<(), Error> {
  safe_call(f, expected)
}

/// Like [`safe_do`], but returns the value produced by `f`.
pub fn safe_call<R>(f: impl FnOnce() -> R, expected: &[Error]) -> Result<R, Error> {
  let result = {
    let _frame = Frame::enter(expected);
    panic::catch_unwind(AssertUnwindSafe(f))
  };
  match result {
    Ok(value) => Ok(value),
    Err(payload) if is_expected(&*payload, expected) => {
      let cause = payload_to_error(payload);
      debug!(%cause, "captured fault raised inside callback");
      Err(cause)
    }
    Err(payload) => {
      trace!(payload = %describe_payload(&*payload), "re-raising unexpected fault");
      panic::resume_unwind(payload)
    }
  }
}

/// Converts a fault payload into an error. [`Error`] payloads pass through, string payloads become message errors.
pub fn payload_to_error(payload: Box<dyn Any + Send>) -> Error {
  match payload.downcast::<Error>() {
    Ok(cause) => *cause,
    Err(payload) => match payload.downcast::<String>() {
      Ok(message) => Error::from(*message),
      Err(payload) => match payload.downcast_ref::<&'static str>() {
        Some(message) => Error::msg(message),
        None => Error::msg(NON_DISPLAYABLE),
      },
    },
  }
}

/// Returns true if a fault with `payload`, raised on this thread right now, would be captured by one of the executors
/// currently running on it.
pub fn will_capture(payload: &(dyn Any + Send)) -> bool {
  FRAMES.with(|frames| match frames.try_borrow() {
    Ok(frames) => frames.iter().any(|expected| is_expected(payload, expected)),
    Err(_) => false,
  })
}

/// Renders a fault payload for logging.
pub fn describe_payload(payload: &(dyn Any + Send)) -> String {
  if let Some(cause) = payload.downcast_ref::<Error>() {
    cause.to_string()
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message.clone()
  } else if let Some(message) = payload.downcast_ref::<&'static str>() {
    message.to_string()
  } else {
    NON_DISPLAYABLE.to_string()
  }
}

const NON_DISPLAYABLE: &str = "panic with a non-displayable payload";

fn is_expected(payload: &(dyn Any + Send), expected: &[Error]) -> bool {
  if expected.is_empty() {
    return true;
  }
  payload.downcast_ref::<Error>().is_some_and(|cause| expected.iter().any(|e| cause.is(e)))
}
