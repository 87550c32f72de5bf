use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

use thiserror::Error;

/// Cheaply cloneable error handle carried by [`Outcome::Err`](crate::outcome::Outcome::Err).
///
/// Clones share identity: equality and [`Error::is`] compare handles, never messages. A handle is either a boxed typed
/// error, a plain message, or a join of several handles.
#[derive(Clone)]
pub struct Error(Arc<Repr>);

enum Repr {
  Boxed(Box<dyn StdError + Send + Sync>),
  Message(String),
  Join(Vec<Error>),
}

impl Error {
  pub fn new(error: impl StdError + Send + Sync + 'static) -> Self {
    Self(Arc::new(Repr::Boxed(Box::new(error))))
  }
  pub fn msg(message: impl Display) -> Self {
    Self(Arc::new(Repr::Message(message.to_string())))
  }

  /// Joins `errors` into one handle that matches every member. Returns `None` when `errors` is empty, and the sole
  /// member itself when there is only one.
  pub fn join(errors: impl IntoIterator<Item=Error>) -> Option<Self> {
    let mut errors: Vec<_> = errors.into_iter().collect();
    match errors.len() {
      0 => None,
      1 => errors.pop(),
      _ => Some(Self(Arc::new(Repr::Join(errors)))),
    }
  }
  /// Joins `self` with `other`.
  pub fn joined(self, other: impl Into<Error>) -> Self {
    Self(Arc::new(Repr::Join(vec![self, other.into()])))
  }

  /// Returns true if `target` is reachable from this error: the same handle, a member of a join, or an [`Error`]
  /// found in the `source` chain of a boxed error.
  pub fn is(&self, target: &Error) -> bool {
    if Arc::ptr_eq(&self.0, &target.0) {
      return true;
    }
    match &*self.0 {
      Repr::Boxed(error) => {
        let mut next: Option<&(dyn StdError + 'static)> = Some(&**error);
        while let Some(current) = next {
          if let Some(inner) = current.downcast_ref::<Error>() {
            return inner.is(target);
          }
          next = current.source();
        }
        false
      }
      Repr::Message(_) => false,
      Repr::Join(errors) => errors.iter().any(|e| e.is(target)),
    }
  }

  /// Returns the first error of type `E` reachable from this error, walking the same chain as [`Error::is`].
  pub fn find<E: StdError + 'static>(&self) -> Option<&E> {
    match &*self.0 {
      Repr::Boxed(error) => {
        let mut next: Option<&(dyn StdError + 'static)> = Some(&**error);
        while let Some(current) = next {
          if let Some(found) = current.downcast_ref::<E>() {
            return Some(found);
          }
          if let Some(inner) = current.downcast_ref::<Error>() {
            return inner.find();
          }
          next = current.source();
        }
        None
      }
      Repr::Message(_) => None,
      Repr::Join(errors) => errors.iter().find_map(|e| e.find()),
    }
  }
}

impl PartialEq for Error {
  #[inline]
  fn eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}
impl Eq for Error {}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &*self.0 {
      Repr::Boxed(error) => Display::fmt(error, f),
      Repr::Message(message) => f.write_str(message),
      Repr::Join(errors) => {
        for (i, error) in errors.iter().enumerate() {
          if i > 0 {
            f.write_str("\n")?;
          }
          Display::fmt(error, f)?;
        }
        Ok(())
      }
    }
  }
}
impl Debug for Error {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &*self.0 {
      Repr::Boxed(error) => Debug::fmt(error, f),
      Repr::Message(message) => f.debug_tuple("Error").field(message).finish(),
      Repr::Join(errors) => f.debug_tuple("Join").field(errors).finish(),
    }
  }
}

impl StdError for Error {
  fn source(&self) -> Option<&(dyn StdError + 'static)> {
    match &*self.0 {
      Repr::Boxed(error) => error.source(),
      _ => None,
    }
  }
}

impl From<&str> for Error {
  fn from(message: &str) -> Self { Self::msg(message) }
}
impl From<String> for Error {
  fn from(message: String) -> Self { Self(Arc::new(Repr::Message(message))) }
}
impl From<Box<dyn StdError + Send + Sync>> for Error {
  fn from(error: Box<dyn StdError + Send + Sync>) -> Self { Self(Arc::new(Repr::Boxed(error))) }
}
impl From<AccessError> for Error {
  fn from(error: AccessError) -> Self { Self::new(error) }
}


/// Contract violations raised as faults by the container accessors.
#[derive(Debug, Error)]
pub enum AccessError {
  #[error("called `Optional::get` on an absent value")]
  EmptyAccess,
  #[error("called `Outcome::get` on an error value: {0}")]
  ErrAccess(#[source] Error),
  #[error("called `Outcome::get_err` on an ok value")]
  OkAccess,
}


#[cfg(test)]
mod tests {
  use std::io;

  use super::*;

  #[derive(Debug, Error)]
  #[error("config unreadable")]
  struct ConfigError(#[source] Error);

  #[test]
  fn identity_not_message() {
    let a = Error::msg("boom");
    let b = Error::msg("boom");
    assert!(a.is(&a.clone()));
    assert!(!a.is(&b));
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
  }

  #[test]
  fn join_matches_every_member() {
    let a = Error::msg("a");
    let b = Error::msg("b");
    let joined = Error::join([a.clone(), b.clone()]).unwrap();
    assert!(joined.is(&a));
    assert!(joined.is(&b));
    assert!(!a.is(&joined));
    assert_eq!(joined.to_string(), "a\nb");
  }

  #[test]
  fn join_edge_cases() {
    assert!(Error::join(Vec::new()).is_none());
    let only = Error::msg("only");
    assert_eq!(Error::join([only.clone()]), Some(only));
  }

  #[test]
  fn nested_joins() {
    let parent = Error::msg("parent");
    let child = Error::msg("child");
    let wrapped = parent.clone().joined("context").joined(child.clone());
    assert!(wrapped.is(&parent));
    assert!(wrapped.is(&child));
    assert_eq!(wrapped.to_string(), "parent\ncontext\nchild");
  }

  #[test]
  fn is_walks_source_chain() {
    let root = Error::msg("disk gone");
    let wrapped = Error::new(ConfigError(root.clone()));
    assert!(wrapped.is(&root));
    assert!(!wrapped.is(&Error::msg("disk gone")));
    assert_eq!(wrapped.to_string(), "config unreadable");
  }

  #[test]
  fn find_typed_error() {
    let missing = Error::new(io::Error::new(io::ErrorKind::NotFound, "missing"));
    let wrapped = Error::msg("loading").joined(Error::new(AccessError::ErrAccess(missing)));
    assert!(matches!(wrapped.find::<AccessError>(), Some(AccessError::ErrAccess(_))));
    assert_eq!(wrapped.find::<io::Error>().map(|e| e.kind()), Some(io::ErrorKind::NotFound));
    assert!(Error::msg("plain").find::<io::Error>().is_none());
  }

  #[test]
  fn access_error_messages() {
    let cause = Error::msg("timeout");
    let error = Error::from(AccessError::ErrAccess(cause.clone()));
    assert_eq!(error.to_string(), "called `Outcome::get` on an error value: timeout");
    assert!(error.is(&cause));
    assert_eq!(Error::from(AccessError::EmptyAccess).to_string(), "called `Optional::get` on an absent value");
  }
}
