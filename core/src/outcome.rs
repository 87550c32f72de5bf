use std::fmt::{self, Debug, Display, Formatter};

use crate::combinator;
use crate::error::{AccessError, Error};
use crate::executor::{raise, safe_call, safe_do};
use crate::optional::{short_type_name, Optional};

/// Either a value of type `T` or an error cause.
///
/// An error outcome always carries an [`Error`]; there is no causeless error state. Equality compares values for
/// [`Outcome::Ok`] and handle identity for [`Outcome::Err`].
///
/// The chain combinators [`try_with`](Outcome::try_with), [`catch`](Outcome::catch), [`finally`](Outcome::finally),
/// [`else_with`](Outcome::else_with), and [`else_map`](Outcome::else_map) run their callback through the executor with
/// no filter: any fault inside the callback becomes an [`Outcome::Err`] carrying the converted fault.
#[derive(Clone, PartialEq, Eq)]
pub enum Outcome<T> {
  Ok(T),
  Err(Error),
}

#[inline]
pub fn ok<T>(value: T) -> Outcome<T> { Outcome::Ok(value) }
#[inline]
pub fn err<T>(cause: impl Into<Error>) -> Outcome<T> { Outcome::Err(cause.into()) }

impl<T> Outcome<T> {
  #[inline]
  pub fn ok(value: T) -> Self { Self::Ok(value) }
  #[inline]
  pub fn err(cause: impl Into<Error>) -> Self { Self::Err(cause.into()) }

  /// Converts `optional` into an outcome, using `cause` for the absent case.
  pub fn from_optional(optional: Optional<T>, cause: impl Into<Error>) -> Self {
    match optional {
      Optional::Present(value) => Self::Ok(value),
      Optional::Absent => Self::Err(cause.into()),
    }
  }

  #[inline]
  pub fn is_ok(&self) -> bool { matches!(self, Self::Ok(_)) }
  #[inline]
  pub fn is_err(&self) -> bool { !self.is_ok() }

  pub fn has(&self, value: &T) -> bool where T: PartialEq {
    matches!(self, Self::Ok(v) if v == value)
  }
  pub fn has_matching(&self, predicate: impl FnOnce(&T) -> bool) -> bool {
    match self {
      Self::Ok(value) => predicate(value),
      Self::Err(_) => false,
    }
  }
  /// Returns true if this is an error whose cause chain contains `target`.
  pub fn has_error(&self, target: &Error) -> bool {
    matches!(self, Self::Err(cause) if cause.is(target))
  }
  pub fn has_error_matching(&self, predicate: impl FnOnce(&Error) -> bool) -> bool {
    match self {
      Self::Ok(_) => false,
      Self::Err(cause) => predicate(cause),
    }
  }

  #[inline]
  pub fn as_ref(&self) -> Outcome<&T> {
    match self {
      Self::Ok(value) => Outcome::Ok(value),
      Self::Err(cause) => Outcome::Err(cause.clone()),
    }
  }
  #[inline]
  pub fn into_result(self) -> Result<T, Error> {
    match self {
      Self::Ok(value) => Ok(value),
      Self::Err(cause) => Err(cause),
    }
  }
}

// Extraction

impl<T> Outcome<T> {
  /// Returns the value.
  ///
  /// # Panics
  ///
  /// Raises an [`AccessError::ErrAccess`] fault wrapping the cause if this is an error.
  #[track_caller]
  pub fn get(self) -> T {
    match self {
      Self::Ok(value) => value,
      Self::Err(cause) => raise(AccessError::ErrAccess(cause)),
    }
  }
  /// Returns the cause.
  ///
  /// # Panics
  ///
  /// Raises an [`AccessError::OkAccess`] fault if this is ok.
  #[track_caller]
  pub fn get_err(self) -> Error {
    match self {
      Self::Ok(_) => raise(AccessError::OkAccess),
      Self::Err(cause) => cause,
    }
  }
  #[inline]
  pub fn get_or(self, default: T) -> T {
    match self {
      Self::Ok(value) => value,
      Self::Err(_) => default,
    }
  }
  #[inline]
  pub fn get_or_zero_value(self) -> T where T: Default {
    self.get_or_else(|_| T::default())
  }
  #[inline]
  pub fn get_or_else(self, f: impl FnOnce(Error) -> T) -> T {
    match self {
      Self::Ok(value) => value,
      Self::Err(cause) => f(cause),
    }
  }
  /// Returns `(value, None)` if ok, otherwise the zero value of `T` paired with the cause.
  pub fn get_value_and_error(self) -> (T, Option<Error>) where T: Default {
    match self {
      Self::Ok(value) => (value, None),
      Self::Err(cause) => (T::default(), Some(cause)),
    }
  }

  pub fn to_optional_value(self) -> Optional<T> {
    match self {
      Self::Ok(value) => Optional::Present(value),
      Self::Err(_) => Optional::Absent,
    }
  }
  pub fn to_optional_error(self) -> Optional<Error> {
    match self {
      Self::Ok(_) => Optional::Absent,
      Self::Err(cause) => Optional::Present(cause),
    }
  }
}

// Fallback

impl<T> Outcome<T> {
  #[inline]
  pub fn or_else(self, other: Self) -> Self {
    match self {
      Self::Ok(_) => self,
      Self::Err(_) => other,
    }
  }
  #[inline]
  pub fn or_else_compute(self, f: impl FnOnce(Error) -> Self) -> Self {
    match self {
      Self::Ok(_) => self,
      Self::Err(cause) => f(cause),
    }
  }

  /// Replaces the cause with `f(cause)`. A fault inside `f` becomes the new cause.
  pub fn map_error(self, f: impl FnOnce(Error) -> Error) -> Self {
    match self {
      Self::Ok(_) => self,
      Self::Err(cause) => Self::Err(safe_call(|| f(cause), &[]).unwrap_or_else(|fault| fault)),
    }
  }
}

// Transformation

impl<T> Outcome<T> {
  #[inline]
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
    combinator::outcome::map(self, f)
  }
  #[inline]
  pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
    combinator::outcome::and_then(self, f)
  }
  #[inline]
  pub fn map_or<U>(self, f: impl FnOnce(T) -> U, default: U) -> U {
    combinator::outcome::map_or(self, f, default)
  }
  #[inline]
  pub fn map_or_else<U>(self, ok_fn: impl FnOnce(T) -> U, err_fn: impl FnOnce(Error) -> U) -> U {
    combinator::outcome::map_or_else(self, ok_fn, err_fn)
  }
  #[inline]
  pub fn and<U>(self, other: Outcome<U>) -> Outcome<U> {
    combinator::outcome::and(self, other)
  }
  #[inline]
  pub fn and_func<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
    combinator::outcome::and_func(self, f)
  }

  /// Calls `f` with the value if ok.
  pub fn inspect(self, f: impl FnOnce(&T)) -> Self {
    if let Self::Ok(value) = &self {
      f(value);
    }
    self
  }
  /// Calls `f` with the cause if this is an error.
  pub fn inspect_err(self, f: impl FnOnce(&Error)) -> Self {
    if let Self::Err(cause) = &self {
      f(cause);
    }
    self
  }
}

// Chain combinators

impl<T> Outcome<T> {
  pub fn try_with(self, f: impl FnOnce(&T)) -> Self {
    if let Self::Ok(value) = &self {
      if let Err(fault) = safe_do(|| f(value), &[]) {
        return Self::Err(fault);
      }
    }
    self
  }
  pub fn catch(self, f: impl FnOnce(&Error)) -> Self {
    if let Self::Err(cause) = &self {
      if let Err(fault) = safe_do(|| f(cause), &[]) {
        return Self::Err(fault);
      }
    }
    self
  }
  pub fn finally(self, f: impl FnOnce()) -> Self {
    match safe_do(f, &[]) {
      Ok(()) => self,
      Err(fault) => Self::Err(fault),
    }
  }
  /// Replaces an error with the outcome of `f(cause)`.
  pub fn else_with(self, f: impl FnOnce(Error) -> Self) -> Self {
    match self {
      Self::Ok(_) => self,
      Self::Err(cause) => safe_call(|| f(cause), &[]).unwrap_or_else(Self::Err),
    }
  }
  /// Replaces an error with the value `f(cause)`.
  pub fn else_map(self, f: impl FnOnce(Error) -> T) -> Self {
    match self {
      Self::Ok(_) => self,
      Self::Err(cause) => safe_call(|| f(cause), &[]).into(),
    }
  }
}


/// Renders `Ok[<type>](<value>)` or `Err[<type>](<cause>)`.
impl<T: Display> Display for Outcome<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let type_name = short_type_name::<T>();
    match self {
      Self::Ok(value) => write!(f, "Ok[{type_name}]({value})"),
      Self::Err(cause) => write!(f, "Err[{type_name}]({cause})"),
    }
  }
}
/// Same shape as [`Display`], with the value in its [`Debug`] form. The cause is rendered with its message.
impl<T: Debug> Debug for Outcome<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let type_name = short_type_name::<T>();
    match self {
      Self::Ok(value) => write!(f, "Ok[{type_name}]({value:?})"),
      Self::Err(cause) => write!(f, "Err[{type_name}]({cause})"),
    }
  }
}

impl<T, E: Into<Error>> From<Result<T, E>> for Outcome<T> {
  #[inline]
  fn from(result: Result<T, E>) -> Self {
    match result {
      Ok(value) => Self::Ok(value),
      Err(cause) => Self::Err(cause.into()),
    }
  }
}
impl<T> From<Outcome<T>> for Result<T, Error> {
  #[inline]
  fn from(outcome: Outcome<T>) -> Self { outcome.into_result() }
}
