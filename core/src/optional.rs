use std::any;
use std::fmt::{self, Debug, Display, Formatter};
use std::slice;

use crate::combinator;
use crate::error::{AccessError, Error};
use crate::executor::{raise, safe_call, safe_do};
use crate::must::expected_fault;
use crate::outcome::Outcome;

/// Zero or one value of type `T`.
///
/// Every combinator consumes the receiver and returns a new instance. The chain combinators ([`try_with`],
/// [`catch`], [`finally`], [`else_with`], [`else_value`]) run their callback through the executor, capturing only
/// faults tagged as [expected](crate::must::expected_fault); a captured fault degrades the chain to
/// [`Optional::Absent`].
///
/// [`try_with`]: Optional::try_with
/// [`catch`]: Optional::catch
/// [`finally`]: Optional::finally
/// [`else_with`]: Optional::else_with
/// [`else_value`]: Optional::else_value
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Optional<T> {
  Present(T),
  Absent,
}

#[inline]
pub fn present<T>(value: T) -> Optional<T> { Optional::Present(value) }
#[inline]
pub fn absent<T>() -> Optional<T> { Optional::Absent }

impl<T> Default for Optional<T> {
  #[inline]
  fn default() -> Self { Self::Absent }
}

impl<T> Optional<T> {
  #[inline]
  pub fn present(value: T) -> Self { Self::Present(value) }
  #[inline]
  pub fn absent() -> Self { Self::Absent }

  /// Runs `f`, returning its value as present, or absent if `f` raised an expected fault. Any other fault propagates.
  pub fn from_fn(f: impl FnOnce() -> T) -> Self {
    safe_call(f, expected()).map_or(Self::Absent, Self::Present)
  }

  #[inline]
  pub fn is_present(&self) -> bool { matches!(self, Self::Present(_)) }
  #[inline]
  pub fn is_absent(&self) -> bool { !self.is_present() }

  /// Returns true if present and the value equals `value`.
  pub fn has(&self, value: &T) -> bool where T: PartialEq {
    matches!(self, Self::Present(v) if v == value)
  }
  pub fn has_matching(&self, predicate: impl FnOnce(&T) -> bool) -> bool {
    match self {
      Self::Present(value) => predicate(value),
      Self::Absent => false,
    }
  }

  #[inline]
  pub fn as_ref(&self) -> Optional<&T> {
    match self {
      Self::Present(value) => Optional::Present(value),
      Self::Absent => Optional::Absent,
    }
  }
  #[inline]
  pub fn into_option(self) -> Option<T> {
    match self {
      Self::Present(value) => Some(value),
      Self::Absent => None,
    }
  }
}

// Extraction

impl<T> Optional<T> {
  /// Returns the value.
  ///
  /// # Panics
  ///
  /// Raises an [`AccessError::EmptyAccess`] fault if absent.
  #[track_caller]
  pub fn get(self) -> T {
    match self {
      Self::Present(value) => value,
      Self::Absent => raise(AccessError::EmptyAccess),
    }
  }
  #[inline]
  pub fn get_or(self, default: T) -> T {
    match self {
      Self::Present(value) => value,
      Self::Absent => default,
    }
  }
  #[inline]
  pub fn get_or_else(self, f: impl FnOnce() -> T) -> T {
    match self {
      Self::Present(value) => value,
      Self::Absent => f(),
    }
  }
  #[inline]
  pub fn get_or_zero_value(self) -> T where T: Default {
    self.get_or_else(T::default)
  }

  /// Returns `Ok(())` if present, otherwise `Err(cause)`.
  pub fn to_error(&self, cause: impl Into<Error>) -> Result<(), Error> {
    match self {
      Self::Present(_) => Ok(()),
      Self::Absent => Err(cause.into()),
    }
  }
  /// Returns `(value, None)` if present, otherwise the zero value of `T` paired with `cause`.
  pub fn to_value_and_error(self, cause: impl Into<Error>) -> (T, Option<Error>) where T: Default {
    match self {
      Self::Present(value) => (value, None),
      Self::Absent => (T::default(), Some(cause.into())),
    }
  }
  /// Converts into an [`Outcome`], using `cause` for the absent case.
  pub fn to_result(self, cause: impl Into<Error>) -> Outcome<T> {
    Outcome::from_optional(self, cause)
  }
}

// Selection

impl<T> Optional<T> {
  /// Returns `self` if present and `predicate` holds for the value, otherwise absent.
  pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
    match self {
      Self::Present(value) => if predicate(&value) { Self::Present(value) } else { Self::Absent },
      Self::Absent => Self::Absent,
    }
  }

  #[inline]
  pub fn or_else(self, other: Self) -> Self {
    match self {
      Self::Present(_) => self,
      Self::Absent => other,
    }
  }
  #[inline]
  pub fn or_else_compute(self, f: impl FnOnce() -> Self) -> Self {
    match self {
      Self::Present(_) => self,
      Self::Absent => f(),
    }
  }

  /// Returns whichever of `self` and `other` is present when exactly one is, otherwise absent.
  pub fn exclusive_or(self, other: Self) -> Self {
    match (self, other) {
      (one @ Self::Present(_), Self::Absent) | (Self::Absent, one @ Self::Present(_)) => one,
      _ => Self::Absent,
    }
  }
}

// Transformation

impl<T> Optional<T> {
  #[inline]
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Optional<U> {
    combinator::optional::map(self, f)
  }
  #[inline]
  pub fn and_then<U>(self, f: impl FnOnce(T) -> Optional<U>) -> Optional<U> {
    combinator::optional::and_then(self, f)
  }
  #[inline]
  pub fn map_or<U>(self, f: impl FnOnce(T) -> U, default: U) -> U {
    combinator::optional::map_or(self, f, default)
  }
  #[inline]
  pub fn map_or_else<U>(self, present_fn: impl FnOnce(T) -> U, absent_fn: impl FnOnce() -> U) -> U {
    combinator::optional::map_or_else(self, present_fn, absent_fn)
  }
  #[inline]
  pub fn and<U>(self, other: Optional<U>) -> Optional<U> {
    combinator::optional::and(self, other)
  }

  /// Calls `f` with the value if present.
  pub fn inspect(self, f: impl FnOnce(&T)) -> Self {
    if let Self::Present(value) = &self {
      f(value);
    }
    self
  }
  /// Calls `f` if absent.
  pub fn else_do(self, f: impl FnOnce()) -> Self {
    if self.is_absent() {
      f();
    }
    self
  }
}

// Chain combinators

impl<T> Optional<T> {
  pub fn try_with(self, f: impl FnOnce(&T)) -> Self {
    if let Self::Present(value) = &self {
      if safe_do(|| f(value), expected()).is_err() {
        return Self::Absent;
      }
    }
    self
  }
  pub fn catch(self, f: impl FnOnce()) -> Self {
    if self.is_present() {
      return self;
    }
    match safe_do(f, expected()) {
      Ok(()) => Self::Absent,
      Err(_) => Self::Absent,
    }
  }
  pub fn finally(self, f: impl FnOnce()) -> Self {
    match safe_do(f, expected()) {
      Ok(()) => self,
      Err(_) => Self::Absent,
    }
  }
  pub fn else_with(self, f: impl FnOnce() -> Self) -> Self {
    match self {
      Self::Present(_) => self,
      Self::Absent => safe_call(f, expected()).unwrap_or(Self::Absent),
    }
  }
  pub fn else_value(self, f: impl FnOnce() -> T) -> Self {
    match self {
      Self::Present(_) => self,
      Self::Absent => Self::from_fn(f),
    }
  }
}

fn expected() -> &'static [Error] {
  slice::from_ref(expected_fault())
}

/// [`any::type_name`] with module paths removed: `Vec<String>` instead of `alloc::vec::Vec<alloc::string::String>`.
pub(crate) fn short_type_name<T: ?Sized>() -> String {
  let full = any::type_name::<T>();
  let mut short = String::with_capacity(full.len());
  let mut segment_start = 0;
  let mut chars = full.chars().peekable();
  while let Some(c) = chars.next() {
    if c == ':' && chars.peek() == Some(&':') {
      chars.next();
      short.truncate(segment_start);
    } else {
      short.push(c);
      if !(c.is_alphanumeric() || c == '_') {
        segment_start = short.len();
      }
    }
  }
  short
}


/// Renders `Some[<type>](<value>)` or `None[<type>]()`.
impl<T: Display> Display for Optional<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let type_name = short_type_name::<T>();
    match self {
      Self::Present(value) => write!(f, "Some[{type_name}]({value})"),
      Self::Absent => write!(f, "None[{type_name}]()"),
    }
  }
}
/// Same shape as [`Display`], with the value in its [`Debug`] form.
impl<T: Debug> Debug for Optional<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let type_name = short_type_name::<T>();
    match self {
      Self::Present(value) => write!(f, "Some[{type_name}]({value:?})"),
      Self::Absent => write!(f, "None[{type_name}]()"),
    }
  }
}

impl<T> From<Option<T>> for Optional<T> {
  #[inline]
  fn from(option: Option<T>) -> Self {
    match option {
      Some(value) => Self::Present(value),
      None => Self::Absent,
    }
  }
}
impl<T> From<Optional<T>> for Option<T> {
  #[inline]
  fn from(optional: Optional<T>) -> Self { optional.into_option() }
}
impl<T, E> From<Result<T, E>> for Optional<T> {
  #[inline]
  fn from(result: Result<T, E>) -> Self { result.ok().into() }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Optional<T> {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serde::Serialize::serialize(&self.as_ref().into_option(), serializer)
  }
}
#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Optional<T> {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Self::from)
  }
}


#[cfg(test)]
mod tests {
  use std::cell::Cell;
  use std::panic::{self, AssertUnwindSafe};

  use crate::executor::payload_to_error;
  use crate::must::must_get;

  use super::*;

  fn fault_of(f: impl FnOnce()) -> Error {
    payload_to_error(panic::catch_unwind(AssertUnwindSafe(f)).unwrap_err())
  }

  #[test]
  fn get() {
    assert_eq!(present(7).get(), 7);
    let fault = fault_of(|| { absent::<i32>().get(); });
    assert!(matches!(fault.find::<AccessError>(), Some(AccessError::EmptyAccess)));
  }

  #[test]
  fn total_getters() {
    assert_eq!(present(1).get_or(9), 1);
    assert_eq!(absent().get_or(9), 9);
    assert_eq!(absent().get_or_else(|| 5), 5);
    assert_eq!(present(String::from("v")).get_or_zero_value(), "v");
    assert_eq!(absent::<String>().get_or_zero_value(), "");
  }

  #[test]
  fn queries() {
    let o = present(3);
    assert!(o.is_present());
    assert!(!o.is_absent());
    assert!(o.has(&3));
    assert!(!o.has(&4));
    assert!(o.has_matching(|v| *v > 2));
    assert!(!absent::<i32>().has(&3));
    assert!(!absent::<i32>().has_matching(|_| true));
  }

  #[test]
  fn filter() {
    assert_eq!(present(4).filter(|v| v % 2 == 0), present(4));
    assert_eq!(present(3).filter(|v| v % 2 == 0), absent());
    let calls = Cell::new(0);
    assert_eq!(absent::<i32>().filter(|_| { calls.set(1); true }), absent());
    assert_eq!(calls.get(), 0);
  }

  #[test]
  fn fallbacks_short_circuit() {
    assert_eq!(present(1).or_else(present(2)), present(1));
    assert_eq!(absent().or_else(present(2)), present(2));
    let calls = Cell::new(0);
    let first = present(1).or_else_compute(|| { calls.set(1); present(2) });
    assert_eq!(first, present(1));
    assert_eq!(calls.get(), 0);
    assert_eq!(absent().or_else_compute(|| present(2)), present(2));
  }

  #[test]
  fn exclusive_or_truth_table() {
    assert_eq!(present(1).exclusive_or(absent()), present(1));
    assert_eq!(absent().exclusive_or(present(2)), present(2));
    assert_eq!(present(1).exclusive_or(present(2)), absent());
    assert_eq!(absent::<i32>().exclusive_or(absent()), absent());
  }

  #[test]
  fn error_conversions() {
    let cause = Error::msg("missing key");
    assert_eq!(present(1).to_error(cause.clone()), Ok(()));
    assert_eq!(absent::<i32>().to_error(cause.clone()), Err(cause.clone()));
    assert_eq!(present(1).to_value_and_error(cause.clone()), (1, None));
    assert_eq!(absent::<i32>().to_value_and_error(cause.clone()), (0, Some(cause.clone())));
    assert_eq!(present(1).to_result(cause.clone()), Outcome::Ok(1));
    assert_eq!(absent::<i32>().to_result(cause.clone()), Outcome::Err(cause));
  }

  #[test]
  fn taps() {
    let seen = Cell::new(0);
    let o = present(5).inspect(|v| seen.set(*v)).else_do(|| seen.set(-1));
    assert_eq!(o, present(5));
    assert_eq!(seen.get(), 5);
    absent::<i32>().inspect(|v| seen.set(*v)).else_do(|| seen.set(-1));
    assert_eq!(seen.get(), -1);
  }

  #[test]
  fn try_with_degrades_on_expected_fault() {
    let kept = present(1).try_with(|_| {});
    assert_eq!(kept, present(1));
    let degraded = present(1).try_with(|_| { must_get::<(), _>(Err("unreachable state")); });
    assert_eq!(degraded, absent());
  }

  #[test]
  fn try_with_propagates_other_faults() {
    let payload = panic::catch_unwind(|| present(1).try_with(|_| panic!("bug"))).unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("bug"));
  }

  #[test]
  fn catch_and_finally() {
    let ran = Cell::new(false);
    assert_eq!(present(1).catch(|| ran.set(true)), present(1));
    assert!(!ran.get());
    assert_eq!(absent::<i32>().catch(|| ran.set(true)), absent());
    assert!(ran.get());

    assert_eq!(present(1).finally(|| {}), present(1));
    assert_eq!(present(1).finally(|| { must_get::<(), _>(Err("closing failed")); }), absent());
  }

  #[test]
  fn else_with_and_else_value() {
    assert_eq!(present(1).else_with(|| present(2)), present(1));
    assert_eq!(absent().else_with(|| present(2)), present(2));
    assert_eq!(absent::<i32>().else_with(|| must_get(Err("no fallback"))), absent());
    assert_eq!(absent().else_value(|| 3), present(3));
    assert_eq!(absent::<i32>().else_value(|| must_get(Err("no fallback"))), absent());
  }

  #[test]
  fn from_fn() {
    assert_eq!(Optional::from_fn(|| 1), present(1));
    assert_eq!(Optional::<i32>::from_fn(|| must_get(Err("nope"))), absent());
  }

  #[test]
  fn conversions() {
    assert_eq!(Optional::from(Some(1)), present(1));
    assert_eq!(Optional::<i32>::from(None), absent());
    assert_eq!(Option::<i32>::from(present(1)), Some(1));
    assert_eq!(Optional::from("12".parse::<i32>()), present(12));
    assert_eq!(Optional::from("x".parse::<i32>()), absent());
  }

  #[test]
  fn display() {
    assert_eq!(present(5).to_string(), "Some[i32](5)");
    assert_eq!(absent::<u8>().to_string(), "None[u8]()");
    assert_eq!(present(String::from("x")).to_string(), "Some[String](x)");
    assert_eq!(present("x").to_string(), "Some[&str](x)");
  }

  #[test]
  fn debug_renders_non_display_values() {
    assert_eq!(format!("{:?}", present(vec![1u8])), "Some[Vec<u8>]([1])");
    assert_eq!(format!("{:?}", absent::<Vec<u8>>()), "None[Vec<u8>]()");
    assert_eq!(format!("{:?}", present((1, "a"))), "Some[(i32, &str)]((1, \"a\"))");
    assert_eq!(format!("{:?}", present(Some(String::from("s")))), "Some[Option<String>](Some(\"s\"))");
  }

  #[test]
  fn short_type_names() {
    assert_eq!(short_type_name::<i32>(), "i32");
    assert_eq!(short_type_name::<String>(), "String");
    assert_eq!(short_type_name::<Vec<String>>(), "Vec<String>");
    assert_eq!(short_type_name::<Option<&str>>(), "Option<&str>");
    assert_eq!(short_type_name::<Optional<Error>>(), "Optional<Error>");
  }

  #[test]
  fn fallbacks_propagate_unexpected_faults() {
    let payload = panic::catch_unwind(|| absent::<i32>().catch(|| panic!("catch bug"))).unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("catch bug"));
    let payload = panic::catch_unwind(|| absent::<i32>().else_with(|| panic!("else bug"))).unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("else bug"));
    let payload = panic::catch_unwind(|| absent::<i32>().else_value(|| panic!("value bug"))).unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("value bug"));
  }

  #[cfg(feature = "serde")]
  #[test]
  fn serde_like_option() {
    assert_eq!(serde_json::to_string(&present(3)).unwrap(), "3");
    assert_eq!(serde_json::to_string(&absent::<i32>()).unwrap(), "null");
    assert_eq!(serde_json::from_str::<Optional<i32>>("3").unwrap(), present(3));
    assert_eq!(serde_json::from_str::<Optional<i32>>("null").unwrap(), absent());
  }
}
