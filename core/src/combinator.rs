//! Cross-type combinators over [`Optional`] and [`Outcome`], taking the source and result element types as independent
//! type parameters. The container methods of the same name delegate here.

/// Combinators over [`Optional`]. None of them invoke their function argument on [`Optional::Absent`].
pub mod optional {
  use crate::optional::Optional;

  pub fn map<T, U>(o: Optional<T>, f: impl FnOnce(T) -> U) -> Optional<U> {
    match o {
      Optional::Present(value) => Optional::Present(f(value)),
      Optional::Absent => Optional::Absent,
    }
  }

  pub fn and_then<T, U>(o: Optional<T>, f: impl FnOnce(T) -> Optional<U>) -> Optional<U> {
    match o {
      Optional::Present(value) => f(value),
      Optional::Absent => Optional::Absent,
    }
  }

  pub fn map_or<T, U>(o: Optional<T>, f: impl FnOnce(T) -> U, default: U) -> U {
    match o {
      Optional::Present(value) => f(value),
      Optional::Absent => default,
    }
  }

  pub fn map_or_else<T, U>(o: Optional<T>, present_fn: impl FnOnce(T) -> U, absent_fn: impl FnOnce() -> U) -> U {
    match o {
      Optional::Present(value) => present_fn(value),
      Optional::Absent => absent_fn(),
    }
  }

  /// Returns `b` if both are present, otherwise [`Optional::Absent`].
  pub fn and<T, U>(a: Optional<T>, b: Optional<U>) -> Optional<U> {
    match (a, b) {
      (Optional::Present(_), b @ Optional::Present(_)) => b,
      _ => Optional::Absent,
    }
  }
}

/// Combinators over [`Outcome`].
///
/// `map`, `and_then`, `map_or`, and `map_or_else` run their ok-callback through the executor with no filter, so a fault
/// inside it is handled like an error instead of unwinding through the caller. `and_func` is the unguarded `and_then`.
pub mod outcome {
  use crate::error::Error;
  use crate::executor::safe_call;
  use crate::outcome::Outcome;

  pub fn map<T, U>(r: Outcome<T>, f: impl FnOnce(T) -> U) -> Outcome<U> {
    match r {
      Outcome::Ok(value) => safe_call(|| f(value), &[]).into(),
      Outcome::Err(cause) => Outcome::Err(cause),
    }
  }

  pub fn and_then<T, U>(r: Outcome<T>, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
    match r {
      Outcome::Ok(value) => safe_call(|| f(value), &[]).unwrap_or_else(Outcome::Err),
      Outcome::Err(cause) => Outcome::Err(cause),
    }
  }

  /// Returns `f(value)` if ok, otherwise `default`. A fault inside `f` also yields `default`.
  pub fn map_or<T, U>(r: Outcome<T>, f: impl FnOnce(T) -> U, default: U) -> U {
    match r {
      Outcome::Ok(value) => safe_call(|| f(value), &[]).unwrap_or(default),
      Outcome::Err(_) => default,
    }
  }

  /// Returns `ok_fn(value)` if ok, otherwise `err_fn(cause)`. A fault inside `ok_fn` is passed to `err_fn`; faults
  /// inside `err_fn` are not captured.
  pub fn map_or_else<T, U>(r: Outcome<T>, ok_fn: impl FnOnce(T) -> U, err_fn: impl FnOnce(Error) -> U) -> U {
    match r {
      Outcome::Ok(value) => safe_call(|| ok_fn(value), &[]).unwrap_or_else(err_fn),
      Outcome::Err(cause) => err_fn(cause),
    }
  }

  /// Returns `b` if `a` is ok, otherwise `a`'s cause as an [`Outcome<U>`].
  pub fn and<T, U>(a: Outcome<T>, b: Outcome<U>) -> Outcome<U> {
    match a {
      Outcome::Ok(_) => b,
      Outcome::Err(cause) => Outcome::Err(cause),
    }
  }

  pub fn and_func<T, U>(r: Outcome<T>, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
    match r {
      Outcome::Ok(value) => f(value),
      Outcome::Err(cause) => Outcome::Err(cause),
    }
  }
}
