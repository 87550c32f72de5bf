pub mod error;
pub mod executor;
pub mod must;

pub mod optional;
pub mod outcome;
pub mod combinator;

pub mod app;

pub use error::{AccessError, Error};
pub use optional::{absent, present, Optional};
pub use outcome::{err, ok, Outcome};
