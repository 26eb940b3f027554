//! Traits which, typically, may be imported without concern: `use exarg::prelude::*`.

pub use crate::api::Validate;
pub use crate::collection::Gatherable;
