//! Traits which, typically, may be imported without concern: `use flagset::prelude::*`.

pub use crate::api::{Primitive, SliceValue, Value};
