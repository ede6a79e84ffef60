mod binding;
pub(crate) mod collection;
mod core;
mod field;
mod flag;
mod typed;
mod value;

pub use self::core::FlagSet;
pub use binding::Binding;
pub use collection::{Collection, Mapping};
pub use field::{Callback, Counter, Scalar, Switch, TimeField};
pub use flag::Flag;
pub use value::{Primitive, SliceValue, Value};
