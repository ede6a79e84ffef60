//! The ambient flag set for the running program, named after `argv[0]`.
//!
//! ### Example
//! ```no_run
//! # use flagset_core as flagset;
//! use flagset::command_line;
//!
//! let verbose = command_line::with(|flags| flags.bool("verbose", false, "print more", &[]));
//! command_line::parse();
//!
//! if verbose.get() {
//!     println!("arguments: {:?}", command_line::args());
//! }
//! ```
use std::cell::RefCell;
use std::env;

use crate::api::FlagSet;
use crate::error::ParseError;
use crate::model::ErrorHandling;

thread_local! {
    static COMMAND_LINE: RefCell<FlagSet> = RefCell::new(FlagSet::new(program(), ErrorHandling::ExitOnError));
}

fn program() -> String {
    env::args().next().unwrap_or_default()
}

/// Run `action` against the ambient flag set.
///
/// Panics if called re-entrantly from within `action`.
pub fn with<R>(action: impl FnOnce(&mut FlagSet) -> R) -> R {
    COMMAND_LINE.with(|command_line| action(&mut command_line.borrow_mut()))
}

/// Parse the process arguments into the ambient flag set.
pub fn parse() -> Result<(), ParseError> {
    with(FlagSet::parse_env)
}

/// The positional arguments left after [`parse`].
pub fn args() -> Vec<String> {
    with(|flags| flags.args().to_vec())
}

/// Whether [`parse`] has succeeded.
pub fn parsed() -> bool {
    with(|flags| flags.parsed())
}
