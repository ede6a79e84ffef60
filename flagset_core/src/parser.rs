mod base;
mod interface;
mod middleware;
mod printer;

pub use interface::{ConsoleInterface, UserInterface};

#[cfg(test)]
pub(crate) use interface::util;
