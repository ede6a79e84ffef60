//! Core of `flagset`: typed command line flags with GNU style long (`--name`) and short (`-n`) forms.
//! See [documentation root](https://docs.rs/flagset/latest/flagset/index.html) for full details.
#![deny(missing_docs)]
mod api;
pub mod command_line;
mod constant;
mod convert;
mod error;
mod matcher;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;

pub use api::*;
pub use convert::{BytesBase64, BytesHex, Complex, IpMask, IpNet, TimeLayout};
pub use error::{ConfigError, ParseError, ValueError};
pub use model::*;
pub use parser::{ConsoleInterface, UserInterface};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
