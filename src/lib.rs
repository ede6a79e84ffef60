//! `flagset` parses command line flags in the GNU style: long flags are written `--name`, short flags `-n`.
//! It is a strongly typed take on the classic flag set, with every registered flag backed by a shared [`Binding`].
//!
//! # Usage
//! Create a [`FlagSet`], register flags on it, and then [`FlagSet::parse`] the tokens.
//! Each typed registration (ex: [`FlagSet::string`], [`FlagSet::uint8`], [`FlagSet::count`]) returns a [`Binding`] which receives the value during parsing.
//! Non-flag tokens are collected as positional arguments, available via [`FlagSet::args`].
//!
//! ```no_run
#![doc = include_str!("../demos/demo_greeter.rs")]
//! ```
//!
//! ```console
//! $ greeter -h
//! Usage of greeter:
//!   -n, --name greet       who to greet (default "world")
//!   -s, --[no-]shout       greet loudly
//!   -t, --times uint8      how many times to greet (default 1)
//!
//! diagnostics flags:
//!   -v, --verbose count    report what was done
//!
//! $ greeter -s --times 2 bob
//! HELLO, BOB!
//! HELLO, BOB!
//!
//! $ greeter --times 300
//! Usage of greeter:
//! <truncated>
//!
//! invalid argument "300" for "-t, --times" flag: parsing "300" as uint8: value out of range
//! ```
//!
//! # Syntax
//! * `--flag` sets a bool flag to true, or a flag with a no-opt default to that default.
//! * `--flag=value` and `--flag value` set a non-bool flag.
//! * `--no-flag` sets a negatable bool flag to false.
//! * `-f`, `-fvalue`, `-f=value`, and `-f value` set the short form of a flag.
//! * `-abc` clusters short bool (or counter) flags, with the last one optionally taking a value.
//! * `--` terminates flag parsing; every following token is positional.
//!
//! # Flags
//! Registration options are passed as a slice of [`Opt`], applied in order:
//! * [`Opt::Shorthand`] and [`Opt::ShorthandOnly`] control the short form.
//! * [`Opt::Required`] makes parsing fail unless the flag is set.
//! * [`Opt::AddNegative`] accepts `--no-<name>` for bool flags.
//! * [`Opt::Deprecated`], [`Opt::Hidden`], and [`Opt::Group`] shape the usage output.
//!
//! Custom types plug in by implementing [`Value`](./prelude/trait.Value.html), then registering through [`FlagSet::var`].
//!
//! # Errors
//! What happens on a parse failure is decided by the [`ErrorHandling`] of the flag set.
//! With [`ErrorHandling::ContinueOnError`] the [`ParseError`] is returned to the caller, while [`ErrorHandling::ExitOnError`] prints usage followed by the error and exits.
//!
//! The process wide flag set is available through the [`command_line`] module.
pub use flagset_core::*;
