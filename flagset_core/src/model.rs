/// What a [`FlagSet`](crate::FlagSet) does when parsing fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorHandling {
    /// Return the error to the caller, printing nothing.
    ContinueOnError,
    /// Print the error and usage, then exit with status 2 (0 when help was requested).
    ExitOnError,
    /// Panic with the error.
    PanicOnError,
}

impl std::fmt::Display for ErrorHandling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A registration option for a flag, applied in order (later options win).
///
/// ### Example
/// ```
/// # use flagset_core as flagset;
/// use flagset::{ErrorHandling, FlagSet, Opt};
///
/// let mut flags = FlagSet::new("program", ErrorHandling::ContinueOnError);
/// let verbose = flags.bool(
///     "verbose",
///     true,
///     "print progress",
///     &[Opt::Shorthand('v'), Opt::AddNegative],
/// );
/// flags.parse(&["--no-verbose"]).unwrap();
/// assert!(!verbose.get());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opt {
    /// Single character alias, used as `-c`.
    Shorthand(char),
    /// Only the shorthand form is matched, never `--name`.
    ShorthandOnly,
    /// Placeholder shown for the value in usage; also disables backtick unquoting.
    UsageType(String),
    /// Keep backticks in the usage text instead of lifting a placeholder out of them.
    DisableUnquoteUsage,
    /// Never show the default in usage.
    DisablePrintDefault,
    /// Text shown as the default in usage, instead of the registered value.
    DefaultText(String),
    /// Value used when the flag is given without one (ex: `--color` meaning `--color=auto`).
    NoOptDefault(String),
    /// Hide the flag and warn with this message when it is used.
    Deprecated(String),
    /// Hide the flag from usage.
    Hidden,
    /// Hide the shorthand and warn with this message when it is used.
    ShorthandDeprecated(String),
    /// Usage section for the flag.
    Group(String),
    /// Arbitrary metadata for the flag.
    Annotation(String, Vec<String>),
    /// Parsing fails unless the flag is set.
    Required,
    /// Accept `--no-<name>` to set a bool flag to false.
    AddNegative,
    /// Accept `--no-<name>` but do not advertise `[no-]` in usage.
    HideNegativeUsage,
    /// Accept bare keys in a string-to-string map, mapped to the empty string.
    MapValueOptional,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorHandling::ContinueOnError, "ContinueOnError")]
    #[case(ErrorHandling::ExitOnError, "ExitOnError")]
    #[case(ErrorHandling::PanicOnError, "PanicOnError")]
    fn error_handling_display(#[case] error_handling: ErrorHandling, #[case] expected: &str) {
        assert_eq!(error_handling.to_string(), expected);
    }
}
