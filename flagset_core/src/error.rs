use thiserror::Error;

/// Error produced when a flag's value cannot accept a raw command line string.
#[derive(Debug, Error)]
pub enum ValueError {
    /// The raw text does not have the shape of the target type.
    #[error("parsing {input:?} as {kind}: invalid syntax")]
    InvalidSyntax {
        /// The type tag being parsed into (ex: `int8`).
        kind: &'static str,
        /// The offending raw text.
        input: String,
    },
    /// The raw text is well formed but does not fit in the target type.
    #[error("parsing {input:?} as {kind}: value out of range")]
    OutOfRange {
        /// The type tag being parsed into (ex: `int8`).
        kind: &'static str,
        /// The offending raw text.
        input: String,
    },
    /// Any other conversion failure.
    #[error("{0}")]
    Message(String),
    /// A failure raised by a user defined value.
    #[error(transparent)]
    Custom(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ValueError {
    pub(crate) fn syntax(kind: &'static str, input: impl Into<String>) -> Self {
        ValueError::InvalidSyntax {
            kind,
            input: input.into(),
        }
    }

    pub(crate) fn range(kind: &'static str, input: impl Into<String>) -> Self {
        ValueError::OutOfRange {
            kind,
            input: input.into(),
        }
    }
}

/// Error produced while parsing, setting, or reading flags of a [`FlagSet`](crate::FlagSet).
#[derive(Debug, Error)]
pub enum ParseError {
    /// A flag token that matches no registered flag.
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    /// Required flags that were never set, in registration order.
    #[error("required flag(s) {} not set", quote_all(.0))]
    MissingRequiredFlags(Vec<String>),
    /// A value that the flag could not convert.
    #[error("invalid argument {value:?} for {flag:?} flag: {source}")]
    InvalidArgument {
        /// The raw value text.
        value: String,
        /// The display name of the flag (ex: `-v, --verbose`).
        flag: String,
        /// The underlying conversion error.
        #[source]
        source: ValueError,
    },
    /// A negated flag given an explicit value (ex: `--no-x=y`).
    #[error("flag cannot have a value: {0}")]
    NegationWithValue(String),
    /// A flag that requires a value found none.
    #[error("flag needs an argument: {0}")]
    MissingValue(String),
    /// A token that looks like a flag but cannot be one (ex: `---x`).
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
    /// The builtin help flag was encountered; usage has been shown.
    #[error("help requested")]
    HelpRequested,
    /// A named flag that is not registered.
    #[error("no such flag -{0}")]
    NoSuchFlag(String),
    /// A typed read of a flag registered with another type.
    #[error("trying to get {expected} value of flag of type {actual}")]
    TypeMismatch {
        /// The type tag requested.
        expected: String,
        /// The type tag of the registered flag.
        actual: String,
    },
    /// A flag whose value does not support typed read back.
    #[error("flag {0:?} does not expose its value")]
    Unreadable(String),
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("{name:?}"))
        .collect::<Vec<String>>()
        .join(", ")
}

/// Error produced when a [`FlagSet`](crate::FlagSet) is misconfigured at registration time.
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);
