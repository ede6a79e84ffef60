use std::any::Any;

use crate::error::ValueError;

/// The behaviour behind every flag: accept raw text, report the current value, and name the type.
///
/// Implement this for custom flag types and register them with [`FlagSet::var`](crate::FlagSet::var).
///
/// ### Example
/// ```
/// # use flagset_core as flagset;
/// use flagset::{ErrorHandling, FlagSet, Value, ValueError};
///
/// struct Words(Vec<String>);
///
/// impl Value for Words {
///     fn set(&mut self, raw: &str) -> Result<(), ValueError> {
///         self.0.extend(raw.split_whitespace().map(str::to_string));
///         Ok(())
///     }
///
///     fn format(&self) -> String {
///         self.0.join(" ")
///     }
///
///     fn type_name(&self) -> &str {
///         "words"
///     }
/// }
///
/// let mut flags = FlagSet::new("program", ErrorHandling::ContinueOnError);
/// flags.var(Words(vec![]), "words", "some words", &[]);
/// flags.parse(&["--words", "a b", "--words=c"]).unwrap();
/// assert_eq!(flags.lookup("words").unwrap().value().format(), "a b c");
/// ```
pub trait Value {
    /// Parse `raw` and store the result.
    fn set(&mut self, raw: &str) -> Result<(), ValueError>;

    /// Render the current value.
    fn format(&self) -> String;

    /// The type tag of this value (ex: `int`, `stringSlice`).
    fn type_name(&self) -> &str;

    /// Whether bare presence of the flag is enough (ex: `--verbose`).
    /// Bool flags may also be negated with `--no-<name>`.
    fn is_bool_flag(&self) -> bool {
        false
    }

    /// Whether the value may be omitted when the next token is not a value.
    fn is_optional(&self) -> bool {
        false
    }

    /// A copy of the current value for typed read back.
    fn get(&self) -> Option<Box<dyn Any>> {
        None
    }

    /// The multi value capability of container types.
    fn as_slice_value(&mut self) -> Option<&mut dyn SliceValue> {
        None
    }

    /// Switch a map value into accepting bare keys.
    /// Returns `false` when the value does not support it.
    fn enable_optional_entries(&mut self) -> bool {
        false
    }
}

/// Multi value access to slice typed flags.
///
/// Unlike [`Value::set`], neither entry point discards the default contents on first use.
pub trait SliceValue {
    /// Parse `raw` and add it to the end.
    fn append(&mut self, raw: &str) -> Result<(), ValueError>;

    /// Parse every item of `raws` and overwrite the contents wholesale.
    /// On error the contents are left untouched.
    fn replace(&mut self, raws: &[String]) -> Result<(), ValueError>;

    /// Each element rendered individually.
    fn get_slice(&self) -> Vec<String>;
}

/// A scalar type with a textual form, usable in scalar, slice, and map flags.
pub trait Primitive: Clone + 'static {
    /// Type tag of the scalar flag.
    const TYPE_NAME: &'static str;
    /// Type tag of the slice flag.
    const SLICE_NAME: &'static str;

    /// Convert raw command line text.
    fn parse(raw: &str) -> Result<Self, ValueError>;

    /// Render for display.
    fn format(&self) -> String;

    /// Convert the value part of a `key=value` map entry.
    fn parse_entry(raw: &str) -> Result<Self, ValueError> {
        Self::parse(raw)
    }

    /// Render inside a `[k=v]` map listing.
    fn format_entry(&self) -> String {
        self.format()
    }
}

impl Primitive for String {
    const TYPE_NAME: &'static str = "string";
    const SLICE_NAME: &'static str = "stringSlice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        Ok(raw.to_string())
    }

    fn format(&self) -> String {
        self.clone()
    }

    fn format_entry(&self) -> String {
        format!("{self:?}")
    }
}

impl Primitive for bool {
    const TYPE_NAME: &'static str = "bool";
    const SLICE_NAME: &'static str = "boolSlice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        match raw.trim() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ValueError::syntax(Self::TYPE_NAME, raw)),
        }
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", true)]
    #[case("t", true)]
    #[case("T", true)]
    #[case("TRUE", true)]
    #[case(" true ", true)]
    #[case("True", true)]
    #[case("0", false)]
    #[case("F", false)]
    #[case("false", false)]
    #[case("False", false)]
    fn bool_parse(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(bool::parse(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("yes")]
    #[case("tRUE")]
    #[case("invalid")]
    fn bool_parse_invalid(#[case] raw: &str) {
        assert_matches!(
            bool::parse(raw),
            Err(ValueError::InvalidSyntax { kind: "bool", .. })
        );
    }

    #[test]
    fn string_is_verbatim() {
        assert_eq!(String::parse("  spaced ").unwrap(), "  spaced ");
        assert_eq!(String::parse("").unwrap(), "");
        assert_eq!("a b".to_string().format_entry(), "\"a b\"");
    }
}
