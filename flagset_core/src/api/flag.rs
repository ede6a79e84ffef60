use std::collections::BTreeMap;
use std::fmt;

use crate::api::Value;
use crate::error::ConfigError;
use crate::model::Opt;

/// A registered flag: its names, usage, value, and bookkeeping.
pub struct Flag {
    pub(crate) name: String,
    pub(crate) shorthand: Option<char>,
    pub(crate) shorthand_only: bool,
    pub(crate) usage: String,
    pub(crate) usage_type: Option<String>,
    pub(crate) value: Box<dyn Value>,
    pub(crate) default_text: String,
    pub(crate) no_opt_default: Option<String>,
    pub(crate) changed: bool,
    pub(crate) required: bool,
    pub(crate) hidden: bool,
    pub(crate) add_negative: bool,
    pub(crate) hide_negative_usage: bool,
    pub(crate) deprecated: Option<String>,
    pub(crate) shorthand_deprecated: Option<String>,
    pub(crate) group: String,
    pub(crate) annotations: BTreeMap<String, Vec<String>>,
    pub(crate) disable_print_default: bool,
    pub(crate) disable_unquote_usage: bool,
}

impl Flag {
    pub(crate) fn new(name: String, usage: &str, value: Box<dyn Value>) -> Self {
        let default_text = value.format();
        Self {
            name,
            shorthand: None,
            shorthand_only: false,
            usage: usage.to_string(),
            usage_type: None,
            value,
            default_text,
            no_opt_default: None,
            changed: false,
            required: false,
            hidden: false,
            add_negative: false,
            hide_negative_usage: false,
            deprecated: None,
            shorthand_deprecated: None,
            group: String::default(),
            annotations: BTreeMap::default(),
            disable_print_default: false,
            disable_unquote_usage: false,
        }
    }

    pub(crate) fn apply(&mut self, opts: &[Opt]) -> Result<(), ConfigError> {
        for opt in opts {
            match opt {
                Opt::Shorthand(shorthand) => {
                    if *shorthand == '-' || *shorthand == '=' {
                        return Err(ConfigError(format!(
                            "{shorthand:?} shorthand of flag {:?} is not allowed",
                            self.name
                        )));
                    }
                    self.shorthand = Some(*shorthand);
                }
                Opt::ShorthandOnly => self.shorthand_only = true,
                Opt::UsageType(usage_type) => {
                    self.usage_type = Some(usage_type.clone());
                    self.disable_unquote_usage = true;
                }
                Opt::DisableUnquoteUsage => self.disable_unquote_usage = true,
                Opt::DisablePrintDefault => self.disable_print_default = true,
                Opt::DefaultText(text) => self.default_text = text.clone(),
                Opt::NoOptDefault(value) => self.no_opt_default = Some(value.clone()),
                Opt::Deprecated(message) => {
                    if message.is_empty() {
                        return Err(ConfigError(format!(
                            "deprecated message for flag {:?} must be set",
                            self.name
                        )));
                    }
                    self.deprecated = Some(message.clone());
                    self.hidden = true;
                }
                Opt::Hidden => self.hidden = true,
                Opt::ShorthandDeprecated(message) => {
                    if message.is_empty() {
                        return Err(ConfigError(format!(
                            "shorthand deprecated message for flag {:?} must be set",
                            self.name
                        )));
                    }
                    self.shorthand_deprecated = Some(message.clone());
                }
                Opt::Group(group) => self.group = group.clone(),
                Opt::Annotation(key, values) => {
                    self.annotations.insert(key.clone(), values.clone());
                }
                Opt::Required => self.required = true,
                Opt::AddNegative => self.add_negative = true,
                Opt::HideNegativeUsage => self.hide_negative_usage = true,
                Opt::MapValueOptional => {
                    if !self.value.enable_optional_entries() {
                        return Err(ConfigError(format!(
                            "flag {:?} of type {} does not support optional map values",
                            self.name,
                            self.value.type_name()
                        )));
                    }
                }
            }
        }

        if self.shorthand_only && self.shorthand.is_none() {
            return Err(ConfigError(format!(
                "flag {:?} is shorthand only but has no shorthand",
                self.name
            )));
        }

        if self.add_negative && !self.value.is_bool_flag() {
            return Err(ConfigError(format!(
                "flag {:?} of type {} cannot be negated",
                self.name,
                self.value.type_name()
            )));
        }

        Ok(())
    }

    /// The long name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The single character alias, if any.
    pub fn shorthand(&self) -> Option<char> {
        self.shorthand
    }

    /// Whether only the shorthand form is matched.
    pub fn is_shorthand_only(&self) -> bool {
        self.shorthand_only
    }

    /// The usage text as registered.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Replace the usage text.
    pub fn set_usage(&mut self, usage: impl Into<String>) {
        self.usage = usage.into();
    }

    /// The placeholder override for usage.
    pub fn usage_type(&self) -> Option<&str> {
        self.usage_type.as_deref()
    }

    /// The value.
    pub fn value(&self) -> &dyn Value {
        self.value.as_ref()
    }

    /// The value, mutably (ex: for [`SliceValue`](crate::SliceValue) access).
    pub fn value_mut(&mut self) -> &mut dyn Value {
        self.value.as_mut()
    }

    /// The default as displayed in usage, captured at registration.
    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    /// The value used when the flag appears without one.
    pub fn no_opt_default(&self) -> Option<&str> {
        self.no_opt_default.as_deref()
    }

    /// Whether the flag has been set since registration.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Whether parsing fails unless the flag is set.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the flag is left out of usage.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Show or hide the flag in usage.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Whether `--no-<name>` is accepted.
    pub fn is_negatable(&self) -> bool {
        self.add_negative
    }

    /// The deprecation message, if deprecated.
    pub fn deprecated(&self) -> Option<&str> {
        self.deprecated.as_deref()
    }

    /// The shorthand deprecation message, if the shorthand is deprecated.
    pub fn shorthand_deprecated(&self) -> Option<&str> {
        self.shorthand_deprecated.as_deref()
    }

    /// The usage group; empty when ungrouped.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// All annotations.
    pub fn annotations(&self) -> &BTreeMap<String, Vec<String>> {
        &self.annotations
    }

    /// Whether usage omits the default.
    pub fn is_print_default_disabled(&self) -> bool {
        self.disable_print_default
    }

    /// Whether backticks in the usage are left as is.
    pub fn is_unquote_usage_disabled(&self) -> bool {
        self.disable_unquote_usage
    }

    /// Name as shown in error messages: `-c, --name`, `--name`, or `-c` for shorthand only flags.
    pub fn display_name(&self) -> String {
        match self.shorthand {
            Some(shorthand) if self.shorthand_only => format!("-{shorthand}"),
            Some(shorthand) if self.shorthand_deprecated.is_none() && !self.hidden => {
                format!("-{shorthand}, --{}", self.name)
            }
            _ => format!("--{}", self.name),
        }
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("shorthand", &self.shorthand)
            .field("type", &self.value.type_name())
            .field("value", &self.value.format())
            .field("default_text", &self.default_text)
            .field("changed", &self.changed)
            .finish()
    }
}
