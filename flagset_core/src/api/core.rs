use std::any::Any;
use std::collections::HashMap;
use std::env;
use std::rc::Rc;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{Flag, Value};
use crate::error::{ConfigError, ParseError, ValueError};
use crate::model::{ErrorHandling, Opt};
use crate::parser::{ConsoleInterface, UserInterface};

pub(crate) type Usage = Rc<dyn Fn(&FlagSet)>;
pub(crate) type UsageFormatter = Rc<dyn Fn(&Flag) -> (String, String)>;
pub(crate) type Normalize = Rc<dyn Fn(&str) -> String>;

/// A named set of flags, together with the state of its most recent parse.
///
/// ### Example
/// ```
/// # use flagset_core as flagset;
/// use flagset::{ErrorHandling, FlagSet, Opt};
///
/// let mut flags = FlagSet::new("program", ErrorHandling::ContinueOnError);
/// let verbose = flags.bool("verbose", false, "print more", &[Opt::Shorthand('v')]);
/// let name = flags.string("name", "world", "who to greet", &[]);
///
/// flags.parse(&["-v", "--name", "flags", "extra"]).unwrap();
/// assert!(verbose.get());
/// assert_eq!(name.get(), "flags");
/// assert_eq!(flags.args(), &["extra"]);
/// ```
pub struct FlagSet {
    pub(crate) name: String,
    pub(crate) error_handling: ErrorHandling,
    pub(crate) flags: Vec<Flag>,
    pub(crate) formal: HashMap<String, usize>,
    pub(crate) shorthands: HashMap<char, usize>,
    pub(crate) normalize: Option<Normalize>,
    pub(crate) args: Vec<String>,
    pub(crate) args_len_at_dash: Option<usize>,
    pub(crate) parsed: bool,
    pub(crate) interspersed: bool,
    pub(crate) sort_flags: bool,
    pub(crate) allow_unknown_flags: bool,
    pub(crate) ignore_required_flags_errors: bool,
    pub(crate) disable_builtin_help: bool,
    pub(crate) unknown_flags: Vec<String>,
    pub(crate) usage: Option<Usage>,
    pub(crate) usage_formatter: Option<UsageFormatter>,
    pub(crate) user_interface: Box<dyn UserInterface>,
    pub(crate) exit: Rc<dyn Fn(i32)>,
}

impl FlagSet {
    /// Create an empty flag set.
    ///
    /// ### Example
    /// ```
    /// # use flagset_core as flagset;
    /// use flagset::{ErrorHandling, FlagSet};
    ///
    /// let mut flags = FlagSet::new("program", ErrorHandling::ContinueOnError);
    /// flags.parse(empty::slice()).unwrap();
    /// assert!(flags.parsed());
    /// ```
    pub fn new(name: impl Into<String>, error_handling: ErrorHandling) -> Self {
        Self {
            name: name.into(),
            error_handling,
            flags: Vec::default(),
            formal: HashMap::default(),
            shorthands: HashMap::default(),
            normalize: None,
            args: Vec::default(),
            args_len_at_dash: None,
            parsed: false,
            interspersed: true,
            sort_flags: true,
            allow_unknown_flags: false,
            ignore_required_flags_errors: false,
            disable_builtin_help: false,
            unknown_flags: Vec::default(),
            usage: None,
            usage_formatter: None,
            user_interface: Box::<ConsoleInterface>::default(),
            exit: Rc::new(|code| std::process::exit(code)),
        }
    }

    /// The name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The error handling mode given at construction.
    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// Allow flags after the first positional argument (default `true`).
    /// When disabled, every token from the first positional argument onwards is positional.
    pub fn set_interspersed(&mut self, interspersed: bool) {
        self.interspersed = interspersed;
    }

    /// Visit and display flags sorted by name (default `true`), otherwise in registration order.
    pub fn set_sort_flags(&mut self, sort_flags: bool) {
        self.sort_flags = sort_flags;
    }

    /// Record unknown flags in [`FlagSet::unknown_flags`] instead of failing.
    pub fn set_allow_unknown_flags(&mut self, allow: bool) {
        self.allow_unknown_flags = allow;
    }

    /// Skip the check for unset required flags.
    pub fn set_ignore_required_flags_errors(&mut self, ignore: bool) {
        self.ignore_required_flags_errors = ignore;
    }

    /// Treat `--help` and `-h` as ordinary (unknown unless registered) flags.
    pub fn set_disable_builtin_help(&mut self, disable: bool) {
        self.disable_builtin_help = disable;
    }

    /// Replace where usage, warnings, and errors are written.
    pub fn set_interface(&mut self, user_interface: impl UserInterface + 'static) {
        self.user_interface = Box::new(user_interface);
    }

    /// Where usage, warnings, and errors are written.
    pub fn interface(&self) -> &dyn UserInterface {
        self.user_interface.as_ref()
    }

    /// Replace how [`ErrorHandling::ExitOnError`] terminates (default [`std::process::exit`]).
    /// If the handler returns, the error is returned from the parse.
    pub fn set_exit_handler(&mut self, exit: impl Fn(i32) + 'static) {
        self.exit = Rc::new(exit);
    }

    /// Replace the usage shown for help and [`ErrorHandling::ExitOnError`] failures.
    pub fn set_usage(&mut self, usage: impl Fn(&FlagSet) + 'static) {
        self.usage = Some(Rc::new(usage));
    }

    /// Replace how each flag line of the usage is laid out: the closure returns the left column
    /// and the usage text.
    pub fn set_usage_formatter(&mut self, formatter: impl Fn(&Flag) -> (String, String) + 'static) {
        self.usage_formatter = Some(Rc::new(formatter));
    }

    /// Transform every flag name, at registration and lookup.
    /// Existing flags are renamed; if two collide, the one registered first is kept.
    ///
    /// ### Example
    /// ```
    /// # use flagset_core as flagset;
    /// use flagset::{ErrorHandling, FlagSet};
    ///
    /// let mut flags = FlagSet::new("program", ErrorHandling::ContinueOnError);
    /// flags.set_normalize_func(|name| name.replace('_', "-"));
    /// let dry_run = flags.bool("dry_run", false, "do nothing", &[]);
    /// flags.parse(&["--dry-run"]).unwrap();
    /// assert!(dry_run.get());
    /// assert!(flags.lookup("dry_run").is_some());
    /// ```
    pub fn set_normalize_func(&mut self, normalize: impl Fn(&str) -> String + 'static) {
        let normalize: Normalize = Rc::new(normalize);
        let flags = std::mem::take(&mut self.flags);
        self.normalize = Some(normalize.clone());
        self.formal.clear();
        self.shorthands.clear();

        for mut flag in flags {
            let name = normalize(&flag.name);

            if self.formal.contains_key(&name) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Dropping flag '{}', it normalizes onto '{name}'.", flag.name);
                }

                continue;
            }

            flag.name = name;
            self.index(flag);
        }
    }

    pub(crate) fn normalize_name(&self, name: &str) -> String {
        match &self.normalize {
            Some(normalize) => normalize(name),
            None => name.to_string(),
        }
    }

    /// Register a flag with a custom value, panicking on a [`ConfigError`].
    pub fn var(&mut self, value: impl Value + 'static, name: &str, usage: &str, opts: &[Opt]) {
        if let Err(error) = self.try_var(value, name, usage, opts) {
            panic!("{error}");
        }
    }

    /// Register a flag with a custom value.
    ///
    /// Fails when the name or shorthand is already taken, or the options are inconsistent.
    pub fn try_var(
        &mut self,
        value: impl Value + 'static,
        name: &str,
        usage: &str,
        opts: &[Opt],
    ) -> Result<(), ConfigError> {
        let mut flag = Flag::new(self.normalize_name(name), usage, Box::new(value));
        flag.apply(opts)?;
        self.insert(flag)
    }

    fn insert(&mut self, flag: Flag) -> Result<(), ConfigError> {
        if self.formal.contains_key(&flag.name) {
            return Err(ConfigError(format!(
                "{} flag redefined: {}",
                self.name, flag.name
            )));
        }

        if let Some(shorthand) = flag.shorthand {
            if let Some(&existing) = self.shorthands.get(&shorthand) {
                return Err(ConfigError(format!(
                    "unable to redefine {shorthand:?} shorthand in {:?} flagset: it's already used for {:?} flag",
                    self.name, self.flags[existing].name
                )));
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Registering flag '{}' ({}).", flag.name, flag.value.type_name());
        }

        self.index(flag);
        Ok(())
    }

    fn index(&mut self, flag: Flag) {
        let offset = self.flags.len();
        self.formal.insert(flag.name.clone(), offset);

        if let Some(shorthand) = flag.shorthand {
            self.shorthands.insert(shorthand, offset);
        }

        self.flags.push(flag);
    }

    /// Move the flags of `other` into this set, skipping names already present.
    pub fn add_flag_set(&mut self, other: FlagSet) -> Result<(), ConfigError> {
        for mut flag in other.flags {
            flag.name = self.normalize_name(&flag.name);

            if !self.formal.contains_key(&flag.name) {
                self.insert(flag)?;
            }
        }

        Ok(())
    }

    /// The flag called `name`, after normalization.
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.formal
            .get(&self.normalize_name(name))
            .map(|&offset| &self.flags[offset])
    }

    /// The flag called `name`, after normalization, mutably.
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Flag> {
        let offset = *self.formal.get(&self.normalize_name(name))?;
        Some(&mut self.flags[offset])
    }

    /// The flag with the given shorthand.
    pub fn shorthand_lookup(&self, shorthand: char) -> Option<&Flag> {
        self.shorthands
            .get(&shorthand)
            .map(|&offset| &self.flags[offset])
    }

    /// Set the flag called `name` as if it appeared on the command line.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        let offset = *self
            .formal
            .get(&self.normalize_name(name))
            .ok_or_else(|| ParseError::NoSuchFlag(name.to_string()))?;
        self.set_at(offset, value)
    }

    pub(crate) fn set_at(&mut self, offset: usize, value: &str) -> Result<(), ParseError> {
        let flag = &mut self.flags[offset];
        flag.value
            .set(value)
            .map_err(|source| ParseError::InvalidArgument {
                value: value.to_string(),
                flag: flag.display_name(),
                source,
            })?;
        flag.changed = true;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Set flag '{}' to '{}'.", flag.name, flag.value.format());
        }

        if let Some(message) = &flag.deprecated {
            self.user_interface.print_error(format!(
                "Flag --{} has been deprecated, {message}\n",
                flag.name
            ));
        }

        Ok(())
    }

    /// A copy of the value of the flag called `name`.
    pub fn get(&self, name: &str) -> Result<Box<dyn Any>, ParseError> {
        let flag = self
            .lookup(name)
            .ok_or_else(|| ParseError::NoSuchFlag(name.to_string()))?;
        flag.value
            .get()
            .ok_or_else(|| ParseError::Unreadable(flag.name.clone()))
    }

    pub(crate) fn get_as<T: 'static>(&self, name: &str, expected: &str) -> Result<T, ParseError> {
        let flag = self
            .lookup(name)
            .ok_or_else(|| ParseError::NoSuchFlag(name.to_string()))?;
        let actual = flag.value.type_name();

        if actual != expected {
            return Err(ParseError::TypeMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        flag.value
            .get()
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
            .ok_or_else(|| ParseError::Unreadable(flag.name.clone()))
    }

    /// Attach metadata to the flag called `name`.
    pub fn set_annotation(
        &mut self,
        name: &str,
        key: impl Into<String>,
        values: Vec<String>,
    ) -> Result<(), ParseError> {
        let flag = self
            .lookup_mut(name)
            .ok_or_else(|| ParseError::NoSuchFlag(name.to_string()))?;
        flag.annotations.insert(key.into(), values);
        Ok(())
    }

    /// Whether the flag called `name` has been set.
    pub fn changed(&self, name: &str) -> bool {
        self.lookup(name).map_or(false, Flag::changed)
    }

    /// The number of flags that have been set.
    pub fn n_flag(&self) -> usize {
        self.flags.iter().filter(|flag| flag.changed).count()
    }

    /// Whether any flag is registered.
    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Whether any registered flag is visible in usage.
    pub fn has_available_flags(&self) -> bool {
        self.flags.iter().any(|flag| !flag.hidden)
    }

    /// The usage groups in order of first appearance, with `""` (ungrouped) first when present.
    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::default();

        if self.flags.iter().any(|flag| flag.group.is_empty()) {
            groups.push(String::default());
        }

        for flag in &self.flags {
            if !flag.group.is_empty() && !groups.contains(&flag.group) {
                groups.push(flag.group.clone());
            }
        }

        groups
    }

    pub(crate) fn ordered(&self) -> Vec<&Flag> {
        let mut flags: Vec<&Flag> = self.flags.iter().collect();

        if self.sort_flags {
            flags.sort_by(|a, b| a.name.cmp(&b.name));
        }

        flags
    }

    /// Visit every flag, sorted by name unless [`FlagSet::set_sort_flags`] disabled it.
    pub fn visit_all(&self, mut visitor: impl FnMut(&Flag)) {
        for flag in self.ordered() {
            visitor(flag);
        }
    }

    /// Visit the flags that have been set, in the same order as [`FlagSet::visit_all`].
    pub fn visit(&self, mut visitor: impl FnMut(&Flag)) {
        for flag in self.ordered() {
            if flag.changed {
                visitor(flag);
            }
        }
    }

    /// Whether [`FlagSet::parse`] has succeeded at least once.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// The positional arguments of the most recent parse.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The `i`th positional argument.
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    /// The number of positional arguments.
    pub fn n_arg(&self) -> usize {
        self.args.len()
    }

    /// The number of positional arguments seen before a `--` terminator, if there was one.
    pub fn args_len_at_dash(&self) -> Option<usize> {
        self.args_len_at_dash
    }

    /// The unknown flag tokens (and any values they consumed) of the most recent parse.
    pub fn unknown_flags(&self) -> &[String] {
        &self.unknown_flags
    }

    /// Parse `tokens` (not including the program name), storing values into the flags.
    ///
    /// ### Example
    /// ```
    /// # use flagset_core as flagset;
    /// use flagset::{ErrorHandling, FlagSet, Opt, ParseError};
    ///
    /// let mut flags = FlagSet::new("program", ErrorHandling::ContinueOnError);
    /// let level = flags.int("level", 1, "the level", &[Opt::Shorthand('l')]);
    ///
    /// flags.parse(&["-l3"]).unwrap();
    /// assert_eq!(level.get(), 3);
    ///
    /// let error = flags.parse(&["--level=high"]).unwrap_err();
    /// assert!(matches!(error, ParseError::InvalidArgument { .. }));
    /// ```
    pub fn parse(&mut self, tokens: &[&str]) -> Result<(), ParseError> {
        self.reset();
        let result = self
            .scan(tokens, &mut |flag_set: &mut FlagSet, offset: usize, value: &str| {
                flag_set.set_at(offset, value)
            })
            .and_then(|_| self.check_required());
        self.conclude(result)
    }

    /// Parse `tokens` like [`FlagSet::parse`], but hand each matched flag and value to `visitor`
    /// instead of storing it. Flags are not marked as changed and required flags are not checked.
    pub fn parse_all<F>(&mut self, tokens: &[&str], mut visitor: F) -> Result<(), ParseError>
    where
        F: FnMut(&Flag, &str) -> Result<(), ValueError>,
    {
        self.reset();
        let result = self.scan(tokens, &mut |flag_set: &mut FlagSet, offset: usize, value: &str| {
            let flag = &flag_set.flags[offset];
            visitor(flag, value).map_err(|source| ParseError::InvalidArgument {
                value: value.to_string(),
                flag: flag.display_name(),
                source,
            })
        });
        self.conclude(result)
    }

    /// Parse the process arguments, skipping the program name.
    pub fn parse_env(&mut self) -> Result<(), ParseError> {
        let arguments: Vec<String> = env::args().skip(1).collect();
        self.parse(
            arguments
                .iter()
                .map(String::as_str)
                .collect::<Vec<&str>>()
                .as_slice(),
        )
    }

    fn reset(&mut self) {
        self.args.clear();
        self.args_len_at_dash = None;
        self.unknown_flags.clear();
    }

    fn check_required(&self) -> Result<(), ParseError> {
        if self.ignore_required_flags_errors {
            return Ok(());
        }

        let missing: Vec<String> = self
            .flags
            .iter()
            .filter(|flag| flag.required && !flag.changed)
            .map(Flag::display_name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ParseError::MissingRequiredFlags(missing))
        }
    }
}
