use terminal_size::{terminal_size, Width};

use crate::api::{Flag, FlagSet};

const SLOP: usize = 5;
const MINIMUM_WRAP: usize = 24;
const FALLBACK_INDENT: usize = 16;

/// The width to wrap usage at, or `0` when not attached to a terminal.
pub(crate) fn terminal_width() -> usize {
    if let Some((Width(terminal_width), _)) = terminal_size() {
        terminal_width as usize
    } else {
        0
    }
}

impl FlagSet {
    /// Show the usage: the callback given to [`FlagSet::set_usage`], otherwise [`FlagSet::default_usage`].
    pub fn usage(&self) {
        match &self.usage {
            Some(usage) => usage(self),
            None => self.default_usage(),
        }
    }

    /// Print `Usage of <name>:` followed by the flag usages, each group under its own heading.
    pub fn default_usage(&self) {
        let mut message = if self.name.is_empty() {
            "Usage:\n".to_string()
        } else {
            format!("Usage of {}:\n", self.name)
        };
        let cols = terminal_width();

        for group in self.groups() {
            if !group.is_empty() {
                message.push_str(&format!("\n{group} flags:\n"));
            }

            message.push_str(&self.flag_usages_for_group(&group, cols));
        }

        self.user_interface.print_error(message);
    }

    /// Print the usage of every visible flag, unwrapped.
    pub fn print_defaults(&self) {
        self.user_interface.print_error(self.flag_usages());
    }

    /// The usage of every visible flag, one per line, unwrapped.
    pub fn flag_usages(&self) -> String {
        self.flag_usages_wrapped(0)
    }

    /// The usage of every visible flag, with usage text wrapped at `cols` (`0` to not wrap).
    pub fn flag_usages_wrapped(&self, cols: usize) -> String {
        self.render(self.ordered(), cols)
    }

    /// The usage of the visible flags in `group` (`""` for ungrouped flags).
    pub fn flag_usages_for_group(&self, group: &str, cols: usize) -> String {
        let flags = self
            .ordered()
            .into_iter()
            .filter(|flag| flag.group == group)
            .collect();
        self.render(flags, cols)
    }

    fn render(&self, flags: Vec<&Flag>, cols: usize) -> String {
        let mut lines: Vec<(String, String)> = Vec::default();
        let mut max_length = 0;

        for flag in flags {
            if flag.hidden {
                continue;
            }

            let (left, right) = match &self.usage_formatter {
                Some(formatter) => formatter(flag),
                None => layout(flag),
            };
            // Account for the separator, as if it were part of the left column.
            max_length = max_length.max(left.len() + 1);
            lines.push((left, right));
        }

        let mut out = String::default();

        for (left, right) in lines {
            let spacing = " ".repeat(max_length - left.len());
            out.push_str(&format!(
                "{left} {spacing} {}\n",
                wrap(max_length + 2, cols, &right)
            ));
        }

        out
    }
}

/// The left column (names and placeholder) and the right column (usage, default, deprecation).
fn layout(flag: &Flag) -> (String, String) {
    let mut left = match flag.shorthand {
        Some(shorthand) if flag.shorthand_only => format!("  -{shorthand}"),
        Some(shorthand) if flag.shorthand_deprecated.is_none() => format!("  -{shorthand}, --"),
        _ => "      --".to_string(),
    };

    if !flag.shorthand_only {
        if flag.add_negative && flag.value.is_bool_flag() && !flag.hide_negative_usage {
            left.push_str("[no-]");
        }

        left.push_str(&flag.name);
    }

    let (placeholder, mut right) = unquote_usage(flag);

    if !placeholder.is_empty() {
        left.push(' ');
        left.push_str(&placeholder);
    }

    if let Some(no_opt_default) = &flag.no_opt_default {
        match flag.value.type_name() {
            "string" => left.push_str(&format!("[=\"{no_opt_default}\"]")),
            "bool" if no_opt_default == "true" => {}
            "count" if no_opt_default == "+1" => {}
            _ => left.push_str(&format!("[={no_opt_default}]")),
        }
    }

    if !flag.disable_print_default && !default_is_zero(flag) {
        if flag.value.type_name() == "string" {
            right.push_str(&format!(" (default {:?})", flag.default_text));
        } else {
            right.push_str(&format!(" (default {})", flag.default_text));
        }
    }

    if let Some(message) = &flag.deprecated {
        right.push_str(&format!(" (DEPRECATED: {message})"));
    }

    (left, right)
}

/// The value placeholder and the usage text, with the first back quoted word lifted out as the placeholder.
pub(crate) fn unquote_usage(flag: &Flag) -> (String, String) {
    let mut placeholder = None;
    let mut usage = flag.usage.clone();

    if !flag.disable_unquote_usage {
        if let Some((before, after)) = flag.usage.split_once('`') {
            if let Some((name, rest)) = after.split_once('`') {
                placeholder = Some(name.to_string());
                usage = format!("{before}{name}{rest}");
            }
        }
    }

    if let Some(usage_type) = &flag.usage_type {
        return (usage_type.clone(), usage);
    }

    if let Some(placeholder) = placeholder {
        return (placeholder, usage);
    }

    let placeholder = match flag.value.type_name() {
        "bool" => "",
        "float64" => "float",
        "int64" => "int",
        "uint64" => "uint",
        "stringSlice" => "strings",
        "intSlice" => "ints",
        "uintSlice" => "uints",
        "boolSlice" => "bools",
        other => other,
    };

    (placeholder.to_string(), usage)
}

fn default_is_zero(flag: &Flag) -> bool {
    let text = flag.default_text.as_str();

    match flag.value.type_name() {
        "string" => text.is_empty(),
        "duration" => text == "0" || text == "0s",
        "ip" => matches!(text, "0.0.0.0" | "::" | "<nil>" | ""),
        "ipMask" => text == "00000000",
        "ipNet" => text == "0.0.0.0/0",
        "complex128" => text == "(0+0i)",
        _ => matches!(text, "" | "[]" | "0" | "false" | "<nil>"),
    }
}

fn floor_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());

    while !s.is_char_boundary(index) {
        index -= 1;
    }

    index
}

/// Split `s` at the last whitespace before `i`, unless all of `s` fits within `i + slop`.
fn wrap_n(i: usize, slop: usize, s: &str) -> (&str, &str) {
    if i + slop > s.len() {
        return (s, "");
    }

    let head = &s[..floor_boundary(s, i)];

    let w = match head.rfind([' ', '\t', '\n']) {
        Some(w) if w > 0 => w,
        _ => return (s, ""),
    };

    match head.rfind('\n') {
        Some(newline) if newline > 0 && newline < w => (&s[..newline], &s[newline + 1..]),
        _ => (&s[..w], &s[w + 1..]),
    }
}

/// Wrap `s` to fit between column `indent` and `cols`, indenting continuation lines by `indent`.
pub(crate) fn wrap(indent: usize, cols: usize, s: &str) -> String {
    let mut indent = indent;
    let mut out = String::default();

    if cols == 0 {
        return s.replace('\n', &format!("\n{}", " ".repeat(indent)));
    }

    let mut width = cols.saturating_sub(indent);

    // Too narrow: start the usage on its own line instead.
    if width < MINIMUM_WRAP {
        indent = FALLBACK_INDENT;
        width = cols.saturating_sub(indent);
        out.push('\n');
        out.push_str(&" ".repeat(indent));
    }

    if width < MINIMUM_WRAP {
        return s.replace('\n', &out);
    }

    let width = width - SLOP;
    let padding = format!("\n{}", " ".repeat(indent));
    let (line, mut rest) = wrap_n(width, SLOP, s);
    out.push_str(&line.replace('\n', &padding));

    while !rest.is_empty() {
        let (line, remaining) = wrap_n(width, SLOP, rest);
        out.push_str(&padding);
        out.push_str(&line.replace('\n', &padding));
        rest = remaining;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Binding, Callback, Primitive, Value};
    use crate::error::ValueError;
    use crate::model::{ErrorHandling, Opt};
    use crate::parser::util::InMemoryInterface;
    use crate::test::assert_contains;
    use rstest::rstest;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn flag_set(name: &str) -> FlagSet {
        FlagSet::new(name, ErrorHandling::ContinueOnError)
    }

    /// A user defined value with its own type tag.
    struct Custom(Binding<i64>);

    impl Value for Custom {
        fn set(&mut self, raw: &str) -> Result<(), ValueError> {
            self.0.replace(i64::parse(raw)?);
            Ok(())
        }

        fn format(&self) -> String {
            self.0.get().to_string()
        }

        fn type_name(&self) -> &str {
            "custom"
        }
    }

    #[test]
    fn print_defaults() {
        // Setup
        let (interface, output) = InMemoryInterface::shared();
        let mut flags = flag_set("print defaults test");
        flags.set_interface(interface);
        flags.bool("A", false, "for bootstrapping, allow 'any' type", &[]);
        flags.bool("Alongflagname", false, "disable bounds checking", &[Opt::AddNegative]);
        flags.bool(
            "CCC",
            true,
            "a boolean defaulting to true",
            &[Opt::Shorthand('C'), Opt::AddNegative],
        );
        flags.string("D", "", "set relative `path` for local imports", &[]);
        flags.float64("F", 2.7, "a non-zero `number`", &[]);
        flags.float64("G", 0.0, "a float that defaults to zero", &[]);
        flags.int("N", 27, "a non-zero int", &[]);
        flags.int_slice("Ints", vec![], "int slice with zero default", &[]);
        flags.ip(
            "IP",
            IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            "IP address with no default",
            &[],
        );
        flags.ip_mask(
            "IPMask",
            crate::convert::IpMask::default(),
            "Netmask address with no default",
            &[],
        );
        flags.ip_net(
            "IPNet",
            crate::convert::IpNet::default(),
            "IP network with no default",
            &[],
        );
        flags.int("Z", 0, "an int that defaults to zero", &[]);
        flags.duration("maxT", Duration::ZERO, "set `timeout` for dial", &[]);
        flags.string_slice("StringSlice", vec![], "string slice with zero default", &[]);
        flags.count("verbose", "verbosity", &[Opt::Shorthand('v')]);
        flags.int(
            "disableDefault",
            -1,
            "A non-zero int with DisablePrintDefault",
            &[Opt::DisablePrintDefault],
        );
        flags.var(Custom(Binding::new(0)), "custom", "custom Value implementation", &[]);
        flags.var(Custom(Binding::new(10)), "customP", "a VarP with default", &[]);

        // Execute
        flags.print_defaults();

        // Verify
        let expected = "      --A                     for bootstrapping, allow 'any' type
      --[no-]Alongflagname    disable bounds checking
  -C, --[no-]CCC              a boolean defaulting to true (default true)
      --D path                set relative path for local imports
      --F number              a non-zero number (default 2.7)
      --G float               a float that defaults to zero
      --IP ip                 IP address with no default
      --IPMask ipMask         Netmask address with no default
      --IPNet ipNet           IP network with no default
      --Ints ints             int slice with zero default
      --N int                 a non-zero int (default 27)
      --StringSlice strings   string slice with zero default
      --Z int                 an int that defaults to zero
      --custom custom         custom Value implementation
      --customP custom        a VarP with default (default 10)
      --disableDefault int    A non-zero int with DisablePrintDefault
      --maxT timeout          set timeout for dial
  -v, --verbose count         verbosity
";
        assert_eq!(output.errors(), expected);
        assert_eq!(flags.flag_usages(), expected);
    }

    fn multiline(flags: &mut FlagSet) {
        flags.bool("long-form", false, "Some description", &[]);
        flags.bool("long-form2", false, "Some description\n  with multiline", &[]);
        flags.bool("long-name", false, "Some description", &[Opt::Shorthand('s')]);
        flags.bool(
            "long-name2",
            false,
            "Some description with\n  multiline",
            &[Opt::Shorthand('t')],
        );
    }

    #[test]
    fn multiline_unwrapped() {
        let mut flags = flag_set("test");
        multiline(&mut flags);
        assert_eq!(
            flags.flag_usages(),
            "      --long-form    Some description
      --long-form2   Some description
                       with multiline
  -s, --long-name    Some description
  -t, --long-name2   Some description with
                       multiline
"
        );
    }

    #[test]
    fn wrapped() {
        let mut flags = flag_set("test");
        multiline(&mut flags);
        flags.string(
            "some-very-long-arg",
            "test",
            "Some very long description having break the limit",
            &[Opt::Shorthand('l')],
        );
        flags.string(
            "other-very-long-arg",
            "long-default-value",
            "Some very long description having break the limit",
            &[Opt::Shorthand('o')],
        );
        flags.string(
            "some-very-long-arg2",
            "very long default value",
            "Some very long description\nwith line break\nmultiple",
            &[],
        );

        assert_eq!(
            flags.flag_usages_wrapped(80),
            r#"      --long-form                    Some description
      --long-form2                   Some description
                                       with multiline
  -s, --long-name                    Some description
  -t, --long-name2                   Some description with
                                       multiline
  -o, --other-very-long-arg string   Some very long description having
                                     break the limit (default
                                     "long-default-value")
  -l, --some-very-long-arg string    Some very long description having
                                     break the limit (default "test")
      --some-very-long-arg2 string   Some very long description
                                     with line break
                                     multiple (default "very long default
                                     value")
"#
        );
    }

    #[test]
    fn wrap_narrow() {
        assert_eq!(wrap(30, 45, "a b"), "\n                a b");
        assert_eq!(wrap(30, 20, "a\nb"), "a\n                b");
        assert_eq!(wrap(4, 0, "a\nb"), "a\n    b");
    }

    #[rstest]
    #[case::plain("test `ctype1`", vec![], "--test ctype1   test ctype1")]
    #[case::disabled("test `ctype3`", vec![Opt::DisableUnquoteUsage], "--test string   test `ctype3`")]
    #[case::usage_type("test `ctype4`", vec![Opt::UsageType("bar".to_string())], "--test bar   test `ctype4`")]
    #[case::single_quote("test `ctype4", vec![], "--test string   test `ctype4")]
    #[case::leading_quote("`test ctype4", vec![Opt::UsageType("val".to_string())], "--test val   `test ctype4")]
    fn unquote(#[case] usage: &str, #[case] opts: Vec<Opt>, #[case] expected: &str) {
        let (interface, output) = InMemoryInterface::shared();
        let mut flags = flag_set("");
        flags.set_interface(interface);
        flags.string("test", "", usage, &opts);

        flags.default_usage();

        assert_eq!(output.errors(), format!("Usage:\n      {expected}\n"));
    }

    #[test]
    fn unquote_with_usage_type() {
        let mut flags = flag_set("");
        flags.string(
            "test",
            "",
            "test `ctype2`",
            &[Opt::UsageType("foo".to_string())],
        );
        flags.lookup_mut("test").unwrap().disable_unquote_usage = false;
        let (placeholder, usage) = unquote_usage(flags.lookup("test").unwrap());
        assert_eq!(placeholder, "foo");
        assert_eq!(usage, "test ctype2");
    }

    #[rstest]
    #[case::no_opt_default(vec![Opt::NoOptDefault("auto".to_string())], r#"  -c, --color string[="auto"]"#)]
    #[case::shorthand_only(vec![Opt::ShorthandOnly], "  -c string")]
    #[case::shorthand_deprecated(vec![Opt::ShorthandDeprecated("x".to_string())], "      --color string")]
    fn left_column(#[case] opts: Vec<Opt>, #[case] expected: &str) {
        let mut flags = flag_set("test");
        let mut all = vec![Opt::Shorthand('c')];
        all.extend(opts);
        flags.string("color", "", "", &all);
        let (left, _) = layout(flags.lookup("color").unwrap());
        assert_eq!(left, expected);
    }

    #[test]
    fn no_opt_default_markers() {
        let mut flags = flag_set("test");
        flags.bool("quiet", false, "", &[Opt::NoOptDefault("true".to_string())]);
        flags.bool("loud", true, "", &[Opt::NoOptDefault("false".to_string())]);
        flags.int("level", 0, "", &[Opt::NoOptDefault("3".to_string())]);

        assert_eq!(layout(flags.lookup("quiet").unwrap()).0, "      --quiet");
        assert_eq!(layout(flags.lookup("loud").unwrap()).0, "      --loud[=false]");
        assert_eq!(layout(flags.lookup("level").unwrap()).0, "      --level int[=3]");
    }

    #[test]
    fn hidden_and_deprecated() {
        let mut flags = flag_set("test");
        flags.string("secret", "", "shhh", &[Opt::Hidden]);
        flags.string("old", "", "old usage", &[Opt::Deprecated("use --new".to_string())]);
        assert_eq!(flags.flag_usages(), "");

        flags.lookup_mut("old").unwrap().set_hidden(false);
        assert_eq!(
            flags.flag_usages(),
            "      --old string   old usage (DEPRECATED: use --new)\n"
        );
    }

    #[test]
    fn custom_formatter() {
        let mut flags = flag_set("test");
        flags.set_usage_formatter(|_| ("--not-uis".to_string(), "not-usage".to_string()));
        flags.string(
            "uis",
            "asom",
            "testing `varname` and usage",
            &[Opt::Deprecated("some msg".to_string())],
        );
        flags.lookup_mut("uis").unwrap().set_hidden(false);
        assert_eq!(flags.flag_usages(), "--not-uis   not-usage\n");
    }

    #[test]
    fn default_snapshot_after_parse() {
        let mut flags = flag_set("test");
        flags.var(Custom(Binding::new(10)), "custom", "custom value", &[]);
        flags.parse(&["--custom", "3"]).unwrap();
        assert_contains!(flags.flag_usages(), "(default 10)");
    }

    #[test]
    fn groups_usage() {
        let (interface, output) = InMemoryInterface::shared();
        let mut flags = flag_set("test");
        flags.set_interface(interface);
        flags.string("string2", "some", "string2 usage", &[Opt::Group("group1".to_string())]);
        flags.bool("bool1", false, "bool1 usage", &[]);

        flags.default_usage();

        assert_eq!(
            output.errors(),
            r#"Usage of test:
      --bool1   bool1 usage

group1 flags:
      --string2 string   string2 usage (default "some")
"#
        );
    }

    #[test]
    fn custom_usage() {
        let (interface, output) = InMemoryInterface::shared();
        let mut flags = flag_set("test");
        flags.set_interface(interface);
        flags.set_usage(|flag_set| {
            flag_set
                .interface()
                .print(format!("custom usage for {}\n", flag_set.name()))
        });
        flags.var(Callback::new(|_: &str| Ok(())), "each", "", &[]);

        let _ = flags.parse(&["--help"]);

        assert_eq!(output.messages(), "custom usage for test\n");
        assert_eq!(output.errors(), "");
    }
}
