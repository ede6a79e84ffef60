use crate::api::FlagSet;
use crate::constant::*;
use crate::error::ParseError;
use crate::matcher::{classify, Token};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

impl FlagSet {
    /// Walk `tokens` left to right, handing every matched flag (by offset) and its raw value to `apply`.
    pub(crate) fn scan<F>(&mut self, tokens: &[&str], apply: &mut F) -> Result<(), ParseError>
    where
        F: FnMut(&mut FlagSet, usize, &str) -> Result<(), ParseError>,
    {
        let mut index = 0;

        while index < tokens.len() {
            let token = tokens[index];
            index += 1;

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Scanning token '{token}' at {}.", index - 1);
            }

            match classify(token) {
                Token::Terminator => {
                    self.args_len_at_dash = Some(self.args.len());
                    self.take_rest(&tokens[index..]);
                    break;
                }
                Token::Positional(positional) => {
                    self.args.push(positional.to_string());

                    if !self.interspersed {
                        self.take_rest(&tokens[index..]);
                        break;
                    }
                }
                Token::BadSyntax => return Err(ParseError::BadSyntax(token.to_string())),
                Token::Long { name, value } => {
                    index = self.parse_long(token, name, value, tokens, index, apply)?;
                }
                Token::Short { shorthands } => {
                    index = self.parse_short(token, shorthands, tokens, index, apply)?;
                }
            }
        }

        Ok(())
    }

    fn take_rest(&mut self, rest: &[&str]) {
        self.args.extend(rest.iter().map(|token| token.to_string()));
    }

    fn parse_long<F>(
        &mut self,
        token: &str,
        raw_name: &str,
        value: Option<&str>,
        tokens: &[&str],
        mut index: usize,
        apply: &mut F,
    ) -> Result<usize, ParseError>
    where
        F: FnMut(&mut FlagSet, usize, &str) -> Result<(), ParseError>,
    {
        let name = self.normalize_name(raw_name);

        let offset = match self.formal.get(&name) {
            Some(&offset) => offset,
            None => {
                if let Some(offset) = self.negation(&name) {
                    if value.is_some() {
                        return Err(ParseError::NegationWithValue(token.to_string()));
                    }

                    apply(self, offset, "false")?;
                    return Ok(index);
                }

                if name == HELP_NAME && !self.disable_builtin_help {
                    self.usage();
                    return Err(ParseError::HelpRequested);
                }

                return self.unknown(
                    token,
                    format!("--{raw_name}"),
                    value.is_none(),
                    tokens,
                    index,
                );
            }
        };

        let flag = &self.flags[offset];

        if flag.shorthand_only {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Ignoring long form '{token}' of shorthand only flag.");
            }

            return Ok(index);
        }

        let raw = match value {
            Some(value) => value.to_string(),
            None if flag.value.is_bool_flag() => flag
                .no_opt_default
                .clone()
                .unwrap_or_else(|| "true".to_string()),
            None if flag.no_opt_default.is_some() => {
                flag.no_opt_default.clone().unwrap_or_default()
            }
            None if flag.value.is_optional()
                && tokens.get(index).map_or(true, |next| next.starts_with('-')) =>
            {
                String::default()
            }
            None => match tokens.get(index) {
                Some(next) => {
                    index += 1;
                    next.to_string()
                }
                None => return Err(ParseError::MissingValue(token.to_string())),
            },
        };

        apply(self, offset, &raw)?;
        Ok(index)
    }

    /// The flag negated by `--no-<name>`, when it accepts negation.
    fn negation(&self, name: &str) -> Option<usize> {
        let stripped = name.strip_prefix(NEGATION_PREFIX)?;
        let offset = *self.formal.get(stripped)?;
        let flag = &self.flags[offset];

        if flag.add_negative && flag.value.is_bool_flag() {
            Some(offset)
        } else {
            None
        }
    }

    fn parse_short<F>(
        &mut self,
        token: &str,
        shorthands: &str,
        tokens: &[&str],
        mut index: usize,
        apply: &mut F,
    ) -> Result<usize, ParseError>
    where
        F: FnMut(&mut FlagSet, usize, &str) -> Result<(), ParseError>,
    {
        for (position, shorthand) in shorthands.char_indices() {
            let rest = &shorthands[position + shorthand.len_utf8()..];

            let offset = match self.shorthands.get(&shorthand) {
                Some(&offset) => offset,
                None => {
                    if shorthand == HELP_SHORT && !self.disable_builtin_help {
                        self.usage();
                        return Err(ParseError::HelpRequested);
                    }

                    if !self.allow_unknown_flags {
                        return Err(ParseError::UnknownFlag(format!("-{shorthand}")));
                    }

                    // The rest of the cluster belongs to the unknown flag.
                    self.record_unknown(token);

                    if rest.is_empty() {
                        index = self.skip_unknown_value(tokens, index);
                    }

                    break;
                }
            };

            let flag = &self.flags[offset];

            if let Some(message) = &flag.shorthand_deprecated {
                self.user_interface.print_error(format!(
                    "Flag shorthand -{shorthand} has been deprecated, {message}\n"
                ));
            }

            // `-x=value` always ends the cluster, whatever the flag kind.
            if let Some(attached) = rest.strip_prefix('=') {
                apply(self, offset, attached)?;
                break;
            }

            let flag = &self.flags[offset];

            if flag.value.is_bool_flag() {
                let raw = flag
                    .no_opt_default
                    .clone()
                    .unwrap_or_else(|| "true".to_string());
                apply(self, offset, &raw)?;
                continue;
            }

            if flag.value.is_optional() || flag.no_opt_default.is_some() {
                let raw = flag.no_opt_default.clone().unwrap_or_default();
                apply(self, offset, &raw)?;
                continue;
            }

            if !rest.is_empty() {
                apply(self, offset, rest)?;
                break;
            }

            match tokens.get(index) {
                Some(next) => {
                    index += 1;
                    apply(self, offset, next)?;
                }
                None => {
                    return Err(ParseError::MissingValue(format!(
                        "{shorthand:?} in -{shorthands}"
                    )))
                }
            }
        }

        Ok(index)
    }

    fn unknown(
        &mut self,
        token: &str,
        name: String,
        consume_value: bool,
        tokens: &[&str],
        index: usize,
    ) -> Result<usize, ParseError> {
        if !self.allow_unknown_flags {
            return Err(ParseError::UnknownFlag(name));
        }

        self.record_unknown(token);

        if consume_value {
            Ok(self.skip_unknown_value(tokens, index))
        } else {
            Ok(index)
        }
    }

    fn skip_unknown_value(&mut self, tokens: &[&str], index: usize) -> usize {
        match tokens.get(index) {
            Some(next) if !next.starts_with('-') => {
                self.record_unknown(next);
                index + 1
            }
            _ => index,
        }
    }

    fn record_unknown(&mut self, token: &str) {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Recording unknown flag token '{token}'.");
        }

        self.unknown_flags.push(token.to_string());
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{Binding, Callback, FlagSet};
    use crate::error::{ParseError, ValueError};
    use crate::model::{ErrorHandling, Opt};
    use crate::parser::util::InMemoryInterface;
    use rstest::rstest;

    fn flag_set() -> FlagSet {
        FlagSet::new("test", ErrorHandling::ContinueOnError)
    }

    #[rstest]
    #[case(vec!["-abc", "-s", "val"])]
    #[case(vec!["-abcs", "val"])]
    #[case(vec!["-abcsval"])]
    #[case(vec!["-abcs=val"])]
    #[case(vec!["-a", "-b", "-c", "--string", "val"])]
    fn shorthand_cluster(#[case] tokens: Vec<&str>) {
        // Setup
        let mut flags = flag_set();
        let a = flags.bool("alpha", false, "", &[Opt::Shorthand('a')]);
        let b = flags.bool("beta", false, "", &[Opt::Shorthand('b')]);
        let c = flags.bool("gamma", false, "", &[Opt::Shorthand('c')]);
        let s = flags.string("string", "0", "", &[Opt::Shorthand('s')]);

        // Execute
        flags.parse(&tokens).unwrap();

        // Verify
        assert!(a.get());
        assert!(b.get());
        assert!(c.get());
        assert_eq!(s.get(), "val");
        assert_eq!(flags.n_arg(), 0);
    }

    #[test]
    fn long_forms() {
        let mut flags = flag_set();
        let number = flags.int("number", 0, "", &[]);
        let text = flags.string("text", "x", "", &[]);
        let empty = flags.string("empty", "x", "", &[]);

        flags
            .parse(&["--number", "3", "--text=a=b", "--empty=", "tail"])
            .unwrap();
        assert_eq!(number.get(), 3);
        assert_eq!(text.get(), "a=b");
        assert_eq!(empty.get(), "");
        assert_eq!(flags.args(), &["tail"]);
    }

    #[test]
    fn value_may_look_like_flag() {
        let mut flags = flag_set();
        let text = flags.string("text", "", "", &[Opt::Shorthand('t')]);
        flags.parse(&["--text", "--other", "-t", "-x"]).unwrap();
        assert_eq!(text.get(), "-x");
    }

    #[rstest]
    #[case(vec!["--number"], "flag needs an argument: --number")]
    #[case(vec!["-n"], "flag needs an argument: 'n' in -n")]
    #[case(vec!["-bn"], "flag needs an argument: 'n' in -bn")]
    #[case(vec!["--missing"], "unknown flag: --missing")]
    #[case(vec!["-bz"], "unknown flag: -z")]
    #[case(vec!["---number"], "bad flag syntax: ---number")]
    #[case(vec!["--=3"], "bad flag syntax: --=3")]
    fn errors(#[case] tokens: Vec<&str>, #[case] expected: &str) {
        let mut flags = flag_set();
        flags.int("number", 0, "", &[Opt::Shorthand('n')]);
        flags.bool("bool", false, "", &[Opt::Shorthand('b')]);

        let error = flags.parse(&tokens).unwrap_err();
        assert_eq!(error.to_string(), expected);
        assert!(!flags.parsed());
    }

    #[test]
    fn invalid_argument_keeps_source() {
        let mut flags = flag_set();
        flags.int8("number", 0, "", &[]);

        let error = flags.parse(&["--number=x"]).unwrap_err();
        assert_matches!(
            error,
            ParseError::InvalidArgument { ref value, ref flag, source: ValueError::InvalidSyntax { kind: "int8", .. } }
                if value == "x" && flag == "--number"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn terminator() {
        let mut flags = flag_set();
        let b = flags.bool("b", false, "", &[]);
        flags.parse(&["--", "a", "-b"]).unwrap();
        assert!(!b.get());
        assert_eq!(flags.args(), &["a", "-b"]);
        assert_eq!(flags.args_len_at_dash(), Some(0));

        flags.parse(&["x", "--", "--b"]).unwrap();
        assert_eq!(flags.args(), &["x", "--b"]);
        assert_eq!(flags.args_len_at_dash(), Some(1));

        flags.parse(&["x"]).unwrap();
        assert_eq!(flags.args_len_at_dash(), None);
    }

    #[test]
    fn interspersed() {
        let mut flags = flag_set();
        let first = flags.bool("true", false, "", &[]);
        let second = flags.bool("false", false, "", &[]);

        flags.parse(&["a", "--true", "-", "b"]).unwrap();
        assert!(first.get());
        assert_eq!(flags.args(), &["a", "-", "b"]);

        flags.set_interspersed(false);
        flags.parse(&["--true", "x", "--false"]).unwrap();
        assert!(!second.get());
        assert_eq!(flags.args(), &["x", "--false"]);
    }

    #[test]
    fn negation() {
        let mut flags = flag_set();
        let verbose = flags.bool("verbose", true, "", &[Opt::AddNegative]);
        let plain = flags.bool("plain", true, "", &[]);

        flags.parse(&["--no-verbose"]).unwrap();
        assert!(!verbose.get());
        assert!(flags.changed("verbose"));

        let error = flags.parse(&["--no-verbose=x"]).unwrap_err();
        assert_eq!(error.to_string(), "flag cannot have a value: --no-verbose=x");

        assert_matches!(
            flags.parse(&["--no-plain"]),
            Err(ParseError::UnknownFlag(name)) if name == "--no-plain"
        );
        assert!(plain.get());
    }

    #[test]
    fn negation_hidden_from_usage_still_parses() {
        let mut flags = flag_set();
        let verbose = flags.bool(
            "verbose",
            true,
            "",
            &[Opt::AddNegative, Opt::HideNegativeUsage],
        );
        flags.parse(&["--no-verbose"]).unwrap();
        assert!(!verbose.get());
    }

    #[rstest]
    #[case(vec!["-v"], 1)]
    #[case(vec!["-vvv"], 3)]
    #[case(vec!["-v", "-v", "-v"], 3)]
    #[case(vec!["-v", "--verbose", "-v"], 3)]
    #[case(vec!["-v=3", "-v"], 4)]
    #[case(vec!["--verbose=0"], 0)]
    #[case(vec!["-v=0"], 0)]
    fn counter(#[case] tokens: Vec<&str>, #[case] expected: isize) {
        let mut flags = flag_set();
        let verbose = flags.count("verbose", "verbosity", &[Opt::Shorthand('v')]);
        flags.parse(&tokens).unwrap();
        assert_eq!(verbose.get(), expected);
    }

    #[test]
    fn counter_invalid() {
        let mut flags = flag_set();
        flags.count("verbose", "", &[Opt::Shorthand('v')]);
        let error = flags.parse(&["-v=a"]).unwrap_err();
        assert_eq!(
            error.to_string(),
            r#"invalid argument "a" for "-v, --verbose" flag: parsing "a" as int: invalid syntax"#
        );
    }

    #[test]
    fn no_opt_default() {
        let mut flags = flag_set();
        let color = flags.string(
            "color",
            "never",
            "",
            &[Opt::Shorthand('c'), Opt::NoOptDefault("auto".to_string())],
        );
        let toggle = flags.bool(
            "toggle",
            false,
            "",
            &[Opt::Shorthand('t'), Opt::NoOptDefault("false".to_string())],
        );

        flags.parse(&["--color", "arg"]).unwrap();
        assert_eq!(color.get(), "auto");
        assert_eq!(flags.args(), &["arg"]);

        flags.parse(&["-ct", "--color=always"]).unwrap();
        assert_eq!(color.get(), "always");
        assert!(!toggle.get());
    }

    #[test]
    fn bool_attached_value() {
        let mut flags = flag_set();
        let b = flags.bool("b", true, "", &[Opt::Shorthand('b')]);
        flags.parse(&["-b=false", "--b", "x"]).unwrap();
        assert!(b.get());
        assert_eq!(flags.args(), &["x"]);

        flags.parse(&["--b=F"]).unwrap();
        assert!(!b.get());
    }

    #[test]
    fn unknown_tolerated() {
        let mut flags = flag_set();
        flags.set_allow_unknown_flags(true);
        let known = flags.bool("known", false, "", &[Opt::Shorthand('k')]);

        flags.parse(&["--unknown=v", "--known"]).unwrap();
        assert!(known.get());
        assert_eq!(flags.unknown_flags(), &["--unknown=v"]);
    }

    #[rstest]
    #[case(vec!["--unknown", "value", "a"], vec!["--unknown", "value"], vec!["a"], false)]
    #[case(vec!["--unknown", "-k", "a"], vec!["--unknown"], vec!["a"], true)]
    #[case(vec!["-u", "value", "a"], vec!["-u", "value"], vec!["a"], false)]
    #[case(vec!["-uk", "a"], vec!["-uk"], vec!["a"], false)]
    #[case(vec!["-ku", "a"], vec!["-ku", "a"], vec![], true)]
    #[case(vec!["-u=x", "a"], vec!["-u=x"], vec!["a"], false)]
    #[case(vec!["-uuuuu", "a"], vec!["-uuuuu"], vec!["a"], false)]
    #[case(vec!["-uuuuu", ""], vec!["-uuuuu"], vec![""], false)]
    fn unknown_values(
        #[case] tokens: Vec<&str>,
        #[case] unknown: Vec<&str>,
        #[case] args: Vec<&str>,
        #[case] expected_known: bool,
    ) {
        let mut flags = flag_set();
        flags.set_allow_unknown_flags(true);
        let known = flags.bool("known", false, "", &[Opt::Shorthand('k')]);

        flags.parse(&tokens).unwrap();
        assert_eq!(flags.unknown_flags(), unknown.as_slice());
        assert_eq!(flags.args(), args.as_slice());
        assert_eq!(known.get(), expected_known);
    }

    #[test]
    fn unknown_reset_between_parses() {
        let mut flags = flag_set();
        flags.set_allow_unknown_flags(true);
        flags.parse(&["--a"]).unwrap();
        flags.parse(&["--b"]).unwrap();
        assert_eq!(flags.unknown_flags(), &["--b"]);
    }

    #[rstest]
    #[case(vec!["--help"])]
    #[case(vec!["-h"])]
    #[case(vec!["-bh"])]
    #[case(vec!["a", "--help", "--missing"])]
    fn help(#[case] tokens: Vec<&str>) {
        let (interface, output) = InMemoryInterface::shared();
        let mut flags = flag_set();
        flags.set_interface(interface);
        flags.bool("bool", false, "a bool", &[Opt::Shorthand('b')]);

        assert_matches!(flags.parse(&tokens), Err(ParseError::HelpRequested));
        assert_eq!(
            output.errors(),
            "Usage of test:\n  -b, --bool   a bool\n"
        );
        assert!(!flags.parsed());
    }

    #[test]
    fn help_user_defined() {
        let mut flags = flag_set();
        let help = flags.bool("help", false, "", &[Opt::Shorthand('h')]);
        flags.parse(&["-h"]).unwrap();
        assert!(help.get());
    }

    #[test]
    fn help_disabled() {
        let mut flags = flag_set();
        flags.set_disable_builtin_help(true);
        assert_matches!(
            flags.parse(&["--help"]),
            Err(ParseError::UnknownFlag(name)) if name == "--help"
        );
        assert_matches!(
            flags.parse(&["-h"]),
            Err(ParseError::UnknownFlag(name)) if name == "-h"
        );
    }

    #[test]
    fn shorthand_only() {
        let mut flags = flag_set();
        let b = flags.bool("bool", false, "", &[Opt::ShorthandOnly, Opt::Shorthand('1')]);

        flags.parse(&["--bool"]).unwrap();
        assert!(flags.parsed());
        assert!(!b.get());

        flags.parse(&["-1"]).unwrap();
        assert!(b.get());
    }

    #[test]
    fn shorthand_deprecated() {
        let (interface, output) = InMemoryInterface::shared();
        let mut flags = flag_set();
        flags.set_interface(interface);
        let b = flags.bool(
            "bool",
            false,
            "",
            &[
                Opt::Shorthand('b'),
                Opt::ShorthandDeprecated("use --bool".to_string()),
            ],
        );

        flags.parse(&["--bool"]).unwrap();
        assert_eq!(output.errors(), "");
        flags.parse(&["-b"]).unwrap();
        assert!(b.get());
        assert_eq!(
            output.errors(),
            "Flag shorthand -b has been deprecated, use --bool\n"
        );
    }

    #[test]
    fn unicode_shorthands() {
        let mut flags = flag_set();
        let a = flags.bool("boola", false, "", &[Opt::Shorthand('a')]);
        let o = flags.string("boolö", "", "", &[Opt::Shorthand('ö')]);
        flags.parse(&["-aöwert"]).unwrap();
        assert!(a.get());
        assert_eq!(o.get(), "wert");
        assert_eq!(flags.shorthand_lookup('ö').unwrap().name(), "boolö");
    }

    #[test]
    fn reparse_keeps_changed() {
        let mut flags = flag_set();
        let a = flags.string("a", "x", "", &[]);
        let b = flags.string("b", "y", "", &[]);

        flags.parse(&["--a", "1"]).unwrap();
        flags.parse(empty::slice()).unwrap();
        assert_eq!(a.get(), "1");
        assert!(flags.changed("a"));
        assert!(!flags.changed("b"));
        assert_eq!(b.get(), "y");
    }

    #[test]
    fn callback_order() {
        let seen = Binding::new(Vec::<String>::new());
        let sink = seen.clone();
        let mut flags = flag_set();
        flags.var(
            Callback::new(move |raw: &str| {
                sink.borrow_mut().push(raw.to_string());
                Ok(())
            }),
            "each",
            "",
            &[Opt::Shorthand('e')],
        );

        flags.parse(&["--each", "1", "-e2", "--each=3"]).unwrap();
        assert_eq!(seen.get(), vec!["1", "2", "3"]);
    }

    #[test]
    fn parse_all() {
        let mut flags = flag_set();
        let b = flags.bool("bool", false, "", &[Opt::Shorthand('b')]);
        let s = flags.string("string", "", "", &[Opt::Required]);
        let mut seen = Vec::default();

        flags
            .parse_all(&["-b", "--string", "x", "pos"], |flag, value| {
                seen.push(format!("{}={value}", flag.name()));
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, vec!["bool=true", "string=x"]);
        assert!(!b.get());
        assert_eq!(s.get(), "");
        assert!(!flags.changed("bool"));
        assert_eq!(flags.args(), &["pos"]);
        assert!(flags.parsed());
    }

    #[test]
    fn parse_all_unknown_tolerated() {
        // Setup
        let mut flags = flag_set();
        flags.set_allow_unknown_flags(true);
        for (name, shorthand) in [
            ("boola", 'a'),
            ("boolb", 'b'),
            ("boolc", 'c'),
            ("boold", 'd'),
            ("boole", 'e'),
        ] {
            flags.bool(name, false, "", &[Opt::Shorthand(shorthand)]);
        }
        for (name, shorthand) in [
            ("stringa", 's'),
            ("stringz", 'z'),
            ("stringy", 'y'),
            ("stringo", 'o'),
        ] {
            flags.string(name, "0", "", &[Opt::Shorthand(shorthand)]);
        }
        let tokens = vec![
            "-ab",
            "-cs=xx",
            "--stringz=something",
            "--unknown1",
            "unknown1Value",
            "-d=true",
            "--unknown2=unknown2Value",
            "-u=unknown3Value",
            "-p",
            "unknown4Value",
            "-q",
            "-y",
            "ee",
            "--unknown7=unknown7value",
            "--stringo=ovalue",
            "--unknown8=unknown8value",
            "--boole",
            "--unknown6",
            "",
            "-uuuuu",
            "",
            "--unknown10",
            "--unknown11",
        ];
        let mut seen = Vec::default();

        // Execute
        flags
            .parse_all(&tokens, |flag, value| {
                seen.push(format!("{}={value}", flag.name()));
                Ok(())
            })
            .unwrap();

        // Verify
        assert_eq!(
            seen,
            vec![
                "boola=true",
                "boolb=true",
                "boolc=true",
                "stringa=xx",
                "stringz=something",
                "boold=true",
                "stringy=ee",
                "stringo=ovalue",
                "boole=true",
            ]
        );
        assert_eq!(
            flags.unknown_flags(),
            &[
                "--unknown1",
                "unknown1Value",
                "--unknown2=unknown2Value",
                "-u=unknown3Value",
                "-p",
                "unknown4Value",
                "-q",
                "--unknown7=unknown7value",
                "--unknown8=unknown8value",
                "--unknown6",
                "",
                "-uuuuu",
                "--unknown10",
                "--unknown11",
            ]
        );
        assert_eq!(flags.args(), &[""]);
        assert!(flags.parsed());
    }

    #[test]
    fn parse_all_error() {
        let mut flags = flag_set();
        flags.string("string", "", "", &[]);
        let error = flags
            .parse_all(&["--string", "x"], |_, value| {
                Err(ValueError::Message(format!("rejected {value}")))
            })
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            r#"invalid argument "x" for "--string" flag: rejected x"#
        );
    }
}
