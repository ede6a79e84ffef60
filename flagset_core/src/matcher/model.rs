use crate::constant::TERMINATOR;

/// The shape of one command line token, before any flag lookup.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// `--`: everything after is positional.
    Terminator,
    /// Not flag shaped: the empty string, `-`, or anything without a leading dash.
    Positional(&'a str),
    /// `--name` or `--name=value`; `value` is `Some` whenever `=` is present.
    Long {
        name: &'a str,
        value: Option<&'a str>,
    },
    /// `-abc`: the characters after the dash.
    Short { shorthands: &'a str },
    /// `---name` or `--=value`.
    BadSyntax,
}

pub(crate) fn classify(token: &str) -> Token<'_> {
    if token == TERMINATOR {
        return Token::Terminator;
    }

    if token.len() < 2 || !token.starts_with('-') {
        return Token::Positional(token);
    }

    match token.strip_prefix(TERMINATOR) {
        Some(long) if long.starts_with(['-', '=']) => Token::BadSyntax,
        Some(long) => match long.split_once('=') {
            Some((name, value)) => Token::Long {
                name,
                value: Some(value),
            },
            None => Token::Long {
                name: long,
                value: None,
            },
        },
        None => Token::Short {
            shorthands: &token[1..],
        },
    }
}
