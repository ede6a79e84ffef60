use std::fmt;
use std::str::FromStr;

use crate::api::Primitive;
use crate::convert::number::format_general;
use crate::error::ValueError;

/// A complex number with `f64` parts, written as `(1+2i)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// Build from both parts.
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let imaginary = format_general(&format!("{:e}", self.im));
        let sign = if imaginary.starts_with(['+', '-']) {
            ""
        } else {
            "+"
        };
        write!(
            f,
            "({}{sign}{imaginary}i)",
            format_general(&format!("{:e}", self.re))
        )
    }
}

impl FromStr for Complex {
    type Err = ValueError;

    /// Accepts `a`, `bi`, `a+bi` and `a-bi`, optionally wrapped in parentheses.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let kind = Self::TYPE_NAME;
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
            .unwrap_or(trimmed);

        let Some(without_i) = body.strip_suffix('i') else {
            return Ok(Self::new(part(body, kind, raw)?, 0.0));
        };

        // The split sits at the last sign that does not belong to an exponent.
        let bytes = without_i.as_bytes();
        let split = (1..bytes.len())
            .rev()
            .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));

        match split {
            Some(index) => {
                let re = part(&without_i[..index], kind, raw)?;
                let im = imaginary(&without_i[index..], kind, raw)?;
                Ok(Self::new(re, im))
            }
            None => Ok(Self::new(0.0, imaginary(without_i, kind, raw)?)),
        }
    }
}

fn part(text: &str, kind: &'static str, raw: &str) -> Result<f64, ValueError> {
    if text.is_empty() {
        return Err(ValueError::syntax(kind, raw));
    }

    f64::parse(text).map_err(|_| ValueError::syntax(kind, raw))
}

// A bare sign stands for a unit coefficient (`1-i`).
fn imaginary(text: &str, kind: &'static str, raw: &str) -> Result<f64, ValueError> {
    match text {
        "+" => Ok(1.0),
        "-" => Ok(-1.0),
        _ => part(text, kind, raw),
    }
}

impl Primitive for Complex {
    const TYPE_NAME: &'static str = "complex128";
    const SLICE_NAME: &'static str = "complex128Slice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        raw.parse()
    }

    fn format(&self) -> String {
        self.to_string()
    }
}
