use crate::api::Primitive;
use crate::error::ValueError;

/// Parse an integer literal, honouring `0x`, `0o`, `0b` and leading `0` (octal) prefixes.
/// Underscores are accepted between digits of prefixed literals.
pub(crate) fn parse_integer(raw: &str, kind: &'static str) -> Result<i128, ValueError> {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits, prefixed) = if let Some(rest) = strip_prefix_ci(body, "0x") {
        (16, rest, true)
    } else if let Some(rest) = strip_prefix_ci(body, "0o") {
        (8, rest, true)
    } else if let Some(rest) = strip_prefix_ci(body, "0b") {
        (2, rest, true)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..], true)
    } else {
        (10, body, false)
    };

    let digits = if prefixed {
        strip_separators(digits).ok_or_else(|| ValueError::syntax(kind, raw))?
    } else {
        digits.to_string()
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValueError::syntax(kind, raw));
    }

    let magnitude = match u128::from_str_radix(&digits, radix) {
        Ok(magnitude) => magnitude,
        Err(_) if digits.chars().all(|c| c.is_digit(radix)) => {
            return Err(ValueError::range(kind, raw));
        }
        Err(_) => return Err(ValueError::syntax(kind, raw)),
    };

    let magnitude = i128::try_from(magnitude).map_err(|_| ValueError::range(kind, raw))?;

    if negative {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

/// Parse a plain base 10 integer with an optional sign; no prefixes or separators.
pub(crate) fn parse_decimal(raw: &str, kind: &'static str) -> Result<i128, ValueError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ValueError::syntax(kind, raw));
    }

    trimmed
        .parse::<i128>()
        .map_err(|_| ValueError::range(kind, raw))
}

fn strip_prefix_ci<'a>(body: &'a str, prefix: &str) -> Option<&'a str> {
    if body.len() >= prefix.len() && body[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&body[prefix.len()..])
    } else {
        None
    }
}

// Underscores may follow the prefix or sit between digits.
fn strip_separators(digits: &str) -> Option<String> {
    if digits.ends_with('_') || digits.contains("__") {
        None
    } else {
        Some(digits.replace('_', ""))
    }
}

/// Render a float the way `%g` does with the shortest exact precision.
/// `scientific` is the `{:e}` rendering of the value.
pub(crate) fn format_general(scientific: &str) -> String {
    match scientific {
        "NaN" => return "NaN".to_string(),
        "inf" => return "+Inf".to_string(),
        "-inf" => return "-Inf".to_string(),
        _ => {}
    }

    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(mantissa) => ("-", mantissa),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if exponent < -4 || exponent >= 6 {
        let mut out = format!("{sign}{}", &digits[..1]);

        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }

        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        out.push_str(&format!("e{exponent_sign}{:02}", exponent.abs()));
        out
    } else if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("{sign}0.{zeros}{digits}")
    } else {
        let point = exponent as usize + 1;

        if digits.len() <= point {
            let zeros = "0".repeat(point - digits.len());
            format!("{sign}{digits}{zeros}")
        } else {
            format!("{sign}{}.{}", &digits[..point], &digits[point..])
        }
    }
}

macro_rules! integer_primitive {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl Primitive for $t {
                const TYPE_NAME: &'static str = $name;
                const SLICE_NAME: &'static str = concat!($name, "Slice");

                fn parse(raw: &str) -> Result<Self, ValueError> {
                    // Unsigned literals take no sign at all.
                    if <$t>::MIN == 0 && raw.trim().starts_with(['-', '+']) {
                        return Err(ValueError::syntax($name, raw));
                    }

                    let value = parse_integer(raw, $name)?;
                    <$t>::try_from(value).map_err(|_| ValueError::range($name, raw))
                }

                fn parse_entry(raw: &str) -> Result<Self, ValueError> {
                    let value = parse_decimal(raw, $name)?;
                    <$t>::try_from(value).map_err(|_| ValueError::range($name, raw))
                }

                fn format(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_primitive!(
    isize => "int",
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    usize => "uint",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
);

fn parse_float(raw: &str, kind: &'static str) -> Result<f64, ValueError> {
    let trimmed = raw.trim();
    let cleaned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if cleaned.starts_with(['+', '-']) && trimmed.starts_with('+') {
        return Err(ValueError::syntax(kind, raw));
    }

    let value: f64 = cleaned.parse().map_err(|_| ValueError::syntax(kind, raw))?;

    if value.is_infinite() && !cleaned.to_ascii_lowercase().contains("inf") {
        return Err(ValueError::range(kind, raw));
    }

    Ok(value)
}

impl Primitive for f64 {
    const TYPE_NAME: &'static str = "float64";
    const SLICE_NAME: &'static str = "float64Slice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        parse_float(raw, Self::TYPE_NAME)
    }

    fn format(&self) -> String {
        format_general(&format!("{self:e}"))
    }
}

impl Primitive for f32 {
    const TYPE_NAME: &'static str = "float32";
    const SLICE_NAME: &'static str = "float32Slice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        let wide = parse_float(raw, Self::TYPE_NAME)?;
        let narrow = wide as f32;

        if narrow.is_infinite() && !wide.is_infinite() {
            return Err(ValueError::range(Self::TYPE_NAME, raw));
        }

        Ok(narrow)
    }

    fn format(&self) -> String {
        format_general(&format!("{self:e}"))
    }
}
