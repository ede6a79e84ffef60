use std::time::Duration;

use crate::api::Primitive;
use crate::error::ValueError;

const NANOS_PER_SECOND: u128 = 1_000_000_000;
// Enough precision for nanoseconds of hours, without overflowing the intermediate product.
const MAX_FRACTION_DIGITS: usize = 18;

impl Primitive for Duration {
    const TYPE_NAME: &'static str = "duration";
    const SLICE_NAME: &'static str = "durationSlice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        parse_duration(raw)
    }

    fn format(&self) -> String {
        format_duration(self)
    }
}

/// Parse a sequence of decimal numbers with unit suffixes, such as `300ms` or `1h30m2.5s`.
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`.
pub(crate) fn parse_duration(raw: &str) -> Result<Duration, ValueError> {
    let kind = Duration::TYPE_NAME;
    let trimmed = raw.trim();
    let (negative, mut rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    if rest.is_empty() {
        return Err(ValueError::syntax(kind, raw));
    }

    let mut total: u128 = 0;

    while !rest.is_empty() {
        let whole_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let whole = &rest[..whole_end];
        rest = &rest[whole_end..];
        let mut fraction = "";

        if let Some(after) = rest.strip_prefix('.') {
            let fraction_end = after
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after.len());
            fraction = &after[..fraction_end];
            rest = &after[fraction_end..];
        }

        if whole.is_empty() && fraction.is_empty() {
            return Err(ValueError::syntax(kind, raw));
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];
        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SECOND,
            "m" => 60 * NANOS_PER_SECOND,
            "h" => 3_600 * NANOS_PER_SECOND,
            "" => {
                return Err(ValueError::Message(format!(
                    "missing unit in duration {raw:?}"
                )))
            }
            _ => {
                return Err(ValueError::Message(format!(
                    "unknown unit {unit:?} in duration {raw:?}"
                )))
            }
        };

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ValueError::range(kind, raw))?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| ValueError::range(kind, raw))?;

        if !fraction.is_empty() {
            let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            let numerator: u128 = fraction
                .parse()
                .map_err(|_| ValueError::syntax(kind, raw))?;
            nanos += numerator * scale / 10u128.pow(fraction.len() as u32);
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| ValueError::range(kind, raw))?;
    }

    if negative && total != 0 {
        return Err(ValueError::Message(format!(
            "negative duration {raw:?} is not supported"
        )));
    }

    let seconds =
        u64::try_from(total / NANOS_PER_SECOND).map_err(|_| ValueError::range(kind, raw))?;
    Ok(Duration::new(seconds, (total % NANOS_PER_SECOND) as u32))
}

/// Render in the form `72h3m0.5s`, switching to a sub-second unit below one second.
pub(crate) fn format_duration(duration: &Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_SECOND {
        let (unit, scale) = if nanos < 1_000 {
            ("ns", 1)
        } else if nanos < 1_000_000 {
            ("µs", 1_000)
        } else {
            ("ms", 1_000_000)
        };

        return format!("{}{unit}", decimal(nanos, scale));
    }

    let seconds = duration.as_secs();
    let hours = seconds / 3_600;
    let minutes = (seconds / 60) % 60;
    let mut out = String::default();

    if hours > 0 {
        out.push_str(&format!("{hours}h{minutes}m"));
    } else if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }

    let remainder = u128::from(seconds % 60) * NANOS_PER_SECOND + u128::from(duration.subsec_nanos());
    out.push_str(&decimal(remainder, NANOS_PER_SECOND));
    out.push('s');
    out
}

fn decimal(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let fraction = value % scale;

    if fraction == 0 {
        return whole.to_string();
    }

    let width = scale.to_string().len() - 1;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
