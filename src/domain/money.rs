use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// For EUR/USD, 1 unit = 100 cents, so $50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
///
/// More than two decimal places is an error, not a rounding: amounts with
/// sub-cent precision are rejected at the boundary instead of silently
/// truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    // A single leading minus; anything else ("--5", "+5") is malformed and
    // falls through to the digit check below.
    let (negative, input) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let parts: Vec<&str> = input.split('.').collect();
    let cents = match parts.len() {
        1 => {
            // No decimal point, treat as whole units
            parse_digits(parts[0])?
                .checked_mul(100)
                .ok_or(ParseCentsError::OutOfRange)?
        }
        2 => {
            let units: i64 = if parts[0].is_empty() {
                0
            } else {
                parse_digits(parts[0])?
            };

            let decimal_str = parts[1];
            let decimal_cents: i64 = match decimal_str.len() {
                0 => 0,
                // Single digit like "5" means 50 cents
                1 => parse_digits(decimal_str)? * 10,
                2 => parse_digits(decimal_str)?,
                _ => return Err(ParseCentsError::TooManyDecimals),
            };

            units
                .checked_mul(100)
                .and_then(|c| c.checked_add(decimal_cents))
                .ok_or(ParseCentsError::OutOfRange)?
        }
        _ => return Err(ParseCentsError::InvalidFormat),
    };

    Ok(if negative { -cents } else { cents })
}

/// Parse an unsigned run of digits. Sign characters are handled (once) by the
/// caller, so anything `i64::parse` would accept beyond plain digits ("-5",
/// "+5") is malformed here.
fn parse_digits(s: &str) -> Result<i64, ParseCentsError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat);
    }
    s.parse().map_err(|_| ParseCentsError::OutOfRange)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    TooManyDecimals,
    OutOfRange,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::TooManyDecimals => {
                write!(f, "amounts support at most two decimal places")
            }
            ParseCentsError::OutOfRange => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
