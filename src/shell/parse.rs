use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Negative,
    InvalidDigit,
    Overflow,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Empty        => write!(f, "empty number"),
            ParseError::Negative     => write!(f, "negative address"),
            ParseError::InvalidDigit => write!(f, "invalid digit"),
            ParseError::Overflow     => write!(f, "number too large"),
        }
    }
}

/// Parse an integer with C literal prefixes: `0x`/`0X` hex, leading `0` octal,
/// otherwise decimal. The whole token must be consumed.
pub fn parse_address(token: &str) -> Result<u64, ParseError> {
    let token = token.trim();
    let token = token.strip_prefix('+').unwrap_or(token);
    if token.starts_with('-') {
        return Err(ParseError::Negative);
    }

    let (digits, radix) = if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        (hex, 16)
    } else if token.len() > 1 && token.starts_with('0') {
        (&token[1..], 8)
    } else {
        (token, 10)
    };

    if digits.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut value: u64 = 0;
    for ch in digits.chars() {
        let digit = ch.to_digit(radix).ok_or(ParseError::InvalidDigit)? as u64;
        value = value
            .checked_mul(radix as u64)
            .and_then(|v| v.checked_add(digit))
            .ok_or(ParseError::Overflow)?;
    }
    Ok(value)
}
