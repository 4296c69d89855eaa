//! Parsing of user-typed keys and ranges.

use std::sync::OnceLock;

use ordex_core::config::KEY_RANGE;
use regex::Regex;

use crate::{Error, Result};

/// Parses a key, accepting integers in `1..=999` with surrounding whitespace.
pub fn parse_key(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    let key: u32 = trimmed
        .parse()
        .map_err(|_| Error::InvalidInput(format!("not a number: {:?}", trimmed)))?;
    if !KEY_RANGE.contains(&key) {
        return Err(Error::InvalidInput(format!(
            "key must be between {} and {}, got {}",
            KEY_RANGE.start(),
            KEY_RANGE.end(),
            key
        )));
    }
    Ok(key)
}

const RANGE_PATTERN: &str = r"([0-9]+)\s*[-~到]\s*([0-9]+)";

static RANGE: OnceLock<Regex> = OnceLock::new();

fn range_regex() -> Result<&'static Regex> {
    if let Some(re) = RANGE.get() {
        return Ok(re);
    }
    let re = Regex::new(RANGE_PATTERN).map_err(|e| Error::InvalidInput(e.to_string()))?;
    Ok(RANGE.get_or_init(|| re))
}

/// Parses a range such as `"10-50"`, `"10~50"` or `"10 到 50"`.
///
/// The first `<number> <separator> <number>` found anywhere in the input is
/// used; whitespace around the separator is allowed. Bounds are returned in
/// the order written, so `"50-10"` yields `(50, 10)`.
pub fn parse_range(input: &str) -> Result<(u32, u32)> {
    let caps = range_regex()?.captures(input).ok_or_else(|| {
        Error::InvalidInput(format!(
            "expected a range like 10-50 or 10~50, got {:?}",
            input
        ))
    })?;
    Ok((parse_bound(&caps[1])?, parse_bound(&caps[2])?))
}

fn parse_bound(digits: &str) -> Result<u32> {
    digits
        .parse()
        .map_err(|_| Error::InvalidInput(format!("range bound out of range: {}", digits)))
}
