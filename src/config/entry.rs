//! Configuration values.
//!
//! An [`Entry`] is whatever scalar sat under a key in the config file. Typed
//! access goes through the `as_*` coercions, which never fail: a value of the
//! wrong shape reads as the zero value of the requested type.

use std::fmt;
use std::time::Duration;

use serde::de::{self, Deserialize, Deserializer, Visitor};

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Entry {
    /// Missing key or explicit `null`.
    #[default]
    Empty,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
}

impl Entry {
    /// Returns true for the zero-value entry handed out for absent keys.
    pub fn is_empty(&self) -> bool {
        matches!(self, Entry::Empty)
    }

    /// String value, or `""` if this is not a string.
    pub fn as_str(&self) -> &str {
        match self {
            Entry::Str(s) => s,
            _ => "",
        }
    }

    /// Integer value, or `0` if this is not an integer.
    pub fn as_int(&self) -> i64 {
        match self {
            Entry::Int(v) => *v,
            _ => 0,
        }
    }

    /// Float value. Integers widen; anything else is `0.0`.
    pub fn as_float(&self) -> f64 {
        match self {
            Entry::Float(v) => *v,
            Entry::Int(v) => *v as f64,
            _ => 0.0,
        }
    }

    /// Boolean value, or `false` if this is not a boolean.
    pub fn as_bool(&self) -> bool {
        matches!(self, Entry::Bool(true))
    }

    /// Duration value.
    ///
    /// Strings such as `"15s"` or `"250ms"` are parsed since YAML has no
    /// duration type. Anything unparseable is `Duration::ZERO`.
    pub fn as_duration(&self) -> Duration {
        match self {
            Entry::Duration(d) => *d,
            Entry::Str(s) => parse_duration(s).unwrap_or(Duration::ZERO),
            _ => Duration::ZERO,
        }
    }
}

impl From<&str> for Entry {
    fn from(value: &str) -> Self {
        Entry::Str(value.to_string())
    }
}

impl From<String> for Entry {
    fn from(value: String) -> Self {
        Entry::Str(value)
    }
}

impl From<i64> for Entry {
    fn from(value: i64) -> Self {
        Entry::Int(value)
    }
}

impl From<f64> for Entry {
    fn from(value: f64) -> Self {
        Entry::Float(value)
    }
}

impl From<bool> for Entry {
    fn from(value: bool) -> Self {
        Entry::Bool(value)
    }
}

impl From<Duration> for Entry {
    fn from(value: Duration) -> Self {
        Entry::Duration(value)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Empty => Ok(()),
            Entry::Str(s) => f.write_str(s),
            Entry::Int(v) => write!(f, "{}", v),
            Entry::Float(v) => write!(f, "{}", v),
            Entry::Bool(v) => write!(f, "{}", v),
            Entry::Duration(d) => write!(f, "{:?}", d),
        }
    }
}

/// Parse a duration string such as `"10s"`, `"5m"`, `"1h"` or `"100ms"`.
///
/// Segments can be combined (`"1m30s"`) and carry a fraction (`"1.5s"`).
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().all(is_number_char) {
        return nanos_to_duration(scaled_nanos(s, NANOS_PER_SEC)?);
    }

    let mut total: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let unit_at = rest.find(|c: char| !is_number_char(c)).unwrap_or(rest.len());
        let (number, tail) = rest.split_at(unit_at);
        let next_at = tail.find(is_number_char).unwrap_or(tail.len());
        let (unit, next) = tail.split_at(next_at);

        let unit_nanos = match unit.trim().to_lowercase().as_str() {
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 60 * 60 * NANOS_PER_SEC,
            "d" => 24 * 60 * 60 * NANOS_PER_SEC,
            _ => return None,
        };
        total = total.checked_add(scaled_nanos(number, unit_nanos)?)?;
        rest = next;
    }

    nanos_to_duration(total)
}

const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// `number` (digits with an optional fraction) times `unit_nanos`.
fn scaled_nanos(number: &str, unit_nanos: u128) -> Option<u128> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(unit_nanos)?;
    if !fraction.is_empty() {
        let digits: u128 = fraction.parse().ok()?;
        let scale = 10u128.checked_pow(u32::try_from(fraction.len()).ok()?)?;
        nanos = nanos.checked_add(digits.checked_mul(unit_nanos)? / scale)?;
    }
    Some(nanos)
}

fn nanos_to_duration(nanos: u128) -> Option<Duration> {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).ok()?;
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Some(Duration::new(secs, subsec))
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = Entry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar configuration value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Entry, E> {
        Ok(Entry::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Entry, E> {
        Ok(Entry::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Entry, E> {
        i64::try_from(v)
            .map(Entry::Int)
            .map_err(|_| E::custom(format!("integer {} out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Entry, E> {
        Ok(Entry::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Entry, E> {
        Ok(Entry::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Entry, E> {
        Ok(Entry::Str(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Entry, E> {
        Ok(Entry::Empty)
    }

    fn visit_none<E: de::Error>(self) -> Result<Entry, E> {
        Ok(Entry::Empty)
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_entry_coerces_to_zero_values() {
        let entry = Entry::default();
        assert!(entry.is_empty());
        assert_eq!(entry.as_str(), "");
        assert_eq!(entry.as_int(), 0);
        assert_eq!(entry.as_float(), 0.0);
        assert!(!entry.as_bool());
        assert_eq!(entry.as_duration(), Duration::ZERO);
    }

    #[test]
    fn mismatched_coercions_do_not_panic() {
        let entry = Entry::from("8080");
        assert_eq!(entry.as_int(), 0);
        assert!(!entry.as_bool());

        let entry = Entry::from(true);
        assert_eq!(entry.as_str(), "");
        assert_eq!(entry.as_duration(), Duration::ZERO);
    }

    #[test]
    fn duration_strings_are_parsed() {
        assert_eq!(Entry::from("15s").as_duration(), Duration::from_secs(15));
        assert_eq!(Entry::from("250ms").as_duration(), Duration::from_millis(250));
        assert_eq!(Entry::from("2m").as_duration(), Duration::from_secs(120));
        assert_eq!(Entry::from("1h").as_duration(), Duration::from_secs(3600));
        assert_eq!(Entry::from("30").as_duration(), Duration::from_secs(30));
        assert_eq!(Entry::from("soon").as_duration(), Duration::ZERO);
        assert_eq!(Entry::from("5 fortnights").as_duration(), Duration::ZERO);
    }

    #[test]
    fn compound_and_fractional_durations() {
        assert_eq!(parse_duration("1m30s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h 15m"), Some(Duration::from_secs(4500)));
        assert_eq!(parse_duration("1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_duration("0.25"), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration("2.5ms"), Some(Duration::from_micros(2500)));
        assert_eq!(parse_duration("1.2.3s"), None);
        assert_eq!(parse_duration("s"), None);
        assert_eq!(parse_duration("-5s"), None);
    }

    #[test]
    fn integers_widen_to_float() {
        assert_eq!(Entry::from(3i64).as_float(), 3.0);
        assert_eq!(Entry::from(0.5).as_float(), 0.5);
    }

    #[test]
    fn deserializes_yaml_scalars() {
        let entries: Vec<Entry> =
            serde_yaml::from_str("[\"host\", 6560, 1.5, true, ~, 15s]").unwrap();
        assert_eq!(
            entries,
            vec![
                Entry::from("host"),
                Entry::Int(6560),
                Entry::Float(1.5),
                Entry::Bool(true),
                Entry::Empty,
                Entry::from("15s"),
            ]
        );
    }

    #[test]
    fn rejects_nested_values() {
        let result: Result<Entry, _> = serde_yaml::from_str("[1, 2]");
        assert!(result.is_err());
    }
}
