//! Status code ranges.
//!
//! A [`StatusCodeRange`] matches a part of the HTTP status code space
//! (`100..=599`). There are five shapes:
//!
//! | shape       | literal     | matches                  |
//! |-------------|-------------|--------------------------|
//! | single      | `404`       | exactly 404              |
//! | bounded     | `400-499`   | 400 up to and incl. 499  |
//! | left-open   | `<=299`     | everything up to 299     |
//! | right-open  | `500+`      | 500 and above            |
//! | universal   | `*`         | everything               |
//!
//! `4xx` style class literals and `>=500` are accepted as well. Ranges are
//! immutable once created, and compare structurally.
//!
//! How two ranges relate to each other (conflict, specificity) lives in
//! [`algebra`].
//!
//! ```rust
//! use gosub_outcomes::StatusCodeRange;
//!
//! let r: StatusCodeRange = "4xx".parse().unwrap();
//! assert!(r.contains(404));
//! assert_eq!(r, StatusCodeRange::bounded(400, 499).unwrap());
//! assert_eq!(r.to_string(), "400-499");
//! ```
pub mod algebra;

use crate::errors::OutcomeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Lowest legal status code.
pub const MIN_CODE: u16 = 100;
/// Highest legal status code.
pub const MAX_CODE: u16 = 599;

/// Returns an error when `code` is outside the legal status code domain.
pub fn check_code(code: u16) -> Result<u16, OutcomeError> {
    if (MIN_CODE..=MAX_CODE).contains(&code) {
        Ok(code)
    } else {
        Err(OutcomeError::invalid(format!(
            "status code {code} is out of range (expected {MIN_CODE}..={MAX_CODE})"
        )))
    }
}

/// Matcher over the HTTP status code space. A missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCodeRange {
    lower: Option<u16>,
    upper: Option<u16>,
}

impl StatusCodeRange {
    /// Creates a range from raw bounds, validating the domain and ordering.
    pub fn new(lower: Option<u16>, upper: Option<u16>) -> Result<Self, OutcomeError> {
        let lower = lower.map(check_code).transpose()?;
        let upper = upper.map(check_code).transpose()?;

        if let (Some(l), Some(u)) = (lower, upper) {
            if l > u {
                return Err(OutcomeError::invalid(format!(
                    "lower bound {l} is larger than upper bound {u}"
                )));
            }
        }

        Ok(Self { lower, upper })
    }

    pub fn single(code: u16) -> Result<Self, OutcomeError> {
        Self::new(Some(code), Some(code))
    }

    pub fn bounded(lower: u16, upper: u16) -> Result<Self, OutcomeError> {
        Self::new(Some(lower), Some(upper))
    }

    /// Everything up to and including `upper`.
    pub fn at_most(upper: u16) -> Result<Self, OutcomeError> {
        Self::new(None, Some(upper))
    }

    /// Everything from `lower` onwards.
    pub fn at_least(lower: u16) -> Result<Self, OutcomeError> {
        Self::new(Some(lower), None)
    }

    /// Matches every status code.
    pub const fn universal() -> Self {
        Self { lower: None, upper: None }
    }

    /// Range matching exactly the given status.
    pub fn from_status(status: http::StatusCode) -> Result<Self, OutcomeError> {
        Self::single(status.as_u16())
    }

    pub const fn informational() -> Self {
        Self::class(100)
    }
    pub const fn success() -> Self {
        Self::class(200)
    }
    pub const fn redirection() -> Self {
        Self::class(300)
    }
    pub const fn client_error() -> Self {
        Self::class(400)
    }
    pub const fn server_error() -> Self {
        Self::class(500)
    }

    const fn class(base: u16) -> Self {
        Self {
            lower: Some(base),
            upper: Some(base + 99),
        }
    }

    #[inline]
    pub fn lower(&self) -> Option<u16> {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> Option<u16> {
        self.upper
    }

    pub fn is_single(&self) -> bool {
        matches!((self.lower, self.upper), (Some(l), Some(u)) if l == u)
    }

    pub fn is_bounded(&self) -> bool {
        matches!((self.lower, self.upper), (Some(l), Some(u)) if l != u)
    }

    pub fn is_left_open(&self) -> bool {
        self.lower.is_none() && self.upper.is_some()
    }

    pub fn is_right_open(&self) -> bool {
        self.lower.is_some() && self.upper.is_none()
    }

    pub fn is_universal(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// True when both bounds are present (single or bounded).
    pub fn is_closed(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    /// Returns true when `code` falls within this range.
    pub fn contains(&self, code: u16) -> bool {
        self.lower.map_or(true, |l| code >= l) && self.upper.map_or(true, |u| code <= u)
    }
}

impl fmt::Display for StatusCodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Some(l), Some(u)) if l == u => write!(f, "{l}"),
            (Some(l), Some(u)) => write!(f, "{l}-{u}"),
            (None, Some(u)) => write!(f, "<={u}"),
            (Some(l), None) => write!(f, "{l}+"),
            (None, None) => write!(f, "*"),
        }
    }
}

impl FromStr for StatusCodeRange {
    type Err = OutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let code = |v: &str| -> Result<u16, OutcomeError> {
            let v = v.trim();
            // `u16::from_str` takes a leading `+`, literals don't
            if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
                return Err(OutcomeError::invalid(format!("invalid status code range literal: {s:?}")));
            }
            v.parse::<u16>()
                .map_err(|_| OutcomeError::invalid(format!("invalid status code range literal: {s:?}")))
        };

        if s == "*" {
            return Ok(Self::universal());
        }
        if let Some(rest) = s.strip_prefix("<=") {
            return Self::at_most(code(rest)?);
        }
        if let Some(rest) = s.strip_prefix(">=") {
            return Self::at_least(code(rest)?);
        }
        if let Some(rest) = s.strip_suffix('+') {
            return Self::at_least(code(rest)?);
        }
        if let Some(class) = s.strip_suffix("xx").or_else(|| s.strip_suffix("XX")) {
            if class.len() == 1 {
                let base = code(class)? * 100;
                return Self::bounded(base, base + 99);
            }
        }
        if let Some((lo, hi)) = s.split_once('-') {
            return Self::bounded(code(lo)?, code(hi)?);
        }

        Self::single(code(s)?)
    }
}

impl TryFrom<&str> for StatusCodeRange {
    type Error = OutcomeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for StatusCodeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StatusCodeRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a list of range literals, failing on the first bad one.
pub fn parse_ranges<I, S>(literals: I) -> Result<Vec<StatusCodeRange>, OutcomeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    literals.into_iter().map(|s| s.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &str) -> StatusCodeRange {
        s.parse().unwrap()
    }

    #[test]
    fn predicates_match_shape() {
        assert!(r("404").is_single());
        assert!(r("400-499").is_bounded());
        assert!(r("<=299").is_left_open());
        assert!(r("500+").is_right_open());
        assert!(r("*").is_universal());

        // exactly one predicate holds per shape
        for lit in ["404", "400-499", "<=299", "500+", "*"] {
            let x = r(lit);
            let n = [x.is_single(), x.is_bounded(), x.is_left_open(), x.is_right_open(), x.is_universal()]
                .iter()
                .filter(|b| **b)
                .count();
            assert_eq!(n, 1, "{lit}");
        }
    }

    #[test]
    fn contains_per_shape() {
        assert!(r("404").contains(404));
        assert!(!r("404").contains(405));

        assert!(r("400-499").contains(400));
        assert!(r("400-499").contains(499));
        assert!(!r("400-499").contains(500));

        assert!(r("<=299").contains(100));
        assert!(r("<=299").contains(299));
        assert!(!r("<=299").contains(300));

        assert!(r("500+").contains(599));
        assert!(!r("500+").contains(499));

        assert!(r("*").contains(100));
        assert!(r("*").contains(599));
    }

    #[test]
    fn rejects_out_of_domain_bounds() {
        assert!(matches!(StatusCodeRange::single(99), Err(OutcomeError::InvalidArgument(_))));
        assert!(matches!(StatusCodeRange::single(600), Err(OutcomeError::InvalidArgument(_))));
        assert!(matches!(StatusCodeRange::at_least(0), Err(OutcomeError::InvalidArgument(_))));
        assert!(StatusCodeRange::single(100).is_ok());
        assert!(StatusCodeRange::single(599).is_ok());
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(matches!(StatusCodeRange::bounded(499, 400), Err(OutcomeError::InvalidArgument(_))));
    }

    #[test]
    fn equal_bounds_make_a_single() {
        assert_eq!(StatusCodeRange::bounded(418, 418).unwrap(), r("418"));
    }

    #[test]
    fn parses_all_literal_forms() {
        assert_eq!(r(" 404 "), StatusCodeRange::single(404).unwrap());
        assert_eq!(r("400-499"), StatusCodeRange::bounded(400, 499).unwrap());
        assert_eq!(r("4xx"), StatusCodeRange::client_error());
        assert_eq!(r("5XX"), StatusCodeRange::server_error());
        assert_eq!(r("500+"), StatusCodeRange::at_least(500).unwrap());
        assert_eq!(r(">=500"), StatusCodeRange::at_least(500).unwrap());
        assert_eq!(r("<=299"), StatusCodeRange::at_most(299).unwrap());
        assert_eq!(r("*"), StatusCodeRange::universal());
    }

    #[test]
    fn rejects_garbage_literals() {
        for lit in [
            "", "abc", "4x", "6xx", "400-", "-", "1000", "200-100", "+404", "400-+499", "<=+299", ">=+500", "+4xx",
        ] {
            assert!(lit.parse::<StatusCodeRange>().is_err(), "{lit:?} should not parse");
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        for lit in ["404", "400-499", "<=299", "500+", "*"] {
            assert_eq!(r(lit).to_string(), lit);
        }
    }

    #[test]
    fn serde_uses_literal_form() {
        let ranges = vec![r("2xx"), r("404"), r("500+")];
        let json = serde_json::to_string(&ranges).unwrap();
        assert_eq!(json, r#"["200-299","404","500+"]"#);

        let back: Vec<StatusCodeRange> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ranges);

        assert!(serde_json::from_str::<StatusCodeRange>(r#""700""#).is_err());
    }

    #[test]
    fn from_http_status() {
        let x = StatusCodeRange::from_status(http::StatusCode::NOT_FOUND).unwrap();
        assert_eq!(x, r("404"));
    }

    #[test]
    fn parse_ranges_collects() {
        let v = parse_ranges(["200", "3xx"]).unwrap();
        assert_eq!(v.len(), 2);
        assert!(parse_ranges(["200", "nope"]).is_err());
    }
}
