//! Weighted links between documents
//!
//! Link text format:
//! - `ref` links to `ref` with weight 1 (e.g., `intro`)
//! - `ref(weight)` links with an explicit positive weight (e.g., `abc1(34)`)
//!
//! References are lowercased and must start with a letter, followed by
//! letters, digits or underscores. Links compare and order by reference only.
//!
//! Letters are alphabetic characters that are not numeric, and digits are
//! numeric characters that are not alphabetic, so letter-like numerals such
//! as `Ⅻ` are rejected everywhere. Combining marks with the Unicode
//! `Alphabetic` property (e.g. U+0345) still count as letters, and
//! non-decimal numerics such as `²` still count as digits.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LinkError {
    #[error("Link reference cannot be empty")]
    EmptyReference,

    #[error("Link weight must be positive, got {0}")]
    NonPositiveWeight(i64),

    #[error("Missing closing parenthesis in link: '{0}'")]
    UnclosedWeight(String),

    #[error("Invalid link weight: '{0}'")]
    InvalidWeight(String),

    #[error("Invalid link reference: '{0}'")]
    InvalidReference(String),
}

/// Returns true if `id` starts with a letter and continues with letters,
/// digits or underscores
pub fn is_valid_identifier(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if is_letter(first) => {}
        _ => return false,
    }
    chars.all(|c| is_letter(c) || is_digit(c) || c == '_')
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_numeric()
}

fn is_digit(c: char) -> bool {
    c.is_numeric() && !c.is_alphabetic()
}

/// A reference to another document with a positive weight
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    #[serde(rename = "ref")]
    reference: String,
    weight: u32,
}

impl Link {
    /// Creates a link with the default weight of 1
    pub fn new(reference: impl Into<String>) -> Result<Self, LinkError> {
        let reference = reference.into();
        if reference.is_empty() {
            return Err(LinkError::EmptyReference);
        }
        Ok(Self {
            reference,
            weight: 1,
        })
    }

    /// Creates a link with an explicit weight, which must be positive and
    /// fit in a `u32`
    pub fn weighted(reference: impl Into<String>, weight: i64) -> Result<Self, LinkError> {
        let mut link = Self::new(reference)?;
        if weight <= 0 {
            return Err(LinkError::NonPositiveWeight(weight));
        }
        link.weight =
            u32::try_from(weight).map_err(|_| LinkError::InvalidWeight(weight.to_string()))?;
        Ok(link)
    }

    /// Returns the referenced document name
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for Link {}

impl PartialOrd for Link {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Link {
    fn cmp(&self, other: &Self) -> Ordering {
        self.reference.cmp(&other.reference)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.reference, self.weight)
    }
}

impl FromStr for Link {
    type Err = LinkError;

    /// Parses link text, lowercasing the reference
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (reference, weight) = match s.find('(') {
            Some(open) => {
                if !s.ends_with(')') {
                    return Err(LinkError::UnclosedWeight(s.to_string()));
                }
                let digits = &s[open + 1..s.len() - 1];
                let weight: i32 = digits
                    .parse()
                    .map_err(|_| LinkError::InvalidWeight(digits.to_string()))?;
                (&s[..open], Some(weight))
            }
            None => (s, None),
        };

        let reference = reference.to_lowercase();
        if !is_valid_identifier(&reference) {
            return Err(LinkError::InvalidReference(reference));
        }

        match weight {
            Some(weight) => Self::weighted(reference, i64::from(weight)),
            None => Self::new(reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weight_is_one() {
        let link = Link::new("intro").unwrap();
        assert_eq!(link.reference(), "intro");
        assert_eq!(link.weight(), 1);
    }

    #[test]
    fn weighted_requires_positive_weight() {
        assert_eq!(Link::weighted("a", 5).unwrap().weight(), 5);
        assert_eq!(Link::weighted("a", 0), Err(LinkError::NonPositiveWeight(0)));
        assert_eq!(Link::weighted("a", -2), Err(LinkError::NonPositiveWeight(-2)));
    }

    #[test]
    fn weighted_rejects_overflow_as_invalid() {
        let err = Link::weighted("a", 5_000_000_000).unwrap_err();
        assert_eq!(err, LinkError::InvalidWeight("5000000000".to_string()));
        assert_eq!(err.to_string(), "Invalid link weight: '5000000000'");
        assert_eq!(Link::weighted("a", i64::from(u32::MAX)).unwrap().weight(), u32::MAX);
    }

    #[test]
    fn errors_are_cloneable() {
        let err = "ok(0)".parse::<Link>().unwrap_err();
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn empty_reference_rejected() {
        assert_eq!(Link::new(""), Err(LinkError::EmptyReference));
        assert_eq!(Link::weighted("", 3), Err(LinkError::EmptyReference));
    }

    #[test]
    fn equality_ignores_weight() {
        let a = Link::weighted("x", 3).unwrap();
        let b = Link::weighted("x", 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_ne!(a, Link::weighted("y", 3).unwrap());
    }

    #[test]
    fn orders_by_reference() {
        let a = Link::weighted("alpha", 9).unwrap();
        let b = Link::new("beta").unwrap();
        assert!(a < b);
    }

    #[test]
    fn display_format() {
        assert_eq!(Link::weighted("abc1", 34).unwrap().to_string(), "abc1(34)");
        assert_eq!(Link::new("xyz").unwrap().to_string(), "xyz(1)");
    }

    #[test]
    fn parse_plain_and_weighted() {
        let plain: Link = "Intro".parse().unwrap();
        assert_eq!(plain.reference(), "intro");
        assert_eq!(plain.weight(), 1);

        let weighted: Link = "AB1(5)".parse().unwrap();
        assert_eq!(weighted.reference(), "ab1");
        assert_eq!(weighted.weight(), 5);

        let padded: Link = "c_d(007)".parse().unwrap();
        assert_eq!(padded.weight(), 7);
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert!(matches!("ok(3".parse::<Link>(), Err(LinkError::UnclosedWeight(_))));
        assert!(matches!("ok2()".parse::<Link>(), Err(LinkError::InvalidWeight(_))));
        assert!(matches!("ok(x)".parse::<Link>(), Err(LinkError::InvalidWeight(_))));
        assert!(matches!("ok(3)(4)".parse::<Link>(), Err(LinkError::InvalidWeight(_))));
        assert!(matches!("ok(99999999999)".parse::<Link>(), Err(LinkError::InvalidWeight(_))));
        assert!(matches!("ok(0)".parse::<Link>(), Err(LinkError::NonPositiveWeight(0))));
        assert!(matches!("ok(-1)".parse::<Link>(), Err(LinkError::NonPositiveWeight(-1))));
        assert!(matches!("_bad".parse::<Link>(), Err(LinkError::InvalidReference(_))));
        assert!(matches!("1st".parse::<Link>(), Err(LinkError::InvalidReference(_))));
        assert!(matches!("a-b".parse::<Link>(), Err(LinkError::InvalidReference(_))));
        assert!(matches!("(4)".parse::<Link>(), Err(LinkError::InvalidReference(_))));
        assert!(matches!("".parse::<Link>(), Err(LinkError::InvalidReference(_))));
    }

    #[test]
    fn identifier_rule() {
        assert!(is_valid_identifier("a"));
        assert!(is_valid_identifier("doc_2"));
        assert!(is_valid_identifier("źródło"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("_x"));
        assert!(!is_valid_identifier("9x"));
        assert!(!is_valid_identifier("x.y"));
    }

    #[test]
    fn identifier_rejects_letter_like_numerals() {
        assert!(!is_valid_identifier("Ⅻ"));
        assert!(!is_valid_identifier("aⅫ"));
        assert!(is_valid_identifier("a9"));
        assert!(is_valid_identifier("x\u{0661}"));
    }

    #[test]
    fn serializes_with_ref_key() {
        let link = Link::weighted("home", 2).unwrap();
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            serde_json::json!({"ref": "home", "weight": 2})
        );
    }
}
