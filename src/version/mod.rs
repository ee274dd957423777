// src/version/mod.rs

//! Version handling for dpkg-style package versions
//!
//! This module provides version parsing and comparison following the dpkg
//! ordering rules, the relation operators used in abbs dependency
//! declarations, and the full version formatting used by the store.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed dpkg version with epoch, upstream version and revision
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DpkgVersion {
    pub epoch: u64,
    pub upstream: String,
    pub revision: Option<String>,
}

impl DpkgVersion {
    /// Parse a dpkg version string
    ///
    /// Format: [epoch:]upstream[-revision]
    /// Examples:
    /// - "1.2.3" → epoch=0, upstream="1.2.3", revision=None
    /// - "2:1.2.3" → epoch=2, upstream="1.2.3", revision=None
    /// - "1.2.3-4" → epoch=0, upstream="1.2.3", revision=Some("4")
    /// - "1:2.3-rc1-5" → epoch=1, upstream="2.3-rc1", revision=Some("5")
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::invalid_version(s, "empty version string"));
        }

        let (epoch, rest) = match s.split_once(':') {
            Some(("", rest)) => (0, rest),
            Some((e, rest)) => {
                let epoch = e
                    .parse::<u64>()
                    .map_err(|err| Error::invalid_version(s, format!("bad epoch: {}", err)))?;
                (epoch, rest)
            }
            None => (0, s),
        };

        // The revision starts after the last hyphen; upstream may contain hyphens
        let (upstream, revision) = match rest.rsplit_once('-') {
            Some((u, r)) => (u, Some(r.to_string())),
            None => (rest, None),
        };

        if upstream.is_empty() {
            return Err(Error::invalid_version(s, "empty upstream version"));
        }
        if !upstream.starts_with(|c: char| c.is_ascii_digit()) {
            tracing::debug!("Version '{}' does not start with a digit", s);
        }

        Ok(Self {
            epoch,
            upstream: upstream.to_string(),
            revision,
        })
    }

    /// Compare two dpkg versions
    pub fn compare(&self, other: &DpkgVersion) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| verrevcmp(&self.upstream, &other.upstream))
            .then_with(|| {
                verrevcmp(
                    self.revision.as_deref().unwrap_or(""),
                    other.revision.as_deref().unwrap_or(""),
                )
            })
    }
}

impl fmt::Display for DpkgVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}", self.upstream)?;
        if let Some(ref revision) = self.revision {
            write!(f, "-{}", revision)?;
        }
        Ok(())
    }
}

impl FromStr for DpkgVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Ord for DpkgVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for DpkgVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort weight of a single byte in a non-digit run
///
/// `~` sorts before everything, even the end of the string; letters sort
/// before all other characters.
fn order(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => i32::from(c),
        Some(b'~') => -1,
        Some(c) => i32::from(c) + 256,
    }
}

/// dpkg's comparison of an upstream version or revision string
fn verrevcmp(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let (mut i, mut j) = (0, 0);
    let is_digit = |s: &[u8], k: usize| s.get(k).is_some_and(u8::is_ascii_digit);

    while i < a.len() || j < b.len() {
        // Non-digit prefix
        while (i < a.len() && !is_digit(a, i)) || (j < b.len() && !is_digit(b, j)) {
            let ac = order(a.get(i).copied());
            let bc = order(b.get(j).copied());
            if ac != bc {
                return ac.cmp(&bc);
            }
            i += 1;
            j += 1;
        }

        while a.get(i) == Some(&b'0') {
            i += 1;
        }
        while b.get(j) == Some(&b'0') {
            j += 1;
        }

        // Digit run: the first differing digit decides unless one run is longer
        let mut first_diff = Ordering::Equal;
        while is_digit(a, i) && is_digit(b, j) {
            if first_diff == Ordering::Equal {
                first_diff = a[i].cmp(&b[j]);
            }
            i += 1;
            j += 1;
        }
        if is_digit(a, i) {
            return Ordering::Greater;
        }
        if is_digit(b, j) {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }

    Ordering::Equal
}

/// Relation operators used in abbs dependency declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `<<` or `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `=` or `==`
    Equal,
    /// `>=`
    GreaterOrEqual,
    /// `>>` or `>`
    Greater,
    /// `!=`
    NotEqual,
}

impl Relation {
    /// Check whether the ordering of candidate against reference satisfies
    /// this relation
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Relation::Less => ordering == Ordering::Less,
            Relation::LessOrEqual => ordering != Ordering::Greater,
            Relation::Equal => ordering == Ordering::Equal,
            Relation::GreaterOrEqual => ordering != Ordering::Less,
            Relation::Greater => ordering == Ordering::Greater,
            Relation::NotEqual => ordering != Ordering::Equal,
        }
    }

    /// Check whether `candidate` satisfies `<relation> reference`
    pub fn satisfied_by(self, candidate: &DpkgVersion, reference: &DpkgVersion) -> bool {
        self.holds(candidate.compare(reference))
    }
}

impl FromStr for Relation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "<<" | "<" => Ok(Relation::Less),
            "<=" => Ok(Relation::LessOrEqual),
            "=" | "==" => Ok(Relation::Equal),
            ">=" => Ok(Relation::GreaterOrEqual),
            ">>" | ">" => Ok(Relation::Greater),
            "!=" => Ok(Relation::NotEqual),
            other => Err(Error::InvalidRelation(other.to_string())),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Relation::Less => "<<",
            Relation::LessOrEqual => "<=",
            Relation::Equal => "=",
            Relation::GreaterOrEqual => ">=",
            Relation::Greater => ">>",
            Relation::NotEqual => "!=",
        };
        f.write_str(op)
    }
}

/// Assemble the full version string of a package version row
///
/// Epoch and release are omitted when empty or `0`.
pub fn full_version(version: &str, release: Option<&str>, epoch: Option<&str>) -> String {
    let mut full = String::new();
    if let Some(epoch) = epoch.filter(|e| !e.is_empty() && *e != "0") {
        full.push_str(epoch);
        full.push(':');
    }
    full.push_str(version);
    if let Some(release) = release.filter(|r| !r.is_empty() && *r != "0") {
        full.push('-');
        full.push_str(release);
    }
    full
}

/// Evaluate `candidate <relop> reference`
///
/// An empty relation is unconstrained and always holds. Versions that do
/// not parse never satisfy a relation.
pub fn check_relation(candidate: &str, relop: &str, reference: &str) -> Result<bool> {
    if relop.trim().is_empty() {
        return Ok(true);
    }
    let relation: Relation = relop.parse()?;

    match (DpkgVersion::parse(candidate), DpkgVersion::parse(reference)) {
        (Ok(c), Ok(r)) => Ok(relation.satisfied_by(&c, &r)),
        (Err(e), _) | (_, Err(e)) => {
            tracing::debug!("Treating relation as unmet: {}", e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(a: &str, b: &str) -> Ordering {
        DpkgVersion::parse(a)
            .unwrap()
            .compare(&DpkgVersion::parse(b).unwrap())
    }

    #[test]
    fn test_parse_simple() {
        let v = DpkgVersion::parse("1.2.3").unwrap();
        assert_eq!(v.epoch, 0);
        assert_eq!(v.upstream, "1.2.3");
        assert_eq!(v.revision, None);
    }

    #[test]
    fn test_parse_full() {
        let v = DpkgVersion::parse("1:2.3-rc1-5").unwrap();
        assert_eq!(v.epoch, 1);
        assert_eq!(v.upstream, "2.3-rc1");
        assert_eq!(v.revision, Some("5".to_string()));
    }

    #[test]
    fn test_parse_empty_epoch() {
        let v = DpkgVersion::parse(":1.0-2").unwrap();
        assert_eq!(v.epoch, 0);
        assert_eq!(v.to_string(), "1.0-2");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DpkgVersion::parse("").is_err());
        assert!(DpkgVersion::parse("x:1.0").is_err());
        assert!(DpkgVersion::parse("1:-3").is_err());
    }

    #[test]
    fn test_compare_epoch_wins() {
        assert_eq!(cmp("1:1.0", "9.9"), Ordering::Greater);
    }

    #[test]
    fn test_compare_numeric_runs() {
        assert_eq!(cmp("1.10", "1.9"), Ordering::Greater);
        assert_eq!(cmp("1.002", "1.2"), Ordering::Equal);
        assert_eq!(cmp("2.0", "2.0.1"), Ordering::Less);
    }

    #[test]
    fn test_compare_tilde_sorts_first() {
        assert_eq!(cmp("1.0~rc1", "1.0"), Ordering::Less);
        assert_eq!(cmp("1.0~~", "1.0~"), Ordering::Less);
        assert_eq!(cmp("1.0~rc1", "1.0~rc2"), Ordering::Less);
    }

    #[test]
    fn test_compare_letters_before_symbols() {
        assert_eq!(cmp("1.0a", "1.0+"), Ordering::Less);
        assert_eq!(cmp("1.0+b1", "1.0"), Ordering::Greater);
    }

    #[test]
    fn test_compare_revisions() {
        assert_eq!(cmp("1.0-1", "1.0-2"), Ordering::Less);
        assert_eq!(cmp("1.0", "1.0-0"), Ordering::Equal);
    }

    #[test]
    fn test_relation_parse_and_display() {
        assert_eq!("<<".parse::<Relation>().unwrap(), Relation::Less);
        assert_eq!("<".parse::<Relation>().unwrap(), Relation::Less);
        assert_eq!("==".parse::<Relation>().unwrap(), Relation::Equal);
        assert_eq!(">".parse::<Relation>().unwrap().to_string(), ">>");
        assert!(matches!(
            "=~".parse::<Relation>(),
            Err(Error::InvalidRelation(_))
        ));
    }

    #[test]
    fn test_check_relation() {
        assert!(check_relation("2.0", ">=", "1.5").unwrap());
        assert!(!check_relation("1.0", ">=", "1.5").unwrap());
        assert!(check_relation("1:0.1", ">>", "5.0").unwrap());
        assert!(check_relation("1.0", "", "9.9").unwrap());
        assert!(!check_relation("1.0", "=", "x:1").unwrap());
        assert!(check_relation("1.0", "~>", "1.0").is_err());
    }

    #[test]
    fn test_full_version() {
        assert_eq!(full_version("1.2", None, None), "1.2");
        assert_eq!(full_version("1.2", Some("0"), Some("0")), "1.2");
        assert_eq!(full_version("1.2", Some("3"), Some("1")), "1:1.2-3");
        assert_eq!(full_version("1.2", Some(""), Some("2")), "2:1.2");
    }
}
