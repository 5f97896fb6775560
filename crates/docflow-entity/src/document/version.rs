//! Revision version numbers ("major.minor").

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use docflow_core::AppError;

/// A "major.minor" revision version.
///
/// Minor component zero marks a major revision. The first revision of any
/// document is always `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionNumber {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
}

impl VersionNumber {
    /// The initial version of every document.
    pub const INITIAL: VersionNumber = VersionNumber { major: 1, minor: 0 };

    /// The next version after this one.
    ///
    /// A major bump increments the major component and resets minor to
    /// zero; a minor bump increments the minor component.
    pub fn next(self, is_major: bool) -> VersionNumber {
        if is_major {
            VersionNumber {
                major: self.major + 1,
                minor: 0,
            }
        } else {
            VersionNumber {
                major: self.major,
                minor: self.minor + 1,
            }
        }
    }

    /// Whether this is a major revision (minor component is zero).
    pub fn is_major(self) -> bool {
        self.minor == 0
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for VersionNumber {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::validation(format!("Invalid version number: '{s}'"));
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        Ok(VersionNumber {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_bump() {
        let v: VersionNumber = "1.0".parse().unwrap();
        assert_eq!(v.next(false).to_string(), "1.1");
    }

    #[test]
    fn test_major_bump_resets_minor() {
        let v: VersionNumber = "1.3".parse().unwrap();
        assert_eq!(v.next(true).to_string(), "2.0");
    }

    #[test]
    fn test_initial() {
        assert_eq!(VersionNumber::INITIAL.to_string(), "1.0");
        assert!(VersionNumber::INITIAL.is_major());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("1".parse::<VersionNumber>().is_err());
        assert!("a.b".parse::<VersionNumber>().is_err());
        assert!("1.2.3".parse::<VersionNumber>().is_err());
    }

    #[test]
    fn test_ordering() {
        let a: VersionNumber = "1.9".parse().unwrap();
        let b: VersionNumber = "2.0".parse().unwrap();
        assert!(a < b);
    }
}
