use crate::error::Result;
use std::fmt;

/// Semantic version of a package release.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(semver::Version);

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version(semver::Version::new(major, minor, patch))
    }

    pub fn parse(version: &str) -> Result<Self> {
        // Tags are commonly written as `v1.2.3`
        let trimmed = version.trim();
        let raw = trimmed.strip_prefix('v').unwrap_or(trimmed);
        Ok(Version(semver::Version::parse(raw)?))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    #[test]
    fn test_version_parsing() {
        let v1 = Version::parse("1.0.0").unwrap();
        let v2 = Version::parse("v1.0.1").unwrap();
        assert!(v2 > v1);
        assert_eq!(v2.to_string(), "1.0.1");
    }

    #[test]
    fn rejects_malformed_version() {
        let err = Version::parse("one.two").unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidVersion(_)));
    }
}
