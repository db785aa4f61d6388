//! Release version and branch classification.
//!
//! The build system recognizes exactly three version shapes:
//! GA `X.Y.Z`, early access `X.Y.Z-ea.N`, and early access hotfix
//! `X.Y.Z-ea.N.H`. Release branches are named `rhoai-X.Y` with a single
//! digit major and a 1-2 digit minor. Everything else is rejected.

use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};

const BRANCH_PATTERN: &str = r"^rhoai-([0-9])\.([0-9]{1,2})$";
const GA_PATTERN: &str = r"^([0-9]+)\.([0-9]+)\.([0-9]+)$";
const EA_PATTERN: &str = r"^([0-9]+)\.([0-9]+)\.([0-9]+)-ea\.([0-9]+)$";
const EA_HOTFIX_PATTERN: &str = r"^([0-9]+)\.([0-9]+)\.([0-9]+)-ea\.([0-9]+)\.([0-9]+)$";

/// Which of the three supported release shapes a version string matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseKind {
    Ga,
    EarlyAccess,
    EarlyAccessHotfix,
}

impl ReleaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Ga => "ga",
            ReleaseKind::EarlyAccess => "early_access",
            ReleaseKind::EarlyAccessHotfix => "early_access_hotfix",
        }
    }
}

/// A parsed release version. `ea`/`hotfix` are only present for the
/// pre-GA shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ea: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotfix: Option<u32>,
}

impl ReleaseVersion {
    /// Classify a version string into one of the three supported shapes.
    /// The shapes are checked most-specific first so classification is
    /// mutually exclusive.
    pub fn parse(value: &str) -> Result<Self> {
        if let Some(caps) = capture(EA_HOTFIX_PATTERN, value) {
            return Ok(Self {
                major: caps[0],
                minor: caps[1],
                patch: caps[2],
                ea: Some(caps[3]),
                hotfix: Some(caps[4]),
            });
        }

        if let Some(caps) = capture(EA_PATTERN, value) {
            return Ok(Self {
                major: caps[0],
                minor: caps[1],
                patch: caps[2],
                ea: Some(caps[3]),
                hotfix: None,
            });
        }

        if let Some(caps) = capture(GA_PATTERN, value) {
            return Ok(Self {
                major: caps[0],
                minor: caps[1],
                patch: caps[2],
                ea: None,
                hotfix: None,
            });
        }

        Err(Error::version_invalid(value))
    }

    pub fn kind(&self) -> ReleaseKind {
        match (self.ea, self.hotfix) {
            (None, _) => ReleaseKind::Ga,
            (Some(_), None) => ReleaseKind::EarlyAccess,
            (Some(_), Some(_)) => ReleaseKind::EarlyAccessHotfix,
        }
    }

    /// True iff this is the very first early access build of a minor
    /// release line (`X.Y.0-ea.1` exactly).
    pub fn is_first_ea(&self) -> bool {
        self.patch == 0 && self.ea == Some(1) && self.hotfix.is_none()
    }

    /// True iff this version belongs to the given release branch
    /// (major.minor must match).
    pub fn matches_branch(&self, branch: &ReleaseBranch) -> bool {
        self.major == branch.major && self.minor == branch.minor
    }

    /// Ordering via semver semantics: the `-ea.N[.H]` suffix is a valid
    /// semver pre-release, which gives exactly the ordering we need
    /// (every EA build precedes its GA, hotfixes follow their base EA).
    pub fn is_newer_than(&self, other: &ReleaseVersion) -> bool {
        self.to_semver() > other.to_semver()
    }

    fn to_semver(&self) -> semver::Version {
        let mut version = semver::Version::new(
            u64::from(self.major),
            u64::from(self.minor),
            u64::from(self.patch),
        );
        if let Some(ea) = self.ea {
            let tag = match self.hotfix {
                Some(hotfix) => format!("ea.{}.{}", ea, hotfix),
                None => format!("ea.{}", ea),
            };
            if let Ok(pre) = semver::Prerelease::new(&tag) {
                version.pre = pre;
            }
        }
        version
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ea) = self.ea {
            write!(f, "-ea.{}", ea)?;
        }
        if let Some(hotfix) = self.hotfix {
            write!(f, ".{}", hotfix)?;
        }
        Ok(())
    }
}

/// A release branch (`rhoai-X.Y`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseBranch {
    pub major: u32,
    pub minor: u32,
}

impl ReleaseBranch {
    pub fn parse(name: &str) -> Result<Self> {
        let caps = capture(BRANCH_PATTERN, name).ok_or_else(|| Error::branch_invalid(name))?;
        Ok(Self {
            major: caps[0],
            minor: caps[1],
        })
    }

    /// Branch name, e.g. `rhoai-3.4`.
    pub fn name(&self) -> String {
        format!("rhoai-{}.{}", self.major, self.minor)
    }

    /// The token embedded in PipelineRun file names, e.g. `v3-4`.
    pub fn file_token(&self) -> String {
        format!("v{}-{}", self.major, self.minor)
    }

    /// The bare major.minor token used inside YAML content, e.g. `3.4`.
    pub fn version_token(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl fmt::Display for ReleaseBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Validate that a version belongs to a branch, returning both parsed forms.
pub fn check_pairing(branch: &str, version: &str) -> Result<(ReleaseBranch, ReleaseVersion)> {
    let branch = ReleaseBranch::parse(branch)?;
    let version = ReleaseVersion::parse(version)?;
    if !version.matches_branch(&branch) {
        return Err(Error::version_branch_mismatch(branch.name(), version.to_string()));
    }
    Ok((branch, version))
}

/// Run an anchored pattern against a value, parsing every capture group
/// as a number. Returns None if the pattern does not match.
fn capture(pattern: &str, value: &str) -> Option<Vec<u32>> {
    let re = Regex::new(pattern).ok()?;
    let caps = re.captures(value)?;
    let mut numbers = Vec::with_capacity(caps.len() - 1);
    for group in caps.iter().skip(1) {
        numbers.push(group?.as_str().parse().ok()?);
    }
    Some(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_ga() {
        let v = ReleaseVersion::parse("3.4.0").unwrap();
        assert_eq!(v.kind(), ReleaseKind::Ga);
        assert_eq!(v.to_string(), "3.4.0");
    }

    #[test]
    fn classifies_early_access() {
        let v = ReleaseVersion::parse("3.4.0-ea.2").unwrap();
        assert_eq!(v.kind(), ReleaseKind::EarlyAccess);
        assert_eq!(v.ea, Some(2));
        assert_eq!(v.to_string(), "3.4.0-ea.2");
    }

    #[test]
    fn classifies_early_access_hotfix() {
        let v = ReleaseVersion::parse("3.4.0-ea.2.1").unwrap();
        assert_eq!(v.kind(), ReleaseKind::EarlyAccessHotfix);
        assert_eq!(v.ea, Some(2));
        assert_eq!(v.hotfix, Some(1));
        assert_eq!(v.to_string(), "3.4.0-ea.2.1");
    }

    #[test]
    fn rejects_everything_else() {
        for bad in [
            "", "3.4", "3.4.0.1", "3.4.0-ea", "3.4.0-ea.", "3.4.0-rc.1", "v3.4.0",
            "3.4.0-ea.1.1.1", "3.4.0-EA.1", "3.4.0 ", " 3.4.0", " ",
        ] {
            assert!(ReleaseVersion::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn classification_is_exclusive() {
        // Each accepted string maps to exactly one kind
        let cases = [
            ("3.4.1", ReleaseKind::Ga),
            ("3.4.1-ea.1", ReleaseKind::EarlyAccess),
            ("3.4.1-ea.1.2", ReleaseKind::EarlyAccessHotfix),
        ];
        for (input, kind) in cases {
            assert_eq!(ReleaseVersion::parse(input).unwrap().kind(), kind);
        }
    }

    #[test]
    fn is_first_ea_is_exact() {
        assert!(ReleaseVersion::parse("3.4.0-ea.1").unwrap().is_first_ea());
        assert!(!ReleaseVersion::parse("3.4.0-ea.2").unwrap().is_first_ea());
        assert!(!ReleaseVersion::parse("3.4.1-ea.1").unwrap().is_first_ea());
        assert!(!ReleaseVersion::parse("3.4.0-ea.1.1").unwrap().is_first_ea());
        assert!(!ReleaseVersion::parse("3.4.0").unwrap().is_first_ea());
    }

    #[test]
    fn branch_accepts_valid_names() {
        let b = ReleaseBranch::parse("rhoai-3.4").unwrap();
        assert_eq!(b.major, 3);
        assert_eq!(b.minor, 4);
        assert_eq!(b.file_token(), "v3-4");
        assert_eq!(b.version_token(), "3.4");

        let b = ReleaseBranch::parse("rhoai-2.16").unwrap();
        assert_eq!(b.minor, 16);
        assert_eq!(b.name(), "rhoai-2.16");
    }

    #[test]
    fn branch_rejects_invalid_names() {
        for bad in [
            "rhoai-3", "rhoai-3.456", "rhoai-30.4", "main", "rhoai-3.4.0", "RHOAI-3.4",
            "rhoai-3-4", "rhoai3.4", "rhoai-3.4 ", " rhoai-3.4", "",
        ] {
            assert!(ReleaseBranch::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn pairing_requires_matching_major_minor() {
        assert!(check_pairing("rhoai-3.4", "3.4.0-ea.1").is_ok());
        let err = check_pairing("rhoai-3.4", "3.5.0").unwrap_err();
        assert_eq!(err.code.as_str(), "version.branch_mismatch");
    }

    #[test]
    fn ordering_matches_release_lifecycle() {
        let order = ["3.4.0-ea.1", "3.4.0-ea.1.1", "3.4.0-ea.2", "3.4.0", "3.4.1"];
        for pair in order.windows(2) {
            let older = ReleaseVersion::parse(pair[0]).unwrap();
            let newer = ReleaseVersion::parse(pair[1]).unwrap();
            assert!(newer.is_newer_than(&older), "{} !> {}", pair[1], pair[0]);
            assert!(!older.is_newer_than(&newer), "{} > {}", pair[0], pair[1]);
        }
    }
}
