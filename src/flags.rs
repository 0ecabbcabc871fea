//! Run flags, resolved once at startup.

use std::fmt;
use std::str::FromStr;

/// Which packages to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Include {
    /// Every package (`*`).
    All,
    /// Only the listed packages.
    Only(Vec<String>),
}

impl Include {
    /// Check whether `package` is included.
    pub fn matches(&self, package: &str) -> bool {
        match self {
            Include::All => true,
            Include::Only(names) => names.iter().any(|name| name == package),
        }
    }
}

impl FromStr for Include {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim() == "*" {
            return Ok(Include::All);
        }
        Ok(Include::Only(
            value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect(),
        ))
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Include::All => write!(f, "*"),
            Include::Only(names) => write!(f, "{}", names.join(",")),
        }
    }
}

/// Flags controlling a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flags {
    /// Packages to process.
    pub include: Include,
    /// Explicit version for the rebundled packages.
    pub version: Option<String>,
    /// Prerelease identifier to bump with.
    pub prerelease: Option<String>,
    /// Bump from the highest published version.
    pub bump: bool,
    /// Append a millisecond timestamp to the version.
    pub timestamp: bool,
    /// Run everything except publish.
    pub dry_run: bool,
}

impl Flags {
    /// Flags that include `include` and leave everything else unset.
    pub fn new(include: Include) -> Self {
        Self {
            include,
            version: None,
            prerelease: None,
            bump: false,
            timestamp: false,
            dry_run: false,
        }
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new(Include::All)
    }
}
