//! String comparison modes
//!
//! Comparison modes are ordinary constant values inside a predicate; the
//! converter never inspects them, evaluators decide what they mean.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How two strings are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StringComparison {
    /// Compare code points
    #[default]
    Ordinal,
    /// Compare code points after case folding
    OrdinalIgnoreCase,
    /// Culture-sensitive comparison using the current culture
    CurrentCulture,
    /// Culture-sensitive, case-insensitive comparison using the current culture
    CurrentCultureIgnoreCase,
    /// Culture-sensitive comparison using the invariant culture
    InvariantCulture,
    /// Culture-sensitive, case-insensitive comparison using the invariant culture
    InvariantCultureIgnoreCase,
}

impl StringComparison {
    /// All comparison modes
    pub const ALL: [StringComparison; 6] = [
        Self::Ordinal,
        Self::OrdinalIgnoreCase,
        Self::CurrentCulture,
        Self::CurrentCultureIgnoreCase,
        Self::InvariantCulture,
        Self::InvariantCultureIgnoreCase,
    ];

    /// Check if case differences are ignored
    pub const fn ignores_case(&self) -> bool {
        matches!(
            self,
            Self::OrdinalIgnoreCase | Self::CurrentCultureIgnoreCase | Self::InvariantCultureIgnoreCase
        )
    }

    /// Check if this mode uses culture-sensitive collation
    pub const fn is_culture_sensitive(&self) -> bool {
        !matches!(self, Self::Ordinal | Self::OrdinalIgnoreCase)
    }

    /// Get the mode name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ordinal => "Ordinal",
            Self::OrdinalIgnoreCase => "OrdinalIgnoreCase",
            Self::CurrentCulture => "CurrentCulture",
            Self::CurrentCultureIgnoreCase => "CurrentCultureIgnoreCase",
            Self::InvariantCulture => "InvariantCulture",
            Self::InvariantCultureIgnoreCase => "InvariantCultureIgnoreCase",
        }
    }
}

impl fmt::Display for StringComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringComparison.{}", self.name())
    }
}

impl FromStr for StringComparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("StringComparison.").unwrap_or(s);
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == name)
            .ok_or_else(|| format!("Unknown string comparison mode: {}", s))
    }
}
