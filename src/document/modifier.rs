//! Atomic update modifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LucernaError, Result};

/// How Solr merges a submitted field value into the stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// Replace the field value (or remove it when set to null).
    Set,
    /// Increment a numeric field.
    Inc,
    /// Append to a multi-valued field.
    Add,
    /// Append only values not already present.
    AddDistinct,
    /// Remove all occurrences of the given values.
    Remove,
    /// Remove all values matching the given regular expressions.
    RemoveRegex,
}

impl Modifier {
    /// All modifiers, in Solr's documentation order.
    pub const ALL: [Modifier; 6] = [
        Modifier::Set,
        Modifier::Inc,
        Modifier::Add,
        Modifier::AddDistinct,
        Modifier::Remove,
        Modifier::RemoveRegex,
    ];

    /// The directive name Solr uses on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Set => "set",
            Modifier::Inc => "inc",
            Modifier::Add => "add",
            Modifier::AddDistinct => "add-distinct",
            Modifier::Remove => "remove",
            Modifier::RemoveRegex => "removeregex",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modifier {
    type Err = LucernaError;

    fn from_str(s: &str) -> Result<Self> {
        Modifier::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                LucernaError::invalid_argument(format!("Attempt to set an atomic update modifier that is not supported: {s}"))
            })
    }
}

impl TryFrom<&str> for Modifier {
    type Error = LucernaError;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for modifier in Modifier::ALL {
            assert_eq!(modifier.as_str().parse::<Modifier>().unwrap(), modifier);
        }
    }

    #[test]
    fn test_unknown_modifier() {
        let err = "append".parse::<Modifier>().unwrap_err();
        assert!(matches!(err, LucernaError::InvalidArgument(_)));
    }
}
