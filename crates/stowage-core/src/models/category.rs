use std::path::{Path, PathBuf};

use crate::constants::WILDCARD;

/// Which MIME types a category rule accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchTypes {
    /// Anything not matched by a concrete rule.
    Any,
    /// Lower-cased MIME types.
    Types(Vec<String>),
}

/// Maps a set of MIME types (or the wildcard) to a destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub match_types: MatchTypes,
    pub destination: PathBuf,
}

impl CategoryRule {
    /// Build a rule from a list of MIME types.
    ///
    /// A list consisting of the single entry `*` produces the wildcard rule.
    pub fn new<I, S>(types: I, destination: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types: Vec<String> = types
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .collect();

        let match_types = if types.len() == 1 && types[0] == WILDCARD {
            MatchTypes::Any
        } else {
            MatchTypes::Types(types)
        };

        Self {
            match_types,
            destination: destination.into(),
        }
    }

    pub fn wildcard(destination: impl Into<PathBuf>) -> Self {
        Self {
            match_types: MatchTypes::Any,
            destination: destination.into(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.match_types, MatchTypes::Any)
    }

    /// Whether this is a concrete rule listing `mime_type` (case-insensitive).
    ///
    /// The wildcard rule never matches here; it is only a fallback.
    pub fn matches(&self, mime_type: &str) -> bool {
        match &self.match_types {
            MatchTypes::Any => false,
            MatchTypes::Types(types) => types.iter().any(|t| t.eq_ignore_ascii_case(mime_type)),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Parse a rule from `type,type=>directory` (or `*=>directory`).
    pub fn parse(s: &str) -> Result<Self, String> {
        let (types, destination) = s
            .split_once("=>")
            .ok_or_else(|| format!("Invalid category rule '{}'. Expected: types=>directory", s))?;

        let destination = destination.trim();
        if destination.is_empty() {
            return Err(format!("Category rule '{}' has no destination", s));
        }

        let types: Vec<&str> = types
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if types.is_empty() {
            return Err(format!("Category rule '{}' lists no MIME types", s));
        }

        Ok(Self::new(types, destination))
    }

    /// Parse a `;`-separated list of rules, keeping their order.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, String> {
        s.split(';')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(Self::parse)
            .collect()
    }
}
