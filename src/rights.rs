//!
//! Rights sets for capability tokens.
//!
//! Right-names come from an open string vocabulary. A `Rights` value is a
//! non-empty, duplicate-free set kept in sorted order, so its canonical
//! comma-joined form is the same however the caller listed the rights.

use crate::error::RightsError;
use std::collections::BTreeSet;
use std::fmt;

/// Right-names used throughout the examples and tests. The vocabulary is open;
/// these carry no special meaning to the verifier.
pub mod well_known {
    pub const READ: &str = "read";
    pub const WRITE: &str = "write";
    pub const DELETE: &str = "delete";
}

/// Separator used in the canonical string form.
pub const RIGHTS_SEPARATOR: char = ',';

/// A right-name is valid when it is non-empty and free of separators
/// (`,` and `:`), whitespace and control characters.
pub fn is_valid_right(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c != RIGHTS_SEPARATOR && c != ':' && !c.is_whitespace() && !c.is_control())
}

/// Non-empty ordered set of right-names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Rights(BTreeSet<String>);

impl Rights {
    /// Builds a rights set, collapsing duplicates.
    ///
    /// # Errors
    /// `RightsError::Empty` if no rights are given, `RightsError::InvalidName`
    /// for the first name that fails [`is_valid_right`].
    pub fn new<I, S>(names: I) -> Result<Self, RightsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.into();
            if !is_valid_right(&name) {
                return Err(RightsError::InvalidName(name));
            }
            set.insert(name);
        }
        if set.is_empty() {
            return Err(RightsError::Empty);
        }
        Ok(Rights(set))
    }

    /// Parses the comma-joined form. Order in the input is not significant.
    pub fn parse(joined: &str) -> Result<Self, RightsError> {
        if joined.is_empty() {
            return Err(RightsError::Empty);
        }
        Self::new(joined.split(RIGHTS_SEPARATOR))
    }

    /// Comma-joined, sorted form used in the claims encoding.
    pub fn to_canonical_string(&self) -> String {
        let names: Vec<&str> = self.0.iter().map(String::as_str).collect();
        names.join(",")
    }

    pub fn contains(&self, right: &str) -> bool {
        self.0.contains(right)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Checks whether the rights held satisfy a single requested right.
///
/// Containment is exact: no right implies another.
#[inline]
pub fn sufficient(have: &Rights, need: &str) -> bool {
    have.contains(need)
}

impl fmt::Display for Rights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl TryFrom<Vec<String>> for Rights {
    type Error = RightsError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Rights::new(value)
    }
}

impl From<Rights> for Vec<String> {
    fn from(rights: Rights) -> Self {
        rights.0.into_iter().collect()
    }
}
