use std::fmt;

use serde::{Deserialize, Serialize};

/// Filing status a bracket table (or table column) applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilerType {
    Single,
    Married,
}

impl FilerType {
    /// The word searched for (case-insensitively) in table captions and
    /// header cells to recognise this filer type.
    pub fn term(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Married => "married",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Married => "Married",
        }
    }

    pub fn all() -> &'static [FilerType] {
        &[FilerType::Single, FilerType::Married]
    }
}

impl fmt::Display for FilerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
