//! Promotion Codes

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::promotions::PromotionError;

/// A normalised promotion code: trimmed and upper-cased, made of ASCII
/// letters, digits, `_` and `-`.
///
/// Two codes compare equal regardless of how the user typed them, so
/// `"summer200 "` and `"SUMMER200"` name the same promotion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromotionCode(String);

impl PromotionCode {
    /// Normalise user input into a code.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::EmptyCode`] if nothing is left after trimming,
    /// or [`PromotionError::InvalidCode`] for any other character.
    pub fn parse(raw: &str) -> Result<Self, PromotionError> {
        let normalized = raw.trim().to_ascii_uppercase();

        if normalized.is_empty() {
            return Err(PromotionError::EmptyCode);
        }

        if !normalized.chars().all(is_code_char) {
            return Err(PromotionError::InvalidCode(normalized));
        }

        Ok(Self(normalized))
    }

    /// The normalised code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl FromStr for PromotionCode {
    type Err = PromotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PromotionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PromotionCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
