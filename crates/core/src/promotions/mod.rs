//! Promotions
//!
//! A promotion is a named discount with a validity window and an
//! active/inactive status flag.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::discounts::{DiscountError, PromotionDiscount};

mod code;
mod window;

pub use code::PromotionCode;
pub use window::{ValidityWindow, parse_bound};

/// Label used when a promotion carries no usable discount.
pub const GENERIC_LABEL: &str = "promotion";

/// Errors raised while building or reading promotions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromotionError {
    /// The code was blank after trimming.
    #[error("promotion code cannot be empty")]
    EmptyCode,

    /// The code holds characters other than letters, digits, `_` and `-`.
    #[error("invalid promotion code: {0}")]
    InvalidCode(String),

    /// A window bound could not be read as a date or timestamp.
    #[error("invalid promotion date: {0}")]
    InvalidBound(String),

    /// The window starts after it ends.
    #[error("promotion window starts ({valid_from}) after it ends ({valid_until})")]
    InvalidWindow {
        /// Start of the window
        valid_from: Timestamp,
        /// End of the window
        valid_until: Timestamp,
    },

    /// The status was neither `active` nor `inactive`.
    #[error("unknown promotion status: {0}")]
    UnknownStatus(String),

    /// The discount columns are inconsistent.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Lifecycle status controlled by administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PromotionStatus {
    /// Usable while inside its window.
    #[default]
    Active,

    /// Switched off regardless of its window.
    Inactive,
}

impl PromotionStatus {
    /// Stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// The other status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

impl FromStr for PromotionStatus {
    type Err = PromotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(PromotionError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A promotion record as the pricing engine sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion {
    code: PromotionCode,
    description: Option<String>,
    discount: Option<PromotionDiscount>,
    window: ValidityWindow,
    status: PromotionStatus,
}

impl Promotion {
    /// Create a promotion.
    pub fn new(
        code: PromotionCode,
        discount: Option<PromotionDiscount>,
        window: ValidityWindow,
        status: PromotionStatus,
    ) -> Self {
        Self {
            code,
            description: None,
            discount,
            window,
            status,
        }
    }

    /// Attach a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();

        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    /// Normalised code.
    pub fn code(&self) -> &PromotionCode {
        &self.code
    }

    /// Description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Discount mode, if any.
    pub fn discount(&self) -> Option<&PromotionDiscount> {
        self.discount.as_ref()
    }

    /// Validity window.
    pub fn window(&self) -> &ValidityWindow {
        &self.window
    }

    /// Lifecycle status.
    pub fn status(&self) -> PromotionStatus {
        self.status
    }

    /// Replace the status.
    pub fn set_status(&mut self, status: PromotionStatus) {
        self.status = status;
    }

    /// Replace the discount mode.
    pub fn set_discount(&mut self, discount: Option<PromotionDiscount>) {
        self.discount = discount;
    }

    /// Replace the validity window.
    pub fn set_window(&mut self, window: ValidityWindow) {
        self.window = window;
    }

    /// Replace the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.filter(|d| !d.trim().is_empty());
    }

    /// Usable only when active and `now` lies inside the window.
    pub fn is_valid(&self, now: Timestamp) -> bool {
        self.status == PromotionStatus::Active && self.window.contains(now)
    }

    /// Short display text, e.g. `"off by 200 THB"`, `"off by 20%"` or `"promotion"`.
    pub fn display_text(&self) -> String {
        self.discount
            .as_ref()
            .map_or_else(|| GENERIC_LABEL.to_string(), PromotionDiscount::label)
    }
}

/// Validity check that also accepts an absent promotion (never valid).
pub fn is_promotion_valid(promotion: Option<&Promotion>, now: Timestamp) -> bool {
    promotion.is_some_and(|promotion| promotion.is_valid(now))
}
