//! Number format categories and their concrete patterns.
//!
//! A [`NumberFormat`] maps a logical category to the pattern string handed
//! to the engine. The mapping is a fixed lookup; there is no way to
//! construct a format with a free-form pattern.

use crate::value::CellValue;

/// Logical format categories understood by the marshalling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatCategory {
    /// No special formatting.
    #[default]
    General,
    /// US currency, two decimal places.
    Currency,
    /// Percentage, one decimal place.
    Percent,
}

/// A concrete cell number format.
///
/// The pattern is derived deterministically from the category and is part
/// of the style fingerprint used for deduplication during a write pass
/// (see [`crate::writer`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NumberFormat {
    category: FormatCategory,
}

impl NumberFormat {
    /// Build the format for a category.
    #[must_use]
    pub const fn new(category: FormatCategory) -> Self {
        Self { category }
    }

    /// The logical category this format was built from.
    #[must_use]
    pub const fn category(self) -> FormatCategory {
        self.category
    }

    /// The pattern string registered with the engine.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self.category {
            FormatCategory::General => "General",
            FormatCategory::Currency => "$#,#0.00",
            FormatCategory::Percent => "0.0%",
        }
    }
}

impl From<FormatCategory> for NumberFormat {
    fn from(category: FormatCategory) -> Self {
        Self::new(category)
    }
}

/// The style fingerprint of a cell: everything that participates in style
/// deduplication, and nothing else.
#[must_use]
pub(crate) fn style_key(value: &CellValue) -> (String, bool) {
    (
        value.number_format().pattern().to_string(),
        value.wrap_text(),
    )
}
