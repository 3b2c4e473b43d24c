//! Cell scalars and their per-cell formatting attributes.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::format::{FormatCategory, NumberFormat};

/// A tagged cell scalar.
///
/// The tag is fixed at construction and never changes; any data type
/// outside this closed set is unrepresentable, so "unsupported type" is a
/// construction-time failure (it simply does not compile), never a
/// write-time one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// Text value.
    Text(String),
    /// Integer value. Written to numeric cells through a real
    /// representation.
    Integer(i64),
    /// Real (floating-point) value.
    Real(f64),
    /// Boolean value.
    Boolean(bool),
    /// Calendar date-time value.
    Date(NaiveDateTime),
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<char> for Scalar {
    fn from(value: char) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value.and_time(NaiveTime::MIN))
    }
}

/// Horizontal alignment of a cell's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    /// Left-aligned (the default).
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right-aligned.
    Right,
    /// Justified.
    Justify,
}

/// A scalar plus the formatting attributes a cell is written with.
///
/// Created per cell per write pass and discarded once the cell is emitted;
/// never persisted independently.
#[derive(Debug, Clone, PartialEq)]
pub struct CellValue {
    scalar: Scalar,
    format: NumberFormat,
    wrap_text: bool,
    align: HorizontalAlign,
}

impl CellValue {
    /// Wrap a scalar with the default attributes: general format, no text
    /// wrapping, left alignment.
    pub fn new(scalar: impl Into<Scalar>) -> Self {
        Self {
            scalar: scalar.into(),
            format: NumberFormat::default(),
            wrap_text: false,
            align: HorizontalAlign::default(),
        }
    }

    /// Wrap a scalar with an explicit format category.
    pub fn with_format(scalar: impl Into<Scalar>, category: FormatCategory) -> Self {
        Self {
            format: NumberFormat::new(category),
            ..Self::new(scalar)
        }
    }

    /// Replace the format category.
    #[must_use]
    pub fn format(mut self, category: FormatCategory) -> Self {
        self.format = NumberFormat::new(category);
        self
    }

    /// Set the wrap-text flag.
    #[must_use]
    pub fn wrap(mut self, wrap_text: bool) -> Self {
        self.wrap_text = wrap_text;
        self
    }

    /// Set the horizontal alignment.
    #[must_use]
    pub fn align(mut self, align: HorizontalAlign) -> Self {
        self.align = align;
        self
    }

    /// The wrapped scalar.
    #[must_use]
    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// The cell's number format.
    #[must_use]
    pub fn number_format(&self) -> NumberFormat {
        self.format
    }

    /// Whether the cell wraps its text.
    #[must_use]
    pub fn wrap_text(&self) -> bool {
        self.wrap_text
    }

    /// The cell's horizontal alignment.
    ///
    /// Carried per cell but not part of the style fingerprint; see the
    /// style-deduplication notes in [`crate::writer`].
    #[must_use]
    pub fn alignment(&self) -> HorizontalAlign {
        self.align
    }
}
