//! The row contract: how a record turns itself into one sheet row.

use crate::format::FormatCategory;
use crate::value::{CellValue, Scalar};

/// A record writable as one row of a sheet.
///
/// [`to_cells`](Self::to_cells) produces the record's ordered cell
/// sequence; `None` entries become empty cells at their position. The
/// `cell` and `formatted_cell` helpers lift raw scalars into positional
/// entries:
///
/// ```
/// use rowbook::{CellValue, FormatCategory, RowSource};
///
/// struct LineItem {
///     name: String,
///     price: f64,
/// }
///
/// impl RowSource for LineItem {
///     fn to_cells(&self) -> Vec<Option<CellValue>> {
///         vec![
///             Self::cell(self.name.as_str()),
///             Self::formatted_cell(self.price, FormatCategory::Currency),
///             None, // reserved column, left empty
///         ]
///     }
/// }
/// ```
pub trait RowSource {
    /// This record as an ordered sequence of positional cell entries.
    fn to_cells(&self) -> Vec<Option<CellValue>>;

    /// Lift a raw scalar into a positional entry with default attributes.
    fn cell(value: impl Into<Scalar>) -> Option<CellValue>
    where
        Self: Sized,
    {
        Some(CellValue::new(value))
    }

    /// Lift a raw scalar into a positional entry with an explicit format.
    fn formatted_cell(value: impl Into<Scalar>, category: FormatCategory) -> Option<CellValue>
    where
        Self: Sized,
    {
        Some(CellValue::with_format(value, category))
    }
}
