//! Price catalog: normalized (width, height) -> price grids per variant.
//!
//! The catalog is built once from a price book and read-only afterwards.
//! Dimensions are whole millimetres, prices whole EUR; both are rounded to
//! the nearest integer on ingest.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pricebook::sheet::{CellScalar, SheetTable};

/// Sheet layout contract: caption in A1, width headers across row 2 starting
/// at B2, heights down column A starting at A3, prices in the body.
const CAPTION_ROW: u32 = 0;
const CAPTION_COL: u32 = 0;
const WIDTH_HEADER_ROW: u32 = 1;
const FIRST_WIDTH_COL: u32 = 1;
const HEIGHT_COL: u32 = 0;
const FIRST_HEIGHT_ROW: u32 = 2;

/// One quoted price for a specific panel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCell {
    /// Panel width in mm.
    pub width: u32,
    /// Panel height in mm.
    pub height: u32,
    /// Price in whole EUR.
    pub price: u32,
}

/// All price cells of one variant for one price kind, sorted by width
/// ascending then height ascending.
///
/// The sort order is load-bearing: [`crate::lookup::find_price`] relies on it
/// to make a linear scan return the smallest dominating cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceGrid {
    cells: Vec<PriceCell>,
}

impl PriceGrid {
    /// Build a grid from cells in any order; sorting happens here.
    ///
    /// Duplicate (width, height) pairs are kept — the sort is stable, so
    /// whichever came first in sheet order stays first and wins lookups.
    #[must_use]
    pub fn from_cells(mut cells: Vec<PriceCell>) -> Self {
        cells.sort_by_key(|c| (c.width, c.height));
        Self { cells }
    }

    /// The cells in lookup order.
    #[must_use]
    pub fn cells(&self) -> &[PriceCell] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Observed min/max dimensions, or the all-zero sentinel for no data.
    #[must_use]
    pub fn range(&self) -> DimensionsRange {
        let mut range = DimensionsRange::default();
        for cell in &self.cells {
            if range.is_empty() {
                range = DimensionsRange {
                    min_width: cell.width,
                    max_width: cell.width,
                    min_height: cell.height,
                    max_height: cell.height,
                };
            } else {
                range.min_width = range.min_width.min(cell.width);
                range.max_width = range.max_width.max(cell.width);
                range.min_height = range.min_height.min(cell.height);
                range.max_height = range.max_height.max(cell.height);
            }
        }
        range
    }
}

/// Min/max width and height for which a variant has price data.
///
/// All-zero means "no data available" for the variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionsRange {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl DimensionsRange {
    /// Whether this is the "no data" sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_width == 0 && self.max_width == 0 && self.min_height == 0 && self.max_height == 0
    }
}

/// One variant's pricing: base and packing grids plus the observed range.
///
/// The range reflects the base price grid only; the packing grid does not
/// contribute to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPricing {
    /// Variant identifier, as configured.
    pub id: String,
    /// Caption from the price sheet's A1 cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Base price grid.
    pub prices: PriceGrid,
    /// Packing price grid.
    pub packing: PriceGrid,
    /// Observed dimensions range of the base price grid.
    pub range: DimensionsRange,
}

/// The full price catalog, in configuration order. Immutable after load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    variants: Vec<VariantPricing>,
}

impl Catalog {
    #[must_use]
    pub fn new(variants: Vec<VariantPricing>) -> Self {
        Self { variants }
    }

    /// Look up one variant by identifier.
    #[must_use]
    pub fn variant(&self, id: &str) -> Option<&VariantPricing> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// All variants, in configuration order.
    #[must_use]
    pub fn variants(&self) -> &[VariantPricing] {
        &self.variants
    }

    /// Configured variant identifiers, in order.
    #[must_use]
    pub fn variant_ids(&self) -> Vec<String> {
        self.variants.iter().map(|v| v.id.clone()).collect()
    }
}

/// Where one variant's two sheets live inside the price book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSource {
    pub id: String,
    pub price_sheet: String,
    pub packing_sheet: String,
}

impl VariantSource {
    #[must_use]
    pub fn new(id: &str, price_sheet: &str, packing_sheet: &str) -> Self {
        Self {
            id: id.to_string(),
            price_sheet: price_sheet.to_string(),
            packing_sheet: packing_sheet.to_string(),
        }
    }

    /// Derive sheet names by the production book's naming convention.
    #[must_use]
    pub fn with_convention(id: &str) -> Self {
        Self::new(id, &format!("{id} - price"), &format!("{id} - packing"))
    }
}

/// The variant table the loader reads. Nothing outside this table is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricebookConfig {
    pub variants: Vec<VariantSource>,
}

impl PricebookConfig {
    /// Build a config from variant identifiers using the naming convention.
    #[must_use]
    pub fn from_ids<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            variants: ids.into_iter().map(VariantSource::with_convention).collect(),
        }
    }
}

impl Default for PricebookConfig {
    /// The two variants the production price book carries.
    fn default() -> Self {
        Self::from_ids(["MasterPack", "ActiveRoll"])
    }
}

/// A non-fatal data-quality finding from the loader.
///
/// Warnings degrade a variant to "no data" at worst; they never abort a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum DataWarning {
    /// A configured sheet is not in the workbook.
    MissingSheet { variant: String, sheet: String },
    /// A configured sheet exists but its XML could not be read.
    UnreadableSheet {
        variant: String,
        sheet: String,
        detail: String,
    },
    /// The sheet has no caption in A1; its data is not trusted.
    MissingCaption { sheet: String },
    /// The width header row yielded no numeric columns.
    NoWidthHeader { sheet: String },
    /// A price cell is absent or non-numeric for a header position.
    MissingPrice { sheet: String, width: u32, height: u32 },
    /// The sheet parsed but produced zero price cells.
    EmptyGrid { variant: String, sheet: String },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSheet { variant, sheet } => {
                write!(f, "sheet \"{sheet}\" for variant {variant} is missing")
            }
            Self::UnreadableSheet {
                variant,
                sheet,
                detail,
            } => {
                write!(f, "sheet \"{sheet}\" for variant {variant} is unreadable: {detail}")
            }
            Self::MissingCaption { sheet } => {
                write!(f, "sheet \"{sheet}\" has no caption in A1")
            }
            Self::NoWidthHeader { sheet } => {
                write!(f, "sheet \"{sheet}\" has no numeric width headers")
            }
            Self::MissingPrice {
                sheet,
                width,
                height,
            } => {
                write!(f, "sheet \"{sheet}\" is missing a price at {width}x{height} mm")
            }
            Self::EmptyGrid { variant, sheet } => {
                write!(f, "sheet \"{sheet}\" yielded no prices for variant {variant}")
            }
        }
    }
}

/// Result of normalizing one sheet: its caption plus the collected cells.
#[derive(Debug, Default)]
pub(crate) struct SheetExtract {
    pub caption: Option<String>,
    pub cells: Vec<PriceCell>,
}

/// Round a sheet value to whole units, clamped non-negative.
/// The clamp ensures the value is in [0, u32::MAX] before casting.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_whole_units(v: f64) -> u32 {
    v.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Normalize one sheet's table into price cells per the layout contract.
///
/// - Width headers: numeric cells define columns, blank cells are tolerated
///   gaps, the first non-numeric cell ends the header. The collected widths
///   are deduplicated and sorted ascending; that canonical order can differ
///   from the physical column order, so each width remembers its original
///   sheet column (first occurrence wins for duplicates).
/// - Heights: the first absent or non-numeric cell in column A ends the data
///   region. This bounds rows only.
/// - Body: a missing or non-numeric price cell is skipped (never zero-filled)
///   and reported as a warning.
pub(crate) fn extract_cells(
    table: &SheetTable,
    sheet_name: &str,
    warnings: &mut Vec<DataWarning>,
) -> SheetExtract {
    // Any scalar works as a caption; what matters is that the cell is not
    // blank, which marks a sheet nobody maintains.
    let caption = table
        .scalar(CAPTION_ROW, CAPTION_COL)
        .map(|s| s.to_display_string().trim().to_string())
        .filter(|s| !s.is_empty());

    if caption.is_none() {
        warnings.push(DataWarning::MissingCaption {
            sheet: sheet_name.to_string(),
        });
        return SheetExtract::default();
    }

    // (width, original sheet column) pairs in physical order.
    let mut header: Vec<(u32, u32)> = Vec::new();
    for col in FIRST_WIDTH_COL..=table.max_col() {
        match table.scalar(WIDTH_HEADER_ROW, col) {
            Some(CellScalar::Number(n)) => header.push((to_whole_units(*n), col)),
            Some(_) => break,
            None => continue,
        }
    }

    let mut canonical: Vec<u32> = header.iter().map(|&(w, _)| w).collect();
    canonical.sort_unstable();
    canonical.dedup();

    if canonical.is_empty() {
        warnings.push(DataWarning::NoWidthHeader {
            sheet: sheet_name.to_string(),
        });
        return SheetExtract {
            caption,
            cells: Vec::new(),
        };
    }

    let mut cells = Vec::new();
    for row in FIRST_HEIGHT_ROW..=table.max_row() {
        let Some(height) = table.number(row, HEIGHT_COL) else {
            break;
        };
        let height = to_whole_units(height);

        for &width in &canonical {
            let Some(&(_, col)) = header.iter().find(|&&(w, _)| w == width) else {
                continue;
            };
            match table.number(row, col) {
                Some(price) => cells.push(PriceCell {
                    width,
                    height,
                    price: to_whole_units(price),
                }),
                None => warnings.push(DataWarning::MissingPrice {
                    sheet: sheet_name.to_string(),
                    width,
                    height,
                }),
            }
        }
    }

    SheetExtract { caption, cells }
}
