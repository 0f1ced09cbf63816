//! Price book loading
//!
//! Orchestrates parsing of the XLSX container and assembly of the catalog.
//! Container-level failures (unreadable archive, missing workbook XML) are
//! fatal; everything below that degrades per variant with a warning.

pub mod sheet;
mod workbook;

use serde::Serialize;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

use crate::catalog::{
    self, Catalog, DataWarning, PriceGrid, PricebookConfig, VariantPricing,
};
use crate::console;
use crate::error::Result;

/// A successfully loaded price book: the catalog plus every data-quality
/// finding collected along the way.
///
/// Warnings are also reported to the console sink so a browser session shows
/// them without asking; they are carried here so callers and tests never have
/// to scrape logs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedPricebook {
    pub catalog: Catalog,
    pub warnings: Vec<DataWarning>,
}

/// Load a price book from XLSX bytes using the given variant table.
///
/// # Errors
/// Fails only when the bytes are not a readable XLSX container. A missing or
/// malformed sheet degrades its variant to "no data" instead.
pub fn load(data: &[u8], config: &PricebookConfig) -> Result<LoadedPricebook> {
    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)?;

    let relationships = workbook::parse_relationships(&mut archive);
    let directory = workbook::sheet_directory(&mut archive, &relationships.worksheets)?;
    let shared_strings =
        workbook::parse_shared_strings(&mut archive, relationships.shared_strings.as_deref());

    let mut warnings = Vec::new();
    let mut variants = Vec::new();

    for source in &config.variants {
        let price = load_grid(
            &mut archive,
            &directory,
            &shared_strings,
            &source.id,
            &source.price_sheet,
            &mut warnings,
        );
        let packing = load_grid(
            &mut archive,
            &directory,
            &shared_strings,
            &source.id,
            &source.packing_sheet,
            &mut warnings,
        );

        // The range reflects base prices only; packing coverage is allowed
        // to differ and does not widen it.
        let range = price.grid.range();

        variants.push(VariantPricing {
            id: source.id.clone(),
            display_name: price.caption,
            prices: price.grid,
            packing: packing.grid,
            range,
        });
    }

    for warning in &warnings {
        console::warn(&warning.to_string());
    }

    Ok(LoadedPricebook {
        catalog: Catalog::new(variants),
        warnings,
    })
}

/// Load a price book with the default variant table.
///
/// # Errors
/// Same failure surface as [`load`].
pub fn load_default(data: &[u8]) -> Result<LoadedPricebook> {
    load(data, &PricebookConfig::default())
}

struct GridLoad {
    caption: Option<String>,
    grid: PriceGrid,
}

impl GridLoad {
    fn empty() -> Self {
        Self {
            caption: None,
            grid: PriceGrid::default(),
        }
    }
}

fn load_grid<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    directory: &HashMap<String, String>,
    shared_strings: &[String],
    variant_id: &str,
    sheet_name: &str,
    warnings: &mut Vec<DataWarning>,
) -> GridLoad {
    let Some(path) = directory.get(sheet_name) else {
        warnings.push(DataWarning::MissingSheet {
            variant: variant_id.to_string(),
            sheet: sheet_name.to_string(),
        });
        return GridLoad::empty();
    };

    let table = match sheet::parse_sheet_table(archive, path, shared_strings) {
        Ok(table) => table,
        Err(e) => {
            warnings.push(DataWarning::UnreadableSheet {
                variant: variant_id.to_string(),
                sheet: sheet_name.to_string(),
                detail: e.to_string(),
            });
            return GridLoad::empty();
        }
    };

    let extract = catalog::extract_cells(&table, sheet_name, warnings);
    if extract.cells.is_empty() {
        warnings.push(DataWarning::EmptyGrid {
            variant: variant_id.to_string(),
            sheet: sheet_name.to_string(),
        });
    }

    GridLoad {
        caption: extract.caption,
        grid: PriceGrid::from_cells(extract.cells),
    }
}
