//! gatequote - price quoting for high-speed door panels
//!
//! Parses an XLSX price book into a normalized catalog and computes quotes
//! in the browser via WebAssembly:
//! - Per-variant (width, height) -> price grids for base and packing prices
//! - Round-up-to-next-panel-size dimension resolution
//! - Purchase and customer prices in EUR and PLN
//! - Bounded quote history in localStorage
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { QuoteBoard, fetchPricebook } from 'gatequote';
//! await init();
//! const board = new QuoteBoard();
//! board.load(await fetchPricebook('/pricebook.xlsx'));
//! const quote = board.quote('MasterPack', 3000, 3200, 10, 4.4);
//! ```

pub mod board;
pub mod catalog;
pub mod cell_ref;
pub mod error;
pub mod history;
pub mod lookup;
pub mod pricebook;
pub mod quote;

pub(crate) mod console;

use wasm_bindgen::prelude::*;

// Re-export the main session struct
pub use board::QuoteBoard;

pub use catalog::{
    Catalog, DataWarning, DimensionsRange, PriceCell, PriceGrid, PricebookConfig, VariantPricing,
    VariantSource,
};
pub use error::{GatequoteError, Result, ValidationError};
pub use history::{HistoryEntry, KeyValueStore, MemoryStore, QuoteHistory};
pub use quote::{Quote, QuoteRequest};

/// Parse a price book and return a JSON string with the catalog and the
/// data-quality warnings, using the default variant table.
///
/// # Arguments
/// * `data` - The raw bytes of the XLSX file
///
/// # Errors
/// Returns an error if the bytes are not a readable XLSX container.
#[wasm_bindgen]
pub fn parse_pricebook(data: &[u8]) -> std::result::Result<String, JsValue> {
    let loaded = pricebook::load_default(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&loaded)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
