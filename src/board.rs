//! Main QuoteBoard struct - the primary entry point for the browser tool.
//!
//! This module provides the WASM-exported `QuoteBoard` struct that handles:
//! - Loading (or fetching) and parsing the XLSX price book
//! - Computing quotes against the immutable catalog
//! - Saving accepted quotes into the bounded localStorage history
//!
//! The catalog load is one fetch-then-parse operation; until it succeeds the
//! board rejects every quote with a not-loaded error, which is how the page
//! keeps quoting disabled while loading.

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::JsFuture;

use crate::catalog::{Catalog, PricebookConfig};
use crate::error::GatequoteError;
#[cfg(target_arch = "wasm32")]
use crate::history::BrowserStorage;
#[cfg(not(target_arch = "wasm32"))]
use crate::history::MemoryStore;
use crate::history::QuoteHistory;
use crate::pricebook;
use crate::quote::{self, QuoteRequest};

#[cfg(target_arch = "wasm32")]
type PlatformStore = BrowserStorage;
#[cfg(not(target_arch = "wasm32"))]
type PlatformStore = MemoryStore;

/// The quoting session: one catalog, one history.
#[wasm_bindgen]
pub struct QuoteBoard {
    catalog: Option<Catalog>,
    history: QuoteHistory<PlatformStore>,
}

#[wasm_bindgen]
impl QuoteBoard {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> QuoteBoard {
        console_error_panic_hook::set_once();
        QuoteBoard {
            catalog: None,
            history: QuoteHistory::new(PlatformStore::default()),
        }
    }

    /// Load a price book from XLSX bytes with the default variant table.
    ///
    /// # Errors
    /// Returns an error when the bytes are not a readable XLSX container; the
    /// previous catalog (if any) stays in place so a failed reload does not
    /// disable quoting retroactively.
    pub fn load(&mut self, data: &[u8]) -> Result<(), JsValue> {
        self.load_with(data, &PricebookConfig::default())
    }

    /// Load a price book with a caller-supplied variant table
    /// (`{ variants: [{ id, priceSheet, packingSheet }] }`).
    ///
    /// # Errors
    /// Same as [`QuoteBoard::load`], plus config deserialization failures.
    #[wasm_bindgen(js_name = "loadWithConfig")]
    pub fn load_with_config(&mut self, data: &[u8], config: JsValue) -> Result<(), JsValue> {
        let config: PricebookConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?;
        self.load_with(data, &config)
    }

    /// Whether a catalog is ready for quoting.
    #[wasm_bindgen(js_name = "isLoaded")]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    /// Configured variant identifiers, in order.
    ///
    /// # Errors
    /// Rejects when no price book is loaded.
    #[wasm_bindgen(js_name = "variantIds")]
    pub fn variant_ids(&self) -> Result<JsValue, JsValue> {
        let catalog = self.catalog()?;
        serde_wasm_bindgen::to_value(&catalog.variant_ids())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// The observed dimensions range for one variant.
    ///
    /// # Errors
    /// Rejects when no price book is loaded or the variant is unknown.
    pub fn range(&self, variant: &str) -> Result<JsValue, JsValue> {
        let catalog = self.catalog()?;
        let pricing = catalog
            .variant(variant)
            .ok_or_else(|| GatequoteError::UnknownVariant(variant.to_string()).to_string())?;
        serde_wasm_bindgen::to_value(&pricing.range)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Compute a quote. Returns `{ purchaseEur, purchasePln, customerEur,
    /// customerPln }` with all four prices rounded to 2 decimals.
    ///
    /// # Errors
    /// Validation, unknown-variant and out-of-range errors reject with their
    /// user-facing message.
    pub fn quote(
        &self,
        variant: &str,
        width: u32,
        height: u32,
        margin_percent: f64,
        exchange_rate: f64,
    ) -> Result<JsValue, JsValue> {
        let catalog = self.catalog()?;
        let request = build_request(variant, width, height, margin_percent, exchange_rate);
        let quote = quote::compute(catalog, &request).map_err(|e| e.to_string())?;
        serde_wasm_bindgen::to_value(&quote)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Recompute a quote and persist it to the history with an optional
    /// label. Returns the saved entry.
    ///
    /// # Errors
    /// Same failure surface as [`QuoteBoard::quote`]; persistence problems do
    /// not reject (the save degrades silently, logged).
    #[wasm_bindgen(js_name = "saveQuote")]
    pub fn save_quote(
        &mut self,
        variant: &str,
        width: u32,
        height: u32,
        margin_percent: f64,
        exchange_rate: f64,
        label: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let catalog = self.catalog()?;
        let request = build_request(variant, width, height, margin_percent, exchange_rate);
        let quote = quote::compute(catalog, &request).map_err(|e| e.to_string())?;
        let label = label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
        let entry = self.history.save(&request, quote, label);
        serde_wasm_bindgen::to_value(&entry)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// The saved history, newest first.
    ///
    /// # Errors
    /// Only serialization can reject; a broken store reads as empty.
    pub fn history(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.history.load())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Drop every saved entry.
    #[wasm_bindgen(js_name = "clearHistory")]
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl QuoteBoard {
    fn load_with(&mut self, data: &[u8], config: &PricebookConfig) -> Result<(), JsValue> {
        let loaded = pricebook::load(data, config).map_err(|e| e.to_string())?;
        self.catalog = Some(loaded.catalog);
        Ok(())
    }

    fn catalog(&self) -> Result<&Catalog, JsValue> {
        self.catalog
            .as_ref()
            .ok_or_else(|| JsValue::from_str(&GatequoteError::NotLoaded.to_string()))
    }
}

impl Default for QuoteBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch the price book bytes from a URL.
///
/// The page's startup is one fetch-then-parse operation: fetch here, then
/// hand the bytes to [`QuoteBoard::load`]. Until both succeed the board
/// keeps rejecting quotes.
///
/// # Errors
/// Network failures and non-2xx responses reject with a message.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = "fetchPricebook")]
pub async fn fetch_pricebook(url: String) -> Result<js_sys::Uint8Array, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(&url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "fetching {url} failed: HTTP {}",
            response.status()
        )));
    }
    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer))
}

fn build_request(
    variant: &str,
    width: u32,
    height: u32,
    margin_percent: f64,
    exchange_rate: f64,
) -> QuoteRequest {
    QuoteRequest {
        variant: variant.to_string(),
        width,
        height,
        margin_percent,
        exchange_rate,
    }
}
