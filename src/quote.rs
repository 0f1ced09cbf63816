//! Quote computation: validated inputs + catalog lookups -> priced quote.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{GatequoteError, Result, ValidationError};
use crate::lookup::find_price;

/// Built-in purchase discount applied to the base price (packing excluded).
pub const BASE_PRICE_FACTOR: f64 = 0.95;

/// EUR -> PLN rate pre-filled in the form; every request may override it.
pub const DEFAULT_EXCHANGE_RATE: f64 = 4.4;

/// One quote request, as it arrives from the form or the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Variant identifier.
    pub variant: String,
    /// Requested panel width in mm.
    pub width: u32,
    /// Requested panel height in mm.
    pub height: u32,
    /// Markup percentage applied to the purchase price.
    pub margin_percent: f64,
    /// EUR -> PLN exchange rate.
    pub exchange_rate: f64,
}

/// A computed quote. All four prices are rounded to 2 decimal places; the
/// rounding happens only here at the presentation boundary, never between
/// intermediate steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Purchase price in EUR (discounted base + packing).
    pub purchase_eur: f64,
    /// Purchase price in PLN.
    pub purchase_pln: f64,
    /// Customer price in EUR (purchase + margin).
    pub customer_eur: f64,
    /// Customer price in PLN.
    pub customer_pln: f64,
}

/// Check a request's inputs without touching the catalog.
///
/// # Errors
/// Returns the first failing field's [`ValidationError`].
pub fn validate(request: &QuoteRequest) -> std::result::Result<(), ValidationError> {
    if request.variant.trim().is_empty() {
        return Err(ValidationError::MissingVariant);
    }
    if request.width == 0 || request.height == 0 {
        return Err(ValidationError::InvalidDimensions);
    }
    if !request.margin_percent.is_finite() || request.margin_percent < 0.0 {
        return Err(ValidationError::InvalidMargin);
    }
    if !request.exchange_rate.is_finite() || request.exchange_rate <= 0.0 {
        return Err(ValidationError::InvalidExchangeRate);
    }
    Ok(())
}

/// Compute a quote against a loaded catalog.
///
/// Both the base and the packing price must resolve; a miss on either makes
/// the whole quote fail with an out-of-range error — no partial quote.
///
/// # Errors
/// [`ValidationError`] before any lookup, [`GatequoteError::UnknownVariant`]
/// for an unconfigured variant, [`GatequoteError::OutOfRange`] when the
/// requested size dominates every cell of either grid.
pub fn compute(catalog: &Catalog, request: &QuoteRequest) -> Result<Quote> {
    validate(request)?;

    let variant = catalog
        .variant(&request.variant)
        .ok_or_else(|| GatequoteError::UnknownVariant(request.variant.clone()))?;

    let out_of_range = || GatequoteError::OutOfRange {
        variant: request.variant.clone(),
        width: request.width,
        height: request.height,
    };

    let base = find_price(&variant.prices, request.width, request.height)
        .ok_or_else(out_of_range)?;
    let packing = find_price(&variant.packing, request.width, request.height)
        .ok_or_else(out_of_range)?;

    let purchase_eur = f64::from(base) * BASE_PRICE_FACTOR + f64::from(packing);
    let purchase_pln = purchase_eur * request.exchange_rate;
    let customer_eur = purchase_eur * (1.0 + request.margin_percent / 100.0);
    let customer_pln = customer_eur * request.exchange_rate;

    Ok(Quote {
        purchase_eur: round2(purchase_eur),
        purchase_pln: round2(purchase_pln),
        customer_eur: round2(customer_eur),
        customer_pln: round2(customer_pln),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
