//! Structured error types for gatequote.
//!
//! One crate-wide error enum plus a nested, per-field validation enum so the
//! UI can attach each message to the input that caused it.

/// All errors that can occur while loading a price book or computing a quote.
#[derive(Debug, thiserror::Error)]
pub enum GatequoteError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// General parse error in the price book container.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A quote was requested before a price book finished loading.
    #[error("no price book loaded")]
    NotLoaded,

    /// The requested variant is not in the catalog.
    #[error("no pricing data for variant: {0}")]
    UnknownVariant(String),

    /// Valid inputs, but no price cell covers the requested size.
    #[error("dimensions {width}x{height} mm are outside the available sizes for {variant}")]
    OutOfRange {
        variant: String,
        width: u32,
        height: u32,
    },

    /// A user-correctable input problem, attributed to a single field.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GatequoteError>;

/// Input validation failures. Each maps to one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("select a product variant")]
    MissingVariant,

    #[error("width and height must be positive numbers of millimetres")]
    InvalidDimensions,

    #[error("margin must be a non-negative percentage")]
    InvalidMargin,

    #[error("exchange rate must be a positive number")]
    InvalidExchangeRate,
}

impl ValidationError {
    /// The input field this validation failure belongs to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingVariant => "variant",
            Self::InvalidDimensions => "dimensions",
            Self::InvalidMargin => "margin",
            Self::InvalidExchangeRate => "exchangeRate",
        }
    }
}

impl From<String> for GatequoteError {
    fn from(s: String) -> Self {
        Self::Parse(s)
    }
}

impl From<&str> for GatequoteError {
    fn from(s: &str) -> Self {
        Self::Parse(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GatequoteError> for wasm_bindgen::JsValue {
    fn from(e: GatequoteError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
