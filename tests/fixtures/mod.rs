//! Test fixtures for generating valid price book XLSX files in memory.
//!
//! This module provides builders for creating price books programmatically,
//! useful for testing the gatequote loader with known inputs.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{PricebookBuilder, SheetBuilder};
//!
//! let xlsx = PricebookBuilder::new()
//!     .sheet(
//!         SheetBuilder::new("MasterPack - price")
//!             .cell("A1", "MasterPack")
//!             .cell("B2", 2000)
//!             .cell("A3", 2000)
//!             .cell("B3", 1000),
//!     )
//!     .build();
//!
//! let loaded = gatequote::pricebook::load_default(&xlsx).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use gatequote::cell_ref;

// ============================================================================
// Cell Values
// ============================================================================

/// A cell value for the builder.
#[derive(Debug, Clone)]
pub enum CellValue {
    /// A numeric value (widths, heights, prices).
    Number(f64),
    /// A text value, emitted through the shared string table.
    Text(String),
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// Builder for a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    pub cells: Vec<(String, CellValue)>,
}

impl SheetBuilder {
    /// Create a new sheet builder with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: Vec::new(),
        }
    }

    /// Add a cell by A1-style reference.
    #[must_use]
    pub fn cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V) -> Self {
        self.cells.push((cell_ref.to_string(), value.into()));
        self
    }
}

/// Build a standard variant sheet: caption in A1, widths across row 2 from
/// B2, heights down column A from A3, one price per (height, width) pair.
pub fn grid_sheet<F>(name: &str, caption: &str, widths: &[u32], heights: &[u32], price: F) -> SheetBuilder
where
    F: Fn(u32, u32) -> f64,
{
    let mut sheet = SheetBuilder::new(name).cell("A1", caption);
    for (i, &width) in widths.iter().enumerate() {
        sheet = sheet.cell(&cell_ref::format_ref(1, 1 + i as u32), width);
    }
    for (r, &height) in heights.iter().enumerate() {
        let row = 2 + r as u32;
        sheet = sheet.cell(&cell_ref::format_ref(row, 0), height);
        for (c, &width) in widths.iter().enumerate() {
            sheet = sheet.cell(&cell_ref::format_ref(row, 1 + c as u32), price(width, height));
        }
    }
    sheet
}

// ============================================================================
// Price Book Builder
// ============================================================================

/// Builder for creating complete price book XLSX files.
#[derive(Debug, Default)]
pub struct PricebookBuilder {
    sheets: Vec<SheetBuilder>,
}

impl PricebookBuilder {
    /// Create a new price book builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet.
    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        // Collect shared strings
        let mut shared_strings: Vec<String> = Vec::new();
        for sheet in &self.sheets {
            for (_, value) in &sheet.cells {
                if let CellValue::Text(ref s) = value {
                    if !shared_strings.contains(s) {
                        shared_strings.push(s.clone());
                    }
                }
            }
        }

        let _ = zip.start_file("[Content_Types].xml", options);
        let _ = zip.write_all(
            generate_content_types(self.sheets.len(), !shared_strings.is_empty()).as_bytes(),
        );

        let _ = zip.start_file("_rels/.rels", options);
        let _ = zip.write_all(generate_rels().as_bytes());

        let _ = zip.start_file("xl/_rels/workbook.xml.rels", options);
        let _ = zip.write_all(
            generate_workbook_rels(self.sheets.len(), !shared_strings.is_empty()).as_bytes(),
        );

        let _ = zip.start_file("xl/workbook.xml", options);
        let _ = zip.write_all(generate_workbook(&self.sheets).as_bytes());

        if !shared_strings.is_empty() {
            let _ = zip.start_file("xl/sharedStrings.xml", options);
            let _ = zip.write_all(generate_shared_strings(&shared_strings).as_bytes());
        }

        for (i, sheet) in self.sheets.iter().enumerate() {
            let path = format!("xl/worksheets/sheet{}.xml", i + 1);
            let _ = zip.start_file(&path, options);
            let _ = zip.write_all(generate_sheet_xml(sheet, &shared_strings).as_bytes());
        }

        let cursor = zip.finish().expect("Failed to finish ZIP");
        cursor.into_inner()
    }
}

// ============================================================================
// Standard Books
// ============================================================================

/// Linear price surface used by the standard fixtures; strictly increasing in
/// both dimensions so lookups are easy to predict.
pub fn linear_price(width: u32, height: u32) -> f64 {
    f64::from(width) / 10.0 + f64::from(height) / 20.0
}

/// A complete two-variant book matching the default configuration:
/// MasterPack and ActiveRoll, each with a price and a packing sheet over a
/// 3x3 size grid.
pub fn standard_book() -> Vec<u8> {
    let widths = [2000, 2500, 3000];
    let heights = [2000, 2500, 3000];
    PricebookBuilder::new()
        .sheet(grid_sheet(
            "MasterPack - price",
            "MasterPack",
            &widths,
            &heights,
            linear_price,
        ))
        .sheet(grid_sheet(
            "MasterPack - packing",
            "MasterPack packing",
            &widths,
            &heights,
            |_, _| 50.0,
        ))
        .sheet(grid_sheet(
            "ActiveRoll - price",
            "ActiveRoll",
            &widths,
            &heights,
            |w, h| linear_price(w, h) * 2.0,
        ))
        .sheet(grid_sheet(
            "ActiveRoll - packing",
            "ActiveRoll packing",
            &widths,
            &heights,
            |_, _| 80.0,
        ))
        .build()
}

/// A one-variant book whose only panel (2000x2000) has the given base and
/// packing prices. Handy for exact-formula assertions.
pub fn flat_book(variant: &str, base: f64, packing: f64) -> Vec<u8> {
    PricebookBuilder::new()
        .sheet(
            SheetBuilder::new(&format!("{variant} - price"))
                .cell("A1", variant)
                .cell("B2", 2000)
                .cell("A3", 2000)
                .cell("B3", base),
        )
        .sheet(
            SheetBuilder::new(&format!("{variant} - packing"))
                .cell("A1", format!("{variant} packing"))
                .cell("B2", 2000)
                .cell("A3", 2000)
                .cell("B3", packing),
        )
        .build()
}

// ============================================================================
// XML Generation
// ============================================================================

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn generate_content_types(sheet_count: usize, has_shared_strings: bool) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            "<Override PartName=\"/xl/worksheets/sheet{i}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\n"
        ));
    }
    if has_shared_strings {
        xml.push_str("<Override PartName=\"/xl/sharedStrings.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml\"/>\n");
    }
    xml.push_str("</Types>");
    xml
}

fn generate_rels() -> String {
    String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
    )
}

fn generate_workbook_rels(sheet_count: usize, has_shared_strings: bool) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{i}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet{i}.xml\"/>\n"
        ));
    }
    if has_shared_strings {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings\" Target=\"sharedStrings.xml\"/>\n",
            sheet_count + 1
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn generate_workbook(sheets: &[SheetBuilder]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
"#,
    );
    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>\n",
            escape_xml(&sheet.name),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets>\n</workbook>");
    xml
}

fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" count=\"{}\" uniqueCount=\"{}\">\n",
        strings.len(),
        strings.len()
    );
    for s in strings {
        xml.push_str(&format!("<si><t>{}</t></si>\n", escape_xml(s)));
    }
    xml.push_str("</sst>");
    xml
}

fn generate_sheet_xml(sheet: &SheetBuilder, shared_strings: &[String]) -> String {
    // Group cells by row, ordered by (row, col), the way real writers do.
    let mut rows: BTreeMap<u32, BTreeMap<u32, (String, &CellValue)>> = BTreeMap::new();
    for (cell_ref_str, value) in &sheet.cells {
        let (row, col) = cell_ref::parse_ref_str(cell_ref_str)
            .unwrap_or_else(|| panic!("bad fixture cell ref: {cell_ref_str}"));
        rows.entry(row)
            .or_default()
            .insert(col, (cell_ref_str.clone(), value));
    }

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
"#,
    );
    for (row, cells) in &rows {
        xml.push_str(&format!("<row r=\"{}\">", row + 1));
        for (_, (cell_ref_str, value)) in cells {
            match value {
                CellValue::Number(n) => {
                    xml.push_str(&format!("<c r=\"{cell_ref_str}\"><v>{n}</v></c>"));
                }
                CellValue::Text(s) => {
                    let idx = shared_strings
                        .iter()
                        .position(|candidate| candidate == s)
                        .expect("shared string collected at build time");
                    xml.push_str(&format!("<c r=\"{cell_ref_str}\" t=\"s\"><v>{idx}</v></c>"));
                }
            }
        }
        xml.push_str("</row>\n");
    }
    xml.push_str("</sheetData>\n</worksheet>");
    xml
}
