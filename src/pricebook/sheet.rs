//! Worksheet parsing - reduces one sheet's XML to a sparse table of scalars.
//!
//! A price book sheet is values only: captions, width/height headers, and
//! prices. Styling, merges, panes and the rest of the worksheet vocabulary
//! are irrelevant here and skipped wholesale.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref;
use crate::error::Result;

/// One populated cell's value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellScalar {
    Number(f64),
    Text(String),
    Bool(bool),
    Error(String),
}

impl CellScalar {
    /// Numeric view of the scalar; text and error cells have none.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Display rendering of the scalar, the way a caption cell reads.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) | Self::Error(s) => s.clone(),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
        }
    }
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone)]
enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

/// Sparse 0-indexed (row, col) -> scalar table for one worksheet.
#[derive(Debug, Default)]
pub struct SheetTable {
    cells: HashMap<(u32, u32), CellScalar>,
    max_row: u32,
    max_col: u32,
}

impl SheetTable {
    /// The scalar at (row, col), if the cell is populated.
    #[must_use]
    pub fn scalar(&self, row: u32, col: u32) -> Option<&CellScalar> {
        self.cells.get(&(row, col))
    }

    /// The numeric value at (row, col), if the cell holds a number.
    #[must_use]
    pub fn number(&self, row: u32, col: u32) -> Option<f64> {
        self.scalar(row, col).and_then(CellScalar::as_number)
    }

    /// The text at (row, col), if the cell holds a string.
    #[must_use]
    pub fn text(&self, row: u32, col: u32) -> Option<&str> {
        match self.scalar(row, col) {
            Some(CellScalar::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Highest populated row index (0 when the sheet is empty).
    #[must_use]
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    /// Highest populated column index (0 when the sheet is empty).
    #[must_use]
    pub fn max_col(&self) -> u32 {
        self.max_col
    }

    /// Number of populated cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the sheet has no populated cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn insert(&mut self, row: u32, col: u32, scalar: CellScalar) {
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self.cells.insert((row, col), scalar);
    }
}

/// Resolve a raw `<v>`/`<t>` payload against the cell's type tag.
fn resolve_scalar(raw: String, tag: CellTypeTag, shared_strings: &[String]) -> Option<CellScalar> {
    match tag {
        CellTypeTag::Shared => {
            let idx: usize = raw.trim().parse().ok()?;
            shared_strings.get(idx).map(|s| CellScalar::Text(s.clone()))
        }
        CellTypeTag::Inline | CellTypeTag::Str => Some(CellScalar::Text(raw)),
        CellTypeTag::Bool => Some(CellScalar::Bool(raw.trim() == "1")),
        CellTypeTag::Error => Some(CellScalar::Error(raw)),
        CellTypeTag::Default => match raw.trim().parse::<f64>() {
            Ok(n) => Some(CellScalar::Number(n)),
            // Untyped non-numeric content (rare, but seen in hand-edited
            // books) reads as text rather than vanishing.
            Err(_) => Some(CellScalar::Text(raw)),
        },
    }
}

/// Parse one worksheet into a [`SheetTable`].
pub(super) fn parse_sheet_table<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    shared_strings: &[String],
) -> Result<SheetTable> {
    let file = archive.by_name(path)?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut table = SheetTable::default();
    let mut buf = Vec::new();
    let mut cell_buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(ref event @ (Event::Start(_) | Event::Empty(_))) => {
                let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                    continue;
                };
                if e.local_name().as_ref() != b"c" {
                    continue;
                }

                let mut position: Option<(u32, u32)> = None;
                let mut tag = CellTypeTag::Default;

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"r" => {
                            position = cell_ref::parse_ref(&attr.value);
                        }
                        b"t" => {
                            tag = parse_cell_type_tag(&attr.value);
                        }
                        _ => {}
                    }
                }

                // A cell without a usable reference cannot be placed; skip it.
                let Some((row, col)) = position else {
                    continue;
                };

                // Self-closing cells like <c r="A1"/> carry no value.
                if matches!(event, Event::Empty(_)) {
                    continue;
                }

                // Collect the cell's value from its <v> child, or the <t>
                // runs of an inline string. Formula text (<f>) is skipped;
                // the cached <v> result is what prices are read from.
                let mut text = String::new();
                let mut saw_value = false;
                let mut in_value = false;

                loop {
                    cell_buf.clear();
                    match xml.read_event_into(&mut cell_buf) {
                        Ok(Event::Start(ref inner)) => {
                            if matches!(inner.local_name().as_ref(), b"v" | b"t") {
                                in_value = true;
                            }
                        }
                        Ok(Event::Text(ref t)) if in_value => {
                            if let Ok(chunk) = t.unescape() {
                                text.push_str(&chunk);
                                saw_value = true;
                            }
                        }
                        Ok(Event::End(ref inner)) => match inner.local_name().as_ref() {
                            b"v" | b"t" => in_value = false,
                            b"c" => break,
                            _ => {}
                        },
                        Ok(Event::Eof) | Err(_) => break,
                        _ => {}
                    }
                }

                if !saw_value {
                    continue;
                }

                if let Some(scalar) = resolve_scalar(text, tag, shared_strings) {
                    table.insert(row, col, scalar);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(table)
}
