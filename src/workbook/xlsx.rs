//! Reads the reference workbook: workbook structure, shared strings, and
//! worksheet cell data, streamed out of the xlsx ZIP container with
//! `quick-xml` and collected into dense [`Sheet`](crate::workbook::sheet::Sheet)
//! grids.

use crate::error::TechSheetError;
use crate::helpers::reference::parse_reference;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::workbook::cell::Cell;
use crate::workbook::cell::CellValue;
use crate::workbook::sheet::Sheet;
use crate::workbook::WorkbookError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use zip::ZipArchive;

// XML tag names for parsing the SpreadsheetML parts
const TAG_RELATIONSHIP: &[u8] = b"Relationship"; // Part relationship
const TAG_SHARED_STRING_ITEM: QName = QName(b"si"); // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh"); // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t"); // Text content within strings
const TAG_SHEET: QName = QName(b"sheet"); // Worksheet definition
const TAG_ROW: QName = QName(b"row"); // Row in worksheet
const TAG_CELL: QName = QName(b"c"); // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is"); // Inline string value
const TAG_VALUE: QName = QName(b"v"); // Cell value content

/// How a raw cell value must be interpreted, from the cell's `t` attribute.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
enum RawKind {
    /// Numeric content (the xlsx default when `t` is absent)
    #[default]
    Number,
    /// Inline string content
    Inline,
    /// Index into the shared string table
    Shared,
    /// Boolean content
    Bool,
    /// Error value, read leniently as an absent cell
    Skip,
}

/// An opened reference workbook with its structure parsed up front.
pub(crate) struct WorkbookReader {
    /// Source file name, kept for error messages
    pub(crate) name: String,
    /// ZIP archive containing the workbook parts
    zip: ZipArchive<BufReader<File>>,
    /// Fully loaded shared string table
    shared_strings: Vec<String>,
    /// Worksheets as (name, zip_path) pairs in workbook order
    sheets: Vec<(String, String)>,
}

impl WorkbookReader {
    /// Opens a reference workbook and parses its structure.
    ///
    /// A missing or unreadable file is the fatal error class of this crate;
    /// it propagates untouched so the caller can surface it.
    pub(crate) fn open(path: &Path) -> Result<WorkbookReader, TechSheetError> {
        let name = path.display().to_string();
        let file = File::open(path)?;
        let mut zip = ZipArchive::new(BufReader::new(file))?;
        let sheets = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(WorkbookError::NoWorksheets(name.clone()))?;
        }
        let shared_strings = load_shared_strings(&mut zip)?;
        Ok(WorkbookReader {
            name,
            zip,
            shared_strings,
            sheets,
        })
    }

    /// Reads one worksheet into a dense grid. Returns `None` when the
    /// workbook has no sheet with that name.
    pub(crate) fn read_sheet(&mut self, sheet_name: &str) -> Result<Option<Sheet>, TechSheetError> {
        let zip_path = match self
            .sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, path)| path.to_owned())
        {
            Some(path) => path,
            None => return Ok(None),
        };

        let mut sheet = Sheet::new(sheet_name);
        let mut row_count = 0u32;
        let mut col_count = 0u32;
        let mut row = 0u32;
        let mut col = 0u32;
        let mut kind = RawKind::Skip;
        let mut value = String::new();
        let shared_strings = &self.shared_strings;
        let mut reader = self
            .zip
            .xml_reader(&zip_path)?
            .ok_or_else(|| WorkbookError::MissingPart(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
                col_count = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event.get_attribute_value("r")?
                    .and_then(|reference| parse_reference(&reference))
                    .map(|(col, row)| (row, col))
                    .unwrap_or((row_count + 1, col_count + 1));
                col_count += 1;
                kind = event.get_attribute_value("t")?.map(|t| {
                    match t.as_ref() {
                        "inlineStr" | "str" => RawKind::Inline,
                        "s" => RawKind::Shared,
                        "b" => RawKind::Bool,
                        "e" => RawKind::Skip,
                        _ => RawKind::Number,
                    }
                }).unwrap_or(RawKind::Number);
                value.clear();
            }
            Event::Start(event) if kind != RawKind::Skip && event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if kind != RawKind::Skip && event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if !value.is_empty() && event.name() == TAG_CELL => {
                sheet.push(Cell {
                    row,
                    col,
                    value: decode_value(kind, &value, shared_strings),
                });
                value.clear();
            }
        });
        sheet.finish();
        Ok(Some(sheet))
    }
}

/// Interprets a raw cell value according to its declared kind.
fn decode_value(kind: RawKind, raw: &str, shared_strings: &[String]) -> CellValue {
    match kind {
        RawKind::Skip => CellValue::Empty,
        RawKind::Inline => CellValue::from_text(raw),
        RawKind::Shared => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| shared_strings.get(index))
            .map(|text| CellValue::from_text(text))
            .unwrap_or(CellValue::Empty),
        RawKind::Bool => {
            let raw = raw.trim();
            CellValue::Bool(raw == "1" || raw.eq_ignore_ascii_case("true"))
        }
        RawKind::Number => match raw.trim().parse::<f64>() {
            Ok(number) => CellValue::from_number(number),
            // Some writers emit untyped text cells; read them as text
            Err(_) => CellValue::from_text(raw),
        },
    }
}

/// Loads worksheet relationships from the workbook's rels part.
///
/// # Arguments
/// * `zip` - ZIP archive handle
/// * `path` - Path to the relationships XML part within the archive
///
/// # Returns
/// Mapping of relationship IDs to worksheet paths
fn load_relationships(
    zip: &mut ZipArchive<BufReader<File>>,
    path: &str,
) -> Result<HashMap<String, String>, TechSheetError> {
    let mut reader = zip
        .xml_reader(path)?
        .ok_or_else(|| WorkbookError::MissingPart(path.to_owned()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheet relationships are of interest
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Loads workbook structure: worksheet names and their part paths.
fn load_workbook(
    zip: &mut ZipArchive<BufReader<File>>,
) -> Result<Vec<(String, String)>, TechSheetError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| WorkbookError::MissingPart("xl/workbook.xml".to_owned()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.unescape_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.unescape_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&id.to_string()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
    });
    Ok(sheets)
}

/// Loads the complete shared string table. The reference workbooks this
/// crate reads are small, so the table is held in memory whole.
fn load_shared_strings(
    zip: &mut ZipArchive<BufReader<File>>,
) -> Result<Vec<String>, TechSheetError> {
    let mut shared_strings = Vec::<String>::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
            shared_strings.push(string);
        }
    });
    Ok(shared_strings)
}

/// Normalizes a relationship target to a path within the xlsx archive.
fn to_zip_path(path: Cow<'_, str>) -> String {
    if path.starts_with("/xl/") {
        path[1..].to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Reads string content up to `end_tag`, skipping phonetic annotations and
/// resolving text, CDATA and entity reference events.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, TechSheetError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_bytes_text(&event)?,
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
