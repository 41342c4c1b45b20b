//! Document assembly: the one entry point that turns a vehicle selection
//! into a finished workbook. Orchestrates code resolution, attribute
//! extraction, section growth and writing for every component category,
//! then the header scalars, images, print area and serialization.
//!
//! The only fatal condition here is an unusable template; a missing code
//! writes an empty section, a missing image is omitted, and generation
//! always delivers a document.

use crate::catalog::attributes::build_values;
use crate::catalog::resolver::find_reference_row;
use crate::catalog::resolver::resolve_code;
use crate::catalog::resolver::Marker;
use crate::catalog::vehicle::VehicleRecord;
use crate::catalog::Catalog;
use crate::config::Block;
use crate::config::CatalogConfig;
use crate::config::Category;
use crate::config::HeaderCells;
use crate::config::ImageConfig;
use crate::config::SectionSpec;
use crate::config::TechSheetConfig;
use crate::error::ResultMessage;
use crate::error::TechSheetError;
use crate::helpers::reference::column_to_letters;
use crate::template::expander::ensure_capacity;
use crate::template::images::embed_image;
use crate::template::images::embed_source;
use crate::template::images::resolve_image_source;
use crate::template::locator::locate_sections;
use crate::template::locator::region_rows;
use crate::template::locator::LocatedSection;
use crate::template::writer::write_distributed;
use crate::template::writer::write_scalar;
use crate::template::writer::write_single_column;
use crate::template::TemplateError;
use crate::workbook::cell::CellValue;
use std::io::Cursor;
use std::path::Path;
use umya_spreadsheet::Spreadsheet;
use umya_spreadsheet::Worksheet;

/// The output template, loaded once and cloned per generation so the
/// pristine copy is never mutated.
#[derive(Clone)]
pub struct Template {
    book: Spreadsheet,
}

impl Template {
    /// Loads the template workbook. An absent or unreadable file is the
    /// fatal error class of this pipeline.
    pub fn load(path: &Path) -> Result<Template, TechSheetError> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(TechSheetError::from)
            .with_prefix("Load template workbook")?;
        Ok(Template { book })
    }

    /// Wraps an already built workbook, for hosts that assemble templates
    /// in memory.
    pub fn from_workbook(book: Spreadsheet) -> Template {
        Template { book }
    }
}

/// Per-category user choices from the host UI's dropdowns. `None` (or the
/// "all/any" sentinel) falls back to the vehicle's stored code.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    products: [Option<String>; 6],
    options: [Option<String>; 6],
}

impl Overrides {
    pub fn new() -> Overrides {
        Overrides::default()
    }

    pub fn set_product(&mut self, category: Category, code: impl Into<String>) {
        self.products[category.index()] = Some(code.into());
    }

    pub fn set_options(&mut self, category: Category, code: impl Into<String>) {
        self.options[category.index()] = Some(code.into());
    }

    fn product(&self, category: Category) -> Option<&str> {
        self.products[category.index()].as_deref()
    }

    fn options(&self, category: Category) -> Option<&str> {
        self.options[category.index()].as_deref()
    }
}

/// Resolved attribute lists of one component category.
struct CategoryValues {
    main: Vec<String>,
    options: Vec<String>,
}

/// Generates the technical data sheet for one vehicle and returns the
/// serialized workbook.
pub fn generate(
    vehicle: &VehicleRecord,
    overrides: &Overrides,
    catalog: &Catalog,
    template: &Template,
    config: &TechSheetConfig,
) -> Result<Vec<u8>, TechSheetError> {
    let mut book = template.book.clone();
    let sheet_index = working_sheet_index(&book, &config.layout.sheet_name);

    // Sections are discovered by title text exactly once, on the pristine
    // template; afterwards their boundaries are maintained through the
    // row-offset bookkeeping below. Re-scanning between insertions would be
    // fragile against written text that happens to contain a title keyword.
    let mut sections = {
        let sheet = book
            .get_sheet(&sheet_index)
            .ok_or(TemplateError::NoWorksheet)?;
        locate_sections(sheet, &config.layout)?
    };

    {
        let sheet = sheet_mut(&mut book, sheet_index)?;
        write_header(sheet, vehicle, &config.layout.header_cells);
    }

    let values: Vec<CategoryValues> = Category::ALL
        .iter()
        .map(|category| category_values(catalog, vehicle, overrides, *category, &config.catalog))
        .collect();

    for spec in &config.layout.sections {
        let needed = rows_needed(spec, &values);
        let position = sections
            .iter()
            .position(|section| section.id == spec.id)
            .ok_or(TemplateError::SectionNotFound(spec.id))?;
        let title_row = sections[position].title_row;
        let next_row = sections[position].next_row;
        let inserted = ensure_capacity(
            &mut book,
            sheet_index,
            title_row,
            next_row,
            needed,
            &config.layout,
        )?;
        if inserted > 0 {
            shift_sections(&mut sections, next_row, inserted);
        }

        let section = &sections[position];
        let (title_row, next_row) = (section.title_row, section.next_row);
        let sheet = sheet_mut(&mut book, sheet_index)?;
        let rows = region_rows(title_row, next_row, sheet.get_highest_row());
        if spec.distributed {
            if let Some(category) = spec.categories.first() {
                let list = section_list(spec, *category, &values);
                write_distributed(sheet, &rows, &spec.columns, list);
            }
        } else {
            for (category, column) in spec.categories.iter().zip(&spec.columns) {
                let list = section_list(spec, *category, &values);
                write_single_column(sheet, &rows, *column, list);
            }
        }
    }

    {
        let sheet = sheet_mut(&mut book, sheet_index)?;
        embed_images(sheet, vehicle, &config.layout.images);
        set_print_area(sheet, config.layout.scan_max_col);
    }

    let mut cursor = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Suggested download name, derived from the vehicle's platform code.
pub fn output_file_name(vehicle: &VehicleRecord) -> String {
    let stem: String = vehicle
        .platform_code
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "technical_data_sheet.xlsx".to_owned()
    } else {
        format!("{stem}.xlsx")
    }
}

/// Index of the preferred working sheet, falling back to the first sheet.
fn working_sheet_index(book: &Spreadsheet, preferred: &str) -> usize {
    book.get_sheet_collection()
        .iter()
        .position(|sheet| sheet.get_name() == preferred)
        .unwrap_or(0)
}

fn sheet_mut(book: &mut Spreadsheet, index: usize) -> Result<&mut Worksheet, TechSheetError> {
    book.get_sheet_mut(&index)
        .ok_or_else(|| TemplateError::NoWorksheet.into())
}

/// Applies one insertion to every stored section boundary: rows at or
/// below the insertion point move down by `inserted`. An insertion with no
/// following section (open-ended last region) shifts nothing.
fn shift_sections(sections: &mut [LocatedSection], insert_at: Option<u32>, inserted: u32) {
    let Some(insert_at) = insert_at else {
        return;
    };
    for section in sections.iter_mut() {
        if section.title_row >= insert_at {
            section.title_row += inserted;
        }
        if let Some(next) = section.next_row.as_mut() {
            if *next >= insert_at {
                *next += inserted;
            }
        }
    }
}

/// Rows a section must hold: the longest of its value lists for
/// side-by-side blocks, the row count of the round-robin fill for
/// distributed blocks, and never less than one.
fn rows_needed(spec: &SectionSpec, values: &[CategoryValues]) -> usize {
    if spec.distributed {
        let len = spec
            .categories
            .first()
            .map(|category| section_list(spec, *category, values).len())
            .unwrap_or(0);
        let per_row = spec.columns.len().max(1);
        len.div_ceil(per_row).max(1)
    } else {
        spec.categories
            .iter()
            .map(|category| section_list(spec, *category, values).len())
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

fn section_list<'a>(
    spec: &SectionSpec,
    category: Category,
    values: &'a [CategoryValues],
) -> &'a [String] {
    let entry = &values[category.index()];
    match spec.block {
        Block::Main => &entry.main,
        Block::Options => &entry.options,
    }
}

/// Resolves codes and extracts both attribute lists of one category.
fn category_values(
    catalog: &Catalog,
    vehicle: &VehicleRecord,
    overrides: &Overrides,
    category: Category,
    config: &CatalogConfig,
) -> CategoryValues {
    let table = catalog.component(category);
    let code_column = table.code_column(&config.category(category).code_column);
    let codes = vehicle.codes(category);

    let product_code = resolve_code(
        overrides.product(category),
        &codes.product,
        &config.any_sentinel,
    );
    let product_row = find_reference_row(
        table,
        product_code,
        code_column,
        Some(&vehicle.platform_code),
        Some(Marker::Product),
    );

    let options_code = resolve_code(
        overrides.options(category),
        &codes.options,
        &config.any_sentinel,
    );
    let options_row = find_reference_row(table, options_code, code_column, None, Some(Marker::Option));

    CategoryValues {
        main: build_values(table, product_row, code_column, config),
        options: build_values(table, options_row, code_column, config),
    }
}

/// Writes the scalar header fields into their fixed, possibly merged cells.
fn write_header(sheet: &mut Worksheet, vehicle: &VehicleRecord, cells: &HeaderCells) {
    write_scalar(sheet, &cells.country, &CellValue::from_text(&vehicle.country));
    write_scalar(sheet, &cells.brand, &CellValue::from_text(&vehicle.brand));
    write_scalar(sheet, &cells.model, &CellValue::from_text(&vehicle.model));
    write_scalar(
        sheet,
        &cells.platform_code,
        &CellValue::from_text(&vehicle.platform_code),
    );
    write_scalar(
        sheet,
        &cells.platform_standard,
        &CellValue::from_text(&vehicle.platform_standard),
    );
    let dimensions = &vehicle.dimensions;
    write_scalar(sheet, &cells.exterior_length, &dimensions.exterior_length);
    write_scalar(sheet, &cells.exterior_width, &dimensions.exterior_width);
    write_scalar(sheet, &cells.exterior_height, &dimensions.exterior_height);
    write_scalar(sheet, &cells.interior_length, &dimensions.interior_length);
    write_scalar(sheet, &cells.interior_width, &dimensions.interior_width);
    write_scalar(sheet, &cells.interior_height, &dimensions.interior_height);
    write_scalar(sheet, &cells.payload, &dimensions.payload);
    write_scalar(sheet, &cells.volume, &dimensions.volume);
    write_scalar(sheet, &cells.pallets, &dimensions.pallets);
}

/// Embeds the vehicle photo, client logo and fuel pictogram from the
/// vehicle record, and the fixed platform logo, skipping whatever does not
/// resolve to an existing local file.
fn embed_images(sheet: &mut Worksheet, vehicle: &VehicleRecord, config: &ImageConfig) {
    let per_record = [
        (&vehicle.images.photo, &config.photo_subdir, &config.photo_anchor),
        (
            &vehicle.images.client_logo,
            &config.client_logo_subdir,
            &config.client_logo_anchor,
        ),
        (
            &vehicle.images.fuel_pictogram,
            &config.fuel_subdir,
            &config.fuel_anchor,
        ),
    ];
    for (reference, subdir, anchor) in per_record {
        if let Some(reference) = reference {
            if let Some(source) = resolve_image_source(reference, &config.root_dir, subdir) {
                embed_source(sheet, source, anchor);
            }
        }
    }
    embed_image(sheet, &config.platform_logo, &config.platform_logo_anchor);
}

/// Sets the print area to cover everything from A1 down to the last row
/// that still carries a value or styled cell.
fn set_print_area(sheet: &mut Worksheet, max_col: u32) {
    let last_row = last_used_row(sheet, max_col);
    let address = format!(
        "'{}'!$A$1:${}${}",
        sheet.get_name(),
        column_to_letters(max_col),
        last_row
    );
    let _ = sheet.add_defined_name("_xlnm.Print_Area".to_owned(), address);
}

/// Last row holding any materialized cell (a value or template styling)
/// within the scanned columns.
fn last_used_row(sheet: &Worksheet, max_col: u32) -> u32 {
    for row in (1..=sheet.get_highest_row()).rev() {
        if (1..=max_col).any(|col| sheet.get_cell((col, row)).is_some()) {
            return row;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_follows_platform_code() {
        let mut vehicle = VehicleRecord::default();
        vehicle.platform_code = "PF42 - EuroTruck".to_owned();
        assert_eq!(output_file_name(&vehicle), "PF42___EuroTruck.xlsx");

        let unnamed = VehicleRecord::default();
        assert_eq!(output_file_name(&unnamed), "technical_data_sheet.xlsx");
    }

    #[test]
    fn preferred_sheet_wins_over_first() {
        let mut book = umya_spreadsheet::new_file();
        book.new_sheet("date").unwrap();
        assert_eq!(working_sheet_index(&book, "date"), 1);
        assert_eq!(working_sheet_index(&book, "missing"), 0);
    }
}
