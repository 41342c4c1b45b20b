//! End-to-end generation scenarios: a reference workbook and a template are
//! built with umya-spreadsheet, the reference workbook is round-tripped
//! through the crate's own loader, and the generated document is read back
//! and inspected.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use techsheet::catalog::CatalogCache;
use techsheet::config::TechSheetConfig;
use techsheet::{generate, Catalog, Overrides, Template, VehicleRecord};
use umya_spreadsheet::{new_file, Spreadsheet, Worksheet};

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("techsheet_{}_{}.xlsx", tag, std::process::id()))
}

fn fill_sheet(sheet: &mut Worksheet, rows: &[Vec<String>]) {
    for (row, record) in rows.iter().enumerate() {
        for (col, value) in record.iter().enumerate() {
            if !value.is_empty() {
                sheet
                    .get_cell_mut((col as u32 + 1, row as u32 + 1))
                    .set_value(value.as_str());
            }
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

fn cabin_lines(count: usize) -> String {
    (1..=count)
        .map(|i| format!("cab line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reference workbook: one vehicle sheet, six component sheets.
fn build_reference(path: &Path) {
    let mut book = new_file();
    {
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.set_name("VEHICLES");
        fill_sheet(
            sheet,
            &[
                strings(&[
                    "Country", "Brand", "Model", "Platform code", "Platform standard",
                    "Cabin code", "Cabin options", "Engine code", "Engine options",
                    "Chassis code", "Chassis options", "Body code", "Body options",
                    "Refrigeration code", "Refrigeration options", "Tail lift code",
                    "Tail lift options", "Payload",
                ]),
                strings(&[
                    "FR", "EuroTruck", "ET-200", "PF42 - EuroTruck", "EN12642",
                    "CAB001", "CAB001", "ENG010", "", "CH020", "", "BOD030", "BODOPT1",
                    "GF100", "", "TL040", "", "1700",
                ]),
                strings(&[
                    "DE", "EuroTruck", "ET-100", "ZZ99 - Micro", "EN12642",
                    "CAB002", "", "ENG010", "", "CH020", "", "BOD030", "",
                    "", "", "TL040", "", "1500",
                ]),
                strings(&[
                    "FR", "EuroTruck", "ET-300", "PF42 - EuroTruck", "EN12642",
                    "", "", "ENG010", "", "CH020", "", "BOD030", "",
                    "GF100", "", "TL040", "", "1600",
                ]),
            ],
        );
    }

    let component = |book: &mut Spreadsheet, name: &str, rows: &[Vec<String>]| {
        let sheet = book.new_sheet(name).unwrap();
        fill_sheet(sheet, rows);
    };
    component(
        &mut book,
        "CABIN",
        &[
            strings(&["CAB_cabin", "Product or Option", "Equipment"]),
            vec!["CAB001".to_owned(), "Product".to_owned(), cabin_lines(25)],
            strings(&["CAB001", "Option", "option trim"]),
            strings(&["CAB002", "Product", "basic seat"]),
            strings(&["PF42-A", "Product", "fallback cab"]),
        ],
    );
    component(
        &mut book,
        "ENGINE",
        &[
            strings(&["ENG_engine", "Product or Option", "Power"]),
            strings(&["ENG010", "Product", "220 hp"]),
        ],
    );
    component(
        &mut book,
        "CHASSIS",
        &[
            strings(&["CH_chassis", "Product or Option", "Axles"]),
            strings(&["CH020", "Product", "4x2"]),
        ],
    );
    component(
        &mut book,
        "BODY",
        &[
            strings(&["BO_body", "Product or Option", "Panels"]),
            strings(&["BOD030", "Product", "isothermal panels"]),
            strings(&["BODOPT1", "Option", "side door\nrear steps\nled strip"]),
        ],
    );
    component(
        &mut book,
        "REFRIGERATION",
        &[
            strings(&["RU_refrigeration", "Product or Option", "Unit"]),
            strings(&["GF100", "Product", "multi-temp unit"]),
        ],
    );
    component(
        &mut book,
        "TAIL LIFT",
        &[
            strings(&["TL_tail_lift", "Product or Option", "Capacity"]),
            strings(&["TL040", "Product", "750 kg"]),
        ],
    );

    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

/// Template: titled sections with the standard base capacities, merged
/// sample rows, and a uniform style over the top region.
fn build_template() -> Template {
    let mut book = new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    sheet.set_name("date");

    let titles = [
        (17u32, "CABIN / ENGINE / CHASSIS"),
        (35, "CABIN / ENGINE / CHASSIS OPTIONS"),
        (39, "BODY"),
        (45, "BODY OPTIONS"),
        (48, "REFRIGERATION UNIT"),
        (55, "REFRIGERATION UNIT OPTIONS"),
        (58, "TAIL LIFT"),
        (64, "TAIL LIFT OPTIONS"),
        (68, "PUBLICITY"),
    ];
    for (row, text) in titles {
        sheet.get_cell_mut((1u32, row)).set_value(text);
    }

    // sample-row merges defining each block's column span
    sheet.add_merge_cells("B18:E18");
    sheet.add_merge_cells("F18:G18");
    sheet.add_merge_cells("H18:J18");
    sheet.add_merge_cells("B36:E36");
    sheet.add_merge_cells("F36:G36");
    sheet.add_merge_cells("H36:J36");
    sheet.add_merge_cells("B40:J40");
    sheet.add_merge_cells("B46:C46");
    sheet.add_merge_cells("F46:G46");
    sheet.add_merge_cells("B49:J49");
    sheet.add_merge_cells("B56:J56");
    sheet.add_merge_cells("B59:J59");
    sheet.add_merge_cells("B65:J65");

    // uniform styling across the top region, the seed for style copies
    for row in 18..=34u32 {
        sheet
            .get_style_mut(format!("B{row}").as_str())
            .set_background_color("FFDDEEFF");
    }

    Template::from_workbook(book)
}

fn load_catalog(tag: &str) -> Catalog {
    let path = temp_path(tag);
    build_reference(&path);
    Catalog::load(&path, &TechSheetConfig::default().catalog).unwrap()
}

fn read_back(bytes: Vec<u8>) -> Spreadsheet {
    umya_spreadsheet::reader::xlsx::read_reader(std::io::Cursor::new(bytes), true).unwrap()
}

fn sheet(book: &Spreadsheet) -> &Worksheet {
    book.get_sheet(&0).unwrap()
}

fn vehicle(catalog: &Catalog, model: &str) -> VehicleRecord {
    catalog
        .vehicles
        .iter()
        .find(|record| record.model == model)
        .unwrap()
        .clone()
}

#[test]
fn long_cabin_list_grows_the_top_section() {
    let config = TechSheetConfig::default();
    let catalog = load_catalog("grow");
    let vehicle = vehicle(&catalog, "ET-200");

    let bytes = generate(&vehicle, &Overrides::new(), &catalog, &build_template(), &config).unwrap();
    let book = read_back(bytes);
    let sheet = sheet(&book);

    // 25 cabin attributes in a 17-row region: 8 rows inserted, everything
    // below shifted accordingly
    assert_eq!(sheet.get_value((1u32, 17u32)), "CABIN / ENGINE / CHASSIS");
    assert_eq!(sheet.get_value((1u32, 43u32)), "CABIN / ENGINE / CHASSIS OPTIONS");
    assert_eq!(sheet.get_value((2u32, 18u32)), "cab line 1");
    assert_eq!(sheet.get_value((2u32, 42u32)), "cab line 25");

    // side-by-side engine and chassis columns share the region
    assert_eq!(sheet.get_value((6u32, 18u32)), "220 hp");
    assert_eq!(sheet.get_value((8u32, 18u32)), "4x2");

    // inserted rows carry the template row's style
    let style_of = |row: u32| {
        sheet
            .get_cell((2u32, row))
            .map(|cell| format!("{:?}", cell.get_style()))
            .unwrap()
    };
    assert_eq!(style_of(17 + 20), style_of(17 + 3));

    // header scalars, merge-aware
    assert_eq!(sheet.get_value((3u32, 4u32)), "FR");
    assert_eq!(sheet.get_value((3u32, 7u32)), "PF42 - EuroTruck");
    assert_eq!(sheet.get_value((3u32, 12u32)), "1700");
}

#[test]
fn option_tagged_row_feeds_the_options_section() {
    let config = TechSheetConfig::default();
    let catalog = load_catalog("marker");
    let vehicle = vehicle(&catalog, "ET-200");

    let bytes = generate(&vehicle, &Overrides::new(), &catalog, &build_template(), &config).unwrap();
    let book = read_back(bytes);
    let sheet = sheet(&book);

    // CAB001 exists as both a product and an option row; the options
    // section gets the option-tagged one
    assert_eq!(sheet.get_value((2u32, 44u32)), "option trim");
    assert_ne!(sheet.get_value((2u32, 44u32)), "cab line 1");
}

#[test]
fn distributed_options_fill_columns_row_major() {
    let config = TechSheetConfig::default();
    let catalog = load_catalog("distributed");
    let vehicle = vehicle(&catalog, "ET-200");

    let bytes = generate(&vehicle, &Overrides::new(), &catalog, &build_template(), &config).unwrap();
    let book = read_back(bytes);
    let sheet = sheet(&book);

    // body options title sits 8 rows lower after the top expansion; its
    // three values flow over two side-by-side columns
    assert_eq!(sheet.get_value((1u32, 53u32)), "BODY OPTIONS");
    assert_eq!(sheet.get_value((2u32, 54u32)), "side door");
    assert_eq!(sheet.get_value((6u32, 54u32)), "rear steps");
    assert_eq!(sheet.get_value((2u32, 55u32)), "led strip");
}

#[test]
fn missing_refrigeration_code_leaves_the_section_blank() {
    let config = TechSheetConfig::default();
    let catalog = load_catalog("blank");
    let vehicle = vehicle(&catalog, "ET-100");

    let bytes = generate(&vehicle, &Overrides::new(), &catalog, &build_template(), &config).unwrap();
    let book = read_back(bytes);
    let sheet = sheet(&book);

    // no attribute list outgrew its section, so nothing shifted
    assert_eq!(sheet.get_value((1u32, 48u32)), "REFRIGERATION UNIT");
    assert_eq!(sheet.get_value((1u32, 55u32)), "REFRIGERATION UNIT OPTIONS");
    for row in 49..=54u32 {
        assert_eq!(sheet.get_value((2u32, row)), "", "row {row}");
    }
}

#[test]
fn platform_prefix_fallback_finds_the_cabin_row() {
    let config = TechSheetConfig::default();
    let catalog = load_catalog("fallback");
    let vehicle = vehicle(&catalog, "ET-300");

    let bytes = generate(&vehicle, &Overrides::new(), &catalog, &build_template(), &config).unwrap();
    let book = read_back(bytes);
    let sheet = sheet(&book);

    // empty cabin code, platform "PF42 - EuroTruck": the PF42-prefixed
    // reference row is used
    assert_eq!(sheet.get_value((2u32, 18u32)), "fallback cab");
}

#[test]
fn explicit_override_beats_the_vehicle_default() {
    let config = TechSheetConfig::default();
    let catalog = load_catalog("override");
    let vehicle = vehicle(&catalog, "ET-200");

    let mut overrides = Overrides::new();
    overrides.set_product(techsheet::Category::Cabin, "CAB002");
    let bytes = generate(&vehicle, &overrides, &catalog, &build_template(), &config).unwrap();
    let book = read_back(bytes);
    let sheet = sheet(&book);

    assert_eq!(sheet.get_value((2u32, 18u32)), "basic seat");
}

#[test]
fn catalog_cache_reuses_parses_until_invalidated() {
    let path = temp_path("cache");
    build_reference(&path);
    let config = TechSheetConfig::default();

    let mut cache = CatalogCache::new();
    let first = cache.fetch(&path, &config.catalog).unwrap();
    let second = cache.fetch(&path, &config.catalog).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    cache.invalidate(&path);
    let third = cache.fetch(&path, &config.catalog).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
}

#[test]
fn missing_component_sheet_fails_the_load() {
    let path = temp_path("missing_sheet");
    let mut book = new_file();
    book.get_sheet_mut(&0).unwrap().set_name("VEHICLES");
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

    let config = TechSheetConfig::default();
    assert!(Catalog::load(&path, &config.catalog).is_err());
}
