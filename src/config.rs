//! Configuration for both sides of the crate: which sheets and columns the
//! reference workbook is expected to carry, and how the output template is
//! laid out. Everything is an explicit value threaded through the pipeline;
//! there is no ambient state. The defaults describe the standard template
//! and reference workbook; hosts with diverging files override fields.

use std::path::PathBuf;

/// Vehicle component categories, in the order the document presents them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Cabin,
    Engine,
    Chassis,
    Body,
    Refrigeration,
    TailLift,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Cabin,
        Category::Engine,
        Category::Chassis,
        Category::Body,
        Category::Refrigeration,
        Category::TailLift,
    ];

    /// Stable index used by per-category arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Category::Cabin => 0,
            Category::Engine => 1,
            Category::Chassis => 2,
            Category::Body => 3,
            Category::Refrigeration => 4,
            Category::TailLift => 5,
        }
    }

    /// Human-readable label, used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Category::Cabin => "cabin",
            Category::Engine => "engine",
            Category::Chassis => "chassis",
            Category::Body => "body",
            Category::Refrigeration => "refrigeration unit",
            Category::TailLift => "tail lift",
        }
    }
}

/// Which attribute list of a category a template section displays.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Attributes of the base product row
    Main,
    /// Attributes of the options row
    Options,
}

/// Identity of a template section.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SectionId {
    Top,
    TopOptions,
    Body,
    BodyOptions,
    Refrigeration,
    RefrigerationOptions,
    TailLift,
    TailLiftOptions,
}

/// Per-category reference sheet configuration.
#[derive(Clone, Debug)]
pub struct CategoryConfig {
    pub category: Category,
    /// Sheet name in the reference workbook
    pub sheet: String,
    /// Code column, matched by normalized header name
    pub code_column: String,
}

/// Normalized column names of the vehicle sheet. Per-category arrays are
/// indexed in [`Category::ALL`] order.
#[derive(Clone, Debug)]
pub struct VehicleColumns {
    pub country: String,
    pub brand: String,
    pub model: String,
    pub platform_code: String,
    pub platform_standard: String,
    pub product_codes: [String; 6],
    pub option_codes: [String; 6],
    pub interior_width: String,
    pub interior_length: String,
    pub interior_height: String,
    pub exterior_width: String,
    pub exterior_length: String,
    pub exterior_height: String,
    pub payload: String,
    pub volume: String,
    pub pallets: String,
    pub photo: String,
    pub client_logo: String,
    pub fuel_pictogram: String,
}

impl Default for VehicleColumns {
    fn default() -> Self {
        VehicleColumns {
            country: "country".to_owned(),
            brand: "brand".to_owned(),
            model: "model".to_owned(),
            platform_code: "platform_code".to_owned(),
            platform_standard: "platform_standard".to_owned(),
            product_codes: [
                "cabin_code".to_owned(),
                "engine_code".to_owned(),
                "chassis_code".to_owned(),
                "body_code".to_owned(),
                "refrigeration_code".to_owned(),
                "tail_lift_code".to_owned(),
            ],
            option_codes: [
                "cabin_options".to_owned(),
                "engine_options".to_owned(),
                "chassis_options".to_owned(),
                "body_options".to_owned(),
                "refrigeration_options".to_owned(),
                "tail_lift_options".to_owned(),
            ],
            interior_width: "interior_width".to_owned(),
            interior_length: "interior_length".to_owned(),
            interior_height: "interior_height".to_owned(),
            exterior_width: "exterior_width".to_owned(),
            exterior_length: "exterior_length".to_owned(),
            exterior_height: "exterior_height".to_owned(),
            payload: "payload".to_owned(),
            volume: "volume".to_owned(),
            pallets: "pallets".to_owned(),
            photo: "photo".to_owned(),
            client_logo: "client_logo".to_owned(),
            fuel_pictogram: "fuel_pictogram".to_owned(),
        }
    }
}

/// Configuration of the reference workbook side.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Sheet holding one row per vehicle
    pub vehicle_sheet: String,
    /// Reference sheet and code column per component category
    pub categories: [CategoryConfig; 6],
    /// Vehicle sheet column names
    pub vehicle_columns: VehicleColumns,
    /// Dropdown sentinel meaning "no explicit choice"
    pub any_sentinel: String,
    /// Normalized prefix of reserved free-zone columns, excluded from
    /// attribute extraction
    pub free_zone_prefix: String,
    /// A header spanning more lines than this, together with
    /// `concatenation_char_threshold`, marks a redundant concatenation
    /// column that is dropped at load time
    pub concatenation_line_threshold: usize,
    /// Companion character-length threshold for concatenation columns
    pub concatenation_char_threshold: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let category = |category: Category, sheet: &str, code_column: &str| CategoryConfig {
            category,
            sheet: sheet.to_owned(),
            code_column: code_column.to_owned(),
        };
        CatalogConfig {
            vehicle_sheet: "VEHICLES".to_owned(),
            categories: [
                category(Category::Cabin, "CABIN", "cab_cabin"),
                category(Category::Engine, "ENGINE", "eng_engine"),
                category(Category::Chassis, "CHASSIS", "ch_chassis"),
                category(Category::Body, "BODY", "bo_body"),
                category(Category::Refrigeration, "REFRIGERATION", "ru_refrigeration"),
                category(Category::TailLift, "TAIL LIFT", "tl_tail_lift"),
            ],
            vehicle_columns: VehicleColumns::default(),
            any_sentinel: "ALL".to_owned(),
            free_zone_prefix: "free_zone".to_owned(),
            concatenation_line_threshold: 3,
            concatenation_char_threshold: 120,
        }
    }
}

impl CatalogConfig {
    /// Reference sheet configuration for one category.
    pub fn category(&self, category: Category) -> &CategoryConfig {
        &self.categories[category.index()]
    }
}

/// One logical region of the output template.
#[derive(Clone, Debug)]
pub struct SectionSpec {
    pub id: SectionId,
    /// Every keyword must appear in the normalized title cell text
    pub keywords: Vec<String>,
    /// No keyword may appear
    pub excluded: Vec<String>,
    /// Categories whose attribute lists feed this section
    pub categories: Vec<Category>,
    /// Which list (main or options) of those categories
    pub block: Block,
    /// Start column of each text block (1-based)
    pub columns: Vec<u32>,
    /// When set, one value list flows across `columns` round-robin instead
    /// of one category per column
    pub distributed: bool,
    /// Rows the template pre-allocates to this section
    pub base_rows: u32,
}

/// Template cell addresses of the scalar header fields.
#[derive(Clone, Debug)]
pub struct HeaderCells {
    pub country: String,
    pub brand: String,
    pub model: String,
    pub platform_code: String,
    pub platform_standard: String,
    pub exterior_length: String,
    pub exterior_width: String,
    pub exterior_height: String,
    pub interior_length: String,
    pub interior_width: String,
    pub interior_height: String,
    pub payload: String,
    pub volume: String,
    pub pallets: String,
}

impl Default for HeaderCells {
    fn default() -> Self {
        HeaderCells {
            country: "C4".to_owned(),
            brand: "C5".to_owned(),
            model: "C6".to_owned(),
            platform_code: "C7".to_owned(),
            platform_standard: "C8".to_owned(),
            exterior_length: "C10".to_owned(),
            exterior_width: "E10".to_owned(),
            exterior_height: "G10".to_owned(),
            interior_length: "C11".to_owned(),
            interior_width: "E11".to_owned(),
            interior_height: "G11".to_owned(),
            payload: "C12".to_owned(),
            volume: "E12".to_owned(),
            pallets: "G12".to_owned(),
        }
    }
}

/// Image asset resolution and placement.
#[derive(Clone, Debug)]
pub struct ImageConfig {
    /// Root directory of local image assets
    pub root_dir: PathBuf,
    /// Subdirectory of vehicle photos under the root
    pub photo_subdir: String,
    /// Subdirectory of client logos under the root
    pub client_logo_subdir: String,
    /// Subdirectory of fuel-type pictograms under the root
    pub fuel_subdir: String,
    /// Fixed platform logo, embedded whenever the file exists
    pub platform_logo: PathBuf,
    pub photo_anchor: String,
    pub client_logo_anchor: String,
    pub fuel_anchor: String,
    pub platform_logo_anchor: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            root_dir: PathBuf::from("assets/images"),
            photo_subdir: "vehicles".to_owned(),
            client_logo_subdir: "clients".to_owned(),
            fuel_subdir: "fuel".to_owned(),
            platform_logo: PathBuf::from("assets/images/platform_logo.png"),
            photo_anchor: "H2".to_owned(),
            client_logo_anchor: "A2".to_owned(),
            fuel_anchor: "J4".to_owned(),
            platform_logo_anchor: "H12".to_owned(),
        }
    }
}

/// Configuration of the template side.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    /// Preferred working sheet name; the first sheet is the fallback
    pub sheet_name: String,
    /// Rightmost column scanned for section titles
    pub scan_max_col: u32,
    /// Hard cap on rows inserted into any one section per generation.
    /// Guards against runaway sheet growth from malformed reference data;
    /// needs beyond the cap are truncated with a warning.
    pub max_extra_rows: u32,
    /// Sections in top-to-bottom template order
    pub sections: Vec<SectionSpec>,
    /// Keywords of the terminal footer marker below the last section
    pub footer_keywords: Vec<String>,
    pub header_cells: HeaderCells,
    pub images: ImageConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let section = |id: SectionId,
                       keywords: &[&str],
                       excluded: &[&str],
                       categories: &[Category],
                       block: Block,
                       columns: &[u32],
                       distributed: bool,
                       base_rows: u32| SectionSpec {
            id,
            keywords: keywords.iter().map(|s| (*s).to_owned()).collect(),
            excluded: excluded.iter().map(|s| (*s).to_owned()).collect(),
            categories: categories.to_vec(),
            block,
            columns: columns.to_vec(),
            distributed,
            base_rows,
        };
        let top = [Category::Cabin, Category::Engine, Category::Chassis];
        LayoutConfig {
            sheet_name: "date".to_owned(),
            scan_max_col: 12,
            max_extra_rows: 200,
            sections: vec![
                section(SectionId::Top, &["cabin"], &["options"], &top, Block::Main, &[2, 6, 8], false, 17),
                section(SectionId::TopOptions, &["cabin", "options"], &[], &top, Block::Options, &[2, 6, 8], false, 3),
                section(SectionId::Body, &["body"], &["options"], &[Category::Body], Block::Main, &[2], false, 5),
                section(SectionId::BodyOptions, &["body", "options"], &[], &[Category::Body], Block::Options, &[2, 6], true, 2),
                section(SectionId::Refrigeration, &["refrigeration"], &["options"], &[Category::Refrigeration], Block::Main, &[2], false, 6),
                section(SectionId::RefrigerationOptions, &["refrigeration", "options"], &[], &[Category::Refrigeration], Block::Options, &[2], false, 2),
                section(SectionId::TailLift, &["tail lift"], &["options"], &[Category::TailLift], Block::Main, &[2], false, 5),
                section(SectionId::TailLiftOptions, &["tail lift", "options"], &[], &[Category::TailLift], Block::Options, &[2], false, 3),
            ],
            footer_keywords: vec!["publicity".to_owned()],
            header_cells: HeaderCells::default(),
            images: ImageConfig::default(),
        }
    }
}

/// Bundled configuration of the whole pipeline.
#[derive(Clone, Debug, Default)]
pub struct TechSheetConfig {
    pub catalog: CatalogConfig,
    pub layout: LayoutConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sections_cover_every_category() {
        let layout = LayoutConfig::default();
        for category in Category::ALL {
            let mains = layout
                .sections
                .iter()
                .filter(|s| s.block == Block::Main && s.categories.contains(&category))
                .count();
            let options = layout
                .sections
                .iter()
                .filter(|s| s.block == Block::Options && s.categories.contains(&category))
                .count();
            assert_eq!(mains, 1, "{} main section", category.label());
            assert_eq!(options, 1, "{} options section", category.label());
        }
    }

    #[test]
    fn column_counts_match_layout_kind() {
        for section in LayoutConfig::default().sections {
            if section.distributed {
                assert_eq!(section.categories.len(), 1);
            } else {
                assert_eq!(section.columns.len(), section.categories.len());
            }
        }
    }
}
