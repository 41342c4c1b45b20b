//! Vehicle records and the filtering the host UI's dropdowns are built on.
//! A record is a read-only snapshot of one row of the vehicle sheet; it is
//! selected by the user from a filtered list and then drives one generation.

use crate::config::Category;
use crate::config::VehicleColumns;
use crate::catalog::table::Table;
use crate::workbook::cell::CellValue;

/// Default product and options codes of one component category.
#[derive(Clone, Debug, Default)]
pub struct CategoryCodes {
    pub product: String,
    pub options: String,
}

/// Dimensional and weight fields shown in the document header. Values stay
/// as loaded — some sheets carry numbers, others annotated text.
#[derive(Clone, Debug, Default)]
pub struct Dimensions {
    pub interior_width: CellValue,
    pub interior_length: CellValue,
    pub interior_height: CellValue,
    pub exterior_width: CellValue,
    pub exterior_length: CellValue,
    pub exterior_height: CellValue,
    pub payload: CellValue,
    pub volume: CellValue,
    pub pallets: CellValue,
}

/// Image references as authored in the vehicle sheet: a URL, a bare file
/// name, or a full path. Resolution happens at embedding time.
#[derive(Clone, Debug, Default)]
pub struct ImageRefs {
    pub photo: Option<String>,
    pub client_logo: Option<String>,
    pub fuel_pictogram: Option<String>,
}

/// One row of the vehicle sheet.
#[derive(Clone, Debug, Default)]
pub struct VehicleRecord {
    pub country: String,
    pub brand: String,
    pub model: String,
    pub platform_code: String,
    pub platform_standard: String,
    codes: [CategoryCodes; 6],
    pub dimensions: Dimensions,
    pub images: ImageRefs,
}

impl VehicleRecord {
    /// Builds a record from a vehicle-table row. Missing columns read as
    /// empty fields; the record never fails to build.
    pub(crate) fn from_row(table: &Table, row: usize, columns: &VehicleColumns) -> VehicleRecord {
        let text = |name: &str| -> String {
            table
                .column_index(name)
                .map(|index| table.value(row, index).display().trim().to_owned())
                .unwrap_or_default()
        };
        let cell = |name: &str| -> CellValue {
            table
                .column_index(name)
                .map(|index| table.value(row, index).to_owned())
                .unwrap_or_default()
        };
        let optional = |name: &str| -> Option<String> {
            Some(text(name)).filter(|value| !value.is_empty())
        };

        VehicleRecord {
            country: text(&columns.country),
            brand: text(&columns.brand),
            model: text(&columns.model),
            platform_code: text(&columns.platform_code),
            platform_standard: text(&columns.platform_standard),
            codes: std::array::from_fn(|index| CategoryCodes {
                product: text(&columns.product_codes[index]),
                options: text(&columns.option_codes[index]),
            }),
            dimensions: Dimensions {
                interior_width: cell(&columns.interior_width),
                interior_length: cell(&columns.interior_length),
                interior_height: cell(&columns.interior_height),
                exterior_width: cell(&columns.exterior_width),
                exterior_length: cell(&columns.exterior_length),
                exterior_height: cell(&columns.exterior_height),
                payload: cell(&columns.payload),
                volume: cell(&columns.volume),
                pallets: cell(&columns.pallets),
            },
            images: ImageRefs {
                photo: optional(&columns.photo),
                client_logo: optional(&columns.client_logo),
                fuel_pictogram: optional(&columns.fuel_pictogram),
            },
        }
    }

    /// The vehicle's stored default codes for one category.
    pub fn codes(&self, category: Category) -> &CategoryCodes {
        &self.codes[category.index()]
    }
}

/// Identifying fields the host UI filters on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterField {
    Country,
    Brand,
    Model,
    PlatformCode,
    PlatformStandard,
}

impl VehicleRecord {
    /// The value of one filterable field.
    pub fn field(&self, field: FilterField) -> &str {
        match field {
            FilterField::Country => &self.country,
            FilterField::Brand => &self.brand,
            FilterField::Model => &self.model,
            FilterField::PlatformCode => &self.platform_code,
            FilterField::PlatformStandard => &self.platform_standard,
        }
    }
}

/// Sorted distinct values of one field, for populating a dropdown.
pub fn distinct_values(records: &[VehicleRecord], field: FilterField) -> Vec<String> {
    let mut values: Vec<String> = records
        .iter()
        .map(|record| record.field(field).to_owned())
        .filter(|value| !value.is_empty())
        .collect();
    values.sort();
    values.dedup();
    values
}

/// Records matching every (field, value) constraint.
pub fn filter_records<'a>(
    records: &'a [VehicleRecord],
    filters: &[(FilterField, String)],
) -> Vec<&'a VehicleRecord> {
    records
        .iter()
        .filter(|record| {
            filters
                .iter()
                .all(|(field, value)| record.field(*field) == value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, brand: &str) -> VehicleRecord {
        VehicleRecord {
            country: country.to_owned(),
            brand: brand.to_owned(),
            ..VehicleRecord::default()
        }
    }

    #[test]
    fn distinct_values_are_sorted_and_unique() {
        let records = [record("FR", "A"), record("DE", "B"), record("FR", "C")];
        assert_eq!(distinct_values(&records, FilterField::Country), ["DE", "FR"]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let records = [record("FR", "A"), record("FR", "B"), record("DE", "A")];
        let filtered = filter_records(
            &records,
            &[
                (FilterField::Country, "FR".to_owned()),
                (FilterField::Brand, "A".to_owned()),
            ],
        );
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].brand, "A");
        assert_eq!(filtered[0].country, "FR");
    }
}
