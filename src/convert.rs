use ironcalc::base::Model;
use ironcalc::import::load_from_xlsx_bytes;
use log::debug;

use crate::error::AppError;

/// Locale and timezone used when importing xlsx files on the server
pub const IMPORT_LOCALE: &str = "en";
pub const IMPORT_TIMEZONE: &str = "UTC";

/// Workbook name for a file, i.e. its display name without `.xlsx`
pub fn workbook_name(display_name: &str) -> &str {
    display_name.trim_end_matches(".xlsx")
}

/// Converts an xlsx file into IronCalc's binary model format
///
/// # Arguments
/// * `xlsx_bytes` - Raw contents of the `.xlsx` file
/// * `display_name` - File name as shown in Nextcloud, used as the workbook name
///
/// # Returns
/// * `Result<Vec<u8>, AppError>` - Bytes accepted by `Model::from_bytes`
pub fn xlsx_to_model_bytes(xlsx_bytes: &[u8], display_name: &str) -> Result<Vec<u8>, AppError> {
    let workbook = load_from_xlsx_bytes(
        xlsx_bytes,
        workbook_name(display_name),
        IMPORT_LOCALE,
        IMPORT_TIMEZONE,
    )
    .map_err(|err| AppError::Import(format!("IronCalc worksheet: {err}")))?;
    debug!("Imported workbook {:?}", workbook.name);

    let model = Model::from_workbook(workbook)
        .map_err(|err| AppError::Import(format!("IronCalc model: {err}")))?;

    Ok(model.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Workbook, Worksheet};

    fn xlsx_with_number(value: f64) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let mut worksheet = Worksheet::new();
        worksheet.write_number(0, 0, value).unwrap();
        workbook.push_worksheet(worksheet);
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn strips_xlsx_extension() {
        assert_eq!(workbook_name("Budget.xlsx"), "Budget");
        assert_eq!(workbook_name("notes.txt"), "notes.txt");
    }

    #[test]
    fn converts_xlsx_into_loadable_model() {
        let bytes = xlsx_to_model_bytes(&xlsx_with_number(42.0), "Budget.xlsx").unwrap();

        let model = Model::from_bytes(&bytes).unwrap();
        assert_eq!(model.workbook.name, "Budget");
        assert_eq!(model.get_formatted_cell_value(0, 1, 1).unwrap(), "42");
    }

    #[test]
    fn rejects_non_xlsx_input() {
        let err = xlsx_to_model_bytes(b"plain text", "notes.xlsx").unwrap_err();
        assert!(matches!(err, AppError::Import(_)));
    }
}
