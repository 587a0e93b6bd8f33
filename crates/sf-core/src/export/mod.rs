pub mod csv;

/// Formats offered by the admin export menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// Spreadsheet export writes the same CSV text.
    Excel,
}

impl ExportFormat {
    pub fn file_extension(self) -> &'static str {
        "csv"
    }

    pub fn mime_type(self) -> &'static str {
        "text/csv;charset=utf-8"
    }
}
