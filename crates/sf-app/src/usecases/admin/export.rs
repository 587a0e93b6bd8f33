use std::sync::Arc;

use tracing::info;

use sf_core::admin::AdminDataStore;
use sf_core::export::{csv, ExportFormat};
use sf_core::ports::ClockPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Institutions,
    Sponsorships,
}

impl ReportKind {
    fn slug(self) -> &'static str {
        match self {
            ReportKind::Institutions => "institutions",
            ReportKind::Sponsorships => "sponsorships",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

/// Render the store's current records as a downloadable report.
pub struct ExportReport {
    store: Arc<AdminDataStore>,
    clock: Arc<dyn ClockPort>,
}

impl ExportReport {
    pub fn new(store: Arc<AdminDataStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub fn execute(&self, kind: ReportKind, format: ExportFormat) -> ExportedReport {
        let content = match kind {
            ReportKind::Institutions => csv::institutions_csv(&self.store.institutions()),
            ReportKind::Sponsorships => csv::sponsorships_csv(&self.store.sponsorship_requests()),
        };
        let file_name = format!(
            "{}-{}.{}",
            kind.slug(),
            self.clock.today().format("%Y-%m-%d"),
            format.file_extension()
        );
        info!(report = kind.slug(), file_name = %file_name, bytes = content.len(), "Report exported");
        ExportedReport {
            file_name,
            mime_type: format.mime_type(),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedClock;

    #[test]
    fn excel_export_degrades_to_the_same_csv() {
        let clock: Arc<dyn ClockPort> = Arc::new(FixedClock);
        let store = Arc::new(AdminDataStore::new(clock.clone()));
        let export = ExportReport::new(store, clock);

        let csv = export.execute(ReportKind::Sponsorships, ExportFormat::Csv);
        let excel = export.execute(ReportKind::Sponsorships, ExportFormat::Excel);

        assert_eq!(csv, excel);
        assert_eq!(csv.file_name, "sponsorships-2026-10-16.csv");
        assert!(csv.content.starts_with("\"ID\",\"Institution ID\""));
    }
}
