//! Output port for rendered ledger views (charts, exports).

use crate::domain::error::JournalError;
use crate::domain::journal::JournalView;
use std::path::Path;

pub trait ReportPort {
    fn write(&self, view: &JournalView, output_path: &Path) -> Result<(), JournalError>;
}
