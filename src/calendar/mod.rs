//! Calendar rendering and output.
//!
//! Renders a scheduled month to iCalendar (RFC 5545) text and writes it
//! next to the other generated files.

mod ics;

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::TargetMonth;
use crate::error::{KondateError, Result};

pub use ics::IcsRenderer;

/// File name for a month's calendar: `menu_2025_3.ics`
pub fn calendar_file_name(month: TargetMonth) -> String {
    format!("menu_{}_{}.ics", month.year(), month.month())
}

/// Write rendered calendar text into `dir`, returning the file path.
pub fn write_calendar(dir: &Path, month: TargetMonth, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| KondateError::Calendar(format!("failed to create {}: {}", dir.display(), e)))?;
    let path = dir.join(calendar_file_name(month));
    fs::write(&path, contents)
        .map_err(|e| KondateError::Calendar(format!("failed to write {}: {}", path.display(), e)))?;
    log::info!("Wrote calendar to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_calendar_file_name() {
        assert_eq!(calendar_file_name(TargetMonth::new(2025, 3).unwrap()), "menu_2025_3.ics");
        assert_eq!(calendar_file_name(TargetMonth::new(2026, 12).unwrap()), "menu_2026_12.ics");
    }

    #[test]
    fn test_write_calendar_creates_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("out");
        let month = TargetMonth::new(2025, 3).unwrap();
        let path = write_calendar(&dir, month, "BEGIN:VCALENDAR\r\n").unwrap();
        assert_eq!(path, dir.join("menu_2025_3.ics"));
        assert_eq!(fs::read_to_string(path).unwrap(), "BEGIN:VCALENDAR\r\n");
    }
}
