//! CSV output for assembled export records.

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::io::AsyncWriteExt;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::models::{COLUMN_ORDER, ExportRecord};
use crate::utils::log;

/// Writes export records to a UTF-8 CSV file.
///
/// Columns follow the fixed priority order, filtered to those present in
/// the record set. An existing file at the target path is overwritten.
pub struct CsvExporter {
    config: ExportConfig,
}

impl CsvExporter {
    /// Create a new exporter with the given output configuration.
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Write records to `filename`, or to a timestamp-derived name when no
    /// filename is given. Returns the path written.
    pub async fn write(
        &self,
        records: &[ExportRecord],
        filename: Option<PathBuf>,
    ) -> Result<PathBuf> {
        let path = filename.unwrap_or_else(|| self.default_filename());
        let columns = present_columns(records);
        let bytes = render_csv(records, &columns)?;

        self.write_bytes(&path, &bytes).await?;
        log::success(&format!(
            "Exported {} articles to {}",
            records.len(),
            path.display()
        ));
        Ok(path)
    }

    /// Derived filename: `<prefix>_<YYYYMMDD_HHMMSS>.csv`, unique per run.
    fn default_filename(&self) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("{}_{}.csv", self.config.filename_prefix, timestamp))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

/// Columns, in priority order, that at least one record carries.
fn present_columns(records: &[ExportRecord]) -> Vec<&'static str> {
    COLUMN_ORDER
        .iter()
        .copied()
        .filter(|column| records.iter().any(|record| record.value(column).is_some()))
        .collect()
}

/// Render header and rows as CSV bytes.
fn render_csv(records: &[ExportRecord], columns: &[&'static str]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(columns)?;
        for record in records {
            writer.write_record(
                columns
                    .iter()
                    .map(|column| record.value(column).unwrap_or_default()),
            )?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}
