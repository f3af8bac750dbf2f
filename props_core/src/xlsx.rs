//! # XLSX Encoder
//!
//! Spreadsheet encoder backed by `rust_xlsxwriter`. Initialization prepares
//! the output directory; each download writes `<command>.xlsx` there,
//! overwriting any previous export of the same kind.
//!
//! ## Sheet layout
//!
//! ```text
//! A1: Kind          B1: thermal_expansion_for_honeycomb
//! A2: Exported at   B2: 2026-10-19T08:00:00+00:00
//!
//! A4: alpha1   B4: alpha2   C4: alpha3      (bold)
//! A5: 0.0002   B5: 0.0002   C5: 0.0002
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::errors::{DispatchError, DispatchResult};
use crate::export::{EncoderLoader, ExportArtifact, ExportBuffer, SpreadsheetEncoder};
use crate::kind::ComputationKind;

const HEADER_ROW: u32 = 3;
const VALUE_ROW: u32 = 4;

/// Loader that prepares an output directory for [`XlsxEncoder`].
#[derive(Debug, Clone)]
pub struct XlsxEncoderLoader {
    output_dir: PathBuf,
}

impl XlsxEncoderLoader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        XlsxEncoderLoader {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl EncoderLoader for XlsxEncoderLoader {
    async fn load(&self) -> DispatchResult<Arc<dyn SpreadsheetEncoder>> {
        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            DispatchError::encoder_init(format!(
                "Cannot prepare output directory '{}': {}",
                self.output_dir.display(),
                e
            ))
        })?;
        let encoder: Arc<dyn SpreadsheetEncoder> = Arc::new(XlsxEncoder {
            output_dir: self.output_dir.clone(),
        });
        Ok(encoder)
    }
}

/// Writes one workbook per export.
#[derive(Debug, Clone)]
pub struct XlsxEncoder {
    output_dir: PathBuf,
}

impl XlsxEncoder {
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl SpreadsheetEncoder for XlsxEncoder {
    fn download(&self, kind: ComputationKind, buffer: &ExportBuffer) -> DispatchResult<ExportArtifact> {
        let path = self.output_dir.join(kind.export_file_name());
        let exported_at = Utc::now();

        let mut workbook = Workbook::new();
        write_sheet(&mut workbook, kind, buffer, exported_at)
            .and_then(|_| workbook.save(&path))
            .map_err(|e| DispatchError::export_failed(path.display().to_string(), e.to_string()))?;

        Ok(ExportArtifact {
            kind,
            path,
            exported_at,
        })
    }
}

fn write_sheet(
    workbook: &mut Workbook,
    kind: ComputationKind,
    buffer: &ExportBuffer,
    exported_at: DateTime<Utc>,
) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(kind.family().display_name())?;

    worksheet.write_string_with_format(0, 0, "Kind", &bold)?;
    worksheet.write_string(0, 1, kind.command())?;
    worksheet.write_string_with_format(1, 0, "Exported at", &bold)?;
    worksheet.write_string(1, 1, exported_at.to_rfc3339())?;

    let labels = kind.family().labels();
    for (col, (label, value)) in labels.iter().zip(buffer.as_slice()).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(HEADER_ROW, col, *label, &bold)?;
        worksheet.write_number(VALUE_ROW, col, *value)?;
    }
    worksheet.set_column_width(0, 14)?;
    worksheet.set_column_width(1, 14)?;

    Ok(())
}
