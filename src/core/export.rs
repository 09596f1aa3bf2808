use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

use crate::domain::model::IdentityNumber;
use crate::utils::error::{PnrError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Plain,
    Csv,
    Tsv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = PnrError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(ExportFormat::Plain),
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            other => Err(PnrError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: plain, csv, tsv, json".to_string(),
            }),
        }
    }
}

/// 匯出時每一列的欄位
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportRecord {
    pub number: String,
    pub birth_date: Option<String>,
    pub gender: String,
    pub sequence: String,
}

impl From<&IdentityNumber> for ExportRecord {
    fn from(number: &IdentityNumber) -> Self {
        Self {
            number: number.to_string(),
            birth_date: number.birth_date().map(|d| d.to_string()),
            gender: number.gender().code().to_string(),
            sequence: number.sequence().to_string(),
        }
    }
}

/// Writes `numbers` in `format` and returns how many were written.
pub fn export<W, I>(numbers: I, format: ExportFormat, mut writer: W) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = IdentityNumber>,
{
    let records: Vec<ExportRecord> = numbers.into_iter().map(|n| (&n).into()).collect();

    match format {
        ExportFormat::Plain => {
            for record in &records {
                writeln!(writer, "{}", record.number)?;
            }
        }
        ExportFormat::Csv | ExportFormat::Tsv => {
            let delimiter = if format == ExportFormat::Tsv { b'\t' } else { b',' };
            let mut csv_writer = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(&mut writer);
            for record in &records {
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &records)?;
            writeln!(writer)?;
        }
    }

    writer.flush()?;
    tracing::debug!("Exported {} numbers as {:?}", records.len(), format);
    Ok(records.len())
}
