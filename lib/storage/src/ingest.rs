//! Raw regulatory dataset ingestion
//!
//! The source file is a delimited table, by default semicolon-separated and
//! Latin-1 encoded. Lines with more fields than the header are skipped here;
//! I/O failures, undecodable bytes and missing columns abort the load.

use medindex_core::{Error, Result};
use medindex_records::RawRecord;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceEncoding {
    Utf8,
    #[default]
    Latin1,
}

impl SourceEncoding {
    /// Decode raw file bytes. A leading UTF-8 byte order mark is dropped.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            SourceEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| Error::Ingestion(format!("source is not valid UTF-8: {e}")))
            }
            // Latin-1 maps every byte to the code point of the same value
            SourceEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceEncoding::Utf8 => f.write_str("utf-8"),
            SourceEncoding::Latin1 => f.write_str("latin-1"),
        }
    }
}

impl FromStr for SourceEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(SourceEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(SourceEncoding::Latin1),
            other => Err(format!("unsupported encoding: {other}")),
        }
    }
}

/// Header names of the raw dataset columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumns {
    pub active_ingredient: String,
    pub therapeutic_class: String,
    pub product_name: String,
    pub company: String,
    pub registration_status: String,
    pub registration_number: String,
}

impl Default for RawColumns {
    fn default() -> Self {
        Self {
            active_ingredient: "PRINCIPIO_ATIVO".to_string(),
            therapeutic_class: "CLASSE_TERAPEUTICA".to_string(),
            product_name: "NOME_PRODUTO".to_string(),
            company: "EMPRESA_DETENTORA_REGISTRO".to_string(),
            registration_status: "SITUACAO_REGISTRO".to_string(),
            registration_number: "NUMERO_REGISTRO_PRODUTO".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub delimiter: u8,
    pub encoding: SourceEncoding,
    pub columns: RawColumns,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            delimiter: b';',
            encoding: SourceEncoding::Latin1,
            columns: RawColumns::default(),
        }
    }
}

/// Column positions resolved against a header row
struct ColumnIndex {
    active_ingredient: usize,
    therapeutic_class: usize,
    product_name: usize,
    company: usize,
    registration_status: usize,
    registration_number: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, columns: &RawColumns) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| Error::Ingestion(format!("missing column: {name}")))
        };

        Ok(Self {
            active_ingredient: find(&columns.active_ingredient)?,
            therapeutic_class: find(&columns.therapeutic_class)?,
            product_name: find(&columns.product_name)?,
            company: find(&columns.company)?,
            registration_status: find(&columns.registration_status)?,
            registration_number: find(&columns.registration_number)?,
        })
    }

    fn extract(&self, record: &csv::StringRecord) -> RawRecord {
        let field = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        RawRecord {
            active_ingredient: field(self.active_ingredient),
            therapeutic_class: field(self.therapeutic_class),
            product_name: field(self.product_name),
            company: field(self.company),
            registration_status: field(self.registration_status),
            registration_number: field(self.registration_number),
        }
    }
}

/// Read and decode a raw dataset file.
pub fn read_raw_records<P: AsRef<Path>>(path: P, config: &IngestConfig) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| Error::Ingestion(format!("cannot read {}: {e}", path.display())))?;
    let text = config.encoding.decode(&bytes)?;

    let records = parse_raw_records(&text, config)?;
    info!(path = %path.display(), rows = records.len(), "loaded raw dataset");
    Ok(records)
}

/// Parse already-decoded dataset text.
///
/// Rows shorter than the header are kept with the missing fields absent.
pub fn parse_raw_records(text: &str, config: &IngestConfig) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::Ingestion(format!("unreadable header: {e}")))?
        .clone();
    let columns = ColumnIndex::resolve(&headers, &config.columns)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        match result {
            Ok(record) if record.len() > headers.len() => {
                skipped += 1;
                warn!(
                    line = record.position().map(|p| p.line()).unwrap_or(0),
                    fields = record.len(),
                    expected = headers.len(),
                    "skipping malformed line"
                );
            }
            Ok(record) => rows.push(columns.extract(&record)),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(Error::Ingestion(e.to_string()));
            }
            Err(e) => {
                skipped += 1;
                warn!(error = %e, "skipping malformed line");
            }
        }
    }

    if skipped > 0 {
        info!(skipped, kept = rows.len(), "skipped malformed lines");
    }

    Ok(rows)
}
