//! CSV export of paginated records
//!
//! [`TabularExporter`] writes a header row followed by one row per record.
//! When no field names are configured, the header is inferred from the first
//! record: byte-order marks stripped from the keys, the reserved `_id` key
//! dropped, names sorted.

use std::collections::{BTreeSet, HashMap};
use std::io::{self, Write};

use emploistore_domain::constants::RESERVED_ID_FIELD;
use emploistore_domain::{strip_bom, EmploiStoreError, Record, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::pagination::{Batch, PaginatedFetcher};

/// Record sequence whose first element and reported size can be inspected
/// before iteration starts.
pub trait RecordSource: Iterator<Item = Result<Record>> {
    /// First record, not consumed from the sequence.
    ///
    /// # Errors
    /// Propagates the failure of the underlying fetch.
    fn peek_first(&mut self) -> Result<Option<&Record>>;

    /// Server-reported number of records.
    ///
    /// # Errors
    /// Propagates the failure of the underlying fetch.
    fn total_count(&mut self) -> Result<u64>;
}

impl<F> RecordSource for PaginatedFetcher<Record, F>
where
    F: FnMut(usize) -> Result<Batch<Record>>,
{
    fn peek_first(&mut self) -> Result<Option<&Record>> {
        Self::peek_first(self)
    }

    fn total_count(&mut self) -> Result<u64> {
        Self::total_count(self)
    }
}

/// Writes records as comma-separated rows.
#[derive(Debug, Clone, Default)]
pub struct TabularExporter {
    field_names: Option<Vec<String>>,
}

impl TabularExporter {
    /// Exporter inferring its columns from the first record.
    #[must_use]
    pub const fn new() -> Self {
        Self { field_names: None }
    }

    /// Exporter with a fixed column list. An empty list means "infer".
    #[must_use]
    pub fn with_field_names<I, S>(field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = field_names.into_iter().map(Into::into).collect();
        Self { field_names: (!names.is_empty()).then_some(names) }
    }

    /// Write every record of `source` to `sink`.
    ///
    /// # Errors
    /// Returns `Io` when the sink fails and propagates fetch errors.
    pub fn write_all<W, S>(&self, sink: W, source: S) -> Result<usize>
    where
        W: Write,
        S: RecordSource,
    {
        self.write(sink, source, |records| records)
    }

    /// Write the records produced by `transform(source)` to `sink`.
    ///
    /// The header is settled from `source` before `transform` runs, so a
    /// transform that filters or reorders records does not change the
    /// columns. Returns the number of data rows written.
    ///
    /// # Errors
    /// Returns `Io` when the sink fails and propagates fetch errors.
    pub fn write<W, S, T, I>(&self, sink: W, mut source: S, transform: T) -> Result<usize>
    where
        W: Write,
        S: RecordSource,
        T: FnOnce(S) -> I,
        I: IntoIterator<Item = Result<Record>>,
    {
        let field_names = match &self.field_names {
            Some(names) => names.clone(),
            None => match source.peek_first()? {
                Some(first) => infer_field_names(first),
                None => {
                    debug!("no records to export, nothing written");
                    return Ok(0);
                }
            },
        };

        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(&field_names).map_err(csv_error)?;

        let mut rows = 0usize;
        for record in transform(source) {
            let record = record?;
            writer.write_record(project_row(&record, &field_names)).map_err(csv_error)?;
            rows += 1;
        }
        writer.flush()?;

        info!(rows, columns = field_names.len(), "records exported");
        Ok(rows)
    }
}

/// Sorted column names of a record: BOM stripped, `_id` excluded.
#[must_use]
pub fn infer_field_names(record: &Record) -> Vec<String> {
    record
        .keys()
        .map(|key| strip_bom(key))
        .filter(|key| *key != RESERVED_ID_FIELD)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Cell text for one JSON value.
///
/// Strings are written verbatim, numbers in their natural decimal form,
/// `null` as an empty cell, arrays and objects as compact JSON.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
    }
}

/// Wrap a source so `on_progress(done, total)` runs after each record.
///
/// `total` is the server-reported count, `None` when it could not be fetched.
pub fn with_progress<S, P>(mut source: S, mut on_progress: P) -> impl Iterator<Item = Result<Record>>
where
    S: RecordSource,
    P: FnMut(usize, Option<u64>),
{
    let total = source.total_count().ok();
    source.enumerate().map(move |(index, record)| {
        on_progress(index + 1, total);
        record
    })
}

fn project_row(record: &Record, field_names: &[String]) -> Vec<String> {
    let cells: HashMap<&str, &Value> = record.iter().map(|(k, v)| (strip_bom(k), v)).collect();
    field_names
        .iter()
        .map(|name| cells.get(name.as_str()).map_or_else(String::new, |v| render_value(v)))
        .collect()
}

fn csv_error(err: csv::Error) -> EmploiStoreError {
    match err.into_kind() {
        csv::ErrorKind::Io(io_err) => EmploiStoreError::Io(io_err),
        other => EmploiStoreError::Io(io::Error::other(format!("csv write failed: {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn source(records: Vec<Record>) -> impl RecordSource {
        let total = records.len() as u64;
        let mut pending = Some(records);
        PaginatedFetcher::new(1000, move |_offset| {
            Ok(Batch::new(total, pending.take().unwrap_or_default()))
        })
    }

    fn export(exporter: &TabularExporter, records: Vec<Record>) -> String {
        let mut out = Vec::new();
        exporter.write_all(&mut out, source(records)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn header_is_inferred_sorted_and_bom_free() {
        let records = vec![
            record(json!({"\u{feff}CODE": "123", "NAME": "First"})),
            record(json!({"\u{feff}CODE": "456", "NAME": "Second"})),
        ];

        let csv = export(&TabularExporter::new(), records);

        assert_eq!(csv, "CODE,NAME\n123,First\n456,Second\n");
    }

    #[test]
    fn reserved_id_never_becomes_a_column() {
        let records = vec![record(json!({"_id": 1, "ZETA": "z", "ALPHA": "a"}))];

        let csv = export(&TabularExporter::new(), records);

        assert_eq!(csv, "ALPHA,ZETA\na,z\n");
    }

    #[test]
    fn explicit_field_names_keep_order_and_drop_extras() {
        let records = vec![
            record(json!({"A": "1", "B": "2", "C": "3"})),
            record(json!({"\u{feff}C": "6", "B": "5"})),
        ];

        let csv = export(&TabularExporter::with_field_names(["C", "A"]), records);

        assert_eq!(csv, "C,A\n3,1\n6,\n");
    }

    #[test]
    fn values_are_stringified_naturally() {
        let records = vec![record(json!({
            "count": 42,
            "ratio": 0.25,
            "flag": true,
            "missing": null,
            "label": "Boulanger, pâtissier",
            "tags": ["a", "b"]
        }))];

        let csv = export(&TabularExporter::new(), records);

        assert_eq!(
            csv,
            "count,flag,label,missing,ratio,tags\n42,true,\"Boulanger, pâtissier\",,0.25,\"[\"\"a\"\",\"\"b\"\"]\"\n"
        );
    }

    #[test]
    fn transform_can_subsample_records() {
        let records: Vec<Record> =
            (0..4).map(|i| record(json!({"ID": i.to_string()}))).collect();
        let mut out = Vec::new();

        let rows = TabularExporter::new()
            .write(&mut out, source(records), |records| records.step_by(2))
            .unwrap();

        assert_eq!(rows, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "ID\n0\n2\n");
    }

    #[test]
    fn progress_hook_sees_index_and_total() {
        let records: Vec<Record> =
            (0..3).map(|i| record(json!({"ID": i.to_string()}))).collect();
        let mut seen = Vec::new();
        let mut out = Vec::new();

        TabularExporter::new()
            .write(&mut out, source(records), |records| {
                with_progress(records, |done, total| seen.push((done, total)))
            })
            .unwrap();

        assert_eq!(seen, vec![(1, Some(3)), (2, Some(3)), (3, Some(3))]);
    }

    #[test]
    fn empty_source_writes_nothing() {
        let csv = export(&TabularExporter::new(), Vec::new());

        assert!(csv.is_empty());
    }

    #[test]
    fn empty_field_list_means_infer() {
        let records = vec![record(json!({"B": "2", "A": "1"}))];

        let csv = export(&TabularExporter::with_field_names(Vec::<String>::new()), records);

        assert_eq!(csv, "A,B\n1,2\n");
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_failure_is_io_error() {
        let records = vec![record(json!({"A": "1"}))];

        let result = TabularExporter::new().write_all(FailingSink, source(records));

        assert!(matches!(result, Err(EmploiStoreError::Io(_))));
    }

    #[test]
    fn fetch_error_aborts_export() {
        let fetcher = PaginatedFetcher::new(1, |offset| {
            if offset == 0 {
                Ok(Batch::new(2, vec![record(json!({"A": "1"}))]))
            } else {
                Err(EmploiStoreError::Transport { status: 502, url: "u".to_string() })
            }
        });
        let mut out = Vec::new();

        let result = TabularExporter::new().write_all(&mut out, fetcher);

        assert!(matches!(result, Err(EmploiStoreError::Transport { status: 502, .. })));
    }
}
