use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use emploistore_core::{Batch, PaginatedFetcher, TabularExporter};
use emploistore_domain::{Record, ResourceInfo, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::client::EmploiStoreClient;

type BatchFn = Box<dyn FnMut(usize) -> Result<Batch<Record>> + Send>;

/// Lazy record sequence of one resource.
pub type ResourceRecords = PaginatedFetcher<Record, BatchFn>;

/// Parameters of a `datastore_search` scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordsQuery {
    /// Records per request; the client's configured batch size when `None`
    pub batch_size: Option<usize>,
    /// Exact-match filters, sent as a JSON object
    pub filters: Option<Map<String, Value>>,
    /// Fields to return; all of them when empty
    pub fields: Vec<String>,
}

/// Options of a CSV export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportOptions {
    /// Columns, in order; inferred from the first record when empty
    pub field_names: Vec<String>,
    pub batch_size: Option<usize>,
    pub filters: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct DatastorePage {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    records: Vec<Record>,
}

/// A paginated dataset of the catalog.
#[derive(Clone)]
pub struct Resource {
    info: ResourceInfo,
    client: EmploiStoreClient,
}

impl Resource {
    pub(crate) const fn new(info: ResourceInfo, client: EmploiStoreClient) -> Self {
        Self { info, client }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.info.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.info.name.as_deref()
    }

    /// Every record of the resource, fetched lazily batch by batch.
    #[must_use]
    pub fn records(&self, query: &RecordsQuery) -> ResourceRecords {
        let batch_size = query.batch_size.unwrap_or(self.client.config().batch_size).max(1);
        let filters = query
            .filters
            .as_ref()
            .filter(|filters| !filters.is_empty())
            .map(|filters| Value::Object(filters.clone()).to_string());
        let fields = (!query.fields.is_empty()).then(|| query.fields.join(","));

        let resource = self.clone();
        let fetch: BatchFn = Box::new(move |offset| {
            resource.fetch_batch(offset, batch_size, filters.as_deref(), fields.as_deref())
        });
        PaginatedFetcher::new(batch_size, fetch)
    }

    /// One `datastore_search` page. A soft failure reads as an empty page.
    fn fetch_batch(
        &self,
        offset: usize,
        limit: usize,
        filters: Option<&str>,
        fields: Option<&str>,
    ) -> Result<Batch<Record>> {
        let mut params =
            vec![("id", self.info.id.clone()), ("limit", limit.to_string()), ("offset", offset.to_string())];
        if let Some(filters) = filters {
            params.push(("filters", filters.to_string()));
        }
        if let Some(fields) = fields {
            params.push(("fields", fields.to_string()));
        }

        let Some(result) = self.client.api_get("/datastore_search", &params)? else {
            debug!(resource = %self.info.id, offset, "datastore_search reported no success");
            return Ok(Batch::empty());
        };
        let page: DatastorePage = serde_json::from_value(result)?;
        Ok(Batch::new(page.total, page.records))
    }

    /// Export every record to a CSV file at `path`.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// Returns `Io` when the file cannot be created or written, plus any
    /// error raised while fetching records.
    pub fn to_csv(&self, path: impl AsRef<Path>, options: &ExportOptions) -> Result<usize> {
        self.to_csv_with(path, options, |records| records)
    }

    /// Export the records produced by `transform` to a CSV file at `path`.
    ///
    /// `transform` receives the full record sequence and may filter, sample
    /// or wrap it (see [`emploistore_core::with_progress`]). Columns are
    /// settled before it runs.
    ///
    /// # Errors
    /// Same as [`Resource::to_csv`].
    pub fn to_csv_with<T, I>(
        &self,
        path: impl AsRef<Path>,
        options: &ExportOptions,
        transform: T,
    ) -> Result<usize>
    where
        T: FnOnce(ResourceRecords) -> I,
        I: IntoIterator<Item = Result<Record>>,
    {
        let path = path.as_ref();
        let exporter = TabularExporter::with_field_names(options.field_names.iter().cloned());
        let records = self.records(&RecordsQuery {
            batch_size: options.batch_size,
            filters: options.filters.clone(),
            fields: Vec::new(),
        });

        let file = File::create(path)?;
        let rows = exporter.write(BufWriter::new(file), records, transform)?;

        info!(resource = %self.info.id, path = %path.display(), rows, "resource exported to CSV");
        Ok(rows)
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource").field("info", &self.info).finish_non_exhaustive()
    }
}
