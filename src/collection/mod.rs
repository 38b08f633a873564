//! Collection facade composing the URL builder, the session port and the
//! metabase/TOC tables into the public catalog operations.

use crate::error::{Error, Result};
use crate::metabase::{check_membership, resolve, Column, MetabaseTable};
use crate::session::{Compression, RawTable, Session, TableOptions};
use crate::settings;
use crate::toc::TocTable;
use crate::url::{build_url, QueryParams};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of catalog entity a bulk file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Dimension,
    Dataset,
}

impl EntityKind {
    fn directory(self) -> &'static str {
        match self {
            EntityKind::Dimension => settings::BULK_DIC_DIR,
            EntityKind::Dataset => settings::BULK_DATA_DIR,
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            EntityKind::Dimension => settings::BULK_DIC_EXTS,
            EntityKind::Dataset => settings::BULK_DATA_EXTS,
        }
    }

    fn zip(self) -> &'static str {
        match self {
            EntityKind::Dimension => settings::BULK_DIC_ZIP,
            EntityKind::Dataset => settings::BULK_DATA_ZIP,
        }
    }

    fn column(self) -> Column {
        match self {
            EntityKind::Dimension => Column::Dimension,
            EntityKind::Dataset => Column::Dataset,
        }
    }
}

/// Configuration of a [`Collection`].
///
/// Exactly the recognized options, typed and validated at construction;
/// unknown options do not exist by design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Base domain of the bulk download service.
    pub domain: String,
    /// Query endpoint appended to the domain.
    pub query: String,
    /// Language of returned URLs and files.
    pub lang: String,
    /// Value of the `sort` query parameter.
    pub sort: i64,
    /// Dimensions of interest, resolved into the cache when the metabase
    /// loads.
    pub dimensions: Vec<String>,
    /// Datasets of interest, resolved into the cache when the metabase
    /// loads.
    pub datasets: Vec<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            domain: settings::BULK_DOMAIN.to_string(),
            query: settings::BULK_QUERY.to_string(),
            lang: settings::DEF_LANG.to_string(),
            sort: settings::DEF_SORT,
            dimensions: Vec::new(),
            datasets: Vec::new(),
        }
    }
}

impl CollectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.domain.is_empty() {
            return Err(Error::InvalidParameter("empty DOMAIN".to_string()));
        }
        if !settings::LANGS.contains(&self.lang.as_str()) {
            return Err(Error::UnsupportedLanguage(self.lang.clone()));
        }
        if self.sort <= 0 {
            return Err(Error::InvalidParameter(format!(
                "SORT must be a positive integer, got {}",
                self.sort
            )));
        }
        Ok(())
    }
}

/// A catalog of online collections (dimensions and datasets) retrieved from
/// the Eurostat bulk download service.
///
/// Owns the loaded metabase and table of contents, and a resolved cache of
/// relationships already answered. Loading is always explicit: queries never
/// reach for the network, they fail with [`Error::NotLoaded`] when the
/// backing table is absent.
pub struct Collection<S: Session> {
    config: CollectionConfig,
    session: S,
    metabase: Option<MetabaseTable>,
    toc: Option<TocTable>,
    // entity code -> related codes, resolved once per process lifetime
    dimension_cache: HashMap<String, Vec<String>>,
    dataset_cache: HashMap<String, Vec<String>>,
}

impl<S: Session> Collection<S> {
    pub fn new(config: CollectionConfig, session: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            session,
            metabase: None,
            toc: None,
            dimension_cache: HashMap::new(),
            dataset_cache: HashMap::new(),
        })
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Base URL of the bulk download endpoint.
    pub fn base_url(&self) -> String {
        format!("{}/{}", self.config.domain, self.config.query)
    }

    fn file_url(&self, file: &str) -> Result<String> {
        let mut params = QueryParams::new();
        params.set("sort", self.config.sort).set("file", file);
        build_url(&self.base_url(), &params)
    }

    fn listing_url(&self, dir: &str, lang: Option<&str>) -> Result<String> {
        let mut params = QueryParams::new();
        params.set("sort", self.config.sort).set("dir", dir);
        if let Some(lang) = lang {
            params.set("lang", lang);
        }
        build_url(&self.base_url(), &params)
    }

    // ---- loading ---------------------------------------------------------

    /// URL of the metabase file (fixed name, compression suffix applied).
    pub fn metabase_url(&self) -> Result<String> {
        let mut name = format!("{}.{}", settings::BULK_BASE_FILE, settings::BULK_BASE_EXT);
        if !settings::BULK_BASE_ZIP.is_empty() {
            name = format!("{}.{}", name, settings::BULK_BASE_ZIP);
        }
        self.file_url(&name)
    }

    /// Fetch and parse the metabase, replacing any previously loaded table
    /// wholesale. On failure the prior table stays untouched.
    pub fn load_metabase(&mut self) -> Result<()> {
        let url = self.metabase_url()?;
        let options = TableOptions {
            compression: Some(Compression::Gzip),
            ..Default::default()
        };
        let table = self
            .session
            .fetch_table(&url, &options)
            .and_then(|raw| MetabaseTable::from_raw(&raw))
            .map_err(|e| Error::Load { url: url.clone(), reason: e.to_string() })?;
        self.metabase = Some(table);
        self.dimension_cache.clear();
        self.dataset_cache.clear();
        // Entities named in the configuration are resolved up front.
        for dimension in self.config.dimensions.clone() {
            let labels = self.labels_of(&dimension)?;
            self.dimension_cache.insert(dimension, labels);
        }
        for dataset in self.config.datasets.clone() {
            let dimensions = self.dimensions_of(&dataset)?;
            self.dataset_cache.insert(dataset, dimensions);
        }
        Ok(())
    }

    /// URL of the table-of-contents file. The name is language-suffixed
    /// except for the XML variant.
    pub fn toc_url(&self, ext: Option<&str>, lang: Option<&str>) -> Result<String> {
        let ext = self.toc_ext(ext)?;
        let lang = self.toc_lang(lang)?;
        let mut name = if ext == "xml" {
            format!("{}.xml", settings::BULK_TOC_FILE)
        } else {
            format!("{}_{}.{}", settings::BULK_TOC_FILE, lang, ext)
        };
        if !settings::BULK_TOC_ZIP.is_empty() {
            name = format!("{}.{}", name, settings::BULK_TOC_ZIP);
        }
        self.file_url(&name)
    }

    fn toc_ext(&self, ext: Option<&str>) -> Result<&'static str> {
        let requested = ext.unwrap_or(settings::BULK_TOC_EXTS[0]);
        settings::BULK_TOC_EXTS
            .iter()
            .find(|e| **e == requested)
            .copied()
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "table of contents extension '{}' not recognised",
                    requested
                ))
            })
    }

    fn toc_lang(&self, lang: Option<&str>) -> Result<String> {
        let lang = lang.unwrap_or(&self.config.lang);
        if !settings::LANGS.contains(&lang) {
            return Err(Error::UnsupportedLanguage(lang.to_string()));
        }
        Ok(lang.to_string())
    }

    /// Fetch and parse the table of contents, replacing any previously
    /// loaded one wholesale.
    pub fn load_toc(&mut self, ext: Option<&str>, lang: Option<&str>) -> Result<()> {
        let requested_ext = self.toc_ext(ext)?;
        let url = self.toc_url(ext, lang)?;
        let options = TableOptions { header_row: Some(0), ..Default::default() };
        let raw = if requested_ext == "xml" {
            // The XML variant renders as a single table on the page.
            self.session
                .fetch_html_tables(&url, &options)
                .and_then(|mut tables| {
                    if tables.is_empty() {
                        Err(Error::Load {
                            url: url.clone(),
                            reason: "no table found".to_string(),
                        })
                    } else {
                        Ok(tables.remove(0))
                    }
                })
        } else {
            self.session.fetch_table(&url, &options)
        };
        let table = raw
            .and_then(|raw| TocTable::from_raw(&raw))
            .map_err(|e| Error::Load { url: url.clone(), reason: e.to_string() })?;
        self.toc = Some(table);
        Ok(())
    }

    /// The loaded metabase, or [`Error::NotLoaded`].
    pub fn metabase(&self) -> Result<&MetabaseTable> {
        self.metabase.as_ref().ok_or(Error::NotLoaded("metabase"))
    }

    /// The loaded table of contents, or [`Error::NotLoaded`].
    pub fn toc(&self) -> Result<&TocTable> {
        self.toc.as_ref().ok_or(Error::NotLoaded("table of contents"))
    }

    // ---- relational queries ----------------------------------------------

    /// Resolve a target column under constraints against the loaded
    /// metabase. See [`crate::metabase::resolve`].
    pub fn resolve(&self, target: Column, constraints: &[(Column, String)]) -> Result<Vec<String>> {
        resolve(self.metabase()?, target, constraints)
    }

    /// All dataset codes of the catalog.
    pub fn datasets(&self) -> Result<Vec<String>> {
        self.resolve(Column::Dataset, &[])
    }

    /// All dimension codes of the catalog.
    pub fn dimensions(&self) -> Result<Vec<String>> {
        self.resolve(Column::Dimension, &[])
    }

    /// All datasets using the given dimension.
    pub fn datasets_using(&self, dimension: &str) -> Result<Vec<String>> {
        self.resolve(Column::Dataset, &[(Column::Dimension, dimension.to_string())])
    }

    /// All dimensions defining the given dataset.
    pub fn dimensions_of(&self, dataset: &str) -> Result<Vec<String>> {
        self.resolve(Column::Dimension, &[(Column::Dataset, dataset.to_string())])
    }

    /// All labels of the given dimension, across the whole catalog.
    pub fn labels_of(&self, dimension: &str) -> Result<Vec<String>> {
        self.resolve(Column::Label, &[(Column::Dimension, dimension.to_string())])
    }

    /// All labels the given dimension takes within the given dataset.
    pub fn labels_in(&self, dimension: &str, dataset: &str) -> Result<Vec<String>> {
        self.resolve(
            Column::Label,
            &[
                (Column::Dimension, dimension.to_string()),
                (Column::Dataset, dataset.to_string()),
            ],
        )
    }

    /// Whether a dataset exists in the catalog.
    pub fn check_dataset(&self, dataset: &str) -> Result<bool> {
        check_membership(self.metabase()?, Column::Dataset, dataset)
    }

    /// Whether a dimension exists in the catalog.
    pub fn check_dimension(&self, dimension: &str) -> Result<bool> {
        check_membership(self.metabase()?, Column::Dimension, dimension)
    }

    /// Whether a dimension is used by the given dataset.
    pub fn check_dimension_in_dataset(&self, dimension: &str, dataset: &str) -> Result<bool> {
        let members = self.dimensions_of(dataset)?;
        if members.is_empty() {
            return Err(Error::EmptyUniverse(Column::Dimension.as_str().to_string()));
        }
        Ok(members.iter().any(|m| m == dimension))
    }

    /// Whether a label is used by the given dimension.
    pub fn check_label_in_dimension(&self, label: &str, dimension: &str) -> Result<bool> {
        let members = self.labels_of(dimension)?;
        if members.is_empty() {
            return Err(Error::EmptyUniverse(Column::Label.as_str().to_string()));
        }
        Ok(members.iter().any(|m| m == label))
    }

    /// Labels of a dimension, resolved once and served from the cache
    /// afterwards. Cache entries never expire within a process lifetime.
    pub fn labels_cached(&mut self, dimension: &str) -> Result<&[String]> {
        if !self.dimension_cache.contains_key(dimension) {
            let labels = self.labels_of(dimension)?;
            self.dimension_cache.insert(dimension.to_string(), labels);
        }
        Ok(&self.dimension_cache[dimension])
    }

    /// Dimensions of a dataset, resolved once and served from the cache
    /// afterwards.
    pub fn dimensions_cached(&mut self, dataset: &str) -> Result<&[String]> {
        if !self.dataset_cache.contains_key(dataset) {
            let dimensions = self.dimensions_of(dataset)?;
            self.dataset_cache.insert(dataset.to_string(), dimensions);
        }
        Ok(&self.dataset_cache[dataset])
    }

    /// Cached labels of a dimension, when already resolved.
    pub fn resolved_labels(&self, dimension: &str) -> Option<&[String]> {
        self.dimension_cache.get(dimension).map(Vec::as_slice)
    }

    /// Cached dimensions of a dataset, when already resolved.
    pub fn resolved_dimensions(&self, dataset: &str) -> Option<&[String]> {
        self.dataset_cache.get(dataset).map(Vec::as_slice)
    }

    // ---- TOC operations --------------------------------------------------

    /// Title of a dataset, trimmed, from the loaded table of contents.
    pub fn title(&self, dataset: &str) -> Result<String> {
        self.toc()?.title(dataset)
    }

    /// `[start, end]` observation period of a dataset.
    pub fn period(&self, dataset: &str) -> Result<(String, String)> {
        self.toc()?.period(dataset)
    }

    /// Last update date of a dataset as recorded in the table of contents.
    pub fn last_update_of(&self, dataset: &str) -> Result<String> {
        let row = self.toc()?.lookup(dataset)?;
        row.last_update.clone().ok_or_else(|| {
            Error::NotFound(format!("last update date for dataset '{}'", dataset))
        })
    }

    // ---- bulk files ------------------------------------------------------

    fn entity_ext(kind: EntityKind, ext: Option<&str>) -> Result<String> {
        let requested = ext.unwrap_or(kind.extensions()[0]);
        if !kind.extensions().contains(&requested) {
            return Err(Error::InvalidParameter(format!(
                "bulk {} extension '{}' not recognised",
                kind.directory(),
                requested
            )));
        }
        if kind.zip().is_empty() {
            Ok(requested.to_string())
        } else {
            Ok(format!("{}.{}", requested, kind.zip()))
        }
    }

    /// URL of a dimension (dictionary) file, namespaced under
    /// `dic/<lang>/`.
    pub fn dimension_url(&self, dimension: &str, ext: Option<&str>) -> Result<String> {
        if dimension.is_empty() {
            return Err(Error::InvalidParameter("empty DIMENSION code".to_string()));
        }
        let ext = Self::entity_ext(EntityKind::Dimension, ext)?;
        let file = format!(
            "{}/{}/{}.{}",
            settings::BULK_DIC_DIR,
            self.config.lang,
            dimension,
            ext
        );
        self.file_url(&file)
    }

    /// URL of a dataset data file, namespaced under `data/`.
    pub fn dataset_url(&self, dataset: &str, ext: Option<&str>) -> Result<String> {
        if dataset.is_empty() {
            return Err(Error::InvalidParameter("empty DATASET code".to_string()));
        }
        let ext = Self::entity_ext(EntityKind::Dataset, ext)?;
        let file = format!("{}/{}.{}", settings::BULK_DATA_DIR, dataset, ext);
        self.file_url(&file)
    }

    fn fetch_entity(&self, kind: EntityKind, code: &str, ext: Option<&str>) -> Result<Vec<u8>> {
        // Membership is only verifiable once the metabase is loaded; an
        // unloaded metabase does not block the fetch.
        if let Some(metabase) = &self.metabase {
            if !check_membership(metabase, kind.column(), code)? {
                return Err(Error::NotFound(format!(
                    "{} '{}' in metabase",
                    kind.column(),
                    code
                )));
            }
        }
        let url = match kind {
            EntityKind::Dimension => self.dimension_url(code, ext)?,
            EntityKind::Dataset => self.dataset_url(code, ext)?,
        };
        self.session.fetch_bytes(&url)
    }

    /// Retrieve a dimension (dictionary) file as raw bytes.
    pub fn fetch_dimension(&self, dimension: &str, ext: Option<&str>) -> Result<Vec<u8>> {
        self.fetch_entity(EntityKind::Dimension, dimension, ext)
    }

    /// Retrieve a dataset data file as raw bytes.
    pub fn fetch_dataset(&self, dataset: &str, ext: Option<&str>) -> Result<Vec<u8>> {
        self.fetch_entity(EntityKind::Dataset, dataset, ext)
    }

    // ---- bulk listing pages ----------------------------------------------

    fn read_listing(&self, kind: EntityKind, alpha: Option<char>) -> Result<RawTable> {
        let url = match kind {
            EntityKind::Dimension => {
                self.listing_url(settings::BULK_DIC_DIR, Some(self.config.lang.as_str()))?
            }
            EntityKind::Dataset => {
                let alpha = alpha.unwrap_or('a');
                if !alpha.is_ascii_lowercase() {
                    return Err(Error::InvalidParameter(format!(
                        "wrong parameter ALPHA: '{}'",
                        alpha
                    )));
                }
                let url = self.listing_url(settings::BULK_DATA_DIR, None)?;
                format!("{}&start={}", url, alpha)
            }
        };
        // Listing pages repeat the header in their second row.
        let options = TableOptions {
            header_row: Some(0),
            skip_rows: vec![0],
            ..Default::default()
        };
        let mut tables = self.session.fetch_html_tables(&url, &options)?;
        if tables.is_empty() {
            return Err(Error::Load { url, reason: "no table found".to_string() });
        }
        // One table per listing page.
        Ok(tables.remove(0))
    }

    fn listing_names(table: &RawTable, url_hint: &str) -> Result<Vec<String>> {
        let name = table.column_index(settings::LISTING_NAME_COLUMN).ok_or_else(|| {
            Error::Load {
                url: url_hint.to_string(),
                reason: format!("no '{}' column in listing", settings::LISTING_NAME_COLUMN),
            }
        })?;
        Ok(table
            .rows
            .iter()
            .filter_map(|row| row.get(name))
            .map(|cell| cell.split('.').next().unwrap_or(cell).to_string())
            .filter(|code| !code.is_empty())
            .collect())
    }

    /// Dimension codes as listed on the bulk download dictionary page.
    pub fn listed_dimensions(&self) -> Result<Vec<String>> {
        let table = self.read_listing(EntityKind::Dimension, None)?;
        Self::listing_names(&table, settings::BULK_DIC_DIR)
    }

    /// Dataset codes as listed on the bulk download data pages, one page
    /// per starting letter. Unreadable pages are reported and skipped so a
    /// single bad page does not lose the whole listing.
    pub fn listed_datasets(&self) -> Result<Vec<String>> {
        let mut datasets = Vec::new();
        for alpha in 'a'..='z' {
            match self
                .read_listing(EntityKind::Dataset, Some(alpha))
                .and_then(|table| Self::listing_names(&table, settings::BULK_DATA_DIR))
            {
                Ok(names) => datasets.extend(names),
                Err(e) => eprintln!("impossible to read listing page '{}': {}", alpha, e),
            }
        }
        Ok(datasets)
    }

    /// Date an entity's bulk file was last touched, read from the Name and
    /// Date columns of the relevant listing page.
    pub fn last_update(&self, kind: EntityKind, code: &str) -> Result<String> {
        let alpha = code.chars().next().and_then(|c| c.to_lowercase().next());
        let table = self.read_listing(kind, alpha)?;
        let hint = kind.directory();
        let name = table.column_index(settings::LISTING_NAME_COLUMN).ok_or_else(|| {
            Error::Load {
                url: hint.to_string(),
                reason: format!("no '{}' column in listing", settings::LISTING_NAME_COLUMN),
            }
        })?;
        let date = table.column_index(settings::LISTING_DATE_COLUMN).ok_or_else(|| {
            Error::Load {
                url: hint.to_string(),
                reason: format!("no '{}' column in listing", settings::LISTING_DATE_COLUMN),
            }
        })?;
        for row in &table.rows {
            let listed = row.get(name).map(|cell| cell.split('.').next().unwrap_or(cell));
            if listed == Some(code) {
                return row
                    .get(date)
                    .map(|cell| cell.trim().to_string())
                    .ok_or_else(|| Error::NotFound(format!("date for entry '{}'", code)));
            }
        }
        Err(Error::NotFound(format!("entry '{}' in bulk listing", code)))
    }
}
