//! Dataset Model
//! Immutable crime table. Normalization of keys happens at construction.

/// Region (state/UT) column name after header normalization.
pub const REGION_COLUMN: &str = "STATE/UT";
/// District column name after header normalization.
pub const DISTRICT_COLUMN: &str = "DISTRICT";
/// Year column name after header normalization.
pub const YEAR_COLUMN: &str = "YEAR";
/// Default aggregate crime column used for ratios and trends.
pub const TOTAL_COLUMN: &str = "TOTAL IPC CRIMES";
/// District label used by summary rows.
pub const TOTAL_DISTRICT: &str = "TOTAL";

/// Trim and upper-case a key value.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_uppercase()
}

/// One row of the crime table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    region: Option<String>,
    district: Option<String>,
    year: Option<i64>,
    counts: Vec<u64>,
}

impl Record {
    /// Build a record. Region and district are trimmed and upper-cased.
    /// `counts` is aligned with the owning dataset's category list.
    pub fn new(
        region: Option<&str>,
        district: Option<&str>,
        year: Option<i64>,
        counts: Vec<u64>,
    ) -> Self {
        Self {
            region: region.map(normalize_key),
            district: district.map(normalize_key),
            year,
            counts,
        }
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    pub fn year(&self) -> Option<i64> {
        self.year
    }

    /// Count at a category index; zero when out of range.
    pub fn count(&self, index: usize) -> u64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }
}

/// Which key columns existed in the source table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyColumns {
    pub region: bool,
    pub district: bool,
    pub year: bool,
}

impl KeyColumns {
    pub fn all() -> Self {
        Self {
            region: true,
            district: true,
            year: true,
        }
    }
}

/// Ordered, read-only crime table.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    keys: KeyColumns,
    categories: Vec<String>,
    total_column: String,
    records: Vec<Record>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl Dataset {
    /// Build a dataset. Category names are normalized like column headers and
    /// every record's counts are padded/truncated to the category count.
    pub fn new(keys: KeyColumns, categories: Vec<String>, records: Vec<Record>) -> Self {
        let categories: Vec<String> = categories.iter().map(|c| normalize_key(c)).collect();
        let width = categories.len();
        let records = records
            .into_iter()
            .map(|mut record| {
                record.counts.resize(width, 0);
                record
            })
            .collect();

        Self {
            keys,
            categories,
            total_column: TOTAL_COLUMN.to_string(),
            records,
        }
    }

    /// An empty dataset with no columns.
    pub fn empty() -> Self {
        Self {
            keys: KeyColumns::default(),
            categories: Vec::new(),
            total_column: TOTAL_COLUMN.to_string(),
            records: Vec::new(),
        }
    }

    /// Use a different aggregate column for ratios and trends.
    pub fn with_total_column(mut self, name: &str) -> Self {
        self.total_column = normalize_key(name);
        self
    }

    /// Same columns, different rows. Used by filters.
    pub(crate) fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            keys: self.keys,
            categories: self.categories.clone(),
            total_column: self.total_column.clone(),
            records,
        }
    }

    pub fn keys(&self) -> KeyColumns {
        self.keys
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn total_column(&self) -> &str {
        &self.total_column
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of a crime category, matched case- and whitespace-insensitively.
    pub fn category_index(&self, name: &str) -> Option<usize> {
        let name = normalize_key(name);
        self.categories.iter().position(|c| *c == name)
    }

    /// Index of the aggregate TOTAL column, if present.
    pub fn total_index(&self) -> Option<usize> {
        self.category_index(&self.total_column)
    }

    /// Records whose region equals `region` (normalized before comparison).
    pub fn region_records<'a>(&'a self, region: &str) -> impl Iterator<Item = &'a Record> + 'a {
        let region = normalize_key(region);
        self.records
            .iter()
            .filter(move |r| r.region() == Some(region.as_str()))
    }
}
