use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// RemoteRatio – normalized remote-work category
// ---------------------------------------------------------------------------

/// Remote-work category derived from the numeric `remote_ratio` code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RemoteRatio {
    NotRemote,
    PartiallyRemote,
    FullyRemote,
    /// A code outside {0, 50, 100}, kept verbatim (trimmed).
    Unmapped(String),
}

impl RemoteRatio {
    pub fn label(&self) -> String {
        match self {
            RemoteRatio::NotRemote => "Not Remote".to_string(),
            RemoteRatio::PartiallyRemote => "Partially Remote".to_string(),
            RemoteRatio::FullyRemote => "Fully Remote".to_string(),
            RemoteRatio::Unmapped(raw) if raw.is_empty() => "Unknown".to_string(),
            RemoteRatio::Unmapped(raw) => format!("Unknown ({raw})"),
        }
    }
}

impl fmt::Display for RemoteRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// ---------------------------------------------------------------------------
// RawRecord – one row exactly as read from the source
// ---------------------------------------------------------------------------

/// A row before normalization. Field names are the source column names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub year: Option<i32>,
    pub work_year: i32,
    pub seniority: String,
    pub employment_type: String,
    pub company_size: String,
    pub job_title: String,
    /// Raw numeric code as text (`"0"`, `"50"`, `"100"`, ...).
    pub remote_ratio: String,
    pub employee_residence_iso3: String,
    pub salary_in_usd: f64,
}

// ---------------------------------------------------------------------------
// Record – one normalized row of the dataset
// ---------------------------------------------------------------------------

/// A single job-salary observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: Option<i32>,
    pub work_year: i32,
    pub seniority: String,
    pub employment_type: String,
    pub company_size: String,
    pub job_title: String,
    pub remote_ratio: RemoteRatio,
    pub employee_residence_iso3: String,
    pub salary_in_usd: f64,
}

// ---------------------------------------------------------------------------
// Filterable dimensions
// ---------------------------------------------------------------------------

/// The four categorical columns the user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    WorkYear,
    Seniority,
    EmploymentType,
    CompanySize,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::WorkYear,
        Dimension::Seniority,
        Dimension::EmploymentType,
        Dimension::CompanySize,
    ];

    /// Label shown on the filter control.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::WorkYear => "work_year",
            Dimension::Seniority => "Seniority",
            Dimension::EmploymentType => "Contract Type",
            Dimension::CompanySize => "Company Size",
        }
    }

    /// The record's value along this dimension.
    pub fn value_of(self, record: &Record) -> FilterValue {
        match self {
            Dimension::WorkYear => FilterValue::Integer(i64::from(record.work_year)),
            Dimension::Seniority => FilterValue::Text(record.seniority.clone()),
            Dimension::EmploymentType => FilterValue::Text(record.employment_type.clone()),
            Dimension::CompanySize => FilterValue::Text(record.company_size.clone()),
        }
    }
}

/// One selectable value of a [`Dimension`]. Integers sort numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Integer(i) => write!(f, "{i}"),
            FilterValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Integer(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded dataset with pre-computed distinct values per dimension.
/// Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    distinct: BTreeMap<Dimension, BTreeSet<FilterValue>>,
}

impl Dataset {
    /// Build the distinct-value index from normalized records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut distinct: BTreeMap<Dimension, BTreeSet<FilterValue>> =
            Dimension::ALL.iter().map(|d| (*d, BTreeSet::new())).collect();

        for record in &records {
            for dim in Dimension::ALL {
                distinct
                    .entry(dim)
                    .or_default()
                    .insert(dim.value_of(record));
            }
        }

        Dataset { records, distinct }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Sorted distinct values observed for `dim`.
    pub fn distinct_values(&self, dim: Dimension) -> &BTreeSet<FilterValue> {
        static EMPTY: BTreeSet<FilterValue> = BTreeSet::new();
        self.distinct.get(&dim).unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn record(
        work_year: i32,
        seniority: &str,
        employment_type: &str,
        company_size: &str,
        job_title: &str,
        remote_ratio: RemoteRatio,
        iso3: &str,
        salary: f64,
    ) -> Record {
        Record {
            year: Some(work_year),
            work_year,
            seniority: seniority.to_string(),
            employment_type: employment_type.to_string(),
            company_size: company_size.to_string(),
            job_title: job_title.to_string(),
            remote_ratio,
            employee_residence_iso3: iso3.to_string(),
            salary_in_usd: salary,
        }
    }

    /// The three-row dataset used throughout the core tests.
    pub(crate) fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            record(2020, "Senior", "FT", "L", "Data Scientist", RemoteRatio::FullyRemote, "USA", 150_000.0),
            record(2021, "Junior", "FT", "S", "Data Analyst", RemoteRatio::NotRemote, "BRA", 40_000.0),
            record(2020, "Senior", "FT", "L", "Data Scientist", RemoteRatio::PartiallyRemote, "CAN", 160_000.0),
        ])
    }

    #[test]
    fn distinct_values_are_sorted_and_deduplicated() {
        let ds = sample_dataset();
        let years: Vec<_> = ds.distinct_values(Dimension::WorkYear).iter().cloned().collect();
        assert_eq!(years, vec![FilterValue::Integer(2020), FilterValue::Integer(2021)]);

        let seniority: Vec<_> = ds.distinct_values(Dimension::Seniority).iter().cloned().collect();
        assert_eq!(seniority, vec![FilterValue::from("Junior"), FilterValue::from("Senior")]);
        assert_eq!(ds.distinct_values(Dimension::EmploymentType).len(), 1);
    }

    #[test]
    fn empty_dataset_has_empty_distinct_sets() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        for dim in Dimension::ALL {
            assert!(ds.distinct_values(dim).is_empty());
        }
    }

    #[test]
    fn unmapped_remote_ratio_label_keeps_raw_code() {
        assert_eq!(RemoteRatio::Unmapped("75".into()).label(), "Unknown (75)");
        assert_eq!(RemoteRatio::Unmapped(String::new()).label(), "Unknown");
        assert_eq!(RemoteRatio::PartiallyRemote.to_string(), "Partially Remote");
    }
}
