//! Category breakdowns
//!
//! Counts a categorical field across the current and previous record sets and
//! merges the counts into one table sorted for bar charts.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::Record;

/// Substituted for empty or missing category values
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Per-call-site aggregation policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOptions {
    /// Drop the unknown sentinel from the result
    #[serde(default)]
    pub exclude_unknown: bool,
    /// Further values to drop, compared after normalization
    #[serde(default)]
    pub excluded_values: Vec<String>,
}

impl CategoryOptions {
    pub fn excluding_unknown() -> Self {
        Self {
            exclude_unknown: true,
            excluded_values: Vec::new(),
        }
    }

    pub fn with_excluded<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_values
            .extend(values.into_iter().map(|v| normalize(Some(v.as_ref()))));
        self
    }

    fn keeps(&self, category: &str) -> bool {
        if self.exclude_unknown && category == UNKNOWN_CATEGORY {
            return false;
        }
        !self.excluded_values.iter().any(|v| v == category)
    }
}

/// One row of a current-vs-previous category table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub current_count: u32,
    pub previous_count: u32,
}

/// A row's slice of the current total, for pie charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: u32,
    /// Percentage of the current total (0-100)
    pub percent: f64,
}

/// Trim and lowercase a category value, mapping blanks to the sentinel
pub fn normalize(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_lowercase(),
        _ => UNKNOWN_CATEGORY.to_string(),
    }
}

fn count_values<'a, I, F>(records: I, selector: &F) -> HashMap<String, u32>
where
    I: IntoIterator<Item = &'a Record>,
    F: Fn(&'a Record) -> Option<&'a str>,
{
    let mut counts: HashMap<String, u32> = HashMap::new();
    for record in records {
        *counts.entry(normalize(selector(record))).or_insert(0) += 1;
    }
    counts
}

/// Merge current and previous category counts into sorted rows
///
/// Rows are ordered by current count descending, then category ascending.
pub fn aggregate<'a, C, P, F>(
    current: C,
    previous: P,
    selector: F,
    options: &CategoryOptions,
) -> Vec<CategoryRow>
where
    C: IntoIterator<Item = &'a Record>,
    P: IntoIterator<Item = &'a Record>,
    F: Fn(&'a Record) -> Option<&'a str>,
{
    let current_counts = count_values(current, &selector);
    let previous_counts = count_values(previous, &selector);

    let categories: BTreeSet<&String> = current_counts
        .keys()
        .chain(previous_counts.keys())
        .collect();

    let mut rows: Vec<CategoryRow> = categories
        .into_iter()
        .filter(|category| options.keeps(category))
        .map(|category| CategoryRow {
            category: category.clone(),
            current_count: current_counts.get(category).copied().unwrap_or(0),
            previous_count: previous_counts.get(category).copied().unwrap_or(0),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.current_count
            .cmp(&a.current_count)
            .then_with(|| a.category.cmp(&b.category))
    });

    rows
}

/// Single-set counts, sorted like `aggregate`
pub fn count_by<'a, I, F>(records: I, selector: F, options: &CategoryOptions) -> Vec<(String, u32)>
where
    I: IntoIterator<Item = &'a Record>,
    F: Fn(&'a Record) -> Option<&'a str>,
{
    aggregate(records, std::iter::empty(), selector, options)
        .into_iter()
        .map(|row| (row.category, row.current_count))
        .collect()
}

/// Percentage share of each row's current count
pub fn shares(rows: &[CategoryRow]) -> Vec<CategoryShare> {
    let total: u32 = rows.iter().map(|r| r.current_count).sum();
    rows.iter()
        .map(|row| CategoryShare {
            category: row.category.clone(),
            count: row.current_count,
            percent: if total > 0 {
                row.current_count as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}
