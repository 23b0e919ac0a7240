//! Lead conversion metrics
//!
//! Summary statistics for the conversions view: how many leads arrived, how
//! many converted, how many are being worked, and the conversion rate, each
//! compared with the previous period.

use serde::{Deserialize, Serialize};

use super::comparison::Comparison;
use crate::models::{CategoryField, Interval, Record, TimestampPolicy};
use crate::trends::buckets::trend_series;
use crate::trends::{Granularity, TrendSeries};

/// Status strings that mark a lead as converted or in contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionVocabulary {
    pub converted_status: String,
    pub in_contact_status: String,
}

impl Default for ConversionVocabulary {
    fn default() -> Self {
        Self {
            converted_status: "Lead Convertida".to_string(),
            in_contact_status: "Em Contacto".to_string(),
        }
    }
}

impl ConversionVocabulary {
    pub fn is_converted(&self, record: &Record) -> bool {
        matches_status(CategoryField::Conversion.value(record), &self.converted_status)
    }

    pub fn is_in_contact(&self, record: &Record) -> bool {
        matches_status(CategoryField::LeadStatus.value(record), &self.in_contact_status)
    }
}

fn matches_status(value: Option<&str>, expected: &str) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case(expected.trim()))
        .unwrap_or(false)
}

/// Lead counts for one period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionCounts {
    pub total_leads: usize,
    pub converted_leads: usize,
    pub leads_in_contact: usize,
    /// Converted share of all leads in percent (0 without leads)
    pub conversion_rate: f64,
}

impl ConversionCounts {
    pub fn from_leads<'a, I>(leads: I, vocabulary: &ConversionVocabulary) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut counts = ConversionCounts::default();
        for lead in leads {
            counts.total_leads += 1;
            if vocabulary.is_converted(lead) {
                counts.converted_leads += 1;
            }
            if vocabulary.is_in_contact(lead) {
                counts.leads_in_contact += 1;
            }
        }

        if counts.total_leads > 0 {
            counts.conversion_rate =
                counts.converted_leads as f64 / counts.total_leads as f64 * 100.0;
        }

        counts
    }
}

/// Current-period conversion figures with previous-period comparisons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub current: ConversionCounts,
    pub previous: Option<ConversionCounts>,
    pub total_change: Option<Comparison>,
    pub converted_change: Option<Comparison>,
    pub rate_change: Option<Comparison>,
}

impl ConversionSummary {
    /// Build the summary; `previous` is `None` when the period has no comparison
    pub fn from_leads<'a, C, P>(
        current: C,
        previous: Option<P>,
        vocabulary: &ConversionVocabulary,
    ) -> Self
    where
        C: IntoIterator<Item = &'a Record>,
        P: IntoIterator<Item = &'a Record>,
    {
        let current = ConversionCounts::from_leads(current, vocabulary);
        let previous = previous.map(|p| ConversionCounts::from_leads(p, vocabulary));

        Self {
            current,
            previous,
            total_change: previous
                .map(|p| Comparison::counts(current.total_leads, p.total_leads)),
            converted_change: previous
                .map(|p| Comparison::counts(current.converted_leads, p.converted_leads)),
            rate_change: previous
                .map(|p| Comparison::between(current.conversion_rate, p.conversion_rate)),
        }
    }
}

/// Converted leads over time, bucketed by lead contact date
pub fn conversion_trend<'a, I>(
    leads: I,
    interval: &Interval,
    vocabulary: &ConversionVocabulary,
    granularity: Option<Granularity>,
) -> TrendSeries
where
    I: IntoIterator<Item = &'a Record>,
{
    let converted = leads.into_iter().filter(|lead| vocabulary.is_converted(lead));
    trend_series(converted, interval, TimestampPolicy::LeadContact, granularity)
}
