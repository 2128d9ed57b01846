//! Aggregate analytics over the full response set
//!
//! Pure arithmetic over an in-memory list: count, per-field mean rating,
//! calendar date range, and a per-date histogram. Calling it twice over the
//! same set returns identical output.

use chrono::NaiveDate;
use csat_common::model::{RatingField, SurveyResponse};
use serde::Serialize;
use std::collections::BTreeMap;

/// Earliest and latest calendar dates (UTC date portion of `created_at`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

/// Response count for one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// The analytics payload served to the admin view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total: i64,
    /// Mean of each rating field, rounded to 2 decimal places; all zeros
    /// when there are no responses
    pub average_ratings: BTreeMap<&'static str, f64>,
    /// `null` when there are no responses
    pub date_range: Option<DateRange>,
    /// Histogram of responses per calendar date, ascending by date
    pub responses_by_date: Vec<DateCount>,
}

/// Compute the report over every response
pub fn analytics(responses: &[SurveyResponse]) -> AnalyticsReport {
    let total = responses.len() as i64;

    let mut average_ratings = BTreeMap::new();
    for field in RatingField::ALL {
        let mean = if responses.is_empty() {
            0.0
        } else {
            let sum: i64 = responses.iter().map(|r| r.rating(field)).sum();
            round2(sum as f64 / responses.len() as f64)
        };
        average_ratings.insert(field.json_name(), mean);
    }

    let mut by_date: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for response in responses {
        *by_date.entry(response.created_at.date_naive()).or_insert(0) += 1;
    }

    let date_range = match (by_date.keys().next(), by_date.keys().next_back()) {
        (Some(&earliest), Some(&latest)) => Some(DateRange { earliest, latest }),
        _ => None,
    };

    let responses_by_date = by_date
        .into_iter()
        .map(|(date, count)| DateCount { date, count })
        .collect();

    AnalyticsReport {
        total,
        average_ratings,
        date_range,
        responses_by_date,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn response(id: i64, day: u32, overall: i64) -> SurveyResponse {
        SurveyResponse {
            id,
            name: "Jane Doe".to_string(),
            company: "Acme".to_string(),
            overall_experience: overall,
            service_quality: 4,
            timeliness: 5,
            communication: 4,
            professionalism: 5,
            issue_resolution: 4,
            ease_of_access: 5,
            value_added: 4,
            efficiency: 5,
            suggestions: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_set_yields_zero_map_and_null_range() {
        let report = analytics(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.average_ratings.len(), 9);
        assert!(report.average_ratings.values().all(|&v| v == 0.0));
        assert_eq!(report.date_range, None);
        assert!(report.responses_by_date.is_empty());
    }

    #[test]
    fn means_rounded_to_two_decimals() {
        // overall 5, 4, 4 -> 13/3 = 4.333... -> 4.33
        let responses = vec![response(1, 1, 5), response(2, 1, 4), response(3, 2, 4)];
        let report = analytics(&responses);
        assert_eq!(report.total, 3);
        assert_eq!(report.average_ratings["overallExperience"], 4.33);
        assert_eq!(report.average_ratings["serviceQuality"], 4.0);
    }

    #[test]
    fn date_range_and_histogram() {
        let responses = vec![response(1, 1, 5), response(2, 1, 4), response(3, 5, 3)];
        let report = analytics(&responses);

        let range = report.date_range.unwrap();
        assert_eq!(range.earliest, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(range.latest, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());

        assert_eq!(report.responses_by_date.len(), 2);
        assert_eq!(report.responses_by_date[0].count, 2);
        assert_eq!(report.responses_by_date[1].count, 1);
    }

    #[test]
    fn idempotent_over_same_input() {
        let responses = vec![response(1, 1, 5), response(2, 2, 2)];
        assert_eq!(analytics(&responses), analytics(&responses));
    }
}
