//! Survey record model and validation
//!
//! The nine rating metrics are a fixed, ordered set. They are represented by
//! the `RatingField` enum with one typed accessor per field rather than
//! string-keyed lookups, so a misspelled field name is a compile error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive rating bounds for every metric
pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

/// Minimum length of the free-text suggestions field (enforced by the wizard)
pub const SUGGESTIONS_MIN_LEN: usize = 3;

/// Maximum length of the free-text suggestions field (enforced by the wizard)
pub const SUGGESTIONS_MAX_LEN: usize = 1000;

/// The nine rating metrics, in the fixed order they appear in the wizard,
/// the CSV columns, and the analytics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingField {
    OverallExperience,
    ServiceQuality,
    Timeliness,
    Communication,
    Professionalism,
    IssueResolution,
    EaseOfAccess,
    ValueAdded,
    Efficiency,
}

impl RatingField {
    /// All nine fields in canonical order
    pub const ALL: [RatingField; 9] = [
        RatingField::OverallExperience,
        RatingField::ServiceQuality,
        RatingField::Timeliness,
        RatingField::Communication,
        RatingField::Professionalism,
        RatingField::IssueResolution,
        RatingField::EaseOfAccess,
        RatingField::ValueAdded,
        RatingField::Efficiency,
    ];

    /// Field name as it appears in the JSON wire format
    pub fn json_name(&self) -> &'static str {
        match self {
            RatingField::OverallExperience => "overallExperience",
            RatingField::ServiceQuality => "serviceQuality",
            RatingField::Timeliness => "timeliness",
            RatingField::Communication => "communication",
            RatingField::Professionalism => "professionalism",
            RatingField::IssueResolution => "issueResolution",
            RatingField::EaseOfAccess => "easeOfAccess",
            RatingField::ValueAdded => "valueAdded",
            RatingField::Efficiency => "efficiency",
        }
    }

    /// Column name in the persisted CSV layout
    ///
    /// The last two metrics keep their historical long-form column names so
    /// existing exports remain comparable.
    pub fn csv_column(&self) -> &'static str {
        match self {
            RatingField::OverallExperience => "overall_experience",
            RatingField::ServiceQuality => "service_quality",
            RatingField::Timeliness => "timeliness",
            RatingField::Communication => "communication",
            RatingField::Professionalism => "professionalism",
            RatingField::IssueResolution => "issue_resolution",
            RatingField::EaseOfAccess => "ease_of_access",
            RatingField::ValueAdded => "value_added_by_security_advisor",
            RatingField::Efficiency => "efficiency_of_security_advisor",
        }
    }

    /// Short step title shown in the wizard UI
    pub fn title(&self) -> &'static str {
        match self {
            RatingField::OverallExperience => "Overall Experience",
            RatingField::ServiceQuality => "Service Quality",
            RatingField::Timeliness => "Timeliness",
            RatingField::Communication => "Communication",
            RatingField::Professionalism => "Professionalism",
            RatingField::IssueResolution => "Issue Resolution",
            RatingField::EaseOfAccess => "Ease of Access",
            RatingField::ValueAdded => "Security Advisor Value",
            RatingField::Efficiency => "Security Advisor Efficiency",
        }
    }

    /// Full question text for the wizard step
    pub fn question(&self) -> &'static str {
        match self {
            RatingField::OverallExperience => {
                "How would you describe your overall experience with our service?"
            }
            RatingField::ServiceQuality => {
                "How satisfied are you with the quality of the service you received?"
            }
            RatingField::Timeliness => {
                "Did the service meet your expectations in terms of delivery time?"
            }
            RatingField::Communication => {
                "How clear and effective was the communication from our team throughout the service process?"
            }
            RatingField::Professionalism => {
                "How would you rate the professionalism and courtesy of our staff?"
            }
            RatingField::IssueResolution => {
                "How effectively did the service resolve your issue or meet your needs?"
            }
            RatingField::EaseOfAccess => "How easy was it to access and use our service?",
            RatingField::ValueAdded => {
                "How would you rate the value added by the security advisor to your overall experience?"
            }
            RatingField::Efficiency => {
                "How efficient was the security advisor in addressing your security concerns and providing solutions?"
            }
        }
    }
}

/// One validation failure, named by JSON field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Raw submission payload as received over the wire
///
/// Every field is optional at the deserialization layer so that a missing
/// rating produces a structured validation error instead of a serde rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitRequest {
    pub name: String,
    pub company: String,
    pub overall_experience: Option<i64>,
    pub service_quality: Option<i64>,
    pub timeliness: Option<i64>,
    pub communication: Option<i64>,
    pub professionalism: Option<i64>,
    pub issue_resolution: Option<i64>,
    pub ease_of_access: Option<i64>,
    pub value_added: Option<i64>,
    pub efficiency: Option<i64>,
    pub suggestions: Option<String>,
}

impl SubmitRequest {
    /// Typed accessor for a rating by field
    pub fn rating(&self, field: RatingField) -> Option<i64> {
        match field {
            RatingField::OverallExperience => self.overall_experience,
            RatingField::ServiceQuality => self.service_quality,
            RatingField::Timeliness => self.timeliness,
            RatingField::Communication => self.communication,
            RatingField::Professionalism => self.professionalism,
            RatingField::IssueResolution => self.issue_resolution,
            RatingField::EaseOfAccess => self.ease_of_access,
            RatingField::ValueAdded => self.value_added,
            RatingField::Efficiency => self.efficiency,
        }
    }

    pub fn set_rating(&mut self, field: RatingField, value: i64) {
        let slot = match field {
            RatingField::OverallExperience => &mut self.overall_experience,
            RatingField::ServiceQuality => &mut self.service_quality,
            RatingField::Timeliness => &mut self.timeliness,
            RatingField::Communication => &mut self.communication,
            RatingField::Professionalism => &mut self.professionalism,
            RatingField::IssueResolution => &mut self.issue_resolution,
            RatingField::EaseOfAccess => &mut self.ease_of_access,
            RatingField::ValueAdded => &mut self.value_added,
            RatingField::Efficiency => &mut self.efficiency,
        };
        *slot = Some(value);
    }

    /// Validate the payload, reporting every offending field
    ///
    /// Rejection happens before anything touches storage. Both respondent
    /// strings must be non-empty after trimming; every rating must be present
    /// and within [1,5].
    pub fn validate(&self) -> std::result::Result<NewSurveyResponse, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if self.company.trim().is_empty() {
            errors.push(FieldError::new("company", "Company is required"));
        }

        for field in RatingField::ALL {
            match self.rating(field) {
                None => errors.push(FieldError::new(field.json_name(), "Rating is required")),
                Some(v) if !(RATING_MIN..=RATING_MAX).contains(&v) => errors.push(
                    FieldError::new(field.json_name(), "Rating must be between 1 and 5"),
                ),
                Some(_) => {}
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        // Every rating verified present above; unwrap_or is unreachable
        Ok(NewSurveyResponse {
            name: self.name.clone(),
            company: self.company.clone(),
            overall_experience: self.overall_experience.unwrap_or(0),
            service_quality: self.service_quality.unwrap_or(0),
            timeliness: self.timeliness.unwrap_or(0),
            communication: self.communication.unwrap_or(0),
            professionalism: self.professionalism.unwrap_or(0),
            issue_resolution: self.issue_resolution.unwrap_or(0),
            ease_of_access: self.ease_of_access.unwrap_or(0),
            value_added: self.value_added.unwrap_or(0),
            efficiency: self.efficiency.unwrap_or(0),
            suggestions: self.suggestions.clone(),
        })
    }
}

/// A validated submission, ready for the storage layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurveyResponse {
    pub name: String,
    pub company: String,
    pub overall_experience: i64,
    pub service_quality: i64,
    pub timeliness: i64,
    pub communication: i64,
    pub professionalism: i64,
    pub issue_resolution: i64,
    pub ease_of_access: i64,
    pub value_added: i64,
    pub efficiency: i64,
    pub suggestions: Option<String>,
}

impl NewSurveyResponse {
    pub fn rating(&self, field: RatingField) -> i64 {
        match field {
            RatingField::OverallExperience => self.overall_experience,
            RatingField::ServiceQuality => self.service_quality,
            RatingField::Timeliness => self.timeliness,
            RatingField::Communication => self.communication,
            RatingField::Professionalism => self.professionalism,
            RatingField::IssueResolution => self.issue_resolution,
            RatingField::EaseOfAccess => self.ease_of_access,
            RatingField::ValueAdded => self.value_added,
            RatingField::Efficiency => self.efficiency,
        }
    }
}

/// Persisted survey response
///
/// `id` is assigned by the database on insert and never reused; `created_at`
/// is stamped once by the storage layer and is the canonical ordering and
/// grouping key for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub overall_experience: i64,
    pub service_quality: i64,
    pub timeliness: i64,
    pub communication: i64,
    pub professionalism: i64,
    pub issue_resolution: i64,
    pub ease_of_access: i64,
    pub value_added: i64,
    pub efficiency: i64,
    pub suggestions: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SurveyResponse {
    pub fn rating(&self, field: RatingField) -> i64 {
        match field {
            RatingField::OverallExperience => self.overall_experience,
            RatingField::ServiceQuality => self.service_quality,
            RatingField::Timeliness => self.timeliness,
            RatingField::Communication => self.communication,
            RatingField::Professionalism => self.professionalism,
            RatingField::IssueResolution => self.issue_resolution,
            RatingField::EaseOfAccess => self.ease_of_access,
            RatingField::ValueAdded => self.value_added,
            RatingField::Efficiency => self.efficiency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_request() -> SubmitRequest {
        let mut req = SubmitRequest {
            name: "Jane Doe".to_string(),
            company: "Acme".to_string(),
            suggestions: Some("Great work".to_string()),
            ..Default::default()
        };
        for field in RatingField::ALL {
            req.set_rating(field, 4);
        }
        req
    }

    #[test]
    fn valid_request_passes() {
        let new = complete_request().validate().expect("should validate");
        assert_eq!(new.name, "Jane Doe");
        assert_eq!(new.rating(RatingField::ValueAdded), 4);
        assert_eq!(new.suggestions.as_deref(), Some("Great work"));
    }

    #[test]
    fn empty_name_rejected() {
        let mut req = complete_request();
        req.name = "   ".to_string();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn out_of_range_rating_rejected() {
        let mut req = complete_request();
        req.set_rating(RatingField::Timeliness, 0);
        req.set_rating(RatingField::Efficiency, 6);
        let errors = req.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["timeliness", "efficiency"]);
    }

    #[test]
    fn all_offending_fields_reported() {
        let req = SubmitRequest::default();
        let errors = req.validate().unwrap_err();
        // name + company + nine missing ratings
        assert_eq!(errors.len(), 11);
        assert!(errors.iter().any(|e| e.field == "overallExperience"));
        assert!(errors.iter().any(|e| e.field == "efficiency"));
    }

    #[test]
    fn missing_suggestions_is_valid_at_data_layer() {
        let mut req = complete_request();
        req.suggestions = None;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn json_names_round_trip_through_serde() {
        let req = complete_request();
        let json = serde_json::to_value(&req).unwrap();
        for field in RatingField::ALL {
            assert_eq!(json[field.json_name()], 4, "field {}", field.json_name());
        }
        let back: SubmitRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back.rating(RatingField::OverallExperience), Some(4));
    }

    #[test]
    fn partial_json_deserializes_with_missing_fields() {
        let req: SubmitRequest =
            serde_json::from_str(r#"{"name":"Jane","overallExperience":5}"#).unwrap();
        assert_eq!(req.name, "Jane");
        assert_eq!(req.rating(RatingField::OverallExperience), Some(5));
        assert_eq!(req.rating(RatingField::ServiceQuality), None);
        assert!(req.company.is_empty());
    }
}
