//! CSV encoding and decoding for the survey export format
//!
//! The CSV file is the durability backstop for submissions, so the layout is
//! fixed: timestamp, name, company, the nine ratings in canonical order, then
//! suggestions. A field is quoted (with interior quotes doubled) whenever it
//! contains a comma, a double quote, or a newline; otherwise it is emitted
//! verbatim.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::{RatingField, SurveyResponse};
use crate::{Error, Result};

/// Header row of the persisted CSV layout (no trailing newline)
pub const CSV_HEADER: &str = "timestamp,name,company,overall_experience,service_quality,\
timeliness,communication,professionalism,issue_resolution,ease_of_access,\
value_added_by_security_advisor,efficiency_of_security_advisor,suggestions";

/// Number of columns per row
const COLUMN_COUNT: usize = 13;

/// One decoded CSV row
///
/// The row carries no identifier; the CSV layout predates the relational
/// store and only records the submission content plus its timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub company: String,
    pub ratings: [i64; 9],
    pub suggestions: String,
}

/// Escape a single field per the quoting rule
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Encode one response as a CSV line (no trailing newline)
pub fn encode_row(response: &SurveyResponse) -> String {
    let mut fields = Vec::with_capacity(COLUMN_COUNT);
    fields.push(
        response
            .created_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    fields.push(escape_field(&response.name));
    fields.push(escape_field(&response.company));
    for field in RatingField::ALL {
        fields.push(response.rating(field).to_string());
    }
    fields.push(escape_field(response.suggestions.as_deref().unwrap_or("")));
    fields.join(",")
}

/// Encode the full document: header plus one line per response, in the
/// order given (storage order for exports)
pub fn encode(responses: &[SurveyResponse]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for response in responses {
        out.push_str(&encode_row(response));
        out.push('\n');
    }
    out
}

/// Decode a full CSV document back into rows
///
/// Quote-aware: a quoted field may contain commas, doubled quotes, and
/// newlines. The header row is required and checked.
pub fn decode(input: &str) -> Result<Vec<CsvRow>> {
    let mut records = split_records(input)?;
    if records.is_empty() {
        return Err(Error::Internal("CSV document is empty".to_string()));
    }

    let header = records.remove(0);
    if header.join(",") != CSV_HEADER {
        return Err(Error::Internal(format!(
            "Unexpected CSV header: {}",
            header.join(",")
        )));
    }

    records.into_iter().map(decode_record).collect()
}

fn decode_record(fields: Vec<String>) -> Result<CsvRow> {
    if fields.len() != COLUMN_COUNT {
        return Err(Error::Internal(format!(
            "CSV row has {} fields, expected {}",
            fields.len(),
            COLUMN_COUNT
        )));
    }

    let timestamp = DateTime::parse_from_rfc3339(&fields[0])
        .map_err(|e| Error::Internal(format!("Bad CSV timestamp '{}': {}", fields[0], e)))?
        .with_timezone(&Utc);

    let mut ratings = [0i64; 9];
    for (i, slot) in ratings.iter_mut().enumerate() {
        *slot = fields[3 + i]
            .parse()
            .map_err(|e| Error::Internal(format!("Bad CSV rating '{}': {}", fields[3 + i], e)))?;
    }

    Ok(CsvRow {
        timestamp,
        name: fields[1].clone(),
        company: fields[2].clone(),
        ratings,
        suggestions: fields[12].clone(),
    })
}

/// Split a CSV document into records of raw fields, honoring quoting
fn split_records(input: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
        } else {
            match c {
                '"' if field.is_empty() => in_quotes = true,
                ',' => {
                    fields.push(std::mem::take(&mut field));
                }
                '\n' => {
                    fields.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut fields));
                }
                '\r' => {} // tolerate CRLF line endings
                _ => field.push(c),
            }
        }
    }

    if in_quotes {
        return Err(Error::Internal("Unterminated quoted CSV field".to_string()));
    }

    // Final record without trailing newline
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(fields);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(id: i64, suggestions: &str) -> SurveyResponse {
        SurveyResponse {
            id,
            name: "Jane Doe".to_string(),
            company: "Acme".to_string(),
            overall_experience: 5,
            service_quality: 4,
            timeliness: 5,
            communication: 4,
            professionalism: 5,
            issue_resolution: 4,
            ease_of_access: 5,
            value_added: 4,
            efficiency: 5,
            suggestions: if suggestions.is_empty() {
                None
            } else {
                Some(suggestions.to_string())
            },
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
        }
    }

    #[test]
    fn plain_field_emitted_verbatim() {
        assert_eq!(escape_field("Great work"), "Great work");
    }

    #[test]
    fn comma_quote_newline_trigger_quoting() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("line1\nline2"), "\"line1\nline2\"");
        assert_eq!(
            escape_field(r#"He said, "great job""#),
            r#""He said, ""great job""""#
        );
    }

    #[test]
    fn header_matches_rating_field_columns() {
        let mut expected = vec!["timestamp", "name", "company"];
        expected.extend(RatingField::ALL.iter().map(|f| f.csv_column()));
        expected.push("suggestions");
        assert_eq!(CSV_HEADER, expected.join(","));
    }

    #[test]
    fn round_trip_plain() {
        let responses = vec![sample(1, "Great work"), sample(2, "")];
        let doc = encode(&responses);
        let rows = decode(&doc).expect("should decode");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Jane Doe");
        assert_eq!(rows[0].ratings, [5, 4, 5, 4, 5, 4, 5, 4, 5]);
        assert_eq!(rows[0].suggestions, "Great work");
        assert_eq!(rows[1].suggestions, "");
        assert_eq!(rows[0].timestamp, responses[0].created_at);
    }

    #[test]
    fn round_trip_special_characters() {
        let doc = encode(&[sample(1, "He said, \"great job\"\nsecond line")]);
        assert!(doc.contains(r#""He said, ""great job"""#));
        let rows = decode(&doc).expect("should decode");
        assert_eq!(rows[0].suggestions, "He said, \"great job\"\nsecond line");
    }

    #[test]
    fn decode_rejects_bad_header() {
        let err = decode("not,a,header\n").unwrap_err();
        assert!(err.to_string().contains("Unexpected CSV header"));
    }

    #[test]
    fn decode_rejects_unterminated_quote() {
        let doc = format!("{}\n\"unterminated", CSV_HEADER);
        assert!(decode(&doc).is_err());
    }

    #[test]
    fn header_only_document_decodes_empty() {
        let doc = format!("{}\n", CSV_HEADER);
        assert!(decode(&doc).expect("should decode").is_empty());
    }
}
