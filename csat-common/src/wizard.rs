//! Wizard state machine for the multi-step survey flow
//!
//! Drives the respondent through a fixed, ordered sequence of steps and
//! guarantees no step is skipped with missing required data. The flow is
//! strictly forward: welcome, respondent info, one step per rating metric in
//! canonical order, free-text suggestions, done. There is no "previous"
//! action; the only way back is a full restart.
//!
//! The machine itself performs no I/O. Advancing past the suggestions step
//! hands the caller a completed submission payload and marks a submission in
//! flight; the caller reports the outcome back via `submission_succeeded` or
//! `submission_failed`. While a submission is in flight further `advance`
//! calls are refused, which is what prevents duplicate submissions.

use crate::model::{
    FieldError, RatingField, SubmitRequest, RATING_MAX, RATING_MIN, SUGGESTIONS_MAX_LEN,
    SUGGESTIONS_MIN_LEN,
};

/// Total number of steps: welcome + info + nine ratings + suggestions + done
pub const STEP_COUNT: usize = 13;

/// One step of the survey flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Welcome,
    Info,
    Rating(RatingField),
    Suggestions,
    Done,
}

impl WizardStep {
    /// Step at a given index in the fixed order
    fn at(index: usize) -> WizardStep {
        match index {
            0 => WizardStep::Welcome,
            1 => WizardStep::Info,
            i if (2..11).contains(&i) => WizardStep::Rating(RatingField::ALL[i - 2]),
            11 => WizardStep::Suggestions,
            _ => WizardStep::Done,
        }
    }
}

/// Outcome of a successful `advance` call
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved to the next step
    Moved(WizardStep),
    /// The suggestions step validated; the caller must now perform the
    /// network submission and report the outcome back
    Submit(SubmitRequest),
}

/// Why `advance` (or a draft mutation) was refused
#[derive(Debug, Clone, PartialEq)]
pub enum WizardError {
    /// The current step's validity predicate failed; the step index is
    /// unchanged and the offending fields are listed
    Invalid(Vec<FieldError>),
    /// A submission is already outstanding
    SubmissionInFlight,
    /// The flow is complete; only `restart` leaves the done step
    Terminal,
    /// Rating outside the accepted range was rejected
    RatingOutOfRange(i64),
}

/// Client-side wizard state: current step index, the partially-filled draft,
/// and per-field validation errors. Ephemeral; never persisted.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    index: usize,
    draft: SubmitRequest,
    errors: Vec<FieldError>,
    in_flight: bool,
}

impl Wizard {
    /// Fresh wizard at the welcome step with an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        WizardStep::at(self.index)
    }

    /// Zero-based index of the current step
    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn draft(&self) -> &SubmitRequest {
        &self.draft
    }

    /// Validation errors recorded by the last refused `advance`
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn submission_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
        self.errors.retain(|e| e.field != "name");
    }

    pub fn set_company(&mut self, company: impl Into<String>) {
        self.draft.company = company.into();
        self.errors.retain(|e| e.field != "company");
    }

    /// Assign a rating; values outside [1,5] are rejected and leave the
    /// draft unchanged
    pub fn set_rating(&mut self, field: RatingField, value: i64) -> Result<(), WizardError> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(WizardError::RatingOutOfRange(value));
        }
        self.draft.set_rating(field, value);
        self.errors.retain(|e| e.field != field.json_name());
        Ok(())
    }

    pub fn set_suggestions(&mut self, suggestions: impl Into<String>) {
        self.draft.suggestions = Some(suggestions.into());
        self.errors.retain(|e| e.field != "suggestions");
    }

    /// Attempt to advance to the next step
    ///
    /// Advances only when the current step's validity predicate holds. On
    /// refusal the step index does not change and the offending fields are
    /// recorded. Advancing from the suggestions step returns the completed
    /// payload instead of moving; the transition to done happens via
    /// `submission_succeeded`.
    pub fn advance(&mut self) -> Result<Advance, WizardError> {
        if self.in_flight {
            return Err(WizardError::SubmissionInFlight);
        }

        match self.step() {
            WizardStep::Welcome => Ok(self.moved()),
            WizardStep::Info => {
                let mut errors = Vec::new();
                if self.draft.name.trim().is_empty() {
                    errors.push(FieldError::new("name", "Name is required"));
                }
                if self.draft.company.trim().is_empty() {
                    errors.push(FieldError::new("company", "Company is required"));
                }
                if errors.is_empty() {
                    Ok(self.moved())
                } else {
                    self.errors = errors.clone();
                    Err(WizardError::Invalid(errors))
                }
            }
            WizardStep::Rating(field) => {
                // set_rating enforces the range, so presence is the predicate
                if self.draft.rating(field).is_some() {
                    Ok(self.moved())
                } else {
                    let error = FieldError::new(field.json_name(), "Rating is required");
                    self.errors = vec![error.clone()];
                    Err(WizardError::Invalid(vec![error]))
                }
            }
            WizardStep::Suggestions => {
                let len = self
                    .draft
                    .suggestions
                    .as_deref()
                    .map(|s| s.trim().len())
                    .unwrap_or(0);
                if len < SUGGESTIONS_MIN_LEN {
                    let error = FieldError::new(
                        "suggestions",
                        format!("Suggestions must be at least {} characters", SUGGESTIONS_MIN_LEN),
                    );
                    self.errors = vec![error.clone()];
                    return Err(WizardError::Invalid(vec![error]));
                }
                if len > SUGGESTIONS_MAX_LEN {
                    let error = FieldError::new(
                        "suggestions",
                        format!("Suggestions must be at most {} characters", SUGGESTIONS_MAX_LEN),
                    );
                    self.errors = vec![error.clone()];
                    return Err(WizardError::Invalid(vec![error]));
                }
                self.in_flight = true;
                self.errors.clear();
                Ok(Advance::Submit(self.draft.clone()))
            }
            WizardStep::Done => Err(WizardError::Terminal),
        }
    }

    /// The outstanding submission was accepted; move to the done step
    pub fn submission_succeeded(&mut self) {
        if self.in_flight {
            self.in_flight = false;
            self.index += 1;
        }
    }

    /// The outstanding submission failed; stay on the suggestions step with
    /// the draft intact so the respondent can retry without re-entering data
    pub fn submission_failed(&mut self, message: impl Into<String>) {
        if self.in_flight {
            self.in_flight = false;
            self.errors = vec![FieldError::new("suggestions", message)];
        }
    }

    /// Discard all state and return to the welcome step
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    fn moved(&mut self) -> Advance {
        self.index += 1;
        self.errors.clear();
        Advance::Moved(self.step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive a fresh wizard up to (but not past) the suggestions step
    fn wizard_at_suggestions() -> Wizard {
        let mut w = Wizard::new();
        assert_eq!(w.advance().unwrap(), Advance::Moved(WizardStep::Info));
        w.set_name("Jane Doe");
        w.set_company("Acme");
        w.advance().unwrap();
        for field in RatingField::ALL {
            w.set_rating(field, 5).unwrap();
            w.advance().unwrap();
        }
        assert_eq!(w.step(), WizardStep::Suggestions);
        w
    }

    #[test]
    fn steps_follow_fixed_order() {
        assert_eq!(WizardStep::at(0), WizardStep::Welcome);
        assert_eq!(WizardStep::at(1), WizardStep::Info);
        assert_eq!(
            WizardStep::at(2),
            WizardStep::Rating(RatingField::OverallExperience)
        );
        assert_eq!(
            WizardStep::at(10),
            WizardStep::Rating(RatingField::Efficiency)
        );
        assert_eq!(WizardStep::at(11), WizardStep::Suggestions);
        assert_eq!(WizardStep::at(STEP_COUNT - 1), WizardStep::Done);
    }

    #[test]
    fn done_is_reached_after_exactly_step_count_states() {
        let mut w = wizard_at_suggestions();
        w.set_suggestions("Great work");
        w.advance().unwrap();
        w.submission_succeeded();
        assert_eq!(w.step(), WizardStep::Done);
        assert_eq!(w.step_index(), STEP_COUNT - 1);
    }

    #[test]
    fn welcome_always_advances() {
        let mut w = Wizard::new();
        assert_eq!(w.step(), WizardStep::Welcome);
        assert_eq!(w.advance().unwrap(), Advance::Moved(WizardStep::Info));
    }

    #[test]
    fn info_refuses_empty_company_without_moving() {
        let mut w = Wizard::new();
        w.advance().unwrap();
        w.set_name("Jane Doe");
        let before = w.step_index();
        let err = w.advance().unwrap_err();
        assert_eq!(w.step_index(), before);
        match err {
            WizardError::Invalid(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "company");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rating_steps_advance_exactly_one_step_in_order() {
        let mut w = Wizard::new();
        w.advance().unwrap();
        w.set_name("Jane Doe");
        w.set_company("Acme");
        w.advance().unwrap();

        for (i, field) in RatingField::ALL.iter().enumerate() {
            assert_eq!(w.step(), WizardStep::Rating(*field), "step {}", i);
            // Unanswered rating must not advance
            assert!(matches!(w.advance(), Err(WizardError::Invalid(_))));
            assert_eq!(w.step(), WizardStep::Rating(*field));
            w.set_rating(*field, 3).unwrap();
            w.advance().unwrap();
        }
        assert_eq!(w.step(), WizardStep::Suggestions);
    }

    #[test]
    fn rating_out_of_range_rejected_by_setter() {
        let mut w = Wizard::new();
        assert_eq!(
            w.set_rating(RatingField::Timeliness, 0),
            Err(WizardError::RatingOutOfRange(0))
        );
        assert_eq!(
            w.set_rating(RatingField::Timeliness, 6),
            Err(WizardError::RatingOutOfRange(6))
        );
        assert_eq!(w.draft().rating(RatingField::Timeliness), None);
    }

    #[test]
    fn suggestions_minimum_length_enforced() {
        let mut w = wizard_at_suggestions();
        w.set_suggestions("ab");
        assert!(matches!(w.advance(), Err(WizardError::Invalid(_))));
        assert_eq!(w.step(), WizardStep::Suggestions);
    }

    #[test]
    fn suggestions_maximum_length_enforced() {
        let mut w = wizard_at_suggestions();
        w.set_suggestions("x".repeat(SUGGESTIONS_MAX_LEN + 1));
        assert!(matches!(w.advance(), Err(WizardError::Invalid(_))));
        assert_eq!(w.step(), WizardStep::Suggestions);
        assert!(!w.submission_in_flight());

        // Exactly at the limit is accepted
        w.set_suggestions("x".repeat(SUGGESTIONS_MAX_LEN));
        assert!(matches!(w.advance(), Ok(Advance::Submit(_))));
    }

    #[test]
    fn suggestions_step_yields_submission_payload() {
        let mut w = wizard_at_suggestions();
        w.set_suggestions("Great work");
        match w.advance().unwrap() {
            Advance::Submit(payload) => {
                assert_eq!(payload.name, "Jane Doe");
                assert_eq!(payload.suggestions.as_deref(), Some("Great work"));
                assert!(payload.validate().is_ok());
            }
            other => panic!("expected submission, got {:?}", other),
        }
        assert!(w.submission_in_flight());
        // Still on the suggestions step until the outcome is reported
        assert_eq!(w.step(), WizardStep::Suggestions);
    }

    #[test]
    fn advance_refused_while_submission_in_flight() {
        let mut w = wizard_at_suggestions();
        w.set_suggestions("Great work");
        w.advance().unwrap();
        assert_eq!(w.advance(), Err(WizardError::SubmissionInFlight));
    }

    #[test]
    fn successful_submission_reaches_done() {
        let mut w = wizard_at_suggestions();
        w.set_suggestions("Great work");
        w.advance().unwrap();
        w.submission_succeeded();
        assert_eq!(w.step(), WizardStep::Done);
        assert_eq!(w.advance(), Err(WizardError::Terminal));
    }

    #[test]
    fn failed_submission_keeps_draft_for_retry() {
        let mut w = wizard_at_suggestions();
        w.set_suggestions("Great work");
        w.advance().unwrap();
        w.submission_failed("server unreachable");
        assert_eq!(w.step(), WizardStep::Suggestions);
        assert!(!w.submission_in_flight());
        assert_eq!(w.errors()[0].message, "server unreachable");
        assert_eq!(w.draft().name, "Jane Doe");

        // Retry succeeds without re-entering data
        assert!(matches!(w.advance(), Ok(Advance::Submit(_))));
        w.submission_succeeded();
        assert_eq!(w.step(), WizardStep::Done);
    }

    #[test]
    fn restart_discards_everything() {
        let mut w = wizard_at_suggestions();
        w.set_suggestions("Great work");
        w.advance().unwrap();
        w.submission_succeeded();
        w.restart();
        assert_eq!(w.step(), WizardStep::Welcome);
        assert!(w.draft().name.is_empty());
        assert_eq!(w.draft().rating(RatingField::OverallExperience), None);
    }
}
