//! The single owned state struct behind the comparison page: two upload
//! slots, the submission status, and the result-or-failure of the last
//! completed submission. All mutation goes through the methods here so the
//! "never show stale results" rule holds mechanically.

use std::sync::Arc;

use crate::error::CompareError;
use crate::protocol::ComparisonResult;
use crate::slot::{SelectedImage, SlotId, UploadSlot};

/// Lifecycle of the current submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Payload for one comparison round trip. Built only when both slots hold a
/// file; immutable once handed out.
#[derive(Debug, Clone)]
pub struct ComparisonRequest {
    pub file_a: Arc<[u8]>,
    pub name_a: String,
    pub file_b: Arc<[u8]>,
    pub name_b: String,
}

/// A submission the form has committed to. The ticket must be passed back to
/// [`CompareForm::finish_submission`] so a response that arrives after the
/// user changed a slot is dropped instead of applied to stale state.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub ticket: u64,
    pub request: ComparisonRequest,
}

/// What the results area should currently show. Pure projection of the form.
#[derive(Debug, PartialEq)]
pub enum ResultView<'a> {
    Nothing,
    Pending,
    Failure(&'a str),
    Success(&'a ComparisonResult),
}

#[derive(Debug, Default)]
pub struct CompareForm {
    slot_a: UploadSlot,
    slot_b: UploadSlot,
    status: SubmissionStatus,
    result: Option<ComparisonResult>,
    failure: Option<String>,
    ticket: u64,
}

impl CompareForm {
    pub fn slot(&self, id: SlotId) -> &UploadSlot {
        match id {
            SlotId::A => &self.slot_a,
            SlotId::B => &self.slot_b,
        }
    }

    /// Put a file into one slot. The other slot is untouched; any displayed
    /// result or error is discarded and an in-flight response invalidated.
    pub fn select(&mut self, id: SlotId, image: SelectedImage) {
        self.slot_mut(id).select(image);
        self.invalidate();
    }

    /// Empty one slot, likewise discarding displayed results.
    pub fn clear(&mut self, id: SlotId) {
        self.slot_mut(id).clear();
        self.invalidate();
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.slot_a.is_empty()
            && !self.slot_b.is_empty()
            && self.status != SubmissionStatus::InFlight
    }

    /// Validate and commit to one submission. Fails synchronously (and
    /// without any transport involvement) when a slot is empty, and rejects
    /// a second call while one submission is outstanding.
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, CompareError> {
        if self.status == SubmissionStatus::InFlight {
            return Err(CompareError::SubmissionInFlight);
        }

        let missing = if self.slot_a.is_empty() {
            Some(SlotId::A)
        } else if self.slot_b.is_empty() {
            Some(SlotId::B)
        } else {
            None
        };
        if let Some(id) = missing {
            let err = CompareError::MissingImage(id);
            self.result = None;
            self.failure = Some(err.to_string());
            self.status = SubmissionStatus::Failed;
            return Err(err);
        }

        // Re-binds what the `missing` check above already established.
        let (Some(a), Some(b)) = (self.slot_a.image(), self.slot_b.image()) else {
            return Err(CompareError::MissingImage(SlotId::A));
        };

        self.ticket += 1;
        self.status = SubmissionStatus::InFlight;
        tracing::debug!(ticket = self.ticket, "comparison submission started");
        Ok(PendingSubmission {
            ticket: self.ticket,
            request: ComparisonRequest {
                file_a: Arc::clone(&a.bytes),
                name_a: a.file_name(),
                file_b: Arc::clone(&b.bytes),
                name_b: b.file_name(),
            },
        })
    }

    /// Apply the outcome of a submission. Outcomes whose ticket no longer
    /// matches (a slot changed in the meantime) are ignored; returns whether
    /// the outcome was applied so callers can skip display updates.
    pub fn finish_submission(
        &mut self,
        ticket: u64,
        outcome: Result<ComparisonResult, CompareError>,
    ) -> bool {
        if ticket != self.ticket || self.status != SubmissionStatus::InFlight {
            tracing::debug!(ticket, current = self.ticket, "ignoring stale comparison response");
            return false;
        }
        match outcome {
            Ok(result) => {
                self.failure = None;
                self.result = Some(result);
                self.status = SubmissionStatus::Succeeded;
            }
            Err(err) => {
                self.result = None;
                self.failure = Some(err.to_string());
                self.status = SubmissionStatus::Failed;
            }
        }
        true
    }

    pub fn view(&self) -> ResultView<'_> {
        match self.status {
            SubmissionStatus::Idle => ResultView::Nothing,
            SubmissionStatus::InFlight => ResultView::Pending,
            SubmissionStatus::Succeeded => match &self.result {
                Some(result) => ResultView::Success(result),
                None => ResultView::Nothing,
            },
            SubmissionStatus::Failed => match &self.failure {
                Some(message) => ResultView::Failure(message),
                None => ResultView::Nothing,
            },
        }
    }

    fn slot_mut(&mut self, id: SlotId) -> &mut UploadSlot {
        match id {
            SlotId::A => &mut self.slot_a,
            SlotId::B => &mut self.slot_b,
        }
    }

    fn invalidate(&mut self) {
        // Any response still in flight no longer matches this ticket.
        self.ticket += 1;
        self.status = SubmissionStatus::Idle;
        self.result = None;
        self.failure = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(name: &str) -> SelectedImage {
        SelectedImage::from_bytes(name, format!("bytes of {name}").into_bytes())
    }

    fn ok_result() -> ComparisonResult {
        ComparisonResult {
            score: 0.8421,
            explanation: "Both show cats.".to_string(),
            image_a_uri: "u1".to_string(),
            image_b_uri: "u2".to_string(),
        }
    }

    #[test]
    fn selecting_one_slot_leaves_the_other_untouched() {
        let mut form = CompareForm::default();
        form.select(SlotId::A, img("a.png"));
        assert!(form.slot(SlotId::B).is_empty());

        form.select(SlotId::B, img("b.png"));
        assert_eq!(form.slot(SlotId::A).image().unwrap().file_name(), "a.png");
        assert_eq!(form.slot(SlotId::B).image().unwrap().file_name(), "b.png");
    }

    #[test]
    fn submit_with_empty_slot_fails_synchronously() {
        let mut form = CompareForm::default();
        form.select(SlotId::A, img("a.png"));

        let err = form.begin_submission().unwrap_err();
        assert!(matches!(err, CompareError::MissingImage(SlotId::B)));
        assert_eq!(form.status(), SubmissionStatus::Failed);
        match form.view() {
            ResultView::Failure(message) => assert!(message.contains("image 2")),
            other => panic!("expected failure view, got {other:?}"),
        }
    }

    #[test]
    fn submission_carries_both_files() {
        let mut form = CompareForm::default();
        form.select(SlotId::A, img("a.png"));
        form.select(SlotId::B, img("b.png"));
        assert!(form.can_submit());

        let pending = form.begin_submission().unwrap();
        assert_eq!(pending.request.name_a, "a.png");
        assert_eq!(pending.request.name_b, "b.png");
        assert_eq!(&*pending.request.file_a, b"bytes of a.png".as_slice());
        assert_eq!(form.status(), SubmissionStatus::InFlight);
        assert_eq!(form.view(), ResultView::Pending);
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected_without_effect() {
        let mut form = CompareForm::default();
        form.select(SlotId::A, img("a.png"));
        form.select(SlotId::B, img("b.png"));
        let pending = form.begin_submission().unwrap();

        let err = form.begin_submission().unwrap_err();
        assert!(matches!(err, CompareError::SubmissionInFlight));
        assert_eq!(form.status(), SubmissionStatus::InFlight);

        // The original submission still completes normally.
        assert!(form.finish_submission(pending.ticket, Ok(ok_result())));
        assert_eq!(form.status(), SubmissionStatus::Succeeded);
    }

    #[test]
    fn success_and_failure_are_mutually_exclusive() {
        let mut form = CompareForm::default();
        form.select(SlotId::A, img("a.png"));
        form.select(SlotId::B, img("b.png"));

        let pending = form.begin_submission().unwrap();
        form.finish_submission(pending.ticket, Ok(ok_result()));
        match form.view() {
            ResultView::Success(result) => {
                assert!(result.score.is_finite());
                assert_eq!(result.explanation, "Both show cats.");
            }
            other => panic!("expected success view, got {other:?}"),
        }

        let pending = form.begin_submission().unwrap();
        form.finish_submission(
            pending.ticket,
            Err(CompareError::Transport("connection refused".to_string())),
        );
        assert_eq!(form.status(), SubmissionStatus::Failed);
        match form.view() {
            ResultView::Failure(message) => assert!(message.contains("connection refused")),
            other => panic!("expected failure view, got {other:?}"),
        }
    }

    #[test]
    fn reselection_hides_a_visible_result() {
        let mut form = CompareForm::default();
        form.select(SlotId::A, img("a.png"));
        form.select(SlotId::B, img("b.png"));
        let pending = form.begin_submission().unwrap();
        form.finish_submission(pending.ticket, Ok(ok_result()));
        assert!(matches!(form.view(), ResultView::Success(_)));

        form.select(SlotId::B, img("c.png"));
        assert_eq!(form.view(), ResultView::Nothing);
        assert_eq!(form.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn late_response_after_reselection_is_dropped() {
        let mut form = CompareForm::default();
        form.select(SlotId::A, img("a.png"));
        form.select(SlotId::B, img("b.png"));
        let pending = form.begin_submission().unwrap();

        // User swaps an image while the request is still running.
        form.select(SlotId::A, img("d.png"));
        assert!(!form.finish_submission(pending.ticket, Ok(ok_result())));

        assert_eq!(form.view(), ResultView::Nothing);
        assert_eq!(form.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn clearing_a_slot_disables_submit_and_hides_results() {
        let mut form = CompareForm::default();
        form.select(SlotId::A, img("a.png"));
        form.select(SlotId::B, img("b.png"));
        let pending = form.begin_submission().unwrap();
        form.finish_submission(pending.ticket, Ok(ok_result()));

        form.clear(SlotId::A);
        assert!(!form.can_submit());
        assert_eq!(form.view(), ResultView::Nothing);
    }
}
