//! Evaluation review workflow: draft → submitted → approved/rejected, with
//! resubmission of rejected drafts.
//!
//! `apply` is the only place a status may change. It is pure over the
//! evaluation and the caller's role; who to notify comes back as data and
//! the store applies it. On any error the evaluation is left untouched.

use thiserror::Error;

use crate::domain::{Evaluation, EvaluationStatus, Role};
use crate::roles;

/// Workflow actions a caller can request on an evaluation.
#[derive(Clone, Debug)]
pub enum Action {
  Submit,
  Approve,
  Reject { feedback: String },
}

impl Action {
  pub fn name(&self) -> &'static str {
    match self {
      Action::Submit => "submit",
      Action::Approve => "approve",
      Action::Reject { .. } => "reject",
    }
  }
}

/// Who to tell once a transition lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notify {
  Reviewers,
  Owner,
}

#[derive(Debug, Error)]
pub enum TransitionError {
  /// The caller's role does not gate into this action at all.
  #[error("role {role} may not {action} evaluations")]
  NotPermitted { role: Role, action: &'static str },

  /// The action exists but is unreachable from the current status.
  #[error("cannot {action} an evaluation in status {from}")]
  InvalidTransition { from: EvaluationStatus, action: &'static str },

  /// Rejections must carry a reason; an empty one aborts the action.
  #[error("a rejection requires a feedback reason")]
  MissingFeedback,
}

/// Apply `action` to `eval` in place.
pub fn apply(eval: &mut Evaluation, role: Role, action: Action) -> Result<Notify, TransitionError> {
  match action {
    Action::Submit => {
      if !matches!(role, Role::Teacher) {
        return Err(TransitionError::NotPermitted { role, action: "submit" });
      }
      if !roles::can_submit(role, eval.status) {
        return Err(TransitionError::InvalidTransition { from: eval.status, action: "submit" });
      }
      // Resubmission of a rejected evaluation clears the reviewer feedback.
      eval.feedback = None;
      eval.status = EvaluationStatus::Submitted;
      eval.version += 1;
      Ok(Notify::Reviewers)
    }

    Action::Approve => {
      if !roles::can_review(role) {
        return Err(TransitionError::NotPermitted { role, action: "approve" });
      }
      if eval.status != EvaluationStatus::Submitted {
        return Err(TransitionError::InvalidTransition { from: eval.status, action: "approve" });
      }
      eval.status = EvaluationStatus::Approved;
      eval.version += 1;
      Ok(Notify::Owner)
    }

    Action::Reject { feedback } => {
      if !roles::can_review(role) {
        return Err(TransitionError::NotPermitted { role, action: "reject" });
      }
      if eval.status != EvaluationStatus::Submitted {
        return Err(TransitionError::InvalidTransition { from: eval.status, action: "reject" });
      }
      let feedback = feedback.trim();
      if feedback.is_empty() {
        return Err(TransitionError::MissingFeedback);
      }
      eval.status = EvaluationStatus::Rejected;
      eval.feedback = Some(feedback.to_string());
      eval.version += 1;
      Ok(Notify::Owner)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{EvaluationCategory, EvaluationType};
  use chrono::NaiveDate;

  fn draft() -> Evaluation {
    Evaluation {
      id: "e1".into(),
      title: "Prueba 1".into(),
      date: NaiveDate::from_ymd_opt(2025, 10, 6).expect("date"),
      course_id: "c1".into(),
      subject_id: "s1".into(),
      max_score: 7.0,
      eval_type: EvaluationType::Sumativa,
      category: EvaluationCategory::Planificada,
      status: EvaluationStatus::Draft,
      feedback: None,
      objectives: vec![],
      questions: vec![],
      owner_id: "t1".into(),
      version: 0,
    }
  }

  #[test]
  fn submit_reject_resubmit_round_trip() {
    let mut e = draft();

    let n = apply(&mut e, Role::Teacher, Action::Submit).expect("submit");
    assert_eq!(n, Notify::Reviewers);
    assert_eq!(e.status, EvaluationStatus::Submitted);

    let n = apply(&mut e, Role::Utp, Action::Reject { feedback: "Falta rúbrica".into() })
      .expect("reject");
    assert_eq!(n, Notify::Owner);
    assert_eq!(e.status, EvaluationStatus::Rejected);
    assert_eq!(e.feedback.as_deref(), Some("Falta rúbrica"));

    let n = apply(&mut e, Role::Teacher, Action::Submit).expect("resubmit");
    assert_eq!(n, Notify::Reviewers);
    assert_eq!(e.status, EvaluationStatus::Submitted);
    assert_eq!(e.feedback, None);
  }

  #[test]
  fn reject_without_feedback_does_not_transition() {
    let mut e = draft();
    apply(&mut e, Role::Teacher, Action::Submit).expect("submit");

    let err = apply(&mut e, Role::Director, Action::Reject { feedback: "   ".into() })
      .expect_err("must refuse");
    assert!(matches!(err, TransitionError::MissingFeedback));
    assert_eq!(e.status, EvaluationStatus::Submitted);
    assert_eq!(e.feedback, None);
  }

  #[test]
  fn review_is_only_reachable_from_submitted() {
    let mut e = draft();
    let err = apply(&mut e, Role::Utp, Action::Approve).expect_err("draft is not reviewable");
    assert!(matches!(err, TransitionError::InvalidTransition { .. }));
    assert_eq!(e.status, EvaluationStatus::Draft);

    let err = apply(&mut e, Role::Utp, Action::Reject { feedback: "x".into() })
      .expect_err("draft is not reviewable");
    assert!(matches!(err, TransitionError::InvalidTransition { .. }));
  }

  #[test]
  fn approved_is_terminal() {
    let mut e = draft();
    apply(&mut e, Role::Teacher, Action::Submit).expect("submit");
    apply(&mut e, Role::Director, Action::Approve).expect("approve");
    assert_eq!(e.status, EvaluationStatus::Approved);

    assert!(apply(&mut e, Role::Teacher, Action::Submit).is_err());
    assert!(apply(&mut e, Role::Director, Action::Approve).is_err());
    assert!(apply(&mut e, Role::Director, Action::Reject { feedback: "x".into() }).is_err());
    assert_eq!(e.status, EvaluationStatus::Approved);
  }

  #[test]
  fn non_reviewers_cannot_review_and_non_teachers_cannot_submit() {
    let mut e = draft();
    assert!(matches!(
      apply(&mut e, Role::Admin, Action::Submit),
      Err(TransitionError::NotPermitted { .. })
    ));

    apply(&mut e, Role::Teacher, Action::Submit).expect("submit");
    assert!(matches!(
      apply(&mut e, Role::Teacher, Action::Approve),
      Err(TransitionError::NotPermitted { .. })
    ));
    assert_eq!(e.status, EvaluationStatus::Submitted);
  }

  #[test]
  fn each_accepted_transition_bumps_the_version() {
    let mut e = draft();
    apply(&mut e, Role::Teacher, Action::Submit).expect("submit");
    assert_eq!(e.version, 1);
    apply(&mut e, Role::Utp, Action::Reject { feedback: "revisar".into() }).expect("reject");
    assert_eq!(e.version, 2);
    apply(&mut e, Role::Teacher, Action::Submit).expect("resubmit");
    assert_eq!(e.version, 3);
  }
}
