//! Composition wizard: three ordered steps assembling a new evaluation from
//! the question bank, with live difficulty feedback on every toggle.
//!
//! One session per open wizard instance. The owning WebSocket connection
//! holds it and handles messages serially, so finalize is single-flight by
//! construction: it is consumed on success, kept intact on failure, and
//! dropped (with everything entered) when the socket closes.

use chrono::NaiveDate;

use crate::domain::{EvaluationCategory, EvaluationType, Role};
use crate::errors::ApiError;
use crate::roles;

/// Practical cap carried over from the form layer.
pub const TITLE_MAX_CHARS: usize = 40;

/// Everything entered across the three steps. Survives back/forward
/// navigation inside one session.
#[derive(Clone, Debug)]
pub struct WizardSession {
  pub actor_id: String,
  pub role: Role,
  /// Current step, 1..=3.
  pub step: u8,
  pub title: String,
  pub course_id: String,
  pub subject_id: String,
  pub date: NaiveDate,
  pub eval_type: EvaluationType,
  pub max_score: f32,
  /// Toggled objective strings (advisory, may stay empty).
  pub objectives: Vec<String>,
  /// Ordered question ids; insertion order is the emitted order.
  pub questions: Vec<String>,
}

/// Creation payload emitted by finalize — the only network-visible effect
/// of a wizard session. Also built directly by the manual-creation route.
#[derive(Clone, Debug)]
pub struct EvaluationDraft {
  pub title: String,
  pub date: NaiveDate,
  pub course_id: String,
  pub subject_id: String,
  pub max_score: f32,
  pub eval_type: EvaluationType,
  pub category: EvaluationCategory,
  pub objectives: Vec<String>,
  pub questions: Vec<String>,
}

impl WizardSession {
  /// Open a fresh session at step 1. Refused up front for roles without
  /// manage rights; the store re-checks at creation time anyway.
  pub fn open(actor_id: &str, role: Role, today: NaiveDate, max_score: f32) -> Result<Self, ApiError> {
    if !roles::can_manage(role) {
      return Err(ApiError::Forbidden(format!("role {role} may not compose evaluations")));
    }
    Ok(Self {
      actor_id: actor_id.to_string(),
      role,
      step: 1,
      title: String::new(),
      course_id: String::new(),
      subject_id: String::new(),
      date: today,
      eval_type: EvaluationType::Formativa,
      max_score,
      objectives: Vec::new(),
      questions: Vec::new(),
    })
  }

  /// Step-1 form fields. Values are stored as given; validation runs on
  /// advance and again on finalize.
  pub fn configure(
    &mut self,
    title: Option<String>,
    course_id: Option<String>,
    subject_id: Option<String>,
    date: Option<NaiveDate>,
    eval_type: Option<EvaluationType>,
  ) {
    if let Some(t) = title {
      self.title = t;
    }
    if let Some(c) = course_id {
      // Switching course invalidates the subject picked for the old one.
      if c != self.course_id {
        self.subject_id.clear();
      }
      self.course_id = c;
    }
    if let Some(s) = subject_id {
      self.subject_id = s;
    }
    if let Some(d) = date {
      self.date = d;
    }
    if let Some(t) = eval_type {
      self.eval_type = t;
    }
  }

  fn validate_step1(&self) -> Result<(), ApiError> {
    let title = self.title.trim();
    if title.is_empty() {
      return Err(ApiError::Validation("title is required".into()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
      return Err(ApiError::Validation(format!("title is limited to {TITLE_MAX_CHARS} characters")));
    }
    if self.course_id.trim().is_empty() {
      return Err(ApiError::Validation("a course must be selected".into()));
    }
    if self.subject_id.trim().is_empty() {
      return Err(ApiError::Validation("a subject must be selected".into()));
    }
    Ok(())
  }

  /// Advance one step. 1→2 is gated on the step-1 fields; 2→3 is free
  /// (objectives are advisory). No state changes on refusal.
  pub fn next(&mut self) -> Result<u8, ApiError> {
    match self.step {
      1 => {
        self.validate_step1()?;
        self.step = 2;
      }
      2 => self.step = 3,
      _ => {}
    }
    Ok(self.step)
  }

  /// Go back one step, keeping everything entered so far.
  pub fn back(&mut self) -> u8 {
    if self.step > 1 {
      self.step -= 1;
    }
    self.step
  }

  /// Toggle an objective in or out of the advisory set.
  pub fn toggle_objective(&mut self, text: &str) {
    if let Some(pos) = self.objectives.iter().position(|o| o == text) {
      self.objectives.remove(pos);
    } else {
      self.objectives.push(text.to_string());
    }
  }

  /// Order-preserving, deduplicating question toggle: first selected comes
  /// first in the emitted sequence, and toggling twice is a no-op.
  pub fn toggle_question(&mut self, id: &str) {
    if let Some(pos) = self.questions.iter().position(|q| q == id) {
      self.questions.remove(pos);
    } else {
      self.questions.push(id.to_string());
    }
  }

  /// Re-validate everything and emit the creation payload. The session
  /// itself is untouched; the caller consumes it only once the creation
  /// succeeded, so a failed finalize loses nothing.
  pub fn finalize(&self, min_questions: usize) -> Result<EvaluationDraft, ApiError> {
    self.validate_step1()?;
    if self.questions.len() < min_questions {
      return Err(ApiError::Validation(format!(
        "at least {min_questions} question(s) must be selected"
      )));
    }
    Ok(EvaluationDraft {
      title: self.title.trim().to_string(),
      date: self.date,
      course_id: self.course_id.clone(),
      subject_id: self.subject_id.clone(),
      max_score: self.max_score,
      eval_type: self.eval_type,
      category: EvaluationCategory::Planificada,
      objectives: self.objectives.clone(),
      questions: self.questions.clone(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 6).expect("date")
  }

  fn open_session() -> WizardSession {
    WizardSession::open("t1", Role::Teacher, today(), 7.0).expect("teacher may open")
  }

  #[test]
  fn students_cannot_open_a_session() {
    assert!(WizardSession::open("st1", Role::Student, today(), 7.0).is_err());
    assert!(WizardSession::open("g1", Role::Guardian, today(), 7.0).is_err());
    assert!(WizardSession::open("d1", Role::Director, today(), 7.0).is_err());
  }

  #[test]
  fn step_one_gates_on_required_fields() {
    let mut s = open_session();
    assert!(s.next().is_err());
    assert_eq!(s.step, 1);

    s.configure(Some("Prueba 1".into()), None, None, None, None);
    assert!(s.next().is_err(), "course still missing");

    s.configure(None, Some("c1".into()), Some("s1".into()), None, None);
    assert_eq!(s.next().expect("complete step 1"), 2);
  }

  #[test]
  fn overlong_titles_are_refused() {
    let mut s = open_session();
    s.configure(Some("x".repeat(41)), Some("c1".into()), Some("s1".into()), None, None);
    assert!(s.next().is_err());
    s.configure(Some("x".repeat(40)), None, None, None, None);
    assert!(s.next().is_ok());
  }

  #[test]
  fn step_two_always_advances_and_back_preserves_data() {
    let mut s = open_session();
    s.configure(Some("Prueba 1".into()), Some("c1".into()), Some("s1".into()), None, None);
    s.next().expect("to step 2");
    // no objectives selected at all
    assert_eq!(s.next().expect("to step 3"), 3);

    s.toggle_question("q1");
    assert_eq!(s.back(), 2);
    assert_eq!(s.back(), 1);
    assert_eq!(s.back(), 1, "step 1 is the floor");
    assert_eq!(s.title, "Prueba 1");
    assert_eq!(s.questions, vec!["q1".to_string()]);
  }

  #[test]
  fn question_toggle_is_idempotent_and_order_preserving() {
    let mut s = open_session();
    s.toggle_question("q2");
    s.toggle_question("q1");
    s.toggle_question("q3");
    assert_eq!(s.questions, vec!["q2", "q1", "q3"]);

    s.toggle_question("q1");
    assert_eq!(s.questions, vec!["q2", "q3"]);
    s.toggle_question("q1");
    assert_eq!(s.questions, vec!["q2", "q3", "q1"]);
  }

  #[test]
  fn switching_course_clears_the_subject() {
    let mut s = open_session();
    s.configure(Some("Prueba".into()), Some("c1".into()), Some("s1".into()), None, None);
    s.configure(None, Some("c2".into()), None, None, None);
    assert_eq!(s.subject_id, "");
    assert!(s.next().is_err());
  }

  #[test]
  fn finalize_with_zero_questions_is_a_valid_payload_by_default() {
    let mut s = open_session();
    s.configure(Some("Prueba 1".into()), Some("c1".into()), Some("s1".into()), None, None);
    let draft = s.finalize(0).expect("empty selection allowed");
    assert!(draft.questions.is_empty());
    assert_eq!(draft.category, EvaluationCategory::Planificada);
    assert_eq!(draft.max_score, 7.0);
  }

  #[test]
  fn finalize_honors_the_minimum_question_policy() {
    let mut s = open_session();
    s.configure(Some("Prueba 1".into()), Some("c1".into()), Some("s1".into()), None, None);
    assert!(s.finalize(1).is_err());
    s.toggle_question("q1");
    assert!(s.finalize(1).is_ok());
  }
}
