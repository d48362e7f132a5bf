//! Domain models used by the backend: evaluations and their review status,
//! bank questions, curriculum materials, the course/subject directory,
//! caller roles, and the side-effect records (notifications, audit).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review-workflow status of an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
  Draft,
  Submitted,
  Approved,
  Rejected,
}

impl fmt::Display for EvaluationStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EvaluationStatus::Draft => write!(f, "draft"),
      EvaluationStatus::Submitted => write!(f, "submitted"),
      EvaluationStatus::Approved => write!(f, "approved"),
      EvaluationStatus::Rejected => write!(f, "rejected"),
    }
  }
}

/// `Planificada` is scheduled and visible; `Sorpresa` stays out of
/// student/guardian listings entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationCategory {
  Planificada,
  Sorpresa,
}

/// Pedagogical type picked at composition time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationType {
  Formativa,
  Sumativa,
  Diagnostica,
}

/// Difficulty bucket of a bank question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Difficulty::Easy => write!(f, "easy"),
      Difficulty::Medium => write!(f, "medium"),
      Difficulty::Hard => write!(f, "hard"),
    }
  }
}

impl FromStr for Difficulty {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "easy" => Ok(Difficulty::Easy),
      "medium" => Ok(Difficulty::Medium),
      "hard" => Ok(Difficulty::Hard),
      other => Err(format!("unknown difficulty: {other}")),
    }
  }
}

/// Caller role. Authentication is external; the backend only gates actions
/// once the role is known (from the `x-role` header).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  SuperAdmin,
  Admin,
  Director,
  /// Academic coordinator ("Unidad Técnico Pedagógica").
  Utp,
  Teacher,
  Student,
  Guardian,
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Role::SuperAdmin => write!(f, "super_admin"),
      Role::Admin => write!(f, "admin"),
      Role::Director => write!(f, "director"),
      Role::Utp => write!(f, "utp"),
      Role::Teacher => write!(f, "teacher"),
      Role::Student => write!(f, "student"),
      Role::Guardian => write!(f, "guardian"),
    }
  }
}

impl FromStr for Role {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "super_admin" | "superadmin" => Ok(Role::SuperAdmin),
      "admin" => Ok(Role::Admin),
      "director" => Ok(Role::Director),
      "utp" => Ok(Role::Utp),
      "teacher" => Ok(Role::Teacher),
      "student" => Ok(Role::Student),
      "guardian" => Ok(Role::Guardian),
      other => Err(format!("unknown role: {other}")),
    }
  }
}

/// A test instrument with a review workflow, persisted in-memory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Evaluation {
  pub id: String,
  pub title: String,
  pub date: NaiveDate,
  pub course_id: String,
  pub subject_id: String,
  pub max_score: f32,
  pub eval_type: EvaluationType,
  pub category: EvaluationCategory,
  pub status: EvaluationStatus,
  /// Present only while rejected; cleared on resubmission.
  #[serde(default)]
  pub feedback: Option<String>,
  /// Advisory learning-objective strings picked at composition time.
  #[serde(default)]
  pub objectives: Vec<String>,
  /// Ordered question ids; empty is legal under default policy.
  #[serde(default)]
  pub questions: Vec<String>,
  pub owner_id: String,
  /// Optimistic-concurrency token, bumped on every accepted mutation.
  #[serde(default)]
  pub version: u64,
}

/// Question kind. Multiple choice keeps a single correct index, so two
/// correct options are unrepresentable.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
  MultipleChoice { choices: Vec<String>, correct: usize },
  TrueFalse { answer: bool },
  Open,
}

/// Reusable bank question, owned by the question store. Evaluations only
/// reference ids and never mutate bank content.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  pub text: String,
  pub difficulty: Difficulty,
  pub subject_id: String,
  /// Level label, e.g. "5° Básico".
  #[serde(default)]
  pub grade: String,
  #[serde(default)]
  pub tags: Vec<String>,
  pub kind: QuestionKind,
}

/// Planning material carrying the learning objectives offered at wizard
/// step 2. A material without a subject applies to the whole course.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurriculumMaterial {
  pub course_id: String,
  #[serde(default)]
  pub subject_id: Option<String>,
  pub title: String,
  pub objectives: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Course {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub grade: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subject {
  pub id: String,
  pub name: String,
  pub course_id: String,
}

/// Gradebook row. Only the cascade on evaluation deletion touches these;
/// aggregation lives elsewhere.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grade {
  pub id: String,
  pub evaluation_id: String,
  pub student_id: String,
  pub value: f32,
}

/// Who a notification is addressed to. Reviewers are a group recipient the
/// reviewer roles poll; the user directory is external.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recipient {
  Reviewers,
  User { id: String },
}

/// Outbox entry produced by lifecycle transitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notification {
  pub id: String,
  pub recipient: Recipient,
  pub evaluation_id: String,
  pub message: String,
  pub created_at: DateTime<Utc>,
}

/// Audit-trail entry recorded alongside every accepted store mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEntry {
  pub evaluation_id: String,
  pub action: String,
  pub actor_id: String,
  pub role: Role,
  pub status: EvaluationStatus,
  pub at: DateTime<Utc>,
}
