//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Evaluation, EvaluationCategory, EvaluationStatus, EvaluationType, Question, QuestionKind,
};
use crate::scoring::DifficultyReport;
use crate::wizard::WizardSession;

/// Messages the client can send over WebSocket. The wizard lives here: one
/// composition session per connection.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    OpenWizard {
        #[serde(rename = "userId")]
        user_id: String,
        role: String,
    },
    Configure {
        #[serde(default)]
        title: Option<String>,
        #[serde(default, rename = "courseId")]
        course_id: Option<String>,
        #[serde(default, rename = "subjectId")]
        subject_id: Option<String>,
        #[serde(default)]
        date: Option<NaiveDate>,
        #[serde(default, rename = "evalType")]
        eval_type: Option<EvaluationType>,
    },
    NextStep,
    PrevStep,
    ToggleObjective {
        text: String,
    },
    ToggleQuestion {
        #[serde(rename = "questionId")]
        question_id: String,
    },
    Finalize,
    CancelWizard,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Wizard {
        wizard: WizardOut,
    },
    Created {
        evaluation: EvaluationOut,
    },
    Closed,
    Error {
        message: String,
    },
}

/// Wizard snapshot sent after every mutation: current draft + live
/// difficulty + the objective list offered at step 2.
#[derive(Debug, Serialize)]
pub struct WizardOut {
    pub step: u8,
    pub title: String,
    #[serde(rename = "courseId")]
    pub course_id: String,
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    pub date: NaiveDate,
    #[serde(rename = "evalType")]
    pub eval_type: EvaluationType,
    #[serde(rename = "maxScore")]
    pub max_score: f32,
    pub objectives: Vec<String>,
    pub questions: Vec<String>,
    #[serde(rename = "availableObjectives")]
    pub available_objectives: Vec<String>,
    pub difficulty: DifficultyReport,
}

pub fn to_wizard_out(
    s: &WizardSession,
    available_objectives: Vec<String>,
    difficulty: DifficultyReport,
) -> WizardOut {
    WizardOut {
        step: s.step,
        title: s.title.clone(),
        course_id: s.course_id.clone(),
        subject_id: s.subject_id.clone(),
        date: s.date,
        eval_type: s.eval_type,
        max_score: s.max_score,
        objectives: s.objectives.clone(),
        questions: s.questions.clone(),
        available_objectives,
        difficulty,
    }
}

/// DTO used by both WS and HTTP for evaluation delivery.
#[derive(Debug, Serialize)]
pub struct EvaluationOut {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "courseId")]
    pub course_id: String,
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    #[serde(rename = "maxScore")]
    pub max_score: f32,
    #[serde(rename = "evalType")]
    pub eval_type: EvaluationType,
    pub category: EvaluationCategory,
    pub status: EvaluationStatus,
    pub feedback: Option<String>,
    pub objectives: Vec<String>,
    pub questions: Vec<String>,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    pub version: u64,
}

/// Convert full `Evaluation` (internal) to the public DTO.
pub fn to_out(e: &Evaluation) -> EvaluationOut {
    EvaluationOut {
        id: e.id.clone(),
        title: e.title.clone(),
        date: e.date,
        course_id: e.course_id.clone(),
        subject_id: e.subject_id.clone(),
        max_score: e.max_score,
        eval_type: e.eval_type,
        category: e.category,
        status: e.status,
        feedback: e.feedback.clone(),
        objectives: e.objectives.clone(),
        questions: e.questions.clone(),
        owner_id: e.owner_id.clone(),
        version: e.version,
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: String,
    pub text: String,
    pub difficulty: crate::domain::Difficulty,
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    pub grade: String,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

pub fn to_question_out(q: &Question) -> QuestionOut {
    QuestionOut {
        id: q.id.clone(),
        text: q.text.clone(),
        difficulty: q.difficulty,
        subject_id: q.subject_id.clone(),
        grade: q.grade.clone(),
        tags: q.tags.clone(),
        kind: q.kind.clone(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Serialize)]
pub struct CourseOut {
    pub id: String,
    pub name: String,
    pub grade: String,
}

#[derive(Debug, Serialize)]
pub struct SubjectOut {
    pub id: String,
    pub name: String,
    #[serde(rename = "courseId")]
    pub course_id: String,
}

#[derive(Debug, Serialize)]
pub struct MaterialOut {
    #[serde(rename = "courseId")]
    pub course_id: String,
    #[serde(rename = "subjectId")]
    pub subject_id: Option<String>,
    pub title: String,
    pub objectives: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    #[serde(rename = "subjectId")]
    pub subject_id: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluationQuery {
    #[serde(rename = "courseId")]
    pub course_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluationCreateIn {
    pub title: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "courseId")]
    pub course_id: String,
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    #[serde(default, rename = "maxScore")]
    pub max_score: Option<f32>,
    #[serde(rename = "evalType")]
    pub eval_type: EvaluationType,
    #[serde(default)]
    pub category: Option<EvaluationCategory>,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluationUpdateIn {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, rename = "courseId")]
    pub course_id: Option<String>,
    #[serde(default, rename = "subjectId")]
    pub subject_id: Option<String>,
    #[serde(default, rename = "maxScore")]
    pub max_score: Option<f32>,
    #[serde(default, rename = "evalType")]
    pub eval_type: Option<EvaluationType>,
    #[serde(default)]
    pub category: Option<EvaluationCategory>,
    #[serde(default)]
    pub objectives: Option<Vec<String>>,
    #[serde(default)]
    pub questions: Option<Vec<String>>,
    #[serde(default, rename = "expectedVersion")]
    pub expected_version: Option<u64>,
}

/// Review verdict body: `{status: approved|rejected, feedback?}`.
#[derive(Debug, Deserialize)]
pub struct ReviewIn {
    pub status: ReviewVerdict,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerdict {
    Approved,
    Rejected,
}

/// Destructive-action confirmation for DELETE.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteIn {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteOut {
    pub deleted: bool,
    #[serde(rename = "cascadedGrades")]
    pub cascaded_grades: usize,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyIn {
    #[serde(rename = "questionIds")]
    pub question_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
