//! HTTP endpoint handlers. These are thin wrappers that forward to the
//! store; the caller's identity and role arrive in `x-user-id` / `x-role`
//! headers (authentication itself lives in front of this service).

use std::sync::Arc;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::{Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::domain::{Difficulty, EvaluationCategory, Role};
use crate::errors::ApiError;
use crate::lifecycle::Action;
use crate::protocol::*;
use crate::state::{AppState, EvaluationUpdate};
use crate::wizard::EvaluationDraft;

/// Parse the caller from headers. Gated endpoints refuse outright when the
/// identity headers are missing or carry an unknown role.
fn actor_from_headers(headers: &HeaderMap) -> Result<(String, Role), ApiError> {
  let user_id = headers
    .get("x-user-id")
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .ok_or_else(|| ApiError::Forbidden("missing x-user-id header".into()))?
    .to_string();
  let role = headers
    .get("x-role")
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| ApiError::Forbidden("missing x-role header".into()))?
    .parse::<Role>()
    .map_err(ApiError::Forbidden)?;
  Ok((user_id, role))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_courses(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let out: Vec<CourseOut> = state
    .list_courses()
    .await
    .into_iter()
    .map(|c| CourseOut { id: c.id, name: c.name, grade: c.grade })
    .collect();
  Json(out)
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_subjects(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let out: Vec<SubjectOut> = state
    .list_subjects()
    .await
    .into_iter()
    .map(|s| SubjectOut { id: s.id, name: s.name, course_id: s.course_id })
    .collect();
  Json(out)
}

#[instrument(level = "info", skip(state), fields(subject = q.subject_id.as_deref().unwrap_or("*")))]
pub async fn http_list_questions(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionQuery>,
) -> Result<Json<Vec<QuestionOut>>, ApiError> {
  let difficulty = match q.difficulty.as_deref() {
    Some(d) => Some(d.parse::<Difficulty>().map_err(ApiError::Validation)?),
    None => None,
  };
  let out: Vec<QuestionOut> = state
    .list_questions(q.subject_id.as_deref(), difficulty)
    .await
    .iter()
    .map(to_question_out)
    .collect();
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%subject_id))]
pub async fn http_list_materials(
  State(state): State<Arc<AppState>>,
  Path(subject_id): Path<String>,
) -> Result<Json<Vec<MaterialOut>>, ApiError> {
  let course_id = state
    .subjects
    .read()
    .await
    .get(&subject_id)
    .map(|s| s.course_id.clone())
    .ok_or_else(|| ApiError::NotFound(format!("unknown subject: {subject_id}")))?;

  let out: Vec<MaterialOut> = state
    .materials
    .read()
    .await
    .iter()
    .filter(|m| m.course_id == course_id)
    .filter(|m| m.subject_id.as_deref().map_or(true, |s| s == subject_id))
    .map(|m| MaterialOut {
      course_id: m.course_id.clone(),
      subject_id: m.subject_id.clone(),
      title: m.title.clone(),
      objectives: m.objectives.clone(),
    })
    .collect();
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, headers))]
pub async fn http_list_evaluations(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Query(q): Query<EvaluationQuery>,
) -> Result<Json<Vec<EvaluationOut>>, ApiError> {
  let (_, role) = actor_from_headers(&headers)?;
  let out: Vec<EvaluationOut> = state
    .list_evaluations(role, q.course_id.as_deref())
    .await
    .iter()
    .map(to_out)
    .collect();
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, headers), fields(%id))]
pub async fn http_get_evaluation(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Path(id): Path<String>,
) -> Result<Json<EvaluationOut>, ApiError> {
  let (_, role) = actor_from_headers(&headers)?;
  let ev = state.get_evaluation(role, &id).await?;
  Ok(Json(to_out(&ev)))
}

#[instrument(level = "info", skip(state, headers, body), fields(title = %body.title))]
pub async fn http_create_evaluation(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Json(body): Json<EvaluationCreateIn>,
) -> Result<Json<EvaluationOut>, ApiError> {
  let (actor_id, role) = actor_from_headers(&headers)?;
  let draft = EvaluationDraft {
    title: body.title,
    date: body.date.unwrap_or_else(crate::util::today),
    course_id: body.course_id,
    subject_id: body.subject_id,
    max_score: body.max_score.unwrap_or(state.policy.max_score),
    eval_type: body.eval_type,
    category: body.category.unwrap_or(EvaluationCategory::Planificada),
    objectives: body.objectives,
    questions: body.questions,
  };
  let ev = state.create_evaluation(&actor_id, role, draft).await?;
  info!(target: "evaluation", id = %ev.id, "HTTP evaluation created");
  Ok(Json(to_out(&ev)))
}

#[instrument(level = "info", skip(state, headers, body), fields(%id))]
pub async fn http_update_evaluation(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Path(id): Path<String>,
  Json(body): Json<EvaluationUpdateIn>,
) -> Result<Json<EvaluationOut>, ApiError> {
  let (actor_id, role) = actor_from_headers(&headers)?;
  let update = EvaluationUpdate {
    title: body.title,
    date: body.date,
    course_id: body.course_id,
    subject_id: body.subject_id,
    max_score: body.max_score,
    eval_type: body.eval_type,
    category: body.category,
    objectives: body.objectives,
    questions: body.questions,
    expected_version: body.expected_version,
  };
  let ev = state.edit_evaluation(&actor_id, role, &id, update).await?;
  Ok(Json(to_out(&ev)))
}

#[instrument(level = "info", skip(state, headers, body), fields(%id))]
pub async fn http_delete_evaluation(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Path(id): Path<String>,
  body: Option<Json<DeleteIn>>,
) -> Result<Json<DeleteOut>, ApiError> {
  let (actor_id, role) = actor_from_headers(&headers)?;
  let confirm = body.map(|Json(b)| b.confirm).unwrap_or(false);
  let cascaded = state.delete_evaluation(&actor_id, role, &id, confirm).await?;
  Ok(Json(DeleteOut { deleted: true, cascaded_grades: cascaded }))
}

#[instrument(level = "info", skip(state, headers), fields(%id))]
pub async fn http_submit_evaluation(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Path(id): Path<String>,
) -> Result<Json<EvaluationOut>, ApiError> {
  let (actor_id, role) = actor_from_headers(&headers)?;
  let ev = state.apply_lifecycle(&actor_id, role, &id, Action::Submit).await?;
  Ok(Json(to_out(&ev)))
}

#[instrument(level = "info", skip(state, headers, body), fields(%id))]
pub async fn http_review_evaluation(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Path(id): Path<String>,
  Json(body): Json<ReviewIn>,
) -> Result<Json<EvaluationOut>, ApiError> {
  let (actor_id, role) = actor_from_headers(&headers)?;
  let action = match body.status {
    ReviewVerdict::Approved => Action::Approve,
    ReviewVerdict::Rejected => Action::Reject { feedback: body.feedback.unwrap_or_default() },
  };
  let ev = state.apply_lifecycle(&actor_id, role, &id, action).await?;
  Ok(Json(to_out(&ev)))
}

#[instrument(level = "info", skip(state, body), fields(selected = body.question_ids.len()))]
pub async fn http_difficulty(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DifficultyIn>,
) -> impl IntoResponse {
  Json(state.difficulty_for(&body.question_ids).await)
}

#[instrument(level = "info", skip(state, headers))]
pub async fn http_list_notifications(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Query(q): Query<NotificationQuery>,
) -> Result<Json<Vec<crate::domain::Notification>>, ApiError> {
  let (_, role) = actor_from_headers(&headers)?;
  Ok(Json(state.notifications_for(&q.user_id, role).await))
}

#[instrument(level = "info", skip(state, headers), fields(%id))]
pub async fn http_evaluation_audit(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Path(id): Path<String>,
) -> Result<Json<Vec<crate::domain::AuditEntry>>, ApiError> {
  let (_, role) = actor_from_headers(&headers)?;
  Ok(Json(state.audit_for(role, &id).await?))
}
