//! Application state: in-memory stores and the operations behind the API.
//!
//! This module owns:
//!   - the evaluation store and its lifecycle/side-effect application
//!   - the question bank and course/subject directory
//!   - curriculum materials (objective source for the wizard)
//!   - the gradebook rows touched by cascade deletion
//!   - the notification outbox and audit trail
//!
//! Role gates are re-checked here at the point of action even though the
//! surface already checked them; a refused operation mutates nothing.

use std::{collections::HashMap, sync::Arc};
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_bank_config_from_env, BankConfig, Policy};
use crate::domain::{
    AuditEntry, Course, CurriculumMaterial, Evaluation, EvaluationCategory, EvaluationStatus,
    EvaluationType, Grade, Notification, Question, Recipient, Role, Subject,
};
use crate::errors::ApiError;
use crate::lifecycle::{self, Action, Notify};
use crate::roles;
use crate::scoring::{difficulty_report, DifficultyReport};
use crate::wizard::{EvaluationDraft, TITLE_MAX_CHARS};

/// Field changes accepted by the edit operation. `None` leaves a field as
/// is; `expected_version` (when given) must match the stored version.
#[derive(Clone, Debug, Default)]
pub struct EvaluationUpdate {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub course_id: Option<String>,
    pub subject_id: Option<String>,
    pub max_score: Option<f32>,
    pub eval_type: Option<EvaluationType>,
    pub category: Option<EvaluationCategory>,
    pub objectives: Option<Vec<String>>,
    pub questions: Option<Vec<String>>,
    pub expected_version: Option<u64>,
}

#[derive(Clone)]
pub struct AppState {
    pub policy: Policy,
    pub evaluations: Arc<RwLock<HashMap<String, Evaluation>>>,
    pub questions: Arc<RwLock<HashMap<String, Question>>>,
    pub courses: Arc<RwLock<HashMap<String, Course>>>,
    pub subjects: Arc<RwLock<HashMap<String, Subject>>>,
    pub materials: Arc<RwLock<Vec<CurriculumMaterial>>>,
    pub grades: Arc<RwLock<HashMap<String, Grade>>>,
    pub notifications: Arc<RwLock<Vec<Notification>>>,
    pub audit: Arc<RwLock<Vec<AuditEntry>>>,
}

impl AppState {
    /// Build state from env: load TOML config if present, merge built-in
    /// seeds, build indices.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        Self::from_config(load_bank_config_from_env())
    }

    pub fn from_config(cfg: Option<BankConfig>) -> Self {
        let cfg = cfg.unwrap_or_default();
        let policy = cfg.policy.clone();

        let mut courses = HashMap::<String, Course>::new();
        for cc in &cfg.courses {
            let id = cc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
            courses.insert(id.clone(), Course { id, name: cc.name.clone(), grade: cc.grade.clone() });
        }
        for c in crate::seeds::seed_courses() {
            courses.entry(c.id.clone()).or_insert(c);
        }

        let mut subjects = HashMap::<String, Subject>::new();
        for sc in &cfg.subjects {
            let id = sc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
            let course_id = sc.course.clone().into_id();
            subjects.insert(id.clone(), Subject { id, name: sc.name.clone(), course_id });
        }
        for s in crate::seeds::seed_subjects() {
            subjects.entry(s.id.clone()).or_insert(s);
        }

        let mut questions = HashMap::<String, Question>::new();
        for qc in &cfg.questions {
            let id = qc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
            // Bank entries that break the single-answer convention are
            // skipped, not patched up.
            let kind = match qc.to_kind() {
                Ok(kind) => kind,
                Err(e) => {
                    error!(target: "evaluation", %id, error = %e, "Skipping bank question");
                    continue;
                }
            };
            questions.insert(
                id.clone(),
                Question {
                    id,
                    text: qc.text.clone(),
                    difficulty: qc.difficulty,
                    subject_id: qc.subject.clone(),
                    grade: qc.grade.clone(),
                    tags: qc.tags.clone(),
                    kind,
                },
            );
        }
        for q in crate::seeds::seed_questions() {
            questions.entry(q.id.clone()).or_insert(q);
        }

        let mut materials: Vec<CurriculumMaterial> = cfg
            .materials
            .iter()
            .map(|mc| CurriculumMaterial {
                course_id: mc.course.clone().into_id(),
                subject_id: mc.subject.clone(),
                title: mc.title.clone(),
                objectives: mc.objectives.clone(),
            })
            .collect();
        materials.extend(crate::seeds::seed_materials());

        // Inventory summary by subject/difficulty.
        let mut count_by_subject: HashMap<String, (usize, usize, usize)> = HashMap::new();
        for q in questions.values() {
            let entry = count_by_subject.entry(q.subject_id.clone()).or_insert((0, 0, 0));
            match q.difficulty {
                crate::domain::Difficulty::Easy => entry.0 += 1,
                crate::domain::Difficulty::Medium => entry.1 += 1,
                crate::domain::Difficulty::Hard => entry.2 += 1,
            }
        }
        for (subject, (easy, medium, hard)) in count_by_subject {
            info!(target: "evaluation", %subject, easy, medium, hard, "Startup question inventory");
        }

        Self {
            policy,
            evaluations: Arc::new(RwLock::new(HashMap::new())),
            questions: Arc::new(RwLock::new(questions)),
            courses: Arc::new(RwLock::new(courses)),
            subjects: Arc::new(RwLock::new(subjects)),
            materials: Arc::new(RwLock::new(materials)),
            grades: Arc::new(RwLock::new(HashMap::new())),
            notifications: Arc::new(RwLock::new(Vec::new())),
            audit: Arc::new(RwLock::new(Vec::new())),
        }
    }

    // -------- directory & bank reads --------

    pub async fn list_courses(&self) -> Vec<Course> {
        let mut out: Vec<Course> = self.courses.read().await.values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    pub async fn list_subjects(&self) -> Vec<Subject> {
        let mut out: Vec<Subject> = self.subjects.read().await.values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Bank query with optional subject/difficulty filters.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_questions(
        &self,
        subject_id: Option<&str>,
        difficulty: Option<crate::domain::Difficulty>,
    ) -> Vec<Question> {
        let mut out: Vec<Question> = self
            .questions
            .read()
            .await
            .values()
            .filter(|q| subject_id.map_or(true, |s| q.subject_id == s))
            .filter(|q| difficulty.map_or(true, |d| q.difficulty == d))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Flattened objective list for a course/subject pair: materials bound
    /// to that subject plus course-wide materials, in material order.
    #[instrument(level = "debug", skip(self))]
    pub async fn objectives_for(&self, course_id: &str, subject_id: &str) -> Vec<String> {
        self.materials
            .read()
            .await
            .iter()
            .filter(|m| m.course_id == course_id)
            .filter(|m| m.subject_id.as_deref().map_or(true, |s| s == subject_id))
            .flat_map(|m| m.objectives.iter().cloned())
            .collect()
    }

    /// Live difficulty of a selection, looked up against the loaded bank.
    /// Unknown ids simply do not count.
    pub async fn difficulty_for(&self, question_ids: &[String]) -> DifficultyReport {
        let bank = self.questions.read().await;
        let difficulties: Vec<crate::domain::Difficulty> = question_ids
            .iter()
            .filter_map(|id| bank.get(id).map(|q| q.difficulty))
            .collect();
        difficulty_report(difficulties.iter())
    }

    // -------- evaluation store --------

    async fn validate_draft_fields(
        &self,
        title: &str,
        course_id: &str,
        subject_id: &str,
        max_score: f32,
    ) -> Result<(), ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("title is required".into()));
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(ApiError::Validation(format!(
                "title is limited to {TITLE_MAX_CHARS} characters"
            )));
        }
        if (max_score - self.policy.max_score).abs() > 0.001 {
            return Err(ApiError::Validation(format!(
                "maxScore is fixed at {} by current policy",
                self.policy.max_score
            )));
        }
        if !self.courses.read().await.contains_key(course_id) {
            return Err(ApiError::Validation(format!("unknown course: {course_id}")));
        }
        // Subject is resolved at save time and must belong to the course.
        match self.subjects.read().await.get(subject_id) {
            None => Err(ApiError::Validation(format!("unknown subject: {subject_id}"))),
            Some(s) if s.course_id != course_id => Err(ApiError::Validation(format!(
                "subject {subject_id} does not belong to course {course_id}"
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Create a new evaluation in `draft`. Used by wizard finalize and by
    /// the manual-creation route; this is the only place drafts are born.
    #[instrument(level = "info", skip(self, draft), fields(%actor_id, %role, title = %draft.title))]
    pub async fn create_evaluation(
        &self,
        actor_id: &str,
        role: Role,
        draft: EvaluationDraft,
    ) -> Result<Evaluation, ApiError> {
        if !roles::can_manage(role) {
            return Err(ApiError::Forbidden(format!("role {role} may not create evaluations")));
        }
        self.validate_draft_fields(&draft.title, &draft.course_id, &draft.subject_id, draft.max_score)
            .await?;
        if draft.questions.len() < self.policy.min_questions {
            return Err(ApiError::Validation(format!(
                "at least {} question(s) must be selected",
                self.policy.min_questions
            )));
        }

        let ev = Evaluation {
            id: Uuid::new_v4().to_string(),
            title: draft.title.trim().to_string(),
            date: draft.date,
            course_id: draft.course_id,
            subject_id: draft.subject_id,
            max_score: draft.max_score,
            eval_type: draft.eval_type,
            category: draft.category,
            status: EvaluationStatus::Draft,
            feedback: None,
            objectives: draft.objectives,
            questions: draft.questions,
            owner_id: actor_id.to_string(),
            version: 0,
        };
        self.evaluations.write().await.insert(ev.id.clone(), ev.clone());
        self.record_audit(&ev, "create", actor_id, role).await;
        info!(target: "evaluation", id = %ev.id, questions = ev.questions.len(), "Evaluation created as draft");
        Ok(ev)
    }

    /// Edit fields of a draft/rejected evaluation. Owner teacher or admin
    /// roles only; an `expected_version` mismatch is a conflict.
    #[instrument(level = "info", skip(self, update), fields(%actor_id, %role, %id))]
    pub async fn edit_evaluation(
        &self,
        actor_id: &str,
        role: Role,
        id: &str,
        update: EvaluationUpdate,
    ) -> Result<Evaluation, ApiError> {
        let mut store = self.evaluations.write().await;
        let current = store
            .get(id)
            .ok_or_else(|| ApiError::NotFound(format!("unknown evaluation: {id}")))?;

        if !matches!(current.status, EvaluationStatus::Draft | EvaluationStatus::Rejected) {
            return Err(ApiError::Validation(format!(
                "only draft or rejected evaluations can be edited (status: {})",
                current.status
            )));
        }
        if !roles::can_edit(role, actor_id, &current.owner_id) {
            return Err(ApiError::Forbidden(format!("role {role} may not edit this evaluation")));
        }
        if let Some(expected) = update.expected_version {
            if expected != current.version {
                return Err(ApiError::Conflict(format!(
                    "version mismatch: expected {expected}, found {}",
                    current.version
                )));
            }
        }

        // Validate the post-edit shape before committing anything.
        let mut next = current.clone();
        if let Some(t) = update.title {
            next.title = t;
        }
        if let Some(d) = update.date {
            next.date = d;
        }
        if let Some(c) = update.course_id {
            next.course_id = c;
        }
        if let Some(s) = update.subject_id {
            next.subject_id = s;
        }
        if let Some(m) = update.max_score {
            next.max_score = m;
        }
        if let Some(t) = update.eval_type {
            next.eval_type = t;
        }
        if let Some(c) = update.category {
            next.category = c;
        }
        if let Some(o) = update.objectives {
            next.objectives = o;
        }
        if let Some(q) = update.questions {
            next.questions = q;
        }
        self.validate_draft_fields(&next.title, &next.course_id, &next.subject_id, next.max_score)
            .await?;
        next.title = next.title.trim().to_string();
        next.version += 1;

        store.insert(id.to_string(), next.clone());
        drop(store);
        self.record_audit(&next, "edit", actor_id, role).await;
        info!(target: "evaluation", %id, version = next.version, "Evaluation edited");
        Ok(next)
    }

    /// Delete an evaluation after explicit confirmation, cascading its
    /// gradebook rows. Returns the number of grades removed.
    #[instrument(level = "info", skip(self), fields(%actor_id, %role, %id))]
    pub async fn delete_evaluation(
        &self,
        actor_id: &str,
        role: Role,
        id: &str,
        confirm: bool,
    ) -> Result<usize, ApiError> {
        if !confirm {
            return Err(ApiError::Validation("deletion requires explicit confirmation".into()));
        }
        if !roles::can_manage(role) {
            return Err(ApiError::Forbidden(format!("role {role} may not delete evaluations")));
        }
        let removed = self
            .evaluations
            .write()
            .await
            .remove(id)
            .ok_or_else(|| ApiError::NotFound(format!("unknown evaluation: {id}")))?;

        let mut grades = self.grades.write().await;
        let before = grades.len();
        grades.retain(|_, g| g.evaluation_id != id);
        let cascaded = before - grades.len();
        drop(grades);

        self.record_audit(&removed, "delete", actor_id, role).await;
        warn!(target: "evaluation", %id, cascaded_grades = cascaded, "Evaluation deleted");
        Ok(cascaded)
    }

    /// Role-filtered listing, optionally narrowed to one course.
    #[instrument(level = "debug", skip(self), fields(%role))]
    pub async fn list_evaluations(&self, role: Role, course_id: Option<&str>) -> Vec<Evaluation> {
        let mut out: Vec<Evaluation> = self
            .evaluations
            .read()
            .await
            .values()
            .filter(|e| course_id.map_or(true, |c| e.course_id == c))
            .filter(|e| roles::can_view(role, e.category))
            .cloned()
            .collect();
        out.sort_by(|a, b| (a.date, a.id.clone()).cmp(&(b.date, b.id.clone())));
        out
    }

    /// Single lookup under the same visibility rule as listings. A hidden
    /// evaluation is indistinguishable from a missing one.
    pub async fn get_evaluation(&self, role: Role, id: &str) -> Result<Evaluation, ApiError> {
        let store = self.evaluations.read().await;
        match store.get(id) {
            Some(e) if roles::can_view(role, e.category) => Ok(e.clone()),
            _ => Err(ApiError::NotFound(format!("unknown evaluation: {id}"))),
        }
    }

    /// Drive the review workflow and apply its side effects: notification
    /// outbox, audit trail, and a log line per transition.
    #[instrument(level = "info", skip(self, action), fields(%actor_id, %role, %id, action = action.name()))]
    pub async fn apply_lifecycle(
        &self,
        actor_id: &str,
        role: Role,
        id: &str,
        action: Action,
    ) -> Result<Evaluation, ApiError> {
        let action_name = action.name();
        let mut store = self.evaluations.write().await;
        let ev = store
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(format!("unknown evaluation: {id}")))?;

        let notify = lifecycle::apply(ev, role, action)?;
        let ev = ev.clone();
        drop(store);

        let (recipient, message) = match notify {
            Notify::Reviewers => (
                Recipient::Reviewers,
                format!("Evaluación «{}» enviada a revisión", ev.title),
            ),
            Notify::Owner => {
                let message = match ev.status {
                    EvaluationStatus::Approved => {
                        format!("Tu evaluación «{}» fue aprobada", ev.title)
                    }
                    _ => format!(
                        "Tu evaluación «{}» fue rechazada: {}",
                        ev.title,
                        ev.feedback.as_deref().unwrap_or_default()
                    ),
                };
                (Recipient::User { id: ev.owner_id.clone() }, message)
            }
        };
        self.notifications.write().await.push(Notification {
            id: Uuid::new_v4().to_string(),
            recipient,
            evaluation_id: ev.id.clone(),
            message,
            created_at: Utc::now(),
        });
        self.record_audit(&ev, action_name, actor_id, role).await;
        info!(target: "evaluation", %id, status = %ev.status, action = action_name, "Lifecycle transition applied");
        Ok(ev)
    }

    /// Outbox entries visible to a caller: their own, plus group-addressed
    /// reviewer entries when the caller holds a reviewer role.
    pub async fn notifications_for(&self, user_id: &str, role: Role) -> Vec<Notification> {
        self.notifications
            .read()
            .await
            .iter()
            .filter(|n| match &n.recipient {
                Recipient::Reviewers => roles::can_review(role),
                Recipient::User { id } => id == user_id,
            })
            .cloned()
            .collect()
    }

    /// Audit trail for one evaluation; staff only.
    pub async fn audit_for(&self, role: Role, id: &str) -> Result<Vec<AuditEntry>, ApiError> {
        if !roles::is_staff(role) {
            return Err(ApiError::Forbidden(format!("role {role} may not read audit trails")));
        }
        Ok(self
            .audit
            .read()
            .await
            .iter()
            .filter(|a| a.evaluation_id == id)
            .cloned()
            .collect())
    }

    /// Insert a gradebook row (used by the cascade-deletion path's tests;
    /// grade capture itself lives in another service).
    #[allow(dead_code)]
    pub async fn insert_grade(&self, g: Grade) {
        self.grades.write().await.insert(g.id.clone(), g);
    }

    async fn record_audit(&self, ev: &Evaluation, action: &str, actor_id: &str, role: Role) {
        self.audit.write().await.push(AuditEntry {
            evaluation_id: ev.id.clone(),
            action: action.to_string(),
            actor_id: actor_id.to_string(),
            role,
            status: ev.status,
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Difficulty;
    use crate::scoring::DifficultyBand;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 6).expect("date")
    }

    fn draft(title: &str, category: EvaluationCategory, questions: Vec<String>) -> EvaluationDraft {
        EvaluationDraft {
            title: title.into(),
            date: date(),
            course_id: "c-5a".into(),
            subject_id: "s-mat5".into(),
            max_score: 7.0,
            eval_type: EvaluationType::Sumativa,
            category,
            objectives: vec![],
            questions,
        }
    }

    #[tokio::test]
    async fn create_validates_subject_course_and_scale() {
        let state = AppState::from_config(None);

        let mut wrong_subject = draft("Prueba", EvaluationCategory::Planificada, vec![]);
        wrong_subject.subject_id = "s-cie6".into(); // belongs to c-6a
        assert!(state.create_evaluation("t1", Role::Teacher, wrong_subject).await.is_err());

        let mut wrong_scale = draft("Prueba", EvaluationCategory::Planificada, vec![]);
        wrong_scale.max_score = 10.0;
        assert!(state.create_evaluation("t1", Role::Teacher, wrong_scale).await.is_err());

        let ok = draft("Prueba", EvaluationCategory::Planificada, vec![]);
        let ev = state.create_evaluation("t1", Role::Teacher, ok).await.expect("valid draft");
        assert_eq!(ev.status, EvaluationStatus::Draft);
        assert_eq!(ev.owner_id, "t1");

        let denied = draft("Prueba", EvaluationCategory::Planificada, vec![]);
        assert!(state.create_evaluation("st1", Role::Student, denied).await.is_err());
    }

    #[tokio::test]
    async fn student_listings_exclude_sorpresa_regardless_of_date() {
        let state = AppState::from_config(None);
        state
            .create_evaluation("t1", Role::Teacher, draft("Planificada", EvaluationCategory::Planificada, vec![]))
            .await
            .expect("create");
        let mut past = draft("Sorpresa pasada", EvaluationCategory::Sorpresa, vec![]);
        past.date = NaiveDate::from_ymd_opt(2020, 3, 1).expect("date");
        state.create_evaluation("t1", Role::Teacher, past).await.expect("create");

        let staff = state.list_evaluations(Role::Teacher, None).await;
        assert_eq!(staff.len(), 2);

        let student = state.list_evaluations(Role::Student, None).await;
        assert_eq!(student.len(), 1);
        assert_eq!(student[0].title, "Planificada");

        let guardian = state.list_evaluations(Role::Guardian, None).await;
        assert_eq!(guardian.len(), 1);
    }

    #[tokio::test]
    async fn lifecycle_records_notifications_and_audit() {
        let state = AppState::from_config(None);
        let ev = state
            .create_evaluation("t1", Role::Teacher, draft("Prueba 1", EvaluationCategory::Planificada, vec![]))
            .await
            .expect("create");

        state.apply_lifecycle("t1", Role::Teacher, &ev.id, Action::Submit).await.expect("submit");
        let rejected = state
            .apply_lifecycle("u1", Role::Utp, &ev.id, Action::Reject { feedback: "Falta rúbrica".into() })
            .await
            .expect("reject");
        assert_eq!(rejected.status, EvaluationStatus::Rejected);
        assert_eq!(rejected.feedback.as_deref(), Some("Falta rúbrica"));

        let resubmitted = state
            .apply_lifecycle("t1", Role::Teacher, &ev.id, Action::Submit)
            .await
            .expect("resubmit");
        assert_eq!(resubmitted.status, EvaluationStatus::Submitted);
        assert_eq!(resubmitted.feedback, None);

        // Reviewer sees the two group-addressed submit entries; the
        // rejection is addressed to the owner alone.
        let reviewer_inbox = state.notifications_for("u1", Role::Utp).await;
        assert_eq!(reviewer_inbox.len(), 2);
        let owner_inbox = state.notifications_for("t1", Role::Teacher).await;
        assert_eq!(owner_inbox.len(), 1);
        assert!(owner_inbox[0].message.contains("Falta rúbrica"));

        let trail = state.audit_for(Role::Utp, &ev.id).await.expect("staff trail");
        let actions: Vec<&str> = trail.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, vec!["create", "submit", "reject", "submit"]);
        assert!(state.audit_for(Role::Student, &ev.id).await.is_err());
    }

    #[tokio::test]
    async fn edit_is_gated_and_detects_stale_versions() {
        let state = AppState::from_config(None);
        let ev = state
            .create_evaluation("t1", Role::Teacher, draft("Prueba", EvaluationCategory::Planificada, vec![]))
            .await
            .expect("create");

        // Another teacher may not edit someone else's draft.
        let upd = EvaluationUpdate { title: Some("Robada".into()), ..Default::default() };
        assert!(state.edit_evaluation("t2", Role::Teacher, &ev.id, upd).await.is_err());

        let upd = EvaluationUpdate {
            title: Some("Prueba corregida".into()),
            expected_version: Some(0),
            ..Default::default()
        };
        let edited = state.edit_evaluation("t1", Role::Teacher, &ev.id, upd).await.expect("edit");
        assert_eq!(edited.title, "Prueba corregida");
        assert_eq!(edited.version, 1);

        // Stale token: still expecting version 0.
        let stale = EvaluationUpdate {
            title: Some("Otra vez".into()),
            expected_version: Some(0),
            ..Default::default()
        };
        let err = state.edit_evaluation("t1", Role::Teacher, &ev.id, stale).await.expect_err("conflict");
        assert!(matches!(err, ApiError::Conflict(_)));

        // Submitted evaluations are not editable.
        state.apply_lifecycle("t1", Role::Teacher, &ev.id, Action::Submit).await.expect("submit");
        let upd = EvaluationUpdate { title: Some("Tarde".into()), ..Default::default() };
        assert!(state.edit_evaluation("t1", Role::Teacher, &ev.id, upd).await.is_err());
    }

    #[tokio::test]
    async fn delete_requires_confirmation_and_cascades_grades() {
        let state = AppState::from_config(None);
        let ev = state
            .create_evaluation("t1", Role::Teacher, draft("Prueba", EvaluationCategory::Planificada, vec![]))
            .await
            .expect("create");
        state
            .insert_grade(Grade { id: "g1".into(), evaluation_id: ev.id.clone(), student_id: "st1".into(), value: 6.2 })
            .await;
        state
            .insert_grade(Grade { id: "g2".into(), evaluation_id: "other".into(), student_id: "st1".into(), value: 4.0 })
            .await;

        assert!(state.delete_evaluation("t1", Role::Teacher, &ev.id, false).await.is_err());
        let cascaded = state.delete_evaluation("t1", Role::Teacher, &ev.id, true).await.expect("delete");
        assert_eq!(cascaded, 1);
        assert_eq!(state.grades.read().await.len(), 1);
        assert!(state.get_evaluation(Role::Teacher, &ev.id).await.is_err());
    }

    #[tokio::test]
    async fn difficulty_lookup_skips_unknown_ids() {
        let state = AppState::from_config(None);
        // q-mat-001/q-mat-004 easy, q-mat-003 hard (seeds), one unknown id.
        let report = state
            .difficulty_for(&[
                "q-mat-001".into(),
                "q-mat-004".into(),
                "q-mat-003".into(),
                "missing".into(),
            ])
            .await;
        assert_eq!((report.easy, report.medium, report.hard), (2, 0, 1));
        assert_eq!(report.band, DifficultyBand::Intermedia);
    }

    #[tokio::test]
    async fn objectives_include_course_wide_materials() {
        let state = AppState::from_config(None);
        let list = state.objectives_for("c-5a", "s-mat5").await;
        assert!(list.iter().any(|o| o.contains("OA 7")));
        assert!(list.iter().any(|o| o.contains("OA T")), "course-wide material applies");
        assert!(!list.iter().any(|o| o.contains("OA 3")), "other subject's objectives excluded");
    }

    #[tokio::test]
    async fn bank_filters_by_subject_and_difficulty() {
        let state = AppState::from_config(None);
        let all = state.list_questions(Some("s-mat5"), None).await;
        assert!(all.iter().all(|q| q.subject_id == "s-mat5"));
        let hard = state.list_questions(Some("s-mat5"), Some(Difficulty::Hard)).await;
        assert!(hard.iter().all(|q| q.difficulty == Difficulty::Hard));
        assert!(hard.len() < all.len());
    }
}
