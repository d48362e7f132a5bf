//! Role gating: pure predicates, no side effects.
//!
//! Handlers check these before touching state, and the store operations
//! re-check them at the point of action. A refused action never mutates
//! anything and never issues a downstream call.

use crate::domain::{EvaluationCategory, EvaluationStatus, Role};

/// Staff = anyone who is not a student or a guardian.
pub fn is_staff(role: Role) -> bool {
  !matches!(role, Role::Student | Role::Guardian)
}

/// Create/edit/delete rights, and the right to initiate submission.
pub fn can_manage(role: Role) -> bool {
  matches!(role, Role::SuperAdmin | Role::Admin | Role::Teacher)
}

/// Approve/reject rights over submitted evaluations.
pub fn can_review(role: Role) -> bool {
  matches!(role, Role::SuperAdmin | Role::Director | Role::Utp)
}

/// Teachers may submit their drafts and resubmit rejected evaluations.
pub fn can_submit(role: Role, status: EvaluationStatus) -> bool {
  matches!(role, Role::Teacher)
    && matches!(status, EvaluationStatus::Draft | EvaluationStatus::Rejected)
}

/// Edit rights on one evaluation: the owning teacher, or the admin roles.
pub fn can_edit(role: Role, actor_id: &str, owner_id: &str) -> bool {
  match role {
    Role::SuperAdmin | Role::Admin => true,
    Role::Teacher => actor_id == owner_id,
    _ => false,
  }
}

/// Listing visibility. Surprise evaluations never reach student or guardian
/// listings; staff see everything.
pub fn can_view(role: Role, category: EvaluationCategory) -> bool {
  is_staff(role) || !matches!(category, EvaluationCategory::Sorpresa)
}
