//! Role-scoped authorization decisions.
//!
//! Every rule lives here as a pure function over the caller identity and
//! already-resolved ownership facts; nothing in this module touches the
//! database or the HTTP layer. Services resolve the facts (who is the
//! student's parent, which teacher owns the class) and routes translate a
//! [`Deny`] into a response.
//!
//! Denied reads are masked: a caller who cannot see a record gets the same
//! 404 as for a record that does not exist. Write attempts by a role that
//! lacks the capability get a 403.

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::user::UserRole;

/// Caller identity resolved from a bearer token.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub id: Uuid,
    pub role: UserRole,
}

impl Caller {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }
}

/// How a student collection must be narrowed for a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentScope {
    /// Director and admin see the whole institution.
    All,
    /// Parent sees only students whose parent_id matches.
    ChildrenOf(Uuid),
    /// Teacher sees only students enrolled in classes they teach.
    TaughtBy(Uuid),
}

/// Ownership facts for one student, resolved by the caller's service.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentOwnership {
    pub parent_id: Option<Uuid>,
    /// Teacher of the student's enrolling class, if any.
    pub teacher_id: Option<Uuid>,
}

/// A denied decision. `Masked` renders as 404, `Forbidden` as 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deny {
    Masked,
    Forbidden,
}

impl Deny {
    /// Translate into the API error for `entity`.
    pub fn api(self, entity: &'static str) -> ApiError {
        match self {
            Deny::Masked => ApiError::NotFound(entity),
            Deny::Forbidden => ApiError::Forbidden,
        }
    }
}

pub fn student_scope(caller: &Caller) -> StudentScope {
    match caller.role {
        UserRole::Parent => StudentScope::ChildrenOf(caller.id),
        UserRole::Teacher => StudentScope::TaughtBy(caller.id),
        UserRole::Director | UserRole::Admin => StudentScope::All,
    }
}

/// Read entitlement to a single student and everything reachable through it
/// (attendance, reports, milestones, badge awards, roadmaps).
pub fn can_view_student(caller: &Caller, ownership: &StudentOwnership) -> Result<(), Deny> {
    match caller.role {
        UserRole::Director | UserRole::Admin => Ok(()),
        UserRole::Parent if ownership.parent_id == Some(caller.id) => Ok(()),
        UserRole::Teacher if ownership.teacher_id == Some(caller.id) => Ok(()),
        _ => Err(Deny::Masked),
    }
}

pub fn can_manage_students(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Teacher | UserRole::Director | UserRole::Admin => Ok(()),
        UserRole::Parent => Err(Deny::Forbidden),
    }
}

/// Teachers and directors mark attendance. (The role gate lives here, not in
/// the route table, so directors are not accidentally locked out.)
pub fn can_mark_attendance(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Teacher | UserRole::Director => Ok(()),
        _ => Err(Deny::Forbidden),
    }
}

pub fn can_author_reports(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Teacher | UserRole::Director => Ok(()),
        _ => Err(Deny::Forbidden),
    }
}

/// A report belongs to its author: nobody else edits it, regardless of rank.
pub fn can_update_report(caller: &Caller, author_id: Uuid) -> Result<(), Deny> {
    can_author_reports(caller.role)?;
    if caller.id == author_id {
        Ok(())
    } else {
        Err(Deny::Forbidden)
    }
}

pub fn can_manage_milestones(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Teacher | UserRole::Director | UserRole::Admin => Ok(()),
        UserRole::Parent => Err(Deny::Forbidden),
    }
}

/// Teachers edit only their own milestones; directors and admins edit any.
pub fn can_update_milestone(caller: &Caller, author_id: Uuid) -> Result<(), Deny> {
    can_manage_milestones(caller.role)?;
    match caller.role {
        UserRole::Teacher if caller.id != author_id => Err(Deny::Forbidden),
        _ => Ok(()),
    }
}

/// The activity catalogue is maintained by the people who run the classes.
pub fn can_manage_activities(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Teacher | UserRole::Director => Ok(()),
        _ => Err(Deny::Forbidden),
    }
}

pub fn can_create_badges(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Teacher | UserRole::Director | UserRole::Admin => Ok(()),
        UserRole::Parent => Err(Deny::Forbidden),
    }
}

pub fn can_award_badges(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Teacher | UserRole::Director => Ok(()),
        _ => Err(Deny::Forbidden),
    }
}

pub fn can_manage_classes(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Director | UserRole::Admin => Ok(()),
        _ => Err(Deny::Forbidden),
    }
}

pub fn can_manage_roadmaps(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Teacher | UserRole::Director | UserRole::Admin => Ok(()),
        UserRole::Parent => Err(Deny::Forbidden),
    }
}

/// Stats and user listing are open to admin and director.
pub fn can_view_admin(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Admin | UserRole::Director => Ok(()),
        _ => Err(Deny::Forbidden),
    }
}

/// Creating users through the admin endpoint is admin-only.
pub fn can_create_admin_users(role: UserRole) -> Result<(), Deny> {
    match role {
        UserRole::Admin => Ok(()),
        _ => Err(Deny::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: UserRole) -> Caller {
        Caller::new(Uuid::new_v4(), role)
    }

    #[test]
    fn parent_scope_is_own_children() {
        let p = caller(UserRole::Parent);
        assert_eq!(student_scope(&p), StudentScope::ChildrenOf(p.id));
    }

    #[test]
    fn teacher_scope_is_taught_classes() {
        let t = caller(UserRole::Teacher);
        assert_eq!(student_scope(&t), StudentScope::TaughtBy(t.id));
    }

    #[test]
    fn director_and_admin_see_everything() {
        assert_eq!(student_scope(&caller(UserRole::Director)), StudentScope::All);
        assert_eq!(student_scope(&caller(UserRole::Admin)), StudentScope::All);
    }

    #[test]
    fn parent_cannot_view_another_parents_child() {
        let p = caller(UserRole::Parent);
        let ownership = StudentOwnership {
            parent_id: Some(Uuid::new_v4()),
            teacher_id: Some(Uuid::new_v4()),
        };
        // Denial is masked: the caller must not learn the student exists.
        assert_eq!(can_view_student(&p, &ownership), Err(Deny::Masked));
    }

    #[test]
    fn parent_views_own_child() {
        let p = caller(UserRole::Parent);
        let ownership = StudentOwnership { parent_id: Some(p.id), teacher_id: None };
        assert!(can_view_student(&p, &ownership).is_ok());
    }

    #[test]
    fn teacher_views_only_students_in_own_classes() {
        let t = caller(UserRole::Teacher);
        let own = StudentOwnership { parent_id: None, teacher_id: Some(t.id) };
        let other = StudentOwnership { parent_id: None, teacher_id: Some(Uuid::new_v4()) };
        assert!(can_view_student(&t, &own).is_ok());
        assert_eq!(can_view_student(&t, &other), Err(Deny::Masked));
    }

    #[test]
    fn unenrolled_student_is_invisible_to_teachers() {
        let t = caller(UserRole::Teacher);
        let ownership = StudentOwnership { parent_id: None, teacher_id: None };
        assert_eq!(can_view_student(&t, &ownership), Err(Deny::Masked));
    }

    #[test]
    fn director_views_any_student() {
        let d = caller(UserRole::Director);
        let ownership = StudentOwnership::default();
        assert!(can_view_student(&d, &ownership).is_ok());
    }

    #[test]
    fn parents_never_write() {
        assert_eq!(can_manage_students(UserRole::Parent), Err(Deny::Forbidden));
        assert_eq!(can_mark_attendance(UserRole::Parent), Err(Deny::Forbidden));
        assert_eq!(can_author_reports(UserRole::Parent), Err(Deny::Forbidden));
        assert_eq!(can_create_badges(UserRole::Parent), Err(Deny::Forbidden));
        assert_eq!(can_award_badges(UserRole::Parent), Err(Deny::Forbidden));
        assert_eq!(can_manage_roadmaps(UserRole::Parent), Err(Deny::Forbidden));
    }

    #[test]
    fn director_marks_attendance_and_authors_reports() {
        assert!(can_mark_attendance(UserRole::Director).is_ok());
        assert!(can_author_reports(UserRole::Director).is_ok());
    }

    #[test]
    fn admin_does_not_mark_attendance() {
        assert_eq!(can_mark_attendance(UserRole::Admin), Err(Deny::Forbidden));
        assert_eq!(can_author_reports(UserRole::Admin), Err(Deny::Forbidden));
    }

    #[test]
    fn report_updates_are_author_only() {
        let t = caller(UserRole::Teacher);
        assert!(can_update_report(&t, t.id).is_ok());
        assert_eq!(can_update_report(&t, Uuid::new_v4()), Err(Deny::Forbidden));

        // Even a director does not edit someone else's report.
        let d = caller(UserRole::Director);
        assert_eq!(can_update_report(&d, Uuid::new_v4()), Err(Deny::Forbidden));
    }

    #[test]
    fn milestone_updates_follow_author_rules() {
        let t = caller(UserRole::Teacher);
        assert!(can_update_milestone(&t, t.id).is_ok());
        assert_eq!(can_update_milestone(&t, Uuid::new_v4()), Err(Deny::Forbidden));

        // Directors and admins may edit any milestone.
        let d = caller(UserRole::Director);
        assert!(can_update_milestone(&d, Uuid::new_v4()).is_ok());
        let a = caller(UserRole::Admin);
        assert!(can_update_milestone(&a, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn admin_surface_is_gated() {
        assert!(can_view_admin(UserRole::Admin).is_ok());
        assert!(can_view_admin(UserRole::Director).is_ok());
        assert_eq!(can_view_admin(UserRole::Teacher), Err(Deny::Forbidden));
        assert_eq!(can_view_admin(UserRole::Parent), Err(Deny::Forbidden));

        assert!(can_create_admin_users(UserRole::Admin).is_ok());
        assert_eq!(can_create_admin_users(UserRole::Director), Err(Deny::Forbidden));
    }

    #[test]
    fn deny_maps_to_masked_or_forbidden_status() {
        use axum::http::StatusCode;
        assert_eq!(Deny::Masked.api("Student").status(), StatusCode::NOT_FOUND);
        assert_eq!(Deny::Forbidden.api("Student").status(), StatusCode::FORBIDDEN);
    }
}
