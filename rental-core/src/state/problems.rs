//! Problem statements (problems:manage)

use super::PortalState;
use crate::audit_log;
use crate::auth::permissions::PROBLEMS_MANAGE;
use crate::storage::Namespace;
use shared::AppResult;
use shared::models::{ProblemStatement, ProblemStatementCreate};
use shared::util::snowflake_id;

impl PortalState {
    pub fn add_problem_statement(&self, create: ProblemStatementCreate) -> AppResult<ProblemStatement> {
        let admin = self.require(PROBLEMS_MANAGE)?;

        let mut problems = self.inner.problems.write();
        let id = loop {
            let candidate = snowflake_id().to_string();
            if !problems.iter().any(|p| p.id == candidate) {
                break candidate;
            }
        };
        let problem = create.into_statement(id);
        problems.push(problem.clone());
        self.inner.persistence.save(Namespace::ProblemStatements, &*problems);

        tracing::info!(problem_id = %problem.id, title = %problem.title, "Problem statement added");
        audit_log!(admin.id.as_str(), "create", format!("problem:{}", problem.id), problem.title.as_str());
        Ok(problem)
    }

    /// Replace by id. `Ok(false)` if it does not exist.
    pub fn update_problem_statement(&self, problem: ProblemStatement) -> AppResult<bool> {
        let admin = self.require(PROBLEMS_MANAGE)?;

        let mut problems = self.inner.problems.write();
        let Some(entry) = problems.iter_mut().find(|p| p.id == problem.id) else {
            tracing::debug!(problem_id = %problem.id, "Update for unknown problem statement ignored");
            return Ok(false);
        };
        let id = problem.id.clone();
        *entry = problem;
        self.inner.persistence.save(Namespace::ProblemStatements, &*problems);

        tracing::info!(problem_id = %id, "Problem statement updated");
        audit_log!(admin.id.as_str(), "update", format!("problem:{}", id));
        Ok(true)
    }

    /// Remove by id. `Ok(false)` if it does not exist.
    pub fn delete_problem_statement(&self, id: &str) -> AppResult<bool> {
        let admin = self.require(PROBLEMS_MANAGE)?;

        let mut problems = self.inner.problems.write();
        let before = problems.len();
        problems.retain(|p| p.id != id);
        if problems.len() == before {
            tracing::debug!(problem_id = %id, "Delete for unknown problem statement ignored");
            return Ok(false);
        }
        self.inner.persistence.save(Namespace::ProblemStatements, &*problems);

        tracing::info!(problem_id = %id, "Problem statement deleted");
        audit_log!(admin.id.as_str(), "delete", format!("problem:{}", id));
        Ok(true)
    }

    pub fn problem_statements(&self) -> Vec<ProblemStatement> {
        self.inner.problems.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use shared::ErrorCode;
    use shared::models::ProblemStatementCreate;

    fn create() -> ProblemStatementCreate {
        ProblemStatementCreate {
            title: "Smart Parking".into(),
            description: "Detect free slots in the faculty parking lot".into(),
            deadline: "2025-01-15".into(),
        }
    }

    #[test]
    fn test_problem_crud() {
        let state = admin_state();
        let added = state.add_problem_statement(create()).unwrap();
        assert_eq!(state.problem_statements().len(), 2);

        let mut edited = added.clone();
        edited.deadline = "2025-02-01".into();
        assert!(state.update_problem_statement(edited).unwrap());
        let stored = state
            .problem_statements()
            .into_iter()
            .find(|p| p.id == added.id)
            .unwrap();
        assert_eq!(stored.deadline, "2025-02-01");

        assert!(state.delete_problem_statement(&added.id).unwrap());
        assert!(!state.delete_problem_statement(&added.id).unwrap());
        assert_eq!(state.problem_statements().len(), 1);
    }

    #[test]
    fn test_problem_mutations_require_admin() {
        let state = student_state();
        assert_eq!(
            state.add_problem_statement(create()).unwrap_err().code,
            ErrorCode::PermissionDenied
        );
        assert_eq!(
            state.delete_problem_statement("p1").unwrap_err().code,
            ErrorCode::PermissionDenied
        );
        assert_eq!(state.problem_statements().len(), 1);
    }
}
