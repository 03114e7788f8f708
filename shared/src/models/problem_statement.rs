//! Problem Statement Model

use serde::{Deserialize, Serialize};

/// Published challenge / hackathon problem
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemStatement {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Date string (`YYYY-MM-DD`)
    pub deadline: String,
}

/// Create problem statement payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemStatementCreate {
    pub title: String,
    pub description: String,
    pub deadline: String,
}

impl ProblemStatementCreate {
    pub fn into_statement(self, id: String) -> ProblemStatement {
        ProblemStatement {
            id,
            title: self.title,
            description: self.description,
            deadline: self.deadline,
        }
    }
}
