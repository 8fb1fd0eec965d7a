use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ordered ids of the questions belonging to this quiz.
    #[serde(default)]
    pub question_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection used by the quiz listing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(title: &str, description: &str) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            question_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
