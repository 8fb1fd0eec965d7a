use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

pub const MIN_OPTIONS: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    pub text: String,
    pub options: Vec<String>,
    /// Zero-based position of the right answer within `options`.
    pub correct_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn new(quiz_id: &str, text: &str, options: Vec<String>, correct_index: i32) -> Self {
        let now = Utc::now();
        Question {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            text: text.to_string(),
            options,
            correct_index,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks the option list and answer key together. Partial updates must
    /// call this on the merged question, since either half may change alone.
    pub fn check_answer_key(&self) -> AppResult<()> {
        check_answer_key(&self.options, self.correct_index)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

pub fn check_answer_key(options: &[String], correct_index: i32) -> AppResult<()> {
    if options.len() < MIN_OPTIONS {
        return Err(AppError::validation(
            "options",
            format!("at least {} options are required", MIN_OPTIONS),
        ));
    }
    if correct_index < 0 || correct_index as usize >= options.len() {
        return Err(AppError::validation(
            "correctIndex",
            format!("must be between 0 and {}", options.len() - 1),
        ));
    }
    Ok(())
}
