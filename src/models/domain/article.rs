use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Id of the admin who wrote the article.
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn new(title: &str, body: &str, author_id: &str) -> Self {
        let now = Utc::now();
        Article {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            body: body.to_string(),
            author_id: author_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
