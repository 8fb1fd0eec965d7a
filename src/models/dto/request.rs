use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn options_not_blank(options: &[String]) -> Result<(), ValidationError> {
    if options.iter().any(|o| o.trim().is_empty()) {
        let mut err = ValidationError::new("blank_option");
        err.message = Some("options must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub username: String,

    #[validate(length(min = 4, message = "must be at least 4 characters"))]
    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl RegisterRequest {
    /// Usernames are stored trimmed; length rules apply to the trimmed value.
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank"))]
    pub username: String,

    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(custom(function = "not_blank"))]
    pub text: String,

    #[validate(
        length(min = 2, message = "at least 2 options are required"),
        custom(function = "options_not_blank")
    )]
    pub options: Vec<String>,

    #[validate(range(min = 0, message = "must not be negative"))]
    pub correct_index: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 2, message = "at least 2 options are required"),
        custom(function = "options_not_blank")
    )]
    pub options: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub correct_index: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub body: Option<String>,
}
