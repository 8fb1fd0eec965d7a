//! Typed HTTP client for the quiz API, with a local read-through cache and
//! client-side scoring of quiz attempts.

pub mod api;
pub mod cache;
pub mod error;
pub mod scoring;

pub use api::QuizClient;
pub use cache::{EntityCache, ListCache};
pub use error::{ClientError, ClientResult};
pub use scoring::{score, QuizAttempt, Score};
