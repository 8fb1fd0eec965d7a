use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use serde::Serialize;

use crate::{
    errors::AppResult,
    repositories::{QuestionRepository, QuizRepository},
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Questions deleted because no quiz lists them.
    pub orphaned_questions: usize,
    /// Quiz list entries dropped because they point at no owned question.
    pub dangling_references: usize,
}

/// Repairs the quiz ↔ question links that the two-step writes can leave
/// inconsistent after a crash. Run it while no question is being created:
/// a question inserted but not yet linked by another instance looks orphaned.
/// Only safe at startup of a single-instance deployment, or from the seed tool.
pub struct IntegrityService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl IntegrityService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { quizzes, questions }
    }

    pub async fn reconcile(&self) -> AppResult<ReconcileReport> {
        let quizzes = self.quizzes.find_all().await?;
        let questions = self.questions.find_all().await?;
        let mut report = ReconcileReport::default();

        let listed: HashMap<&str, HashSet<&str>> = quizzes
            .iter()
            .map(|quiz| {
                (
                    quiz.id.as_str(),
                    quiz.question_ids.iter().map(String::as_str).collect(),
                )
            })
            .collect();

        // (question id, owning quiz id) for every question that survives.
        let mut owned: HashSet<(&str, &str)> = HashSet::new();
        for question in &questions {
            let is_listed = listed
                .get(question.quiz_id.as_str())
                .is_some_and(|ids| ids.contains(question.id.as_str()));

            if is_listed {
                owned.insert((question.id.as_str(), question.quiz_id.as_str()));
            } else {
                log::warn!(
                    "Removing orphaned question {} (quiz {})",
                    question.id,
                    question.quiz_id
                );
                self.questions.delete(&question.id).await?;
                report.orphaned_questions += 1;
            }
        }

        for quiz in &quizzes {
            let kept: Vec<String> = quiz
                .question_ids
                .iter()
                .filter(|id| owned.contains(&(id.as_str(), quiz.id.as_str())))
                .cloned()
                .collect();

            let dropped = quiz.question_ids.len() - kept.len();
            if dropped > 0 {
                log::warn!("Dropping {} dangling question id(s) from quiz {}", dropped, quiz.id);
                self.quizzes.set_question_ids(&quiz.id, kept).await?;
                report.dangling_references += dropped;
            }
        }

        if report != ReconcileReport::default() {
            log::info!(
                "Reconciliation removed {} orphaned question(s) and {} dangling reference(s)",
                report.orphaned_questions,
                report.dangling_references
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{Question, Quiz},
        repositories::memory::{InMemoryQuestionRepository, InMemoryQuizRepository},
    };

    fn question(quiz_id: &str) -> Question {
        Question::new(quiz_id, "Pick", vec!["a".into(), "b".into()], 1)
    }

    #[actix_web::test]
    async fn test_reconcile_repairs_both_directions() {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let questions = Arc::new(InMemoryQuestionRepository::new());

        let mut quiz = Quiz::new("Repair", "");
        let linked = question(&quiz.id);
        let unlinked = question(&quiz.id);
        let homeless = question("deleted-quiz");
        quiz.question_ids = vec![linked.id.clone(), "never-created".to_string()];

        quizzes.create(quiz.clone()).await.unwrap();
        for q in [&linked, &unlinked, &homeless] {
            questions.create(q.clone()).await.unwrap();
        }

        let service = IntegrityService::new(quizzes.clone(), questions.clone());
        let report = service.reconcile().await.unwrap();

        assert_eq!(report.orphaned_questions, 2);
        assert_eq!(report.dangling_references, 1);

        let repaired = quizzes.find_by_id(&quiz.id).await.unwrap().unwrap();
        assert_eq!(repaired.question_ids, vec![linked.id.clone()]);
        assert!(questions.find_by_id(&unlinked.id).await.unwrap().is_none());
        assert!(questions.find_by_id(&homeless.id).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_reconcile_consistent_data_is_noop() {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let questions = Arc::new(InMemoryQuestionRepository::new());

        let mut quiz = Quiz::new("Fine", "");
        let q = question(&quiz.id);
        quiz.question_ids.push(q.id.clone());
        quizzes.create(quiz).await.unwrap();
        questions.create(q).await.unwrap();

        let report = IntegrityService::new(quizzes, questions)
            .reconcile()
            .await
            .unwrap();
        assert_eq!(report, ReconcileReport::default());
    }
}
