use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::dto::response::{QuestionDto, QuizDetailDto};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

/// Counts the questions whose selected option equals the answer key.
/// Unanswered questions count towards the total only.
pub fn score(questions: &[QuestionDto], answers: &HashMap<String, usize>) -> Score {
    let correct = questions
        .iter()
        .filter(|question| {
            let Ok(key) = usize::try_from(question.correct_index) else {
                return false;
            };
            answers.get(&question.id) == Some(&key)
        })
        .count();

    Score {
        correct,
        total: questions.len(),
    }
}

/// One pass through a quiz: collect selections, submit for a score, restart.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    quiz: QuizDetailDto,
    answers: HashMap<String, usize>,
    score: Option<Score>,
}

impl QuizAttempt {
    pub fn new(quiz: QuizDetailDto) -> Self {
        Self {
            quiz,
            answers: HashMap::new(),
            score: None,
        }
    }

    pub fn quiz(&self) -> &QuizDetailDto {
        &self.quiz
    }

    /// Records `option` for the question, replacing an earlier pick.
    /// Returns false when the attempt is already submitted, the question is
    /// not part of this quiz, or the option is out of range.
    pub fn select(&mut self, question_id: &str, option: usize) -> bool {
        if self.score.is_some() {
            return false;
        }

        let in_range = self
            .quiz
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .is_some_and(|q| option < q.options.len());
        if in_range {
            self.answers.insert(question_id.to_string(), option);
        }
        in_range
    }

    pub fn selection(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn submit(&mut self) -> Score {
        let result = score(&self.quiz.questions, &self.answers);
        self.score = Some(result);
        result
    }

    pub fn score(&self) -> Option<Score> {
        self.score
    }

    pub fn is_submitted(&self) -> bool {
        self.score.is_some()
    }

    pub fn restart(&mut self) {
        self.answers.clear();
        self.score = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn question(id: &str, correct_index: i32) -> QuestionDto {
        QuestionDto {
            id: id.to_string(),
            quiz_id: "quiz".to_string(),
            text: format!("Question {}", id),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn quiz(questions: Vec<QuestionDto>) -> QuizDetailDto {
        QuizDetailDto {
            id: "quiz".to_string(),
            title: "General Knowledge".to_string(),
            description: "Basics".to_string(),
            questions,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn answers(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
        pairs.iter().map(|(id, i)| (id.to_string(), *i)).collect()
    }

    #[test]
    fn test_score_counts_matching_answers() {
        let questions = vec![question("q1", 2), question("q2", 0)];

        let result = score(&questions, &answers(&[("q1", 2), ("q2", 1)]));
        assert_eq!(result, Score { correct: 1, total: 2 });
    }

    #[test]
    fn test_score_without_answers_is_zero() {
        let questions = vec![question("q1", 2), question("q2", 0)];

        let result = score(&questions, &HashMap::new());
        assert_eq!(result, Score { correct: 0, total: 2 });
    }

    #[test]
    fn test_score_all_correct() {
        let questions = vec![question("q1", 2), question("q2", 0), question("q3", 3)];

        let result = score(&questions, &answers(&[("q1", 2), ("q2", 0), ("q3", 3)]));
        assert_eq!(result.correct, questions.len());
    }

    #[test]
    fn test_score_ignores_answers_for_other_questions() {
        let questions = vec![question("q1", 1)];

        let result = score(&questions, &answers(&[("elsewhere", 1)]));
        assert_eq!(result.correct, 0);
    }

    #[test]
    fn test_attempt_select_submit_restart() {
        let mut attempt = QuizAttempt::new(quiz(vec![question("q1", 2), question("q2", 0)]));

        assert!(attempt.select("q1", 1));
        assert!(attempt.select("q1", 2));
        assert!(!attempt.select("q2", 4));
        assert!(!attempt.select("missing", 0));
        assert_eq!(attempt.selection("q1"), Some(2));
        assert_eq!(attempt.answered(), 1);

        let result = attempt.submit();
        assert_eq!(result, Score { correct: 1, total: 2 });
        assert!(attempt.is_submitted());
        assert!(!attempt.select("q2", 0));

        attempt.restart();
        assert!(!attempt.is_submitted());
        assert_eq!(attempt.score(), None);
        assert_eq!(attempt.answered(), 0);
    }
}
