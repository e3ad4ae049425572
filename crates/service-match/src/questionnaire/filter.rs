use super::bank::QuestionBank;
use super::domain::{AnswerMap, Question};

/// Ordered subset of the bank relevant for the given answers.
///
/// Predicates only look backward, so one pass in bank order is enough.
pub fn visible_questions<'a>(bank: &'a QuestionBank, answers: &AnswerMap) -> Vec<&'a Question> {
    bank.questions()
        .iter()
        .filter(|question| question.is_applicable(answers))
        .collect()
}

/// Position of `question_id` inside the visible list, if it is currently shown.
pub fn visible_position(
    bank: &QuestionBank,
    answers: &AnswerMap,
    question_id: &str,
) -> Option<usize> {
    visible_questions(bank, answers)
        .iter()
        .position(|question| question.id.as_str() == question_id)
}
