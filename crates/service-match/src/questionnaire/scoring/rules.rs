use super::super::bank::QuestionBank;
use super::super::domain::AnswerMap;
use super::super::filter::visible_questions;
use super::{ScoreContribution, ScoreVector};

use tracing::warn;

/// Accumulates weighted option scores over every visible, answered question.
///
/// Answers to questions hidden under the final answer state stay in the map but are
/// skipped here.
pub(crate) fn aggregate(
    bank: &QuestionBank,
    answers: &AnswerMap,
) -> (ScoreVector, Vec<ScoreContribution>) {
    let mut scores = ScoreVector::default();
    let mut contributions = Vec::new();

    for question in visible_questions(bank, answers) {
        let Some(answer) = answers.get(question.id.as_str()) else {
            continue;
        };

        if answer.mode() != question.mode {
            warn!(
                question = %question.id,
                expected = %question.mode,
                "answer shape does not match question, scoring every recognised value"
            );
        }

        let mut combined = ScoreVector::default();
        let mut selected = Vec::new();
        let mut ignored = Vec::new();
        for value in answer.values() {
            match question.option(value) {
                Some(option) => {
                    combined.add_weights(&option.weights, 1.0);
                    selected.push(option.value.clone());
                }
                None => {
                    warn!(
                        question = %question.id,
                        value,
                        "unknown option skipped while scoring"
                    );
                    ignored.push(value.to_string());
                }
            }
        }

        if selected.is_empty() && ignored.is_empty() {
            continue;
        }

        let multiplier = bank.importance_of(question.id.as_str());
        let weighted = combined.scaled(multiplier);
        scores.merge(&weighted);

        let mut notes = if selected.is_empty() {
            "no recognised option selected".to_string()
        } else {
            format!(
                "{} selected at importance {:.2} adds {:.2}",
                selected.join(", "),
                multiplier,
                weighted.total()
            )
        };
        if !ignored.is_empty() {
            notes.push_str(&format!("; ignored unknown {}", ignored.join(", ")));
        }
        contributions.push(ScoreContribution {
            question: question.id.clone(),
            selected,
            ignored,
            multiplier,
            weighted,
            notes,
        });
    }

    (scores, contributions)
}
