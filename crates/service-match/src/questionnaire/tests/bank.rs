use std::collections::BTreeMap;

use crate::questionnaire::applicability::Applicability;
use crate::questionnaire::bank::{BankError, BankLoadError, QuestionBank};
use crate::questionnaire::domain::{AnswerOption, Category, Question, QuestionId, SelectionMode};

fn opening() -> Question {
    Question::single(
        "goal",
        "Goal",
        vec![
            AnswerOption::new("site", "Website", &[(Category::Web, 3.0)]),
            AnswerOption::new("photos", "Photos", &[(Category::Photo, 3.0)]),
        ],
    )
}

fn follow_up(id: &str) -> Question {
    Question::single(
        id,
        "Follow-up",
        vec![AnswerOption::new("yes", "Yes", &[(Category::Tech, 1.0)])],
    )
}

fn build(questions: Vec<Question>) -> Result<QuestionBank, BankError> {
    QuestionBank::new(questions, BTreeMap::new())
}

#[test]
fn duplicate_question_ids_are_rejected() {
    assert_eq!(
        build(vec![opening(), opening()]),
        Err(BankError::DuplicateQuestion(QuestionId::from("goal")))
    );
}

#[test]
fn questions_need_distinct_weighted_options() {
    assert_eq!(
        build(vec![Question::single("empty", "Empty", Vec::new())]),
        Err(BankError::NoOptions(QuestionId::from("empty")))
    );

    let duplicated = Question::single(
        "dup",
        "Dup",
        vec![
            AnswerOption::new("a", "A", &[(Category::Web, 1.0)]),
            AnswerOption::new("a", "Again", &[(Category::Web, 1.0)]),
        ],
    );
    assert_eq!(
        build(vec![duplicated]),
        Err(BankError::DuplicateOption {
            question: QuestionId::from("dup"),
            value: "a".to_string(),
        })
    );

    let weightless = Question::single(
        "zero",
        "Zero",
        vec![AnswerOption::new("a", "A", &[(Category::Web, 0.0)])],
    );
    assert_eq!(
        build(vec![weightless]),
        Err(BankError::EmptyWeights {
            question: QuestionId::from("zero"),
            value: "a".to_string(),
        })
    );

    let negative = Question::single(
        "neg",
        "Negative",
        vec![AnswerOption::new("a", "A", &[(Category::Ai, -2.0)])],
    );
    assert!(matches!(
        build(vec![negative]),
        Err(BankError::InvalidWeight {
            category: Category::Ai,
            ..
        })
    ));
}

#[test]
fn predicates_may_only_look_backward() {
    let self_ref = follow_up("loop").shown_when(Applicability::answered("loop"));
    assert_eq!(
        build(vec![opening(), self_ref]),
        Err(BankError::SelfReference {
            question: QuestionId::from("loop"),
        })
    );

    let forward = opening().shown_when(Applicability::equals("later", "yes"));
    assert_eq!(
        build(vec![forward, follow_up("later")]),
        Err(BankError::ForwardReference {
            question: QuestionId::from("goal"),
            target: QuestionId::from("later"),
        })
    );

    let dangling = follow_up("next").shown_when(Applicability::answered("ghost"));
    assert_eq!(
        build(vec![opening(), dangling]),
        Err(BankError::UnknownReference {
            question: QuestionId::from("next"),
            target: QuestionId::from("ghost"),
        })
    );
}

#[test]
fn nested_predicates_are_checked_for_option_values() {
    let typo = follow_up("next").shown_when(Applicability::all(vec![
        Applicability::answered("goal"),
        Applicability::any_of("goal", &["site", "webiste"]).negate(),
    ]));

    assert_eq!(
        build(vec![opening(), typo]),
        Err(BankError::UnknownPredicateValue {
            question: QuestionId::from("next"),
            target: QuestionId::from("goal"),
            value: "webiste".to_string(),
        })
    );
}

#[test]
fn importance_entries_must_match_questions_and_be_finite() {
    let mut unknown = BTreeMap::new();
    unknown.insert(QuestionId::from("missing"), 2.0);
    assert_eq!(
        QuestionBank::new(vec![opening()], unknown),
        Err(BankError::UnknownImportance(QuestionId::from("missing")))
    );

    let mut invalid = BTreeMap::new();
    invalid.insert(QuestionId::from("goal"), f64::NAN);
    assert!(matches!(
        QuestionBank::new(vec![opening()], invalid),
        Err(BankError::InvalidImportance { .. })
    ));
}

#[test]
fn json_documents_load_and_validate() {
    let document = r#"{
        "questions": [
            {
                "id": "goal",
                "prompt": "What do you need?",
                "mode": "single",
                "options": [
                    { "value": "site", "label": "Website", "weights": { "web": 4 } },
                    { "value": "film", "label": "Film", "weights": { "cinema": 4, "photo": 1 } }
                ]
            },
            {
                "id": "extras",
                "prompt": "Anything else?",
                "mode": "multiple",
                "applicability": { "kind": "equals", "question": "goal", "value": "site" },
                "options": [
                    { "value": "shop", "label": "Shop", "weights": { "web": 2, "automation": 1 } }
                ]
            },
            {
                "id": "when",
                "prompt": "When?",
                "mode": "single",
                "final_stage": true,
                "options": [ { "value": "soon", "label": "Soon", "weights": { "web": 1 } } ]
            }
        ],
        "importance": { "goal": 2.0 }
    }"#;

    let bank = QuestionBank::from_reader(document.as_bytes()).expect("document loads");
    assert_eq!(bank.len(), 3);
    assert_eq!(bank.importance_of("goal"), 2.0);
    assert_eq!(bank.importance_of("extras"), 1.0);

    let extras = bank.get("extras").expect("extras present");
    assert_eq!(extras.mode, SelectionMode::Multiple);
    assert_eq!(
        extras.applicability,
        Some(Applicability::equals("goal", "site"))
    );
    assert!(bank.get("when").map(|q| q.final_stage).unwrap_or(false));
}

#[test]
fn json_documents_surface_validation_errors() {
    let document = r#"{
        "questions": [
            {
                "id": "goal",
                "prompt": "Goal",
                "mode": "single",
                "applicability": { "kind": "answered", "question": "goal" },
                "options": [ { "value": "a", "label": "A", "weights": { "web": 1 } } ]
            }
        ]
    }"#;

    match QuestionBank::from_reader(document.as_bytes()) {
        Err(BankLoadError::Invalid(BankError::SelfReference { question })) => {
            assert_eq!(question, QuestionId::from("goal"));
        }
        other => panic!("expected self reference error, got {other:?}"),
    }

    assert!(matches!(
        QuestionBank::from_reader("{ not json".as_bytes()),
        Err(BankLoadError::Json(_))
    ));
}

#[test]
fn standard_bank_survives_document_export() {
    let bank = QuestionBank::standard();
    let json = serde_json::to_string(&bank.to_document()).expect("document serializes");
    let reloaded = QuestionBank::from_reader(json.as_bytes()).expect("exported bank reloads");
    assert_eq!(reloaded, bank);
}
