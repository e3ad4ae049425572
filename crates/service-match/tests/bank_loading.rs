//! Loading question banks from JSON documents on disk.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use service_match::config::QuestionnaireConfig;
use service_match::questionnaire::{
    AnswerValue, BankError, BankLoadError, Category, QuestionBank, QuestionnaireSession,
    ScoringEngine,
};

fn write_document(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("service-match-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write bank document");
    path
}

const STUDIO_BANK: &str = r#"{
    "questions": [
        {
            "id": "medium",
            "prompt": "Stills or motion?",
            "mode": "single",
            "options": [
                { "value": "stills", "label": "Stills", "weights": { "photo": 5 } },
                { "value": "motion", "label": "Motion", "weights": { "cinema": 5 } }
            ]
        },
        {
            "id": "length",
            "prompt": "How long should the film run?",
            "mode": "single",
            "applicability": {
                "kind": "all",
                "conditions": [
                    { "kind": "equals", "question": "medium", "value": "motion" },
                    { "kind": "not", "condition": { "kind": "answered", "question": "medium_skip" } }
                ]
            },
            "options": [
                { "value": "short", "label": "Under a minute", "weights": { "cinema": 2, "web": 1 } }
            ]
        }
    ],
    "importance": { "medium": 3 }
}"#;

#[test]
fn loads_bank_from_disk_through_config() {
    let path = write_document("studio-invalid.json", STUDIO_BANK);
    let config = QuestionnaireConfig {
        bank_path: Some(path),
        ..QuestionnaireConfig::default()
    };

    match config.load_bank() {
        Err(BankLoadError::Invalid(BankError::UnknownReference { target, .. })) => {
            assert_eq!(target.as_str(), "medium_skip");
        }
        other => panic!("expected unknown reference, got {other:?}"),
    }
}

#[test]
fn loaded_bank_drives_a_session() {
    let valid = STUDIO_BANK.replace(
        r#",
                    { "kind": "not", "condition": { "kind": "answered", "question": "medium_skip" } }"#,
        "",
    );
    let path = write_document("studio.json", &valid);
    let bank = QuestionBank::from_path(&path).expect("bank loads");
    assert_eq!(bank.importance_of("medium"), 3.0);

    let mut session = QuestionnaireSession::new(Arc::new(bank), Arc::new(ScoringEngine::default()));
    session
        .answer("medium", AnswerValue::single("motion"))
        .expect("answer accepted");
    assert_eq!(session.visible_questions().len(), 2);

    session.next();
    session
        .answer("length", AnswerValue::single("short"))
        .expect("answer accepted");
    session.next();

    let result = session.result().expect("completed");
    assert_eq!(result.primary, Category::Cinema);
    let cinema = result.entry(Category::Cinema).expect("cinema ranked");
    assert!(cinema.detailed);
    assert_eq!(cinema.raw_score, 17.0);
}

#[test]
fn unreadable_paths_surface_io_errors() {
    let missing = std::env::temp_dir().join("service-match-missing/never.json");
    assert!(matches!(
        QuestionBank::from_path(missing),
        Err(BankLoadError::Io(_))
    ));
}
