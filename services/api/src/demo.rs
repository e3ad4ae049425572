use crate::infra::{parse_scripted_answer, ScriptedAnswer};
use clap::Args;
use service_match::config::{AppConfig, QuestionnaireConfig};
use service_match::error::AppError;
use service_match::questionnaire::{
    QuestionBank, QuestionnaireSession, RecommendationResult, ScoringEngine, SelectionMode,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Scripted answer as `question=value` or `question=value,value` (repeatable)
    #[arg(long = "answer", value_parser = parse_scripted_answer)]
    pub(crate) answers: Vec<ScriptedAnswer>,
    /// JSON question bank to use instead of the built-in catalog
    #[arg(long)]
    pub(crate) bank: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BankCheckArgs {
    /// Path to the JSON question bank document
    pub(crate) path: PathBuf,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { answers, bank } = args;

    let settings = AppConfig::load()?.questionnaire;
    let (bank, engine) = prepare(bank, &settings)?;
    let mut session = QuestionnaireSession::new(bank.clone(), engine.clone());

    println!("Service match questionnaire demo");
    let mut step = 1;
    while let Some(question) = session.current_question().cloned() {
        println!(
            "\n[{:>3.0}%] Q{} {} ({})",
            session.progress(),
            step,
            question.prompt,
            question.mode
        );
        for option in &question.options {
            println!("  - {}: {}", option.value, option.label);
        }

        match answers
            .iter()
            .find(|answer| answer.question == question.id.as_str())
        {
            Some(answer) => {
                let value = answer.to_value(question.mode);
                match session.answer(question.id.as_str(), value) {
                    Ok(()) => println!("  answered: {}", answer.values.join(", ")),
                    Err(err) => println!("  answer rejected: {}", err),
                }
            }
            None => println!("  skipped"),
        }

        session.next();
        step += 1;
    }

    let unused: Vec<&str> = answers
        .iter()
        .map(|answer| answer.question.as_str())
        .filter(|question| !session.answers().contains(question))
        .collect();
    if !unused.is_empty() {
        println!("\nScripted answers not used on this path: {}", unused.join(", "));
    }

    let Some(result) = session.result() else {
        println!("\nQuestionnaire did not complete");
        return Ok(());
    };
    render_result(result);

    let breakdown = engine.score_breakdown(&bank, session.answers());
    if !breakdown.contributions.is_empty() {
        println!("Score contributions:");
        for contribution in &breakdown.contributions {
            println!("  - {}: {}", contribution.question, contribution.notes);
        }
    }

    Ok(())
}

/// Bank and engine for a demo run; `--bank` wins over the configured bank path.
fn prepare(
    bank_override: Option<PathBuf>,
    settings: &QuestionnaireConfig,
) -> Result<(Arc<QuestionBank>, Arc<ScoringEngine>), AppError> {
    let bank = match bank_override {
        Some(path) => QuestionBank::from_path(path)?,
        None => settings.load_bank()?,
    };
    let engine = ScoringEngine::new(settings.scoring_config()?)?;
    Ok((Arc::new(bank), Arc::new(engine)))
}

fn render_result(result: &RecommendationResult) {
    println!("\n[100%] Recommendation: {}", result.summary());
    if result.fallback {
        println!("  No category carried enough signal; offer a general consultation.");
        return;
    }

    for (rank, entry) in result.entries.iter().enumerate() {
        println!(
            "  {}. {} {}%{}",
            rank + 1,
            entry.category.label(),
            entry.rounded_percentage(),
            if entry.detailed { " (detailed)" } else { "" }
        );
    }
}

pub(crate) fn run_bank_check(args: BankCheckArgs) -> Result<(), AppError> {
    let bank = QuestionBank::from_path(&args.path)?;

    println!(
        "Question bank {}: {} questions",
        args.path.display(),
        bank.len()
    );
    for question in bank.questions() {
        let mode = match question.mode {
            SelectionMode::Single => "single",
            SelectionMode::Multiple => "multiple",
        };
        let mut line = format!(
            "- {} [{}] {} options, importance {:.2}",
            question.id,
            mode,
            question.options.len(),
            bank.importance_of(question.id.as_str())
        );
        if let Some(predicate) = &question.applicability {
            let rendered = serde_json::to_string(predicate)
                .unwrap_or_else(|_| "<unprintable predicate>".to_string());
            line.push_str(&format!(", shown when {rendered}"));
        }
        if question.final_stage {
            line.push_str(", final stage");
        }
        println!("{line}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_match::questionnaire::Category;

    #[test]
    fn configured_ranking_settings_reach_the_demo_session() {
        let settings = QuestionnaireConfig {
            fallback_category: Category::Photo,
            detailed_threshold: 40.0,
            ..QuestionnaireConfig::default()
        };
        let (bank, engine) = prepare(None, &settings).expect("demo prepares");
        assert_eq!(engine.config().detailed_threshold, 40.0);

        let mut session = QuestionnaireSession::new(bank, engine);
        while session.current_question().is_some() {
            session.next();
        }
        let result = session.result().expect("session completes");
        assert!(result.fallback);
        assert_eq!(result.primary, Category::Photo);
    }

    #[test]
    fn invalid_configured_thresholds_stop_the_demo() {
        let settings = QuestionnaireConfig {
            relevance_threshold: 50.0,
            detailed_threshold: 10.0,
            ..QuestionnaireConfig::default()
        };
        assert!(matches!(
            prepare(None, &settings),
            Err(AppError::Scoring(_))
        ));
    }
}
