use crate::infra::{load_catalog, parse_language};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use vitalcheck::assessment::{
    answers_from_path, AssessmentEngine, AssessmentResult, Language, QuestionBank,
};
use vitalcheck::config::{AppConfig, AssessmentConfig};
use vitalcheck::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV file with `question_id,answer` rows
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Question bank language (defaults to APP_DEFAULT_LANGUAGE)
    #[arg(long, value_parser = parse_language)]
    pub(crate) language: Option<Language>,
    /// JSON question bank to score against instead of the configured one
    #[arg(long)]
    pub(crate) question_bank: Option<PathBuf>,
    /// Seed for recommendation sampling
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionsArgs {
    /// Question bank language (defaults to APP_DEFAULT_LANGUAGE)
    #[arg(long, value_parser = parse_language)]
    pub(crate) language: Option<Language>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    print!("{}", score_report(args, &config.assessment)?);
    Ok(())
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let language = args
        .language
        .unwrap_or(config.assessment.default_language);
    let catalog = load_catalog(&config.assessment)?;
    print!("{}", render_questions(catalog.bank(language), language));
    Ok(())
}

pub(crate) fn score_report(args: ScoreArgs, config: &AssessmentConfig) -> Result<String, AppError> {
    let ScoreArgs {
        answers,
        language,
        question_bank,
        seed,
    } = args;

    let language = language.unwrap_or(config.default_language);
    let mut catalog = load_catalog(config)?;
    if let Some(path) = question_bank {
        catalog = catalog.with_bank(language, QuestionBank::from_path(path)?);
    }

    let config = AssessmentConfig {
        recommendation_seed: seed.or(config.recommendation_seed),
        ..config.clone()
    };
    let engine = AssessmentEngine::new(catalog, &config);
    let answers = answers_from_path(answers)?;
    let result = engine.evaluate(language, &answers)?;

    Ok(render_score_report(&result, language, answers.len()))
}

pub(crate) fn render_score_report(
    result: &AssessmentResult,
    language: Language,
    answered: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "VitalCheck health check ({}, {} answers)",
        language.display_name(),
        answered
    );
    let _ = writeln!(
        out,
        "Overall score: {}/100 - {} ({})",
        result.overall_score,
        result.overall_status.label(),
        result.overall_status
    );

    for pillar in &result.pillar_scores {
        let _ = writeln!(
            out,
            "\n{}: {}/100 - {}",
            pillar.pillar_name,
            pillar.score,
            pillar.status.label()
        );
        if pillar.recommendations.is_empty() {
            let _ = writeln!(out, "  No recommendations for this band");
        }
        for recommendation in &pillar.recommendations {
            let _ = writeln!(out, "  - {recommendation}");
        }
    }

    out
}

pub(crate) fn render_questions(bank: &QuestionBank, language: Language) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} question bank: {} pillars, {} questions",
        language.display_name(),
        bank.pillars.len(),
        bank.question_count()
    );

    for pillar in &bank.pillars {
        let _ = writeln!(out, "\n[{}] {}", pillar.id, pillar.name);
        for question in &pillar.questions {
            let _ = writeln!(out, "  {}. {}", question.id, question.text);
            for option in &question.options {
                let _ = writeln!(out, "     ({}) {}", option.score, option.label);
            }
        }
    }

    out
}
