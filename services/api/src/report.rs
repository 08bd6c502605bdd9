use crate::infra::{load_repository, parse_timestamp};
use chrono::{DateTime, Utc};
use clap::Args;
use polls::error::AppError;
use polls::polls::{IndexPage, PollService, QuestionId, ResultsPage};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// JSON fixture holding questions and choices
    #[arg(long)]
    pub(crate) fixture: PathBuf,
    /// Evaluate publish gating at this RFC 3339 instant (defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct ResultsArgs {
    /// JSON fixture holding questions and choices
    #[arg(long)]
    pub(crate) fixture: PathBuf,
    /// Question to report on
    #[arg(long)]
    pub(crate) question_id: u64,
}

pub(crate) fn run_list(args: ListArgs) -> Result<(), AppError> {
    let ListArgs { fixture, now } = args;
    let now = now.unwrap_or_else(Utc::now);

    let service = PollService::new(Arc::new(load_repository(Some(fixture.as_path()))?));
    let page = service.index(now)?;
    print!("{}", render_index(&page, now));
    Ok(())
}

pub(crate) fn run_results(args: ResultsArgs) -> Result<(), AppError> {
    let ResultsArgs {
        fixture,
        question_id,
    } = args;

    let service = PollService::new(Arc::new(load_repository(Some(fixture.as_path()))?));
    let page = service.results(QuestionId(question_id), Utc::now())?;
    print!("{}", render_results(&page));
    Ok(())
}

pub(crate) fn render_index(page: &IndexPage, now: DateTime<Utc>) -> String {
    let mut out = format!("Latest polls (as of {})\n", now.format("%Y-%m-%d %H:%M UTC"));

    if let Some(message) = page.message {
        out.push_str(message);
        out.push('\n');
        return out;
    }

    for question in &page.latest_question_list {
        let marker = if question.was_published_recently {
            " [new]"
        } else {
            ""
        };
        out.push_str(&format!(
            "- #{} {} (published {}){}\n",
            question.id,
            question.question_text,
            question.pub_date.format("%Y-%m-%d"),
            marker
        ));
    }
    out
}

pub(crate) fn render_results(page: &ResultsPage) -> String {
    let mut out = format!("{}\n", page.question.question_text);
    for choice in &page.choices {
        let plural = if choice.votes == 1 { "" } else { "s" };
        out.push_str(&format!(
            "- {} -- {} vote{}\n",
            choice.choice_text, choice.votes, plural
        ));
    }
    out.push_str(&format!("Total: {}\n", page.total_votes));
    out
}
