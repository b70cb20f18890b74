use std::io::Write;

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use flowtask_app::{FilterBuildError, TaskBoard, TaskFilterBuilder, TaskStore};
use flowtask_core::{TaskFilter, TaskId};
use time::Date;

use crate::view::{render_board, render_notice};

pub mod shell;

pub use shell::{Flow, Session};

/// Output format for `flowtask list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Grouped plain-text view.
    Text,
    /// Filtered tasks as a JSON array.
    Json,
}

/// Filter tokens accepted on the command line.
#[derive(Debug, Default)]
pub struct FilterArgs {
    pub search: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl FilterArgs {
    /// Layer the given tokens over `base`.
    pub fn apply_to(self, base: &TaskFilter) -> Result<TaskFilter> {
        let mut builder = TaskFilterBuilder::from_filter(base);
        if let Some(search) = self.search {
            builder = builder.with_search(search);
        }
        if let Some(priority) = self.priority {
            builder = builder.with_priority(&priority).map_err(|err| user_facing(&err))?;
        }
        if let Some(status) = self.status {
            builder = builder.with_status(&status).map_err(|err| user_facing(&err))?;
        }
        Ok(builder.build())
    }
}

/// Load once, filter, and print.
pub async fn run_list<S: TaskStore>(
    board: &TaskBoard<S>,
    filter: &TaskFilter,
    format: ListFormat,
    today: Date,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = board.load().await;
    if let Some(notice) = outcome.notice() {
        writeln!(out, "{}", render_notice(&notice))?;
    }
    if let flowtask_app::Outcome::Failed { error, .. } = outcome {
        return Err(error.context("failed to load tasks"));
    }

    let visible = board.visible(filter);
    match format {
        ListFormat::Text => write!(out, "{}", render_board(&board.tasks(), &visible, filter, today))?,
        ListFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&visible)?)?,
    }
    Ok(())
}

fn user_facing(err: &FilterBuildError) -> anyhow::Error {
    anyhow!(err.describe_user_facing())
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    raw.parse()
        .map_err(|err| anyhow!("invalid task id '{raw}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtask_core::{Priority, PriorityFilter, StatusFilter};
    use flowtask_store::{LatencyProfile, MemoryStore};
    use time::macros::date;

    const SEED: &str = r#"[
      {"Id": 1, "title": "Buy milk", "priority": "low", "createdAt": "2025-02-01T09:00:00Z"},
      {"Id": 2, "title": "Buy car", "priority": "high", "createdAt": "2025-02-02T09:00:00Z"}
    ]"#;

    fn seeded_board() -> TaskBoard<MemoryStore> {
        let store = MemoryStore::from_json(SEED)
            .unwrap_or_else(|err| panic!("seed should parse: {err}"))
            .with_latency(LatencyProfile::none());
        TaskBoard::new(store)
    }

    #[test]
    fn filter_args_layer_over_the_configured_default() {
        let base = TaskFilter {
            status: StatusFilter::Active,
            ..TaskFilter::default()
        };
        let args = FilterArgs {
            search: Some("buy".into()),
            priority: Some("high".into()),
            status: None,
        };
        let filter = args
            .apply_to(&base)
            .unwrap_or_else(|err| panic!("valid tokens: {err}"));
        assert_eq!(filter.search, "buy");
        assert_eq!(filter.priority, PriorityFilter::Only(Priority::High));
        assert_eq!(filter.status, StatusFilter::Active);
    }

    #[test]
    fn filter_args_report_bad_tokens() {
        let args = FilterArgs {
            priority: Some("urgent".into()),
            ..FilterArgs::default()
        };
        let Err(err) = args.apply_to(&TaskFilter::default()) else {
            panic!("unknown priority should error");
        };
        assert!(err.to_string().contains("Unknown priority 'urgent'"));
    }

    #[test]
    fn task_ids_are_parsed_at_the_edge() {
        assert_eq!(
            parse_task_id(" 12 ").unwrap_or_else(|err| panic!("{err}")),
            TaskId(12)
        );
        assert!(parse_task_id("abc").is_err());
        assert!(parse_task_id("0").is_err());
    }

    #[tokio::test]
    async fn list_renders_text_and_json() {
        let board = seeded_board();
        let filter = TaskFilter {
            search: "car".into(),
            ..TaskFilter::default()
        };

        let mut text = Vec::new();
        run_list(&board, &filter, ListFormat::Text, date!(2025 - 03 - 01), &mut text)
            .await
            .unwrap_or_else(|err| panic!("list failed: {err}"));
        let text = String::from_utf8_lossy(&text);
        assert!(text.contains("2 tasks in your workflow"));
        assert!(text.contains("#2 Buy car (high)"));
        assert!(!text.contains("Buy milk"));

        let mut json = Vec::new();
        run_list(&board, &filter, ListFormat::Json, date!(2025 - 03 - 01), &mut json)
            .await
            .unwrap_or_else(|err| panic!("list failed: {err}"));
        let parsed: serde_json::Value =
            serde_json::from_slice(&json).unwrap_or_else(|err| panic!("json output: {err}"));
        assert_eq!(parsed[0]["Id"], 2);
        assert_eq!(parsed[0]["priority"], "high");
    }
}
