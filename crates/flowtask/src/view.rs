//! Plain-text rendering of the task list.

use std::fmt::Write as _;

use flowtask_app::{Notice, NoticeLevel};
use flowtask_core::{DueStatus, Partition, Task, TaskFilter, TaskStats, due_label, is_overdue};
use time::Date;

const WELCOME: &str = "Welcome to FlowTask! Add your first task to get started.";
const NO_MATCHES: &str = "No tasks found. Try adjusting your search or filters.";

/// Render the whole board: header, grouped list, and progress footer.
///
/// `all` is the unfiltered cache; `visible` is what the filter kept.
pub fn render_board(all: &[Task], visible: &[Task], filter: &TaskFilter, today: Date) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "FlowTask - {}", workflow_count(all.len()));
    if !filter.is_empty() {
        let _ = writeln!(out, "{}", describe_filter(filter));
    }
    out.push('\n');

    if all.is_empty() {
        out.push_str(WELCOME);
        out.push('\n');
        return out;
    }

    let partition = Partition::of(visible);
    if partition.is_empty() {
        out.push_str(NO_MATCHES);
        out.push('\n');
    } else {
        render_group(&mut out, "Active", &partition.active, today);
        render_group(&mut out, "Completed", &partition.completed, today);
        out.push_str(&render_visible_summary(&TaskStats::from_tasks(visible)));
    }

    out.push('\n');
    out.push_str(&render_stats(&TaskStats::from_tasks(all)));
    out
}

fn workflow_count(total: usize) -> String {
    if total == 1 {
        "1 task in your workflow".to_owned()
    } else {
        format!("{total} tasks in your workflow")
    }
}

fn describe_filter(filter: &TaskFilter) -> String {
    let search = if filter.search.is_empty() {
        "-".to_owned()
    } else {
        format!("\"{}\"", filter.search)
    };
    format!(
        "Filters: search {search} | priority {} | status {}",
        filter.priority, filter.status
    )
}

fn render_group(out: &mut String, label: &str, tasks: &[&Task], today: Date) {
    if tasks.is_empty() {
        return;
    }
    let _ = writeln!(out, "{label} ({})", tasks.len());
    for task in tasks {
        let _ = writeln!(out, "  {}", render_task_line(task, today));
    }
}

/// One list row: checkbox, id, title, priority, and due label.
pub fn render_task_line(task: &Task, today: Date) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{mark}] #{} {} ({})", task.id, task.title, task.priority);
    if let Some(due) = task.due_date {
        let _ = write!(line, " due {}", due_label(due, today));
        if is_overdue(task, today) {
            line.push_str(" !overdue");
        } else if !task.completed && DueStatus::classify(Some(due), today) == DueStatus::Today {
            line.push_str(" !today");
        }
    }
    line
}

/// Progress footer over the unfiltered collection.
pub fn render_stats(stats: &TaskStats) -> String {
    format!(
        "Total {} | Active {} | Completed {} | Progress {}%\n",
        stats.total,
        stats.active,
        stats.completed,
        stats.progress_percent()
    )
}

/// Progress over the filtered list only, shown under the groups.
fn render_visible_summary(visible: &TaskStats) -> String {
    format!(
        "{} of {} tasks completed ({}%)\n",
        visible.completed,
        visible.total,
        visible.progress_percent()
    )
}

/// Toast line for an outcome notice.
pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {notice}")
}
