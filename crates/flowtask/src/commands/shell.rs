//! Line-oriented interactive session.

use std::io::Write;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use flowtask_app::{
    Notice, Outcome, TaskBoard, TaskDraft, TaskEdit, TaskStore, parse_due_date, parse_priority,
    parse_priority_filter, parse_status_filter,
};
use flowtask_core::{Task, TaskFilter, TaskId};
use time::Date;
use tracing::debug;

use super::{parse_task_id, user_facing};
use crate::view::{render_board, render_notice, render_stats};

/// Whether the session keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Parser, Debug)]
#[command(
    name = "flowtask",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
struct ShellLine {
    #[command(subcommand)]
    cmd: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Create a task.
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        #[arg(short = 'd', long)]
        description: Option<String>,
        #[arg(short = 'p', long, default_value = "medium")]
        priority: String,
        /// YYYY-MM-DD, today, tomorrow, or next-week.
        #[arg(long)]
        due: Option<String>,
    },

    /// Flip a task between active and completed.
    Toggle { id: String },

    /// Change fields of a task; omitted fields keep their value.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short = 'd', long)]
        description: Option<String>,
        #[arg(short = 'p', long)]
        priority: Option<String>,
        /// YYYY-MM-DD, today, tomorrow, next-week, or none.
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a task.
    Delete { id: String },

    /// Remove every completed task.
    Clear,

    /// Set the title search (no argument clears it).
    Search { term: Vec<String> },

    /// Set the priority filter: all, high, medium, low.
    Priority { filter: String },

    /// Set the status filter: all, active, completed.
    Status { filter: String },

    /// Print one task as JSON.
    Show { id: String },

    /// Print the filtered list.
    #[command(alias = "ls")]
    List,

    /// Print progress counters.
    Stats,

    /// Leave the session.
    #[command(alias = "exit")]
    Quit,
}

/// Interactive session state: the board plus the current view filter.
pub struct Session<S> {
    board: TaskBoard<S>,
    filter: TaskFilter,
    today: Date,
}

impl<S: TaskStore> Session<S> {
    pub const fn new(board: TaskBoard<S>, filter: TaskFilter, today: Date) -> Self {
        Self {
            board,
            filter,
            today,
        }
    }

    /// Initial load followed by the first render.
    pub async fn start(&self, out: &mut impl Write) -> Result<()> {
        let outcome = self.board.load().await;
        if let Some(notice) = outcome.notice() {
            writeln!(out, "{}", render_notice(&notice))?;
        }
        self.render(out)
    }

    /// Run one input line.
    pub async fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let words = match shell_words::split(line) {
            Ok(words) => words,
            Err(err) => {
                writeln!(out, "{}", render_notice(&Notice::error(format!("cannot parse input: {err}"))))?;
                return Ok(Flow::Continue);
            }
        };
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed.cmd,
            Err(err) => {
                write!(out, "{}", err.render())?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "Shell command");

        match self.dispatch(command, out).await {
            Ok(flow) => Ok(flow),
            Err(err) => {
                writeln!(out, "{}", render_notice(&Notice::error(err.to_string())))?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn dispatch(&mut self, command: ShellCommand, out: &mut impl Write) -> Result<Flow> {
        match command {
            ShellCommand::Add {
                title,
                description,
                priority,
                due,
            } => {
                let draft = TaskDraft {
                    title: title.join(" "),
                    description: description.unwrap_or_default(),
                    priority: parse_priority(&priority).map_err(|err| user_facing(&err))?,
                    due_date: self.due_date(due.as_deref())?,
                };
                let outcome = self.board.add(draft).await;
                report(&outcome, out)?;
            }
            ShellCommand::Toggle { id } => {
                let outcome = self.board.toggle(parse_task_id(&id)?).await;
                report(&outcome, out)?;
            }
            ShellCommand::Edit {
                id,
                title,
                description,
                priority,
                due,
            } => {
                let id = parse_task_id(&id)?;
                let current = self.cached(id)?;
                let mut edit = TaskEdit::from_task(&current);
                if let Some(title) = title {
                    edit.title = title;
                }
                if let Some(description) = description {
                    edit.description = description;
                }
                if let Some(priority) = priority {
                    edit.priority = parse_priority(&priority).map_err(|err| user_facing(&err))?;
                }
                if due.is_some() {
                    edit.due_date = self.due_date(due.as_deref())?;
                }
                let outcome = self.board.edit(id, edit).await;
                report(&outcome, out)?;
            }
            ShellCommand::Delete { id } => {
                let outcome = self.board.delete(parse_task_id(&id)?).await;
                report(&outcome, out)?;
            }
            ShellCommand::Clear => {
                let outcome = self.board.clear_completed().await;
                report(&outcome, out)?;
            }
            ShellCommand::Search { term } => {
                self.filter.search = term.join(" ");
                self.render(out)?;
            }
            ShellCommand::Priority { filter } => {
                self.filter.priority = parse_priority_filter(&filter).map_err(|err| user_facing(&err))?;
                self.render(out)?;
            }
            ShellCommand::Status { filter } => {
                self.filter.status = parse_status_filter(&filter).map_err(|err| user_facing(&err))?;
                self.render(out)?;
            }
            ShellCommand::Show { id } => {
                let task = self.cached(parse_task_id(&id)?)?;
                writeln!(out, "{}", serde_json::to_string_pretty(&task)?)?;
            }
            ShellCommand::List => self.render(out)?,
            ShellCommand::Stats => write!(out, "{}", render_stats(&self.board.stats()))?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn cached(&self, id: TaskId) -> Result<Task> {
        self.board
            .task(id)
            .ok_or_else(|| anyhow!("No task with id {id}"))
    }

    fn due_date(&self, token: Option<&str>) -> Result<Option<Date>> {
        token.map_or(Ok(None), |token| {
            parse_due_date(token, self.today).map_err(|err| user_facing(&err))
        })
    }

    fn render(&self, out: &mut impl Write) -> Result<()> {
        let all = self.board.tasks();
        let visible = self.board.visible(&self.filter);
        write!(out, "{}", render_board(&all, &visible, &self.filter, self.today))?;
        Ok(())
    }
}

fn report(outcome: &Outcome, out: &mut impl Write) -> Result<()> {
    if let Some(notice) = outcome.notice() {
        writeln!(out, "{}", render_notice(&notice))?;
    }
    Ok(())
}
