use flowtask_core::{Priority, PriorityFilter, QuickDate, StatusFilter, TaskFilter};
use thiserror::Error;
use time::Date;
use time::macros::format_description;

/// Error type returned while turning user-facing tokens into typed values.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    /// Unrecognized priority token.
    #[error("invalid priority: {token}")]
    InvalidPriority {
        /// Token as typed.
        token: String,
    },
    /// Unrecognized status token.
    #[error("invalid status: {token}")]
    InvalidStatus {
        /// Token as typed.
        token: String,
    },
    /// Neither a date shortcut nor `YYYY-MM-DD`.
    #[error("invalid due date '{token}': {source}")]
    InvalidDueDate {
        /// Token as typed.
        token: String,
        /// Why the date parse failed.
        #[source]
        source: time::error::Parse,
    },
}

/// Result alias for token parsing helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into a [`TaskFilter`].
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    search: String,
    priority: PriorityFilter,
    status: StatusFilter,
}

impl TaskFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing filter.
    #[must_use]
    pub fn from_filter(filter: &TaskFilter) -> Self {
        Self {
            search: filter.search.clone(),
            priority: filter.priority,
            status: filter.status,
        }
    }

    /// Set the search term (kept verbatim; empty disables search).
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Set the priority criterion from a token (`all`, `low`, `medium`, `high`).
    ///
    /// # Errors
    /// Returns an error for unknown tokens.
    pub fn with_priority(mut self, token: &str) -> FilterBuildResult<Self> {
        self.priority = parse_priority_filter(token)?;
        Ok(self)
    }

    /// Set the status criterion from a token (`all`, `active`, `completed`).
    ///
    /// # Errors
    /// Returns an error for unknown tokens.
    pub fn with_status(mut self, token: &str) -> FilterBuildResult<Self> {
        self.status = parse_status_filter(token)?;
        Ok(self)
    }

    /// Build the final [`TaskFilter`].
    #[must_use]
    pub fn build(self) -> TaskFilter {
        TaskFilter {
            search: self.search,
            priority: self.priority,
            status: self.status,
        }
    }
}

/// Parse a priority token.
///
/// # Errors
/// Returns an error if the token is not `low`, `medium`, or `high`.
pub fn parse_priority(token: &str) -> FilterBuildResult<Priority> {
    match normalize(token).as_str() {
        "low" => Ok(Priority::Low),
        "medium" | "med" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        _ => Err(FilterBuildError::InvalidPriority {
            token: token.to_owned(),
        }),
    }
}

/// Parse a priority filter token (`all` or a priority).
///
/// # Errors
/// Returns an error for unknown tokens.
pub fn parse_priority_filter(token: &str) -> FilterBuildResult<PriorityFilter> {
    if normalize(token) == "all" {
        return Ok(PriorityFilter::All);
    }
    parse_priority(token).map(PriorityFilter::Only)
}

/// Parse a status filter token.
///
/// # Errors
/// Returns an error if the token is not `all`, `active`, or `completed`.
pub fn parse_status_filter(token: &str) -> FilterBuildResult<StatusFilter> {
    match normalize(token).as_str() {
        "all" => Ok(StatusFilter::All),
        "active" => Ok(StatusFilter::Active),
        "completed" | "done" => Ok(StatusFilter::Completed),
        _ => Err(FilterBuildError::InvalidStatus {
            token: token.to_owned(),
        }),
    }
}

/// Parse a due-date token relative to `today`.
///
/// Accepts `today`, `tomorrow`, `next-week`, or `YYYY-MM-DD`; empty and
/// `none` mean no due date.
///
/// # Errors
/// Returns an error when the token is neither a shortcut nor a valid date.
pub fn parse_due_date(token: &str, today: Date) -> FilterBuildResult<Option<Date>> {
    let normalized = normalize(token).replace(['_', ' '], "-");
    let quick = match normalized.as_str() {
        "" | "none" => return Ok(None),
        "today" => QuickDate::Today,
        "tomorrow" => QuickDate::Tomorrow,
        "next-week" | "nextweek" => QuickDate::NextWeek,
        _ => {
            let date = Date::parse(token.trim(), format_description!("[year]-[month]-[day]"))
                .map_err(|source| FilterBuildError::InvalidDueDate {
                    token: token.to_owned(),
                    source,
                })?;
            return Ok(Some(date));
        }
    };
    Ok(Some(quick.resolve(today)))
}

fn normalize(token: &str) -> String {
    token.trim().to_ascii_lowercase()
}

impl FilterBuildError {
    /// Convert the error into a message that is friendly for end-users.
    #[must_use]
    pub fn describe_user_facing(&self) -> String {
        match self {
            Self::InvalidPriority { token } => {
                format!("Unknown priority '{token}' (use all, high, medium, or low)")
            }
            Self::InvalidStatus { token } => {
                format!("Unknown status '{token}' (use all, active, or completed)")
            }
            Self::InvalidDueDate { token, .. } => {
                format!("Unknown due date '{token}' (use YYYY-MM-DD, today, tomorrow, or next-week)")
            }
        }
    }
}
