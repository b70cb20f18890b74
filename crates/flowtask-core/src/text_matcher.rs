use crate::model::Task;

/// Case-insensitive substring matcher over task titles.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Build a matcher for a search term. Returns `None` for an empty term.
    ///
    /// The term is matched as typed; surrounding whitespace is significant.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self {
            needle: query.to_lowercase(),
        })
    }

    /// Whether the task title contains the term. Descriptions are not searched.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.title.to_lowercase().contains(&self.needle)
    }
}
