use crate::models::{Recipe, RecipeDetail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the results area shows. Exactly one holds at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum DisplayState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Empty,
    Populated,
}

/// Filter selectors beside the search box
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub max_time: Option<u32>,
}

impl SearchFilters {
    /// Normalize empty strings from form posts into `None`
    pub fn cleaned(self) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            diet: non_empty(self.diet),
            cuisine: non_empty(self.cuisine),
            max_time: self.max_time.filter(|t| *t > 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diet.is_none() && self.cuisine.is_none() && self.max_time.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchForm {
    pub query: String,
    pub filters: SearchFilters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum ModalState {
    #[default]
    Closed,
    Loading,
    Open(Box<RecipeDetail>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Transient notification shown above the results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        }
    }
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickFilter {
    Healthy,
    Quick,
    Cheap,
    Popular,
}

/// Max time set by the `Quick` filter, in minutes
pub const QUICK_MAX_TIME: u32 = 30;

impl QuickFilter {
    pub const ALL: [QuickFilter; 4] = [
        QuickFilter::Healthy,
        QuickFilter::Quick,
        QuickFilter::Cheap,
        QuickFilter::Popular,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuickFilter::Healthy => "healthy",
            QuickFilter::Quick => "quick",
            QuickFilter::Cheap => "cheap",
            QuickFilter::Popular => "popular",
        }
    }

    /// Apply the filter to a form in place
    pub fn apply(&self, form: &mut SearchForm) {
        match self {
            QuickFilter::Quick => form.filters.max_time = Some(QUICK_MAX_TIME),
            QuickFilter::Healthy | QuickFilter::Cheap | QuickFilter::Popular => {
                form.query = self.as_str().to_string()
            }
        }
    }
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuickFilter {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuickFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| crate::Error::Validation(format!("Unknown quick filter: {s}")))
    }
}

/// Complete state of a recipes view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub form: SearchForm,
    /// Form of the last replacing load; further pages are fetched with it
    pub active: SearchForm,
    pub results: Vec<Recipe>,
    pub total_results: usize,
    pub offset: usize,
    pub has_more: bool,
    pub display: DisplayState,
    pub loading_more: bool,
    pub generation: u64,
    pub notice: Option<Notice>,
    pub modal: ModalState,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.display == DisplayState::Loading
    }

    /// Settle the display after a replacing load
    pub(crate) fn settle(&mut self) {
        self.display = if self.results.is_empty() {
            DisplayState::Empty
        } else {
            DisplayState::Populated
        };
    }
}
