//! Listing page types (`hot`, `top-week`, ...)

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid page type '{0}'")]
pub struct PageTypeError(pub String);

/// Listing sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Hot,
    New,
    Rising,
    Best,
    Top,
    Controversial,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Hot => "hot",
            Sort::New => "new",
            Sort::Rising => "rising",
            Sort::Best => "best",
            Sort::Top => "top",
            Sort::Controversial => "controversial",
        }
    }

    /// Only ranked sorts can be scoped to a time window
    fn accepts_window(&self) -> bool {
        matches!(self, Sort::Top | Sort::Controversial)
    }
}

/// Time window for ranked sorts, sent as the `t` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

/// A validated page-type filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageType {
    pub sort: Sort,
    pub window: Option<TimeWindow>,
}

impl Default for PageType {
    fn default() -> Self {
        Self {
            sort: Sort::Hot,
            window: None,
        }
    }
}

impl FromStr for PageType {
    type Err = PageTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PageTypeError(s.to_string());

        let (sort, window) = match s.split_once('-') {
            Some((sort, window)) => (sort, Some(window)),
            None => (s, None),
        };

        let sort = match sort {
            "hot" => Sort::Hot,
            "new" => Sort::New,
            "rising" => Sort::Rising,
            "best" => Sort::Best,
            "top" => Sort::Top,
            "controversial" => Sort::Controversial,
            _ => return Err(invalid()),
        };

        let window = match window {
            None => None,
            Some(_) if !sort.accepts_window() => return Err(invalid()),
            Some("hour") => Some(TimeWindow::Hour),
            Some("day") => Some(TimeWindow::Day),
            Some("week") => Some(TimeWindow::Week),
            Some("month") => Some(TimeWindow::Month),
            Some("year") => Some(TimeWindow::Year),
            Some("all") => Some(TimeWindow::All),
            Some(_) => return Err(invalid()),
        };

        Ok(Self { sort, window })
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.window {
            Some(window) => write!(f, "{}-{}", self.sort.as_str(), window.as_str()),
            None => f.write_str(self.sort.as_str()),
        }
    }
}
