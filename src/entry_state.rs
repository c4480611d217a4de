use serde::Serialize;
use serde_json::Value;

use crate::{
    calendar_options::CalendarOption, WindowSize, WINDOW_HEIGHT_COMPACT, WINDOW_HEIGHT_EXPANDED,
    WINDOW_WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum EntryMode {
    Natural,
    Command,
}

impl EntryMode {
    pub(crate) fn of(text: &str) -> Self {
        if text.starts_with('/') {
            Self::Command
        } else {
            Self::Natural
        }
    }
}

/// View state pushed to the webview after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntrySnapshot {
    pub(crate) text: String,
    pub(crate) text_seq: u64,
    pub(crate) mode: EntryMode,
    pub(crate) preview: Option<Value>,
    pub(crate) error: Option<String>,
    pub(crate) is_loading: bool,
    pub(crate) calendars: Vec<CalendarOption>,
    pub(crate) selected_calendar_id: Option<String>,
    pub(crate) calendar_loading: bool,
    pub(crate) calendar_error: Option<String>,
    pub(crate) calendar_retries: u32,
    pub(crate) needs_calendar: bool,
    pub(crate) submit_error: Option<String>,
    pub(crate) submit_loading: bool,
}

impl EntrySnapshot {
    pub(crate) fn window_size(&self) -> WindowSize {
        let needs_extra_space = self.mode == EntryMode::Natural
            && (self.preview.is_some()
                || self.error.is_some()
                || self.needs_calendar
                || self.submit_error.is_some()
                || self.submit_loading);
        WindowSize {
            width: WINDOW_WIDTH,
            height: if needs_extra_space {
                WINDOW_HEIGHT_EXPANDED
            } else {
                WINDOW_HEIGHT_COMPACT
            },
        }
    }
}

pub(crate) fn needs_calendar(
    mode: EntryMode,
    selected_calendar_id: Option<&str>,
    calendar_loading: bool,
    calendars: &[CalendarOption],
) -> bool {
    mode == EntryMode::Natural
        && selected_calendar_id.is_none()
        && !calendar_loading
        && !calendars.is_empty()
}
