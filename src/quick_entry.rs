use std::sync::{atomic::AtomicBool, Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    backend_http::{BackendApi, ScheduleRequest},
    calendar_options::{self, CalendarOption},
    calendar_retry::CalendarRetry,
    entry_state::{self, EntryMode, EntrySnapshot},
    append_desktop_log, AtomicFlagGuard, WindowSize, PARSE_DEBOUNCE,
};

pub(crate) const SELECT_CALENDAR_MESSAGE: &str = "Select a calendar before scheduling.";

/// Window-side effects the controller needs from the shell.
pub(crate) trait EntryHost: Send + Sync {
    fn publish(&self, snapshot: &EntrySnapshot);
    fn resize_window(&self, size: WindowSize);
    fn hide_window(&self);
}

#[derive(Default)]
struct EntryInner {
    text: String,
    text_seq: u64,
    preview: Option<Value>,
    error: Option<String>,
    is_loading: bool,
    calendars: Vec<CalendarOption>,
    selected_calendar_id: Option<String>,
    calendar_loading: bool,
    calendar_error: Option<String>,
    calendar_retries: u32,
    submit_error: Option<String>,
    submit_loading: bool,

    backend: Option<Arc<dyn BackendApi>>,
    debounce: Option<CancellationToken>,
    parse: Option<CancellationToken>,
    parse_generation: u64,
    calendar_loader: Option<CancellationToken>,
    last_size: Option<WindowSize>,
}

impl EntryInner {
    fn mode(&self) -> EntryMode {
        EntryMode::of(&self.text)
    }

    fn cancel_debounce(&mut self) {
        if let Some(token) = self.debounce.take() {
            token.cancel();
        }
    }

    fn cancel_parse(&mut self) {
        if let Some(token) = self.parse.take() {
            token.cancel();
        }
        self.parse_generation += 1;
    }

    fn snapshot(&self) -> EntrySnapshot {
        let mode = self.mode();
        EntrySnapshot {
            text: self.text.clone(),
            text_seq: self.text_seq,
            mode,
            preview: self.preview.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
            calendars: self.calendars.clone(),
            selected_calendar_id: self.selected_calendar_id.clone(),
            calendar_loading: self.calendar_loading,
            calendar_error: self.calendar_error.clone(),
            calendar_retries: self.calendar_retries,
            needs_calendar: entry_state::needs_calendar(
                mode,
                self.selected_calendar_id.as_deref(),
                self.calendar_loading,
                &self.calendars,
            ),
            submit_error: self.submit_error.clone(),
            submit_loading: self.submit_loading,
        }
    }
}

struct Shared {
    inner: Mutex<EntryInner>,
    host: Arc<dyn EntryHost>,
    is_submitting: AtomicBool,
}

/// Draft, preview and calendar state of the quick-entry box, plus the
/// request lifecycle that keeps them current. Cheap to clone.
#[derive(Clone)]
pub(crate) struct QuickEntry {
    shared: Arc<Shared>,
}

impl QuickEntry {
    pub(crate) fn new(host: Arc<dyn EntryHost>) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(EntryInner::default()),
                host,
                is_submitting: AtomicBool::new(false),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EntryInner> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> EntrySnapshot {
        self.lock().snapshot()
    }

    /// Applies `change` and publishes the resulting snapshot. Publishing
    /// happens under the lock so the webview sees snapshots in order.
    fn update<R>(&self, change: impl FnOnce(&mut EntryInner) -> R) -> R {
        let mut inner = self.lock();
        let result = change(&mut inner);
        let snapshot = inner.snapshot();
        let size = snapshot.window_size();
        self.shared.host.publish(&snapshot);
        if inner.last_size != Some(size) {
            inner.last_size = Some(size);
            self.shared.host.resize_window(size);
        }
        result
    }

    /// Installs a backend client, reloads calendars from it and re-parses the
    /// current draft. A loader from a previous backend is cancelled.
    pub(crate) fn attach_backend(&self, backend: Arc<dyn BackendApi>) {
        let loader_token = CancellationToken::new();
        self.update(|inner| {
            inner.backend = Some(Arc::clone(&backend));
            if let Some(previous) = inner.calendar_loader.replace(loader_token.clone()) {
                previous.cancel();
            }
        });

        let loader = self.clone();
        tokio::spawn(async move { loader.load_calendars(backend, loader_token).await });
        let parser = self.clone();
        tokio::spawn(async move { parser.run_parse().await });
    }

    /// Stores a draft edit. `seq` increases with every keystroke the webview
    /// sends; an edit that is not newer than the last one applied is dropped.
    pub(crate) fn set_text(&self, text: String, seq: u64) {
        let token = CancellationToken::new();
        let applied = self.update(|inner| {
            if seq <= inner.text_seq {
                return false;
            }
            inner.text_seq = seq;
            if inner.text != text {
                inner.preview = None;
            }
            inner.text = text;
            inner.cancel_debounce();
            inner.debounce = Some(token.clone());
            true
        });
        if !applied {
            return;
        }

        let entry = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(PARSE_DEBOUNCE) => entry.run_parse().await,
            }
        });
    }

    async fn run_parse(&self) {
        let prepared = self.update(|inner| {
            let backend = inner.backend.clone()?;
            let query = inner.text.trim().to_string();
            inner.cancel_parse();
            if inner.mode() != EntryMode::Natural || query.is_empty() {
                inner.preview = None;
                inner.error = None;
                inner.is_loading = false;
                return None;
            }

            let token = CancellationToken::new();
            inner.parse = Some(token.clone());
            inner.is_loading = true;
            inner.error = None;
            Some((backend, query, token, inner.parse_generation))
        });
        let Some((backend, query, token, generation)) = prepared else {
            return;
        };

        let outcome = tokio::select! {
            _ = token.cancelled() => return,
            outcome = backend.parse(&query) => outcome,
        };

        self.update(|inner| {
            if inner.parse_generation != generation {
                return;
            }
            inner.parse = None;
            inner.is_loading = false;
            if inner.text.trim() != query {
                return;
            }
            match outcome {
                Ok(preview) => inner.preview = Some(preview),
                Err(error) => {
                    inner.preview = None;
                    inner.error = Some(error.to_string());
                }
            }
        });
    }

    /// Schedules the parsed preview, or the raw draft when nothing has been
    /// parsed yet. A second submit while one is in flight is dropped.
    pub(crate) async fn submit(&self) {
        let Some(_submitting) = AtomicFlagGuard::try_set(&self.shared.is_submitting) else {
            return;
        };

        let prepared = self.update(|inner| {
            let backend = inner.backend.clone()?;
            if inner.mode() != EntryMode::Natural {
                return None;
            }
            if inner.selected_calendar_id.is_none() {
                inner.submit_error = Some(SELECT_CALENDAR_MESSAGE.to_string());
                return None;
            }
            let request = match &inner.preview {
                Some(preview) => ScheduleRequest::Event(preview.clone()),
                None if inner.text.trim().is_empty() => return None,
                None => ScheduleRequest::Text(inner.text.clone()),
            };

            inner.cancel_debounce();
            inner.cancel_parse();
            inner.is_loading = false;
            inner.submit_loading = true;
            inner.submit_error = None;
            Some((backend, request))
        });
        let Some((backend, request)) = prepared else {
            return;
        };

        let result = backend.schedule(&request).await;
        let scheduled = self.update(|inner| {
            inner.submit_loading = false;
            match result {
                Ok(()) => {
                    inner.text.clear();
                    inner.preview = None;
                    inner.error = None;
                    true
                }
                Err(error) => {
                    append_desktop_log(&format!("schedule request failed: {error}"));
                    inner.submit_error = Some(error.to_string());
                    false
                }
            }
        });

        if scheduled {
            self.shared.host.hide_window();
        }
    }

    pub(crate) async fn select_calendar(&self, calendar_id: String) {
        if calendar_id.is_empty() {
            return;
        }

        let backend = self.update(|inner| {
            inner.selected_calendar_id = Some(calendar_id.clone());
            inner.calendar_error = None;
            inner.backend.clone()
        });
        let Some(backend) = backend else {
            return;
        };

        if let Err(error) = backend.set_calendar(&calendar_id).await {
            self.update(|inner| inner.calendar_error = Some(error.to_string()));
        }
    }

    pub(crate) async fn cycle_calendar(&self, step: i32) {
        let next = {
            let inner = self.lock();
            calendar_options::cycle_calendar_id(
                &inner.calendars,
                inner.selected_calendar_id.as_deref(),
                step,
            )
            .filter(|id| inner.selected_calendar_id.as_deref() != Some(*id))
            .map(str::to_string)
        };

        if let Some(calendar_id) = next {
            self.select_calendar(calendar_id).await;
        }
    }

    async fn load_calendars(&self, backend: Arc<dyn BackendApi>, token: CancellationToken) {
        let mut retry = CalendarRetry::default();
        loop {
            self.update(|inner| {
                inner.calendar_loading = true;
                inner.calendar_error = None;
                inner.calendar_retries = retry.attempt();
            });

            let settings = tokio::select! {
                _ = token.cancelled() => return,
                settings = backend.settings() => settings,
            };
            self.update(|inner| match settings {
                Ok(settings) => {
                    if let Some(calendar_id) = settings.selected_calendar_id {
                        inner.selected_calendar_id = Some(calendar_id);
                    }
                }
                Err(error) => inner.calendar_error = Some(error.to_string()),
            });

            let calendars = tokio::select! {
                _ = token.cancelled() => return,
                calendars = backend.calendars() => calendars,
            };
            let retry_delay = self.update(|inner| {
                inner.calendar_loading = false;
                match calendars {
                    Ok(calendars) => {
                        let writable = calendar_options::writable_calendars(calendars);
                        if inner.selected_calendar_id.is_none() {
                            inner.selected_calendar_id =
                                calendar_options::primary_calendar_id(&writable).map(str::to_string);
                        }
                        inner.calendars = writable;
                        None
                    }
                    Err(error) => {
                        append_desktop_log(&format!(
                            "calendar load failed (attempt {}): {error}",
                            retry.attempt() + 1
                        ));
                        inner.calendar_error = Some(error.to_string());
                        retry.on_failure()
                    }
                }
            });

            let Some(delay) = retry_delay else {
                return;
            };
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
