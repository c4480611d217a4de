use std::time::Duration;

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const TRAY_ID: &str = "cumo-tray";
pub(crate) const TOGGLE_SHORTCUT: &str = "CommandOrControl+/";

pub(crate) const WINDOW_WIDTH: u32 = 700;
pub(crate) const WINDOW_HEIGHT_COMPACT: u32 = 130;
pub(crate) const WINDOW_HEIGHT_EXPANDED: u32 = 380;
pub(crate) const WINDOW_BACKGROUND_RGB: (u8, u8, u8) = (0x01, 0x00, 0x0f);

pub(crate) const PYTHON_ENV: &str = "CUMO_PYTHON";
pub(crate) const BACKEND_PORT_ENV: &str = "CUMO_BACKEND_PORT";
pub(crate) const BACKEND_DIR_ENV: &str = "CUMO_BACKEND_DIR";
pub(crate) const DEV_SERVER_URL_ENV: &str = "VITE_DEV_SERVER_URL";
pub(crate) const LOG_FILTER_ENV: &str = "CUMO_LOG";

pub(crate) const BACKEND_ENTRYPOINT: &str = "app.py";
pub(crate) const BACKEND_PORT_CANDIDATES: [u16; 4] = [5001, 5000, 5002, 5050];
pub(crate) const BACKEND_PORT_FALLBACK: u16 = 5001;
pub(crate) const BACKEND_PORT_INVALID_OVERRIDE: u16 = 5000;
pub(crate) const RENDERER_BACKEND_PORT_FALLBACK: u16 = 5000;
pub(crate) const BACKEND_EXIT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub(crate) const PARSE_DEBOUNCE: Duration = Duration::from_millis(250);
pub(crate) const CALENDAR_MAX_RETRIES: u32 = 3;
pub(crate) const CALENDAR_RETRY_STEP: Duration = Duration::from_secs(1);

pub(crate) const ENTRY_STATE_EVENT: &str = "quick-entry://state";
