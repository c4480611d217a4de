use std::env;

use tauri::{window::Color, AppHandle, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{
    DEV_SERVER_URL_ENV, MAIN_WINDOW_LABEL, WINDOW_BACKGROUND_RGB, WINDOW_HEIGHT_COMPACT,
    WINDOW_WIDTH,
};

const BUNDLED_ENTRY: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RendererTarget {
    DevServer(Url),
    Bundled,
}

impl RendererTarget {
    pub(crate) fn resolve(dev_server_url: Option<&str>) -> Result<Self, String> {
        let Some(raw) = dev_server_url.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(Self::Bundled);
        };
        Url::parse(raw)
            .map(Self::DevServer)
            .map_err(|error| format!("Invalid {DEV_SERVER_URL_ENV} '{raw}': {error}"))
    }

    fn webview_url(&self) -> WebviewUrl {
        match self {
            Self::DevServer(url) => WebviewUrl::External(url.clone()),
            Self::Bundled => WebviewUrl::App(BUNDLED_ENTRY.into()),
        }
    }
}

pub(crate) fn create_main_window<F>(app_handle: &AppHandle, log: F) -> Result<WebviewWindow, String>
where
    F: Fn(&str),
{
    let dev_server_url = env::var(DEV_SERVER_URL_ENV).ok();
    let target = match RendererTarget::resolve(dev_server_url.as_deref()) {
        Ok(target) => target,
        Err(error) => {
            log(&format!("{error}; falling back to bundled renderer"));
            RendererTarget::Bundled
        }
    };
    log(&format!("loading renderer from {target:?}"));

    let (red, green, blue) = WINDOW_BACKGROUND_RGB;
    let builder = WebviewWindowBuilder::new(app_handle, MAIN_WINDOW_LABEL, target.webview_url())
        .title("Cumo")
        .inner_size(f64::from(WINDOW_WIDTH), f64::from(WINDOW_HEIGHT_COMPACT))
        .decorations(false)
        .background_color(Color(red, green, blue, 255))
        .always_on_top(true)
        .skip_taskbar(true)
        .visible(false)
        .resizable(false)
        .center();

    #[cfg(target_os = "macos")]
    let builder = builder.visible_on_all_workspaces(true);

    builder
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))
}
