use tauri::{AppHandle, LogicalSize, Manager};

use crate::{tray_labels, WindowSize, MAIN_WINDOW_LABEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowVisibility {
    Visible,
    Hidden,
}

impl WindowVisibility {
    pub fn from_visible(visible: bool) -> Self {
        if visible {
            Self::Visible
        } else {
            Self::Hidden
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityTrigger {
    Shortcut,
    Blur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityTransition {
    ShowAndFocus,
    Hide,
}

pub fn next_transition(
    current: WindowVisibility,
    trigger: VisibilityTrigger,
) -> Option<VisibilityTransition> {
    match (current, trigger) {
        (WindowVisibility::Hidden, VisibilityTrigger::Shortcut) => {
            Some(VisibilityTransition::ShowAndFocus)
        }
        (WindowVisibility::Visible, VisibilityTrigger::Shortcut)
        | (WindowVisibility::Visible, VisibilityTrigger::Blur) => Some(VisibilityTransition::Hide),
        (WindowVisibility::Hidden, VisibilityTrigger::Blur) => None,
    }
}

pub fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("show_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
    tray_labels::update_tray_menu_labels_with_visibility(app_handle, Some(true), &log);
}

pub fn hide_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("hide_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.hide() {
        log(&format!("failed to hide main window: {error}"));
    }
    tray_labels::update_tray_menu_labels_with_visibility(app_handle, Some(false), &log);
}

pub fn resize_main_window<F>(app_handle: &AppHandle, size: WindowSize, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("resize_main_window skipped: main window not found");
        return;
    };

    let logical = LogicalSize::new(f64::from(size.width), f64::from(size.height));
    if let Err(error) = window.set_size(logical) {
        log(&format!(
            "failed to resize main window to {}x{}: {error}",
            size.width, size.height
        ));
    }
}

pub fn apply_visibility_trigger<F>(app_handle: &AppHandle, trigger: VisibilityTrigger, log: F)
where
    F: Fn(&str) + Copy,
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("visibility change skipped: main window not found");
        return;
    };

    let current = match window.is_visible() {
        Ok(visible) => WindowVisibility::from_visible(visible),
        Err(error) => {
            log(&format!("failed to read main window visibility: {error}"));
            return;
        }
    };

    match next_transition(current, trigger) {
        Some(VisibilityTransition::ShowAndFocus) => show_main_window(app_handle, log),
        Some(VisibilityTransition::Hide) => hide_main_window(app_handle, log),
        None => {}
    }
}

pub fn toggle_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str) + Copy,
{
    apply_visibility_trigger(app_handle, VisibilityTrigger::Shortcut, log);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_toggles_between_states() {
        assert_eq!(
            next_transition(WindowVisibility::Hidden, VisibilityTrigger::Shortcut),
            Some(VisibilityTransition::ShowAndFocus)
        );
        assert_eq!(
            next_transition(WindowVisibility::Visible, VisibilityTrigger::Shortcut),
            Some(VisibilityTransition::Hide)
        );
    }

    #[test]
    fn blur_hides_only_a_visible_window() {
        assert_eq!(
            next_transition(WindowVisibility::Visible, VisibilityTrigger::Blur),
            Some(VisibilityTransition::Hide)
        );
        assert_eq!(
            next_transition(WindowVisibility::Hidden, VisibilityTrigger::Blur),
            None
        );
    }

    #[test]
    fn from_visible_maps_window_flag() {
        assert_eq!(WindowVisibility::from_visible(true), WindowVisibility::Visible);
        assert_eq!(WindowVisibility::from_visible(false), WindowVisibility::Hidden);
    }
}
