use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tauri::menu::MenuItem;

#[derive(Clone)]
pub(crate) struct TrayMenuState {
    pub(crate) toggle_item: MenuItem<tauri::Wry>,
    pub(crate) restart_backend_item: MenuItem<tauri::Wry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct WindowSize {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Resize request from the webview; both fields must be present to apply.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResizePayload {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
}

impl ResizePayload {
    pub(crate) fn size(&self) -> Option<WindowSize> {
        Some(WindowSize {
            width: self.width?,
            height: self.height?,
        })
    }
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::{AtomicFlagGuard, ResizePayload, WindowSize};

    #[test]
    fn atomic_flag_guard_try_set_rejects_double_set_until_drop() {
        let flag = AtomicBool::new(false);

        let guard = AtomicFlagGuard::try_set(&flag).expect("first set should succeed");
        assert!(flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_some());
    }

    #[test]
    fn resize_payload_requires_both_dimensions() {
        let full: ResizePayload =
            serde_json::from_str(r#"{"width":320,"height":160}"#).expect("payload");
        assert_eq!(
            full.size(),
            Some(WindowSize {
                width: 320,
                height: 160
            })
        );

        let partial: ResizePayload = serde_json::from_str(r#"{"width":320}"#).expect("payload");
        assert_eq!(partial.size(), None);
        assert_eq!(ResizePayload::default().size(), None);
    }
}
