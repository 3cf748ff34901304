//! Notice delivery adapter for browser contexts.

use platform_host::{Notice, NoticeLevel, NotificationService};

#[derive(Debug, Clone, Copy, Default)]
/// Notice adapter that mirrors notices to the browser devtools console.
///
/// Toast rendering belongs to the UI layer; this adapter only keeps a trace of what the user
/// was shown.
pub struct WebConsoleNotificationService;

impl WebConsoleNotificationService {
    /// Formats a notice as a single console line.
    pub fn render(notice: &Notice) -> String {
        let tag = match notice.level {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
        };
        if notice.description.trim().is_empty() {
            format!("[{tag}] {}", notice.title)
        } else {
            format!("[{tag}] {}: {}", notice.title, notice.description)
        }
    }
}

impl NotificationService for WebConsoleNotificationService {
    fn notify(&self, notice: &Notice) {
        let rendered = Self::render(notice);

        #[cfg(target_arch = "wasm32")]
        {
            let line = wasm_bindgen::JsValue::from_str(&rendered);
            match notice.level {
                NoticeLevel::Warning => web_sys::console::warn_1(&line),
                _ => web_sys::console::log_1(&line),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = rendered;
        }
    }
}
