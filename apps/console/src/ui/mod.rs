pub mod assistant;
pub mod cases;
pub mod followups;
pub mod login;
pub mod nav;
pub mod notifications;
pub mod tasks;
pub mod upload;

/// Human-in-the-loop guard in front of every delete call.
#[cfg(target_arch = "wasm32")]
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .map(|window| window.confirm_with_message(message).unwrap_or(false))
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn confirm(_message: &str) -> bool {
    true
}

#[cfg(target_arch = "wasm32")]
pub fn copy_to_clipboard(text: &str) {
    if let Some(window) = web_sys::window() {
        // Fire-and-forget; clipboard denial is not worth surfacing.
        let _ = window.navigator().clipboard().write_text(text);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn copy_to_clipboard(_text: &str) {}
