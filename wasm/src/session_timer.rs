//! Browser-side inactivity sign-out

use chrono::{Duration, Utc};
use shared::session::InactivityTracker;
use wasm_bindgen::prelude::*;

/// Signs a session out after a period without user activity.
///
/// Create one when the user signs in, call `reset()` from activity
/// listeners and `stop()` on sign-out. Dropping the timer clears any
/// pending timeout.
#[wasm_bindgen]
pub struct SessionTimer {
    timeout_ms: i32,
    on_expire: js_sys::Function,
    handle: Option<i32>,
    tracker: InactivityTracker,
}

#[wasm_bindgen]
impl SessionTimer {
    #[wasm_bindgen(constructor)]
    pub fn new(timeout_ms: i32, on_expire: js_sys::Function) -> SessionTimer {
        SessionTimer {
            timeout_ms,
            on_expire,
            handle: None,
            tracker: InactivityTracker::new(Duration::milliseconds(i64::from(timeout_ms)), Utc::now()),
        }
    }

    /// Arm the timer, replacing any pending timeout
    pub fn start(&mut self) -> Result<(), JsValue> {
        self.stop();
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&self.on_expire, self.timeout_ms)?;
        self.handle = Some(handle);
        self.tracker.record_activity(Utc::now());
        Ok(())
    }

    /// Record user activity. Has no effect on a stopped timer, and an
    /// expired session stays signed out.
    pub fn reset(&mut self) -> Result<(), JsValue> {
        if self.tracker.is_expired(Utc::now()) {
            // The browser has already fired `on_expire`
            self.handle = None;
            return Ok(());
        }
        if self.handle.is_some() {
            self.start()?;
        }
        Ok(())
    }

    /// Disarm the timer
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.handle.is_some() && !self.tracker.is_expired(Utc::now())
    }

    /// Milliseconds left before sign-out
    #[wasm_bindgen(getter)]
    pub fn remaining_ms(&self) -> f64 {
        self.tracker.remaining(Utc::now()).num_milliseconds() as f64
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
