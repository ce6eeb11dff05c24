//! # Gesture Lock WASM Application
//!
//! Binds the lock to an HTML canvas and persists the pattern in
//! `localStorage`.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web lock-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { GestureLockApp } from './pkg/lock_app.js';
//!
//! await init();
//! const app = new GestureLockApp('lock-canvas', 300, 300, 3);
//! canvas.addEventListener('touchstart', (e) => app.handleTouchEvent(e));
//! canvas.addEventListener('touchmove', (e) => app.handleTouchEvent(e));
//! canvas.addEventListener('touchend', (e) => app.handleTouchEvent(e));
//!
//! function frame() {
//!     app.frame();
//!     title.textContent = app.title();
//!     requestAnimationFrame(frame);
//! }
//! requestAnimationFrame(frame);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod storage;

use std::time::Duration;

use lock_core::{
    GestureLock, LockConfig, LockError, MemoryStore, PatternStore, TouchEvent, TouchPhase,
    TouchPoint,
};
use lock_renderer::{LockStyle, LockView, Renderer};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, DomRect, HtmlCanvasElement};

pub use canvas::DomCanvasBackend;
pub use storage::LocalStorageStore;

type AppLock = GestureLock<Box<dyn PatternStore>, LockView>;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Gesture Lock WASM initialized");
}

/// The lock widget attached to a canvas element.
#[wasm_bindgen]
pub struct GestureLockApp {
    lock: AppLock,
    renderer: Renderer,
    canvas: HtmlCanvasElement,
    last_frame_ms: Option<f64>,
}

#[wasm_bindgen]
impl GestureLockApp {
    /// Attach the lock to the canvas with the given element ID.
    ///
    /// The canvas is sized to `width` x `height`. Without `matrix` the
    /// default 3x3 grid is used, unless a stored pattern names another size.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is empty, the element is not a canvas, the
    /// 2D context is unavailable, or the size is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        width: u32,
        height: u32,
        matrix: Option<u32>,
    ) -> Result<GestureLockApp, JsValue> {
        if canvas_id.is_empty() {
            return Err(to_js(&LockError::MissingParameter("canvas id")));
        }

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object"))?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas element '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("Element is not a canvas"))?;

        let ctx = canvas
            .get_context("2d")
            .map_err(|_| JsValue::from_str("Failed to get 2D context"))?
            .ok_or_else(|| JsValue::from_str("2D context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Failed to cast to 2D context"))?;

        #[allow(clippy::cast_precision_loss)]
        let mut config = LockConfig::new(width as f32, height as f32);
        if let Some(matrix) = matrix {
            config = config.with_matrix(matrix);
        }
        config.validate().map_err(|e| to_js(&e))?;

        let store: Box<dyn PatternStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::warn!("localStorage unavailable, pattern will not persist: {e}");
                Box::new(MemoryStore::new())
            }
        };

        let mut renderer = Renderer::with_backend(
            Box::new(DomCanvasBackend::new(canvas.clone(), ctx)),
            LockStyle::default(),
        );
        renderer
            .resize(width, height)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let lock = GestureLock::new(config, store, LockView::new()).map_err(|e| to_js(&e))?;

        let mut app = Self {
            lock,
            renderer,
            canvas,
            last_frame_ms: None,
        };
        app.render();
        Ok(app)
    }

    /// Repaint the canvas if anything changed.
    pub fn render(&mut self) {
        if let Err(err) = self.renderer.render_if_dirty(self.lock.sink_mut()) {
            tracing::error!("Renderer error: {:?}", err);
        }
    }

    /// Handle a touch at canvas coordinates. Returns the outcome name
    /// (`enter_again`, `mismatch`, `saved`, `unlocked`, `failed`) when a
    /// gesture was judged.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown phase or if saving the pattern fails.
    #[wasm_bindgen(js_name = handleTouch)]
    pub fn handle_touch(&mut self, x: f32, y: f32, phase: &str) -> Result<Option<String>, JsValue> {
        let event = touch_from_parts(x, y, phase).map_err(|e| JsValue::from_str(&e))?;
        self.dispatch(&event)
    }

    /// Handle a DOM touch event on the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported event type or if saving the
    /// pattern fails.
    #[wasm_bindgen(js_name = handleTouchEvent)]
    pub fn handle_touch_event(
        &mut self,
        event: &web_sys::TouchEvent,
    ) -> Result<Option<String>, JsValue> {
        event.prevent_default();
        let phase = TouchPhase::parse(&event.type_())
            .ok_or_else(|| JsValue::from_str(&format!("Unsupported event '{}'", event.type_())))?;

        let rect = self.canvas.get_bounding_client_rect();
        let list = event.touches();
        let touches = (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|touch| canvas_point(&touch, &rect))
            .collect();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let timestamp_ms = event.time_stamp() as u64;
        self.dispatch(&TouchEvent::new(phase, touches, timestamp_ms))
    }

    /// Advance the deferred reset by the wall-clock time since the previous
    /// frame, then repaint. Call once per animation frame.
    pub fn frame(&mut self) {
        let now = js_sys::Date::now();
        if let Some(last) = self.last_frame_ms.replace(now) {
            self.tick(now - last);
        }
        self.render();
    }

    /// Advance the deferred reset by `elapsed_ms`. Returns `true` when the
    /// previous gesture was cleared.
    pub fn tick(&mut self, elapsed_ms: f64) -> bool {
        self.lock.advance(duration_from_ms(elapsed_ms))
    }

    /// Forget the stored pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern could not be removed from storage.
    #[wasm_bindgen(js_name = resetPassword)]
    pub fn reset_password(&mut self) -> Result<(), JsValue> {
        self.lock.reset_stored_pattern().map_err(|e| to_js(&e))
    }

    /// Rebuild the grid as `matrix` x `matrix`.
    ///
    /// # Errors
    ///
    /// Returns an error if `matrix` is outside `1..=16` or a pattern is
    /// stored for another size.
    #[wasm_bindgen(js_name = setMatrix)]
    pub fn set_matrix(&mut self, matrix: u32) -> Result<(), JsValue> {
        self.lock.change_matrix_size(matrix).map_err(|e| to_js(&e))
    }

    /// Caption to show above the canvas.
    #[must_use]
    pub fn title(&self) -> String {
        self.lock.sink().title().to_string()
    }

    /// Whether the "reset password" control should be visible.
    #[wasm_bindgen(js_name = showResetButton)]
    #[must_use]
    pub fn show_reset_button(&self) -> bool {
        self.lock.sink().show_reset_button()
    }

    /// Workflow phase: `unset`, `awaiting_confirmation` or `locked`.
    #[must_use]
    pub fn phase(&self) -> String {
        self.lock.phase().as_str().to_string()
    }

    /// Grid size in use.
    #[must_use]
    pub fn matrix(&self) -> u32 {
        self.lock.grid().matrix()
    }

    /// Frames painted so far.
    #[wasm_bindgen(js_name = frameCount)]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.renderer.frame_count()
    }
}

impl GestureLockApp {
    fn dispatch(&mut self, event: &TouchEvent) -> Result<Option<String>, JsValue> {
        let outcome = self.lock.handle_touch(event).map_err(|e| to_js(&e))?;
        Ok(outcome.map(|o| o.as_str().to_string()))
    }
}

/// Position of a DOM touch relative to the canvas' top-left corner.
#[allow(clippy::cast_possible_truncation)]
fn canvas_point(touch: &web_sys::Touch, rect: &DomRect) -> TouchPoint {
    TouchPoint {
        id: u32::try_from(touch.identifier()).unwrap_or_default(),
        x: (f64::from(touch.client_x()) - rect.left()) as f32,
        y: (f64::from(touch.client_y()) - rect.top()) as f32,
        pressure: None,
        radius: None,
    }
}

/// Build a single-touch event from loose parts. `end` and `cancel` carry no
/// touch points, like their DOM counterparts.
fn touch_from_parts(x: f32, y: f32, phase: &str) -> Result<TouchEvent, String> {
    let phase = TouchPhase::parse(phase).ok_or_else(|| format!("Unknown touch phase '{phase}'"))?;
    Ok(match phase {
        TouchPhase::Start | TouchPhase::Move => TouchEvent::single(phase, x, y, 0),
        TouchPhase::End | TouchPhase::Cancel => TouchEvent::new(phase, Vec::new(), 0),
    })
}

fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

fn to_js(err: &LockError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_parts_follow_dom_shape() {
        let start = touch_from_parts(10.0, 20.0, "touchstart").expect("phase");
        assert_eq!(start.phase, TouchPhase::Start);
        assert_eq!(start.primary_touch().map(|t| (t.x, t.y)), Some((10.0, 20.0)));

        let end = touch_from_parts(10.0, 20.0, "end").expect("phase");
        assert_eq!(end.phase, TouchPhase::End);
        assert!(end.primary_touch().is_none());
    }

    #[test]
    fn unknown_phase_is_rejected() {
        assert!(touch_from_parts(0.0, 0.0, "wiggle").is_err());
    }

    #[test]
    fn negative_elapsed_time_is_ignored() {
        assert_eq!(duration_from_ms(-5.0), Duration::ZERO);
        assert_eq!(duration_from_ms(f64::NAN), Duration::ZERO);
        assert_eq!(duration_from_ms(250.0), Duration::from_millis(250));
    }
}
