//! WebAssembly bindings for lock-core.
//!
//! A headless lock for hosts that draw and persist on the JavaScript side:
//! signals are drained as JSON and the stored pattern lives in memory.

use std::time::Duration;

use wasm_bindgen::prelude::*;

use crate::{GestureLock, LockConfig, MemoryStore, Signal};

/// Initialize the lock WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Headless gesture lock for WASM.
#[wasm_bindgen]
pub struct WasmGestureLock {
    lock: GestureLock<MemoryStore, Vec<Signal>>,
}

#[wasm_bindgen]
impl WasmGestureLock {
    /// Create a lock for a surface of the given size.
    ///
    /// # Errors
    ///
    /// Returns an error string for a zero matrix or a degenerate surface.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, matrix: u32) -> Result<WasmGestureLock, String> {
        let config = LockConfig::new(width, height).with_matrix(matrix);
        let lock =
            GestureLock::new(config, MemoryStore::new(), Vec::new()).map_err(|e| e.to_string())?;
        Ok(Self { lock })
    }

    /// Pointer down. Returns `false` if the press was ignored.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.lock.pointer_down(x, y)
    }

    /// Pointer move.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.lock.pointer_move(x, y);
    }

    /// Pointer up. Returns the outcome name (`enter_again`, `mismatch`,
    /// `saved`, `unlocked`, `failed`) or `undefined` for an empty gesture.
    ///
    /// # Errors
    ///
    /// Returns an error string if the confirmed pattern could not be saved.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> Result<Option<String>, String> {
        let outcome = self.lock.pointer_up().map_err(|e| e.to_string())?;
        Ok(outcome.map(|o| o.as_str().to_string()))
    }

    /// Advance the deferred reset by `elapsed_ms`. Returns `true` when it fired.
    #[must_use]
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        self.lock.advance(duration_from_ms(elapsed_ms))
    }

    /// Take all signals emitted since the last call, as a JSON array.
    #[wasm_bindgen(js_name = drainSignalsJson)]
    pub fn drain_signals_json(&mut self) -> String {
        let signals: Vec<Signal> = self.lock.sink_mut().drain(..).collect();
        serde_json::to_string(&signals).unwrap_or_default()
    }

    /// Current workflow phase name.
    #[must_use]
    pub fn phase(&self) -> String {
        self.lock.phase().as_str().to_string()
    }

    /// Forget the stored pattern.
    ///
    /// # Errors
    ///
    /// Returns an error string if the store could not be cleared.
    #[wasm_bindgen(js_name = resetStoredPattern)]
    pub fn reset_stored_pattern(&mut self) -> Result<(), String> {
        self.lock.reset_stored_pattern().map_err(|e| e.to_string())
    }

    /// Switch the grid side length.
    ///
    /// # Errors
    ///
    /// Returns an error string for zero or while a pattern for another grid
    /// is stored.
    #[wasm_bindgen(js_name = setMatrix)]
    pub fn set_matrix(&mut self, matrix: u32) -> Result<(), String> {
        self.lock
            .change_matrix_size(matrix)
            .map_err(|e| e.to_string())
    }

    /// The current grid as JSON.
    #[wasm_bindgen(js_name = getGridJson)]
    #[must_use]
    pub fn get_grid_json(&self) -> String {
        serde_json::to_string(self.lock.grid()).unwrap_or_default()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_millis(ms.round() as u64)
    } else {
        Duration::ZERO
    }
}
