//! # Gesture Lock Renderer
//!
//! Presentation layer for the lock: a [`LockView`] listens to core signals
//! and paints itself through a [`RenderBackend`].
//!
//! ## Rendering Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            RenderBackend Trait              │
//! ├──────────────────────┬──────────────────────┤
//! │ Canvas2D (browser,   │ Display list         │
//! │ lives in lock-app)   │ (headless / tests)   │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;
pub mod style;
pub mod view;

pub use backend::display_list::{DisplayListBackend, DrawCommand};
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};
pub use style::LockStyle;
pub use view::{Highlight, LockView};

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Browser `CanvasRenderingContext2d`.
    Canvas2D,
    /// In-memory command recording.
    DisplayList,
}

/// Paints a [`LockView`] frame by frame.
pub struct Renderer {
    style: LockStyle,
    backend: Box<dyn RenderBackend>,
    frame_count: u64,
}

impl Renderer {
    /// Create a renderer over the given backend.
    #[must_use]
    pub fn with_backend(backend: Box<dyn RenderBackend>, style: LockStyle) -> Self {
        Self {
            style,
            backend,
            frame_count: 0,
        }
    }

    /// Create a renderer recording into a display list.
    #[must_use]
    pub fn headless(width: u32, height: u32) -> Self {
        Self::with_backend(
            Box::new(DisplayListBackend::new(width, height)),
            LockStyle::default(),
        )
    }

    /// Render a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&mut self, view: &LockView) -> RenderResult<()> {
        view.paint(self.backend.as_mut(), &self.style)?;
        self.frame_count += 1;
        Ok(())
    }

    /// Render only if the view changed since the last frame. Returns whether
    /// a frame was drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render_if_dirty(&mut self, view: &mut LockView) -> RenderResult<bool> {
        if !view.is_dirty() {
            return Ok(false);
        }
        self.render(view)?;
        view.mark_clean();
        Ok(true)
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// The style in use.
    #[must_use]
    pub fn style(&self) -> &LockStyle {
        &self.style
    }

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lock_core::{GestureLock, LockConfig, MemoryStore};

    #[test]
    fn renders_lock_driven_view() {
        let mut lock = GestureLock::new(LockConfig::default(), MemoryStore::new(), LockView::new())
            .expect("valid");
        let mut renderer = Renderer::headless(300, 300);
        assert_eq!(renderer.active_backend(), BackendType::DisplayList);

        assert!(renderer
            .render_if_dirty(lock.sink_mut())
            .expect("render"));
        assert!(!renderer
            .render_if_dirty(lock.sink_mut())
            .expect("render"));

        lock.pointer_down(50.0, 50.0);
        lock.pointer_move(150.0, 150.0);
        assert_eq!(lock.sink().chosen().len(), 2);
        assert!(renderer
            .render_if_dirty(lock.sink_mut())
            .expect("render"));
        assert_eq!(renderer.frame_count(), 2);
    }

    #[test]
    fn resize_is_forwarded() {
        let mut renderer = Renderer::headless(300, 300);
        assert!(renderer.resize(0, 0).is_err());
        renderer.resize(600, 600).expect("resize");
    }
}
