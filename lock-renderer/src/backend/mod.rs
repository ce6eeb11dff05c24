//! Rendering backend implementations.

pub mod display_list;

use crate::{BackendType, RenderResult};

/// 2D drawing primitives the lock view is painted with.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Erase the whole surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is unavailable.
    fn clear(&mut self) -> RenderResult<()>;

    /// Stroke a circle outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the draw call fails.
    fn stroke_circle(
        &mut self,
        center: (f32, f32),
        radius: f32,
        color: &str,
        line_width: f32,
    ) -> RenderResult<()>;

    /// Fill a disc.
    ///
    /// # Errors
    ///
    /// Returns an error if the draw call fails.
    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: &str) -> RenderResult<()>;

    /// Stroke an open polyline through `points`.
    ///
    /// # Errors
    ///
    /// Returns an error if the draw call fails.
    fn polyline(&mut self, points: &[(f32, f32)], color: &str, line_width: f32)
        -> RenderResult<()>;

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;
}
