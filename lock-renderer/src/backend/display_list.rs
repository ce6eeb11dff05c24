//! Display-list backend for headless hosts and tests.
//!
//! Records every primitive instead of rasterizing it. Hosts without a
//! drawing surface (the CLI, unit tests) paint into this backend and inspect
//! the resulting commands.

use serde::Serialize;

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

/// One recorded drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Erase the surface.
    Clear {
        /// Surface width.
        width: u32,
        /// Surface height.
        height: u32,
    },
    /// Circle outline.
    StrokeCircle {
        /// Centre X.
        x: f32,
        /// Centre Y.
        y: f32,
        /// Radius.
        radius: f32,
        /// Stroke colour.
        color: String,
        /// Stroke width.
        line_width: f32,
    },
    /// Filled disc.
    FillCircle {
        /// Centre X.
        x: f32,
        /// Centre Y.
        y: f32,
        /// Radius.
        radius: f32,
        /// Fill colour.
        color: String,
    },
    /// Open polyline.
    Polyline {
        /// Vertices in order.
        points: Vec<(f32, f32)>,
        /// Stroke colour.
        color: String,
        /// Stroke width.
        line_width: f32,
    },
}

/// Recording backend.
#[derive(Debug, Clone)]
pub struct DisplayListBackend {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DisplayListBackend {
    /// Create a backend for a surface of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Commands recorded since the last [`Self::take_commands`].
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Remove and return the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    fn record(&mut self, command: DrawCommand) {
        tracing::trace!(?command, "Draw");
        self.commands.push(command);
    }
}

impl Default for DisplayListBackend {
    fn default() -> Self {
        Self::new(300, 300)
    }
}

impl RenderBackend for DisplayListBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::DisplayList
    }

    fn clear(&mut self) -> RenderResult<()> {
        self.record(DrawCommand::Clear {
            width: self.width,
            height: self.height,
        });
        Ok(())
    }

    fn stroke_circle(
        &mut self,
        center: (f32, f32),
        radius: f32,
        color: &str,
        line_width: f32,
    ) -> RenderResult<()> {
        self.record(DrawCommand::StrokeCircle {
            x: center.0,
            y: center.1,
            radius,
            color: color.to_string(),
            line_width,
        });
        Ok(())
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: &str) -> RenderResult<()> {
        self.record(DrawCommand::FillCircle {
            x: center.0,
            y: center.1,
            radius,
            color: color.to_string(),
        });
        Ok(())
    }

    fn polyline(
        &mut self,
        points: &[(f32, f32)],
        color: &str,
        line_width: f32,
    ) -> RenderResult<()> {
        self.record(DrawCommand::Polyline {
            points: points.to_vec(),
            color: color.to_string(),
            line_width,
        });
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::Surface(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        self.width = width;
        self.height = height;
        tracing::debug!("Display list resized to {}x{}", width, height);
        Ok(())
    }
}
