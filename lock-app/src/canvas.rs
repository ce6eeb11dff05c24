//! `CanvasRenderingContext2d` backend.

use std::f64::consts::TAU;

use lock_renderer::{BackendType, RenderBackend, RenderError, RenderResult};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Paints onto an HTML canvas element.
pub struct DomCanvasBackend {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl DomCanvasBackend {
    /// Wrap a canvas and its 2D context.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    fn arc(&self, center: (f32, f32), radius: f32) -> RenderResult<()> {
        self.ctx.begin_path();
        self.ctx
            .arc(
                f64::from(center.0),
                f64::from(center.1),
                f64::from(radius),
                0.0,
                TAU,
            )
            .map_err(draw_error)
    }
}

impl RenderBackend for DomCanvasBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Canvas2D
    }

    fn clear(&mut self) -> RenderResult<()> {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        Ok(())
    }

    fn stroke_circle(
        &mut self,
        center: (f32, f32),
        radius: f32,
        color: &str,
        line_width: f32,
    ) -> RenderResult<()> {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(f64::from(line_width));
        self.arc(center, radius)?;
        self.ctx.close_path();
        self.ctx.stroke();
        Ok(())
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: &str) -> RenderResult<()> {
        self.ctx.set_fill_style_str(color);
        self.arc(center, radius)?;
        self.ctx.close_path();
        self.ctx.fill();
        Ok(())
    }

    fn polyline(
        &mut self,
        points: &[(f32, f32)],
        color: &str,
        line_width: f32,
    ) -> RenderResult<()> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(f64::from(line_width));
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(first.0), f64::from(first.1));
        for (x, y) in rest {
            self.ctx.line_to(f64::from(*x), f64::from(*y));
        }
        self.ctx.stroke();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::Surface(format!(
                "invalid canvas size {width}x{height}"
            )));
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }
}

#[allow(clippy::needless_pass_by_value)]
fn draw_error(err: JsValue) -> RenderError {
    RenderError::Draw(format!("{err:?}"))
}
