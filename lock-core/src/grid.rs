//! The anchor grid.
//!
//! Anchors sit on an `N x N` lattice derived from the surface width: every
//! anchor has radius `r = width / (4 * N)` and neighbouring centres are `4r`
//! apart, with a `2r` margin to the surface edge.

use serde::{Deserialize, Serialize};

use crate::{LockError, LockResult};

/// Largest supported grid side length.
pub const MAX_MATRIX: u32 = 16;

/// Whether `matrix` is a supported grid side length.
#[must_use]
pub fn matrix_in_range(matrix: u32) -> bool {
    (1..=MAX_MATRIX).contains(&matrix)
}

/// A fixed grid location the user can select.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    /// Centre X in surface coordinates.
    pub x: f32,
    /// Centre Y in surface coordinates.
    pub y: f32,
    /// 1-based row-major index.
    pub index: u32,
}

impl AnchorPoint {
    /// Square hit test: the sample must fall strictly inside the box of
    /// half-width `radius` around the centre on both axes.
    #[must_use]
    pub fn is_hit(&self, x: f32, y: f32, radius: f32) -> bool {
        (x - self.x).abs() < radius && (y - self.y).abs() < radius
    }
}

/// An immutable `matrix x matrix` set of anchors in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    matrix: u32,
    radius: f32,
    points: Vec<AnchorPoint>,
}

impl Grid {
    /// Build the grid for a surface of the given width.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::InvalidMatrix`] if `matrix` is zero or above
    /// [`MAX_MATRIX`], and
    /// [`LockError::InvalidSurface`] if the width is not finite and positive.
    #[allow(clippy::cast_precision_loss)] // matrix and indices are small
    pub fn build(surface_width: f32, matrix: u32) -> LockResult<Self> {
        if !matrix_in_range(matrix) {
            return Err(LockError::InvalidMatrix(matrix));
        }
        if !surface_width.is_finite() || surface_width <= 0.0 {
            return Err(LockError::InvalidSurface {
                width: surface_width,
                height: surface_width,
            });
        }

        let radius = surface_width / (4.0 * matrix as f32);
        let mut points = Vec::with_capacity((matrix * matrix) as usize);
        for row in 0..matrix {
            for col in 0..matrix {
                points.push(AnchorPoint {
                    x: col as f32 * 4.0 * radius + 2.0 * radius,
                    y: row as f32 * 4.0 * radius + 2.0 * radius,
                    index: row * matrix + col + 1,
                });
            }
        }

        tracing::debug!(matrix, radius, "Built {} anchor grid", points.len());
        Ok(Self {
            matrix,
            radius,
            points,
        })
    }

    /// Anchors per side.
    #[must_use]
    pub fn matrix(&self) -> u32 {
        self.matrix
    }

    /// Anchor radius, also the hit-box half-width.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// All anchors in row-major order.
    #[must_use]
    pub fn points(&self) -> &[AnchorPoint] {
        &self.points
    }

    /// Number of anchors (`matrix²`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a built grid; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Look up an anchor by its 1-based index.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&AnchorPoint> {
        let slot = usize::try_from(index.checked_sub(1)?).ok()?;
        self.points.get(slot)
    }

    /// First anchor in grid order whose hit box contains the sample.
    #[must_use]
    pub fn hit(&self, x: f32, y: f32) -> Option<&AnchorPoint> {
        self.points.iter().find(|p| p.is_hit(x, y, self.radius))
    }
}
