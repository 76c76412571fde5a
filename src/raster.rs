use crate::canvas::{Canvas, Fill};
use crate::model::{Collider, Vec2};

/// Strength at or below this is drawn solid.
pub const FULL_THRESHOLD: f64 = 0.75;
/// Strength at or below this (and above `FULL_THRESHOLD`) is drawn shaded.
pub const SHADE_THRESHOLD: f64 = 1.0;

/// Normalized squared distance of `point` from `origin` under an ellipse with
/// semi-axes `half_width` (columns) and `half_height` (rows).
///
/// Below 1 inside, exactly 1 on the rim, above 1 outside. The value grows
/// quadratically: a point one full semi-axis past the rim scores 4.
pub fn oval_strength(point: Vec2, origin: Vec2, half_width: f64, half_height: f64) -> f64 {
    let d = point - origin;
    (d.y * d.y) / (half_width * half_width) + (d.x * d.x) / (half_height * half_height)
}

/// Visual footprint of the ball.
#[derive(Clone, Copy, Debug)]
pub struct DiscShape {
    pub reach_rows: i64,
    pub reach_cols: i64,
    pub half_width: f64,
    pub half_height: f64,
}

impl DiscShape {
    /// `radius_damper` scales the ellipse by `1 - radius_damper`; a negative
    /// value grows it past the collider. Physics never sees it.
    pub fn new(collider: Collider, radius_damper: f64) -> Self {
        let (reach_rows, reach_cols) = collider.cell_reach();
        let scale = 1.0 - radius_damper;
        Self {
            reach_rows,
            reach_cols,
            half_width: reach_cols as f64 * scale,
            half_height: reach_rows as f64 * scale,
        }
    }

    /// Strength of `cell` around `center`. An axis with a zero semi-axis
    /// only admits the center line, so a radius 0 ball is a single cell.
    pub fn strength(&self, cell: Vec2, center: Vec2) -> f64 {
        if self.half_width > 0.0 && self.half_height > 0.0 {
            return oval_strength(cell, center, self.half_width, self.half_height);
        }
        let d = cell - center;
        let axis = |off: f64, half: f64| {
            if half > 0.0 {
                (off * off) / (half * half)
            } else if off == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        };
        axis(d.y, self.half_width) + axis(d.x, self.half_height)
    }
}

/// Stamp the ball centered on the cell nearest to `pos`. Cells outside the
/// ellipse, or outside the canvas, keep their current state.
pub fn rasterize(pos: Vec2, canvas: &mut Canvas, shape: &DiscShape) {
    let (cr, cc) = pos.to_cell();
    let center = Vec2::new(cr as f64, cc as f64);

    for row in (cr - shape.reach_rows)..=(cr + shape.reach_rows) {
        for col in (cc - shape.reach_cols)..=(cc + shape.reach_cols) {
            if canvas.get(row, col).is_none() {
                continue;
            }
            let s = shape.strength(Vec2::new(row as f64, col as f64), center);
            if s <= FULL_THRESHOLD {
                canvas.set(row, col, Fill::Full);
            } else if s <= SHADE_THRESHOLD {
                canvas.set(row, col, Fill::Shaded);
            }
        }
    }
}
