// ── Sparkline projection ──
//
// Maps a numeric series onto a `width` x `height` box with y growing
// downward (screen coordinates). Degenerate inputs never divide by
// zero: a single value or a constant series sits on the midline.

use std::iter::FusedIterator;

/// A projected point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Lazy iterator over projected points. Clone it to restart.
#[derive(Debug, Clone)]
pub struct Projection<'a> {
    values: &'a [f64],
    width: f64,
    height: f64,
    min: f64,
    range: f64,
    next: usize,
}

/// Project `values` into a `width` x `height` box.
pub fn project(values: &[f64], width: f64, height: f64) -> Projection<'_> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = if values.is_empty() { 0.0 } else { max - min };

    Projection {
        values,
        width,
        height,
        min,
        range,
        next: 0,
    }
}

/// Index of the sample nearest to pointer position `x`, clamped to the
/// series. `None` for an empty series.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn nearest_index(x: f64, width: f64, n: usize) -> Option<usize> {
    let last = n.checked_sub(1)?;
    if last == 0 || width <= 0.0 {
        return Some(0);
    }
    let raw = ((x / width) * to_f64(last)).round();
    if raw.is_nan() {
        return Some(0);
    }
    Some((raw.clamp(0.0, to_f64(last)) as usize).min(last))
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn to_f64(n: usize) -> f64 {
    n as f64
}

impl Iterator for Projection<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let value = *self.values.get(self.next)?;
        let index = self.next;
        self.next += 1;

        let n = self.values.len();
        let x = if n > 1 {
            (to_f64(index) / to_f64(n - 1)) * self.width
        } else {
            0.0
        };
        let y = if self.range > 0.0 && self.range.is_finite() {
            self.height - ((value - self.min) / self.range) * self.height
        } else {
            self.height / 2.0
        };
        Some(Point { x, y })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.values.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Projection<'_> {}

impl FusedIterator for Projection<'_> {}
