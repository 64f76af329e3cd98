use crate::geometry::Point;
use crate::math::{lerp, TOLERANCE};

/// Cuts a polyline into the pieces a dashed stroke draws.
///
/// The pattern runs continuously along the whole polyline, so dashes carry
/// across vertices.
#[must_use]
pub fn dash_polyline(points: &[Point], dash: f64, gap: f64) -> Vec<Vec<Point>> {
    let mut pieces = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut drawing = true;
    let mut left = dash;

    if let Some(first) = points.first() {
        current.push(*first);
    }
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let len = a.distance(&b);
        let mut at = 0.0;
        while len - at > left {
            at += left;
            let t = at / len;
            let cut = Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t));
            if drawing {
                current.push(cut);
                pieces.push(std::mem::take(&mut current));
                left = gap;
            } else {
                current.push(cut);
                left = dash;
            }
            drawing = !drawing;
        }
        left -= len - at;
        if drawing {
            current.push(b);
        }
    }
    if drawing && current.len() > 1 {
        pieces.push(current);
    }
    pieces.retain(|piece| piece.windows(2).any(|w| w[0].distance(&w[1]) > TOLERANCE));
    pieces
}
