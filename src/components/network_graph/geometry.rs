//! Trimmed edge paths with room for an arrowhead.

/// Gap between an entity's rim and the line end.
pub const EDGE_PADDING: f64 = 4.0;
/// Length of the arrowhead along the line.
pub const ARROW_LENGTH: f64 = 10.0;

/// A resolved link ready to draw: the line runs `start -> end`, the
/// arrowhead fills `end -> tip`. `(ux, uy)` is the source-to-target unit
/// vector, zero when the path is degenerate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgePath {
	/// Line start, just outside the source rim
	pub start: (f64, f64),
	/// Line end and arrowhead base
	pub end: (f64, f64),
	/// Arrowhead point, just outside the target rim
	pub tip: (f64, f64),
	/// Unit vector x
	pub ux: f64,
	/// Unit vector y
	pub uy: f64,
}

impl EdgePath {
	fn collapsed(x: f64, y: f64) -> Self {
		Self {
			start: (x, y),
			end: (x, y),
			tip: (x, y),
			ux: 0.0,
			uy: 0.0,
		}
	}

	/// Distance from `start` to `tip`.
	pub fn length(&self) -> f64 {
		let (dx, dy) = (self.tip.0 - self.start.0, self.tip.1 - self.start.1);
		(dx * dx + dy * dy).sqrt()
	}

	/// Coincident centers: no direction to draw in.
	pub fn is_degenerate(&self) -> bool {
		self.ux == 0.0 && self.uy == 0.0
	}
}

/// Trims the segment between two circles so it leaves the source rim and
/// stops an arrowhead short of the target rim. Coincident centers give a
/// zero-length path at the source. When the circles are too close for the
/// trim, the path collapses to the midpoint of the gap.
pub fn resolve_edge(
	source: (f64, f64),
	source_radius: f64,
	target: (f64, f64),
	target_radius: f64,
) -> EdgePath {
	let (dx, dy) = (target.0 - source.0, target.1 - source.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if !(dist > f64::EPSILON) {
		return EdgePath::collapsed(source.0, source.1);
	}
	let (ux, uy) = (dx / dist, dy / dist);

	let head = source_radius + EDGE_PADDING;
	let tail = target_radius + EDGE_PADDING;
	if head + tail + ARROW_LENGTH > dist {
		let mid = (head + (dist - tail)) / 2.0;
		let (x, y) = (source.0 + ux * mid, source.1 + uy * mid);
		return EdgePath {
			ux,
			uy,
			..EdgePath::collapsed(x, y)
		};
	}

	let tip = (target.0 - ux * tail, target.1 - uy * tail);
	EdgePath {
		start: (source.0 + ux * head, source.1 + uy * head),
		end: (tip.0 - ux * ARROW_LENGTH, tip.1 - uy * ARROW_LENGTH),
		tip,
		ux,
		uy,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: (f64, f64), b: (f64, f64)) -> bool {
		(a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
	}

	#[test]
	fn test_trims_both_ends() {
		let path = resolve_edge((0.0, 0.0), 16.0, (100.0, 0.0), 15.0);
		assert!(close(path.start, (20.0, 0.0)));
		assert!(close(path.tip, (81.0, 0.0)));
		assert!(close(path.end, (71.0, 0.0)));
		assert_eq!((path.ux, path.uy), (1.0, 0.0));
	}

	#[test]
	fn test_diagonal_direction_is_unit() {
		let path = resolve_edge((0.0, 0.0), 10.0, (300.0, 400.0), 10.0);
		assert!(((path.ux * path.ux + path.uy * path.uy) - 1.0).abs() < 1e-12);
		assert!(close(path.start, (0.6 * 14.0, 0.8 * 14.0)));
	}

	#[test]
	fn test_coincident_centers_give_zero_length() {
		let path = resolve_edge((5.0, 5.0), 16.0, (5.0, 5.0), 15.0);
		assert!(path.is_degenerate());
		assert_eq!(path.length(), 0.0);
		assert!(path.start.0.is_finite() && path.tip.1.is_finite());
	}

	#[test]
	fn test_overlapping_circles_collapse() {
		let path = resolve_edge((0.0, 0.0), 30.0, (40.0, 0.0), 15.0);
		assert_eq!(path.length(), 0.0);
		assert!(!path.is_degenerate());
		assert!(path.start.0.is_finite());
	}
}
