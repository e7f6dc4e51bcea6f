//! Pan/zoom transform from world to screen coordinates.

/// Smallest allowed zoom.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed zoom.
pub const MAX_SCALE: f64 = 4.0;
/// Scale step of the zoom-in button.
pub const ZOOM_IN_FACTOR: f64 = 1.2;
/// Scale step of the zoom-out button.
pub const ZOOM_OUT_FACTOR: f64 = 0.8;
/// Seconds a programmatic zoom takes
pub const ZOOM_DURATION: f64 = 0.3;
/// Scale step per wheel notch toward the user.
pub const WHEEL_ZOOM_IN: f64 = 1.1;
/// Scale step per wheel notch away from the user.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// `screen = world * k + (x, y)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation
	pub x: f64,
	/// Vertical translation
	pub y: f64,
	/// Scale
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Inverse of [`Self::world_to_screen`].
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Maps a world point onto the canvas.
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Scales by `factor` around a screen point, keeping the world point
	/// under it fixed. The scale is clamped to `[MIN_SCALE, MAX_SCALE]`.
	pub fn zoomed_at(&self, factor: f64, sx: f64, sy: f64) -> Self {
		let k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
		let ratio = k / self.k;
		Self {
			x: sx - (sx - self.x) * ratio,
			y: sy - (sy - self.y) * ratio,
			k,
		}
	}

	/// Translates by a screen-space delta.
	pub fn panned(&self, dx: f64, dy: f64) -> Self {
		Self {
			x: self.x + dx,
			y: self.y + dy,
			k: self.k,
		}
	}

	/// Linear blend. Two transforms anchored on the same point stay anchored
	/// on it for every `t`, since the translation is affine in the scale.
	pub fn lerp(&self, other: &Self, t: f64) -> Self {
		Self {
			x: self.x + (other.x - self.x) * t,
			y: self.y + (other.y - self.y) * t,
			k: self.k + (other.k - self.k) * t,
		}
	}
}

/// Eased transition between two transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomAnimation {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

impl ZoomAnimation {
	/// Starts an animation of [`ZOOM_DURATION`].
	pub fn new(from: ViewTransform, to: ViewTransform) -> Self {
		Self {
			from,
			to,
			elapsed: 0.0,
			duration: ZOOM_DURATION,
		}
	}

	/// Where the animation ends.
	pub fn target(&self) -> ViewTransform {
		self.to
	}

	/// Transform at the elapsed time.
	pub fn current(&self) -> ViewTransform {
		let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
		if t >= 1.0 {
			return self.to;
		}
		self.from.lerp(&self.to, ease_in_out_cubic(t))
	}

	/// Advances by `dt` seconds and returns the transform at the new time.
	pub fn step(&mut self, dt: f64) -> ViewTransform {
		self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
		self.current()
	}

	/// True once the whole duration has elapsed.
	pub fn is_finished(&self) -> bool {
		self.elapsed >= self.duration
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_zoom_keeps_anchor_fixed() {
		let t = ViewTransform {
			x: 30.0,
			y: -20.0,
			k: 1.5,
		};
		let before = t.screen_to_world(200.0, 150.0);
		let z = t.zoomed_at(1.1, 200.0, 150.0);
		let after = z.screen_to_world(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn test_zoom_clamps() {
		let mut t = ViewTransform::default();
		for _ in 0..100 {
			t = t.zoomed_at(ZOOM_IN_FACTOR, 10.0, 10.0);
		}
		assert_eq!(t.k, MAX_SCALE);
		for _ in 0..100 {
			t = t.zoomed_at(ZOOM_OUT_FACTOR, 10.0, 10.0);
		}
		assert_eq!(t.k, MIN_SCALE);
	}

	#[test]
	fn test_round_trip_coordinates() {
		let t = ViewTransform {
			x: 12.0,
			y: 7.0,
			k: 2.0,
		};
		let (wx, wy) = t.screen_to_world(100.0, 50.0);
		assert_eq!(t.world_to_screen(wx, wy), (100.0, 50.0));
	}

	#[test]
	fn test_animation_eases_to_target() {
		let from = ViewTransform::default();
		let to = from.zoomed_at(ZOOM_IN_FACTOR, 400.0, 300.0);
		let mut anim = ZoomAnimation::new(from, to);

		let mid = anim.step(ZOOM_DURATION / 2.0);
		assert!(mid.k > from.k && mid.k < to.k);
		assert!(!anim.is_finished());

		let (wx, wy) = mid.screen_to_world(400.0, 300.0);
		assert!((wx - 400.0).abs() < 1e-9 && (wy - 300.0).abs() < 1e-9);

		let end = anim.step(1.0);
		assert!(anim.is_finished());
		assert_eq!(end, to);
	}

	#[test]
	fn test_easing_endpoints() {
		assert_eq!(ease_in_out_cubic(0.0), 0.0);
		assert_eq!(ease_in_out_cubic(1.0), 1.0);
		assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-12);
	}
}
