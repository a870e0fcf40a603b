//! Pointer-driven radial attraction.

/// Radius within which the pointer perturbs node targets.
pub const INFLUENCE_RADIUS: f64 = 200.0;

/// Pull exerted on a node by the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Influence {
	/// Unit vector from the node toward the pointer.
	pub direction: (f64, f64),
	/// Falloff in `0..=1`, 1 at the pointer and 0 at the influence radius.
	pub magnitude: f64,
}

/// Latest raw pointer position. No smoothing: the last write wins.
#[derive(Clone, Debug, Default)]
pub struct PointerField {
	position: Option<(f64, f64)>,
}

impl PointerField {
	pub fn update_pointer(&mut self, x: f64, y: f64) {
		if x.is_finite() && y.is_finite() {
			self.position = Some((x, y));
		}
	}

	/// Forget the pointer, e.g. when it leaves the window.
	pub fn clear(&mut self) {
		self.position = None;
	}

	pub fn position(&self) -> Option<(f64, f64)> {
		self.position
	}

	pub fn influence_at(&self, (nx, ny): (f64, f64)) -> Option<Influence> {
		let (px, py) = self.position?;
		let (dx, dy) = (px - nx, py - ny);
		let distance = (dx * dx + dy * dy).sqrt();
		if distance >= INFLUENCE_RADIUS {
			return None;
		}
		// A node sitting exactly under the pointer has no defined heading.
		let direction = if distance < 1e-9 {
			(1.0, 0.0)
		} else {
			(dx / distance, dy / distance)
		};
		Some(Influence {
			direction,
			magnitude: ((INFLUENCE_RADIUS - distance) / INFLUENCE_RADIUS).max(0.0),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_pointer_means_no_influence() {
		let field = PointerField::default();
		assert!(field.influence_at((10.0, 10.0)).is_none());
	}

	#[test]
	fn influence_falls_off_linearly() {
		let mut field = PointerField::default();
		field.update_pointer(100.0, 0.0);

		let inf = field.influence_at((0.0, 0.0)).unwrap();
		assert!((inf.magnitude - 0.5).abs() < 1e-12);
		assert!((inf.direction.0 - 1.0).abs() < 1e-12);
		assert!(inf.direction.1.abs() < 1e-12);

		assert!(field.influence_at((-100.0, 0.0)).is_none());
		assert!(field.influence_at((-150.0, 0.0)).is_none());
	}

	#[test]
	fn coincident_pointer_has_full_strength() {
		let mut field = PointerField::default();
		field.update_pointer(40.0, 40.0);
		let inf = field.influence_at((40.0, 40.0)).unwrap();
		assert_eq!(inf.magnitude, 1.0);
		let len = (inf.direction.0.powi(2) + inf.direction.1.powi(2)).sqrt();
		assert!((len - 1.0).abs() < 1e-12);
	}

	#[test]
	fn latest_write_wins_and_clear_resets() {
		let mut field = PointerField::default();
		field.update_pointer(1.0, 2.0);
		field.update_pointer(3.0, 4.0);
		assert_eq!(field.position(), Some((3.0, 4.0)));
		field.update_pointer(f64::NAN, 0.0);
		assert_eq!(field.position(), Some((3.0, 4.0)));
		field.clear();
		assert_eq!(field.position(), None);
	}
}
