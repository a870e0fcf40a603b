//! Short-lived lightning arcs converging on a trigger point.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use rand::Rng;

pub const MIN_BURST: usize = 3;
pub const MAX_BURST: usize = 5;
/// Distance range between an arc's start and its trigger point.
pub const MIN_REACH: f64 = 200.0;
pub const MAX_REACH: f64 = 500.0;
/// How far outside the surface an arc may start.
pub const OVERSCAN: f64 = 100.0;
pub const ARC_SEGMENTS: usize = 8;
/// Peak zigzag offset of a fresh arc at full intensity.
pub const ARC_JITTER: f64 = 20.0;

/// One lightning bolt. `end` is always the point that triggered it.
#[derive(Clone, Debug, PartialEq)]
pub struct ElectricArc {
	pub start: (f64, f64),
	pub end: (f64, f64),
	pub intensity: f64,
	/// Creation timestamp in milliseconds.
	pub created_at: f64,
	pub duration_ms: f64,
}

impl ElectricArc {
	pub fn is_expired(&self, now: f64) -> bool {
		now - self.created_at >= self.duration_ms
	}

	pub fn age_fraction(&self, now: f64) -> f64 {
		if self.duration_ms <= 0.0 {
			return 1.0;
		}
		((now - self.created_at) / self.duration_ms).clamp(0.0, 1.0)
	}

	/// Fades linearly over the arc's lifetime; may exceed 1 for intense arcs.
	pub fn opacity(&self, now: f64) -> f64 {
		(1.0 - self.age_fraction(now)) * self.intensity
	}

	/// Jittered polyline from `start` to `end` as seen at `now`.
	pub fn path<R: Rng>(&self, now: f64, segments: usize, rng: &mut R) -> Vec<(f64, f64)> {
		zigzag_path(
			self.start,
			self.end,
			segments,
			ARC_JITTER * self.opacity(now),
			rng,
		)
	}
}

/// Polyline of `segments + 1` points whose perpendicular jitter is zero at both
/// ends and peaks at the midpoint. The last point is exactly `end`.
pub fn zigzag_path<R: Rng>(
	start: (f64, f64),
	end: (f64, f64),
	segments: usize,
	amplitude: f64,
	rng: &mut R,
) -> Vec<(f64, f64)> {
	let segments = segments.max(1);
	let (dx, dy) = (end.0 - start.0, end.1 - start.1);
	let len = (dx * dx + dy * dy).sqrt();
	let normal = if len > 0.0 {
		(-dy / len, dx / len)
	} else {
		(0.0, 0.0)
	};

	let mut points = Vec::with_capacity(segments + 1);
	for i in 0..segments {
		let t = i as f64 / segments as f64;
		let envelope = 1.0 - (t - 0.5).abs() * 2.0;
		let side = if i % 2 == 0 { 1.0 } else { -1.0 };
		let offset = side * amplitude * envelope * rng.gen_range(0.5..=1.0);
		points.push((
			start.0 + dx * t + normal.0 * offset,
			start.1 + dy * t + normal.1 * offset,
		));
	}
	points.push(end);
	points
}

/// Owns the active arcs, oldest first.
#[derive(Clone, Debug)]
pub struct ArcGenerator {
	arcs: VecDeque<ElectricArc>,
	max_arcs: usize,
}

impl ArcGenerator {
	pub fn new(max_arcs: usize) -> Self {
		Self {
			arcs: VecDeque::with_capacity(max_arcs),
			max_arcs,
		}
	}

	/// Fires a burst of 3 to 5 arcs at `target`.
	pub fn trigger<R: Rng>(
		&mut self,
		target: (f64, f64),
		now: f64,
		surface: (f64, f64),
		rng: &mut R,
	) -> usize {
		let count = rng.gen_range(MIN_BURST..=MAX_BURST);
		self.trigger_burst(target, now, count, surface, rng);
		count
	}

	pub fn trigger_burst<R: Rng>(
		&mut self,
		target: (f64, f64),
		now: f64,
		count: usize,
		(width, height): (f64, f64),
		rng: &mut R,
	) {
		for _ in 0..count {
			let angle = rng.gen_range(0.0..TAU);
			let reach = rng.gen_range(MIN_REACH..=MAX_REACH);
			let start = (
				(target.0 + angle.cos() * reach).clamp(-OVERSCAN, width + OVERSCAN),
				(target.1 + angle.sin() * reach).clamp(-OVERSCAN, height + OVERSCAN),
			);
			self.arcs.push_back(ElectricArc {
				start,
				end: target,
				intensity: rng.gen_range(0.8..=1.2),
				created_at: now,
				duration_ms: rng.gen_range(800.0..=1200.0),
			});
		}
		while self.arcs.len() > self.max_arcs {
			self.arcs.pop_front();
		}
	}

	/// Drops every arc whose lifetime has elapsed.
	pub fn expire(&mut self, now: f64) {
		self.arcs.retain(|arc| !arc.is_expired(now));
	}

	pub fn arcs(&self) -> impl Iterator<Item = &ElectricArc> {
		self.arcs.iter()
	}

	pub fn len(&self) -> usize {
		self.arcs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.arcs.is_empty()
	}

	#[cfg(test)]
	pub(crate) fn push(&mut self, arc: ElectricArc) {
		self.arcs.push_back(arc);
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn arc_at(created_at: f64, duration_ms: f64) -> ElectricArc {
		ElectricArc {
			start: (0.0, 0.0),
			end: (300.0, 0.0),
			intensity: 1.0,
			created_at,
			duration_ms,
		}
	}

	#[test]
	fn burst_converges_on_target() {
		let mut rng = StdRng::seed_from_u64(42);
		let mut generator = ArcGenerator::new(30);
		generator.trigger_burst((50.0, 50.0), 1000.0, 4, (800.0, 600.0), &mut rng);
		assert_eq!(generator.len(), 4);
		for arc in generator.arcs() {
			assert_eq!(arc.end, (50.0, 50.0));
			assert_eq!(arc.created_at, 1000.0);
			assert!((0.8..=1.2).contains(&arc.intensity));
			assert!((800.0..=1200.0).contains(&arc.duration_ms));
			assert!((-OVERSCAN..=800.0 + OVERSCAN).contains(&arc.start.0));
			assert!((-OVERSCAN..=600.0 + OVERSCAN).contains(&arc.start.1));
		}
	}

	#[test]
	fn random_burst_size_is_three_to_five() {
		let mut rng = StdRng::seed_from_u64(8);
		for _ in 0..50 {
			let mut generator = ArcGenerator::new(30);
			let count = generator.trigger((400.0, 300.0), 0.0, (800.0, 600.0), &mut rng);
			assert!((MIN_BURST..=MAX_BURST).contains(&count));
			assert_eq!(generator.len(), count);
		}
	}

	#[test]
	fn unclamped_start_lies_within_reach() {
		let mut rng = StdRng::seed_from_u64(2);
		let mut generator = ArcGenerator::new(30);
		// A huge surface keeps the clamp out of the way.
		generator.trigger_burst((5000.0, 5000.0), 0.0, 5, (10000.0, 10000.0), &mut rng);
		for arc in generator.arcs() {
			let (dx, dy) = (arc.start.0 - arc.end.0, arc.start.1 - arc.end.1);
			let reach = (dx * dx + dy * dy).sqrt();
			assert!(reach >= MIN_REACH - 1e-9 && reach <= MAX_REACH + 1e-9);
		}
	}

	#[test]
	fn expiry_boundaries() {
		let mut generator = ArcGenerator::new(30);
		generator.push(arc_at(1000.0, 900.0));
		generator.expire(1899.0);
		assert_eq!(generator.len(), 1);
		generator.expire(1000.0);
		assert_eq!(generator.len(), 1);
		generator.expire(1900.0);
		assert!(generator.is_empty());

		generator.push(arc_at(1000.0, 900.0));
		generator.expire(1901.0);
		assert!(generator.is_empty());
	}

	#[test]
	fn cap_drops_oldest_first() {
		let mut rng = StdRng::seed_from_u64(4);
		let mut generator = ArcGenerator::new(6);
		generator.trigger_burst((10.0, 10.0), 1.0, 4, (100.0, 100.0), &mut rng);
		generator.trigger_burst((20.0, 20.0), 2.0, 4, (100.0, 100.0), &mut rng);
		assert_eq!(generator.len(), 6);
		let created: Vec<f64> = generator.arcs().map(|a| a.created_at).collect();
		assert_eq!(created, vec![1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);
	}

	#[test]
	fn path_ends_exactly_at_target_for_any_amplitude() {
		let mut rng = StdRng::seed_from_u64(13);
		for amplitude in [0.0, 1.0, 20.0, 1e6] {
			let path = zigzag_path((3.5, -7.25), (123.456, 78.9), 8, amplitude, &mut rng);
			assert_eq!(path.len(), 9);
			assert_eq!(path[0], (3.5, -7.25));
			assert_eq!(*path.last().unwrap(), (123.456, 78.9));
		}
	}

	#[test]
	fn jitter_peaks_mid_arc_and_fades_with_age() {
		let mut rng = StdRng::seed_from_u64(21);
		let arc = arc_at(0.0, 1000.0);

		let fresh = arc.path(0.0, 8, &mut rng);
		// Straight line runs along y = 0, so |y| is the jitter.
		let mid = fresh[4].1.abs();
		assert!(mid >= ARC_JITTER * 0.5 - 1e-9 && mid <= ARC_JITTER + 1e-9);
		assert!(fresh[1].1.abs() <= ARC_JITTER * 0.25 + 1e-9);

		let faded = arc.path(999.999, 8, &mut rng);
		assert!(faded.iter().all(|p| p.1.abs() < 0.1));
	}

	#[test]
	fn opacity_decays_linearly() {
		let arc = ElectricArc {
			intensity: 1.2,
			..arc_at(0.0, 1000.0)
		};
		assert!((arc.opacity(0.0) - 1.2).abs() < 1e-12);
		assert!((arc.opacity(500.0) - 0.6).abs() < 1e-12);
		assert_eq!(arc.opacity(2000.0), 0.0);
	}
}
