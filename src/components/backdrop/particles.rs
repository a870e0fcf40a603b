//! Ambient "synaptic" particles drifting under the graph.

use rand::Rng;

/// Particles spawned per graph node.
pub const PARTICLES_PER_NODE: usize = 2;
/// Life gained per tick at speed 1.
pub const LIFE_STEP: f64 = 0.01;
const MAX_VELOCITY: f64 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub position: (f64, f64),
	pub velocity: (f64, f64),
	pub life: f64,
	pub max_life: f64,
	pub size: f64,
}

impl Particle {
	fn spawn<R: Rng>((width, height): (f64, f64), speed: f64, rng: &mut R) -> Self {
		let v = MAX_VELOCITY * speed;
		Self {
			position: (rng.gen_range(0.0..width), rng.gen_range(0.0..height)),
			velocity: (rng.gen_range(-v..=v), rng.gen_range(-v..=v)),
			life: rng.gen_range(0.0..1.0),
			max_life: rng.gen_range(0.5..=2.0),
			size: rng.gen_range(1.0..=4.0),
		}
	}

	/// Fades from 1 at birth to 0 at end of life.
	pub fn alpha(&self) -> f64 {
		(1.0 - self.life / self.max_life).clamp(0.0, 1.0)
	}
}

/// Fixed-size particle set; expired particles respawn in place.
#[derive(Clone, Debug, Default)]
pub struct ParticleField {
	particles: Vec<Particle>,
	width: f64,
	height: f64,
	speed: f64,
}

impl ParticleField {
	pub fn seed<R: Rng>(count: usize, (width, height): (f64, f64), speed: f64, rng: &mut R) -> Self {
		if width <= 0.0 || height <= 0.0 {
			return Self::default();
		}
		let speed = if speed.is_finite() { speed.max(0.0) } else { 1.0 };
		Self {
			particles: (0..count)
				.map(|_| Particle::spawn((width, height), speed, rng))
				.collect(),
			width,
			height,
			speed,
		}
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Moves every particle one tick, wrapping at the surface edges.
	pub fn step<R: Rng>(&mut self, rng: &mut R) {
		if self.width <= 0.0 || self.height <= 0.0 {
			return;
		}
		let size = (self.width, self.height);
		for p in &mut self.particles {
			p.position = (
				(p.position.0 + p.velocity.0).rem_euclid(self.width),
				(p.position.1 + p.velocity.1).rem_euclid(self.height),
			);
			p.life += LIFE_STEP * self.speed;
			if p.life > p.max_life {
				*p = Particle::spawn(size, self.speed, rng);
				p.life = 0.0;
			}
		}
	}

	#[cfg(test)]
	pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
		&mut self.particles
	}
}
