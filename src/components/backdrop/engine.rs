//! Session state and the per-frame simulation step.
//!
//! `EngineState` never touches the browser. Each call to [`EngineState::advance`]
//! runs scheduled transitions, expires arcs, steps the graph and particles
//! and fills a
//! [`Scene`] with everything the painter needs for the frame.

use std::f64::consts::TAU;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::arcs::{ARC_SEGMENTS, ArcGenerator};
use super::config::EngineConfig;
use super::graph::{CONNECTION_RADIUS, Graph, distance};
use super::palette::{StyleConfig, StyleId};
use super::particles::{PARTICLES_PER_NODE, ParticleField};
use super::pointer::PointerField;

/// Max offset of a connection's control point from the chord midpoint.
pub const CONNECTION_JITTER: f64 = 4.0;
/// Fraction of an edge a signal pulse covers per second.
pub const SIGNAL_SPEED: f64 = 0.4;
const AMBIENT_ARC_MIN_MS: f64 = 2500.0;
const AMBIENT_ARC_MAX_MS: f64 = 6000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ArcStroke {
	pub points: Vec<(f64, f64)>,
	pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionStroke {
	pub from: (f64, f64),
	pub control: (f64, f64),
	pub to: (f64, f64),
	pub opacity: f64,
	/// Where the travelling signal dot sits this frame.
	pub pulse: (f64, f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSprite {
	pub position: (f64, f64),
	pub size: f64,
	pub alpha: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite {
	pub position: (f64, f64),
	pub energy: f64,
}

/// Everything drawn in one frame, in paint order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	pub width: f64,
	pub height: f64,
	pub style: StyleConfig,
	pub particles: Vec<ParticleSprite>,
	pub arcs: Vec<ArcStroke>,
	pub connections: Vec<ConnectionStroke>,
	pub nodes: Vec<NodeSprite>,
}

/// Point on a quadratic Bézier curve at parameter `t`.
pub fn quadratic_point(p0: (f64, f64), c: (f64, f64), p2: (f64, f64), t: f64) -> (f64, f64) {
	let u = 1.0 - t;
	(
		u * u * p0.0 + 2.0 * u * t * c.0 + t * t * p2.0,
		u * u * p0.1 + 2.0 * u * t * c.1 + t * t * p2.1,
	)
}

pub struct EngineState {
	config: EngineConfig,
	graph: Graph,
	particles: ParticleField,
	arcs: ArcGenerator,
	/// Clicks that arrived before the first frame set the clock.
	pending_triggers: Vec<(f64, f64)>,
	pointer: PointerField,
	surface: (f64, f64),
	style_id: StyleId,
	style: StyleConfig,
	rng: StdRng,
	started_at: Option<f64>,
	now: f64,
	next_ambient_arc: Option<f64>,
	next_style_change: Option<f64>,
	scene: Scene,
}

impl EngineState {
	pub fn new(config: EngineConfig, seed: u64) -> Self {
		let style_id = config.style;
		Self {
			arcs: ArcGenerator::new(config.max_arcs),
			config,
			graph: Graph::default(),
			particles: ParticleField::default(),
			pending_triggers: Vec::new(),
			pointer: PointerField::default(),
			surface: (0.0, 0.0),
			style_id,
			style: style_id.config(),
			rng: StdRng::seed_from_u64(seed),
			started_at: None,
			now: 0.0,
			next_ambient_arc: None,
			next_style_change: None,
			scene: Scene::default(),
		}
	}

	/// Adopts a new surface size and reseeds the graph. Zero sizes defer seeding.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.surface = (width.max(0.0), height.max(0.0));
		if width <= 0.0 || height <= 0.0 {
			debug!("backdrop: surface {}x{} not laid out, seeding deferred", width, height);
			self.graph = Graph::default();
			self.particles = ParticleField::default();
			return;
		}
		self.graph = Graph::seed(self.config.node_count(), self.surface, &mut self.rng);
		self.particles = ParticleField::seed(
			self.graph.len() * PARTICLES_PER_NODE,
			self.surface,
			self.config.speed,
			&mut self.rng,
		);
		debug!(
			"backdrop: seeded {} nodes, {} particles on {}x{}",
			self.graph.len(),
			self.particles.len(),
			width,
			height
		);
	}

	pub fn is_seeded(&self) -> bool {
		!self.graph.is_empty()
	}

	pub fn set_style(&mut self, id: StyleId) {
		if id != self.style_id {
			debug!("backdrop: style {} -> {}", self.style_id.as_str(), id.as_str());
		}
		self.style_id = id;
		self.style = id.config();
	}

	pub fn style_id(&self) -> StyleId {
		self.style_id
	}

	pub fn style(&self) -> StyleConfig {
		self.style
	}

	pub fn update_pointer(&mut self, x: f64, y: f64) {
		self.pointer.update_pointer(x, y);
	}

	pub fn clear_pointer(&mut self) {
		self.pointer.clear();
	}

	/// Fires an arc burst at `(x, y)`, stamped with the latest frame time.
	/// Before the first frame the click is held and fired by it.
	pub fn trigger(&mut self, x: f64, y: f64) {
		if self.started_at.is_none() {
			self.pending_triggers.push((x, y));
			return;
		}
		if self.surface.0 <= 0.0 || self.surface.1 <= 0.0 {
			return;
		}
		self.arcs
			.trigger((x, y), self.now, self.surface, &mut self.rng);
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn particles(&self) -> &ParticleField {
		&self.particles
	}

	pub fn arcs(&self) -> &ArcGenerator {
		&self.arcs
	}

	pub fn surface(&self) -> (f64, f64) {
		self.surface
	}

	/// Runs one frame at wall-clock `now` (milliseconds).
	pub fn advance(&mut self, now: f64) -> &Scene {
		self.now = now;
		let started_at = *self.started_at.get_or_insert(now);
		let elapsed = ((now - started_at) / 1000.0).max(0.0);

		for (x, y) in std::mem::take(&mut self.pending_triggers) {
			self.trigger(x, y);
		}
		self.run_schedules(now);
		self.arcs.expire(now);
		self.graph
			.step(elapsed * self.config.speed, &self.pointer, &mut self.rng);
		self.particles.step(&mut self.rng);
		self.build_scene(now, elapsed);
		&self.scene
	}

	fn ambient_interval(&mut self) -> f64 {
		self.rng.gen_range(AMBIENT_ARC_MIN_MS..=AMBIENT_ARC_MAX_MS)
	}

	fn run_schedules(&mut self, now: f64) {
		if self.config.ambient_arcs {
			match self.next_ambient_arc {
				None => self.next_ambient_arc = Some(now + self.ambient_interval()),
				Some(due) if now >= due => {
					if !self.graph.is_empty() {
						let idx = self.rng.gen_range(0..self.graph.len());
						let target = self.graph.nodes()[idx].position;
						self.arcs.trigger(target, now, self.surface, &mut self.rng);
					}
					self.next_ambient_arc = Some(now + self.ambient_interval());
				}
				Some(_) => {}
			}
		}

		if let Some(period) = self.config.style_cycle.filter(|p| *p > 0.0) {
			match self.next_style_change {
				None => self.next_style_change = Some(now + period),
				Some(due) if now >= due => {
					self.set_style(self.style_id.next());
					self.next_style_change = Some(now + period);
				}
				Some(_) => {}
			}
		}
	}

	fn build_scene(&mut self, now: f64, elapsed: f64) {
		let scene = &mut self.scene;
		scene.width = self.surface.0;
		scene.height = self.surface.1;
		scene.style = self.style;

		scene.particles.clear();
		scene
			.particles
			.extend(self.particles.particles().iter().map(|p| ParticleSprite {
				position: p.position,
				size: p.size,
				alpha: p.alpha(),
			}));

		scene.arcs.clear();
		for arc in self.arcs.arcs() {
			scene.arcs.push(ArcStroke {
				points: arc.path(now, ARC_SEGMENTS, &mut self.rng),
				opacity: arc.opacity(now),
			});
		}

		scene.connections.clear();
		let nodes = self.graph.nodes();
		for node in nodes {
			for &j in &node.neighbors {
				let other = &nodes[j];
				// Topology is fixed, but an edge only shows while its ends are close.
				let d = distance(node.position, other.position);
				if d >= CONNECTION_RADIUS {
					continue;
				}
				let opacity = (CONNECTION_RADIUS - d) / CONNECTION_RADIUS
					* (node.energy + other.energy)
					/ 2.0;
				let control = (
					(node.position.0 + other.position.0) / 2.0
						+ self.rng.gen_range(-CONNECTION_JITTER..=CONNECTION_JITTER),
					(node.position.1 + other.position.1) / 2.0
						+ self.rng.gen_range(-CONNECTION_JITTER..=CONNECTION_JITTER),
				);
				let t = (elapsed * SIGNAL_SPEED + node.phase / TAU).rem_euclid(1.0);
				scene.connections.push(ConnectionStroke {
					from: node.position,
					control,
					to: other.position,
					opacity,
					pulse: quadratic_point(node.position, control, other.position, t),
				});
			}
		}

		scene.nodes.clear();
		scene.nodes.extend(nodes.iter().map(|n| NodeSprite {
			position: n.position,
			energy: n.energy,
		}));
	}

	#[cfg(test)]
	pub(crate) fn graph_mut(&mut self) -> &mut Graph {
		&mut self.graph
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::backdrop::config::Intensity;

	fn quiet_config() -> EngineConfig {
		EngineConfig {
			ambient_arcs: false,
			..Default::default()
		}
	}

	#[test]
	fn zero_surface_defers_seeding() {
		let mut engine = EngineState::new(quiet_config(), 1);
		engine.resize(0.0, 0.0);
		assert!(!engine.is_seeded());
		let scene = engine.advance(16.0);
		assert!(scene.nodes.is_empty());
		engine.trigger(10.0, 10.0);
		assert!(engine.arcs().is_empty());

		engine.resize(800.0, 600.0);
		assert!(engine.is_seeded());
		assert_eq!(engine.graph().len(), 80);
	}

	#[test]
	fn reseed_keeps_count_and_edge_radius() {
		let config = EngineConfig {
			intensity: Intensity::High,
			..quiet_config()
		};
		let mut engine = EngineState::new(config, 2);
		for _ in 0..2 {
			engine.resize(1024.0, 768.0);
			let graph = engine.graph();
			assert_eq!(graph.len(), 120);
			for node in graph.nodes() {
				for &j in &node.neighbors {
					assert!(distance(node.position, graph.nodes()[j].position) < CONNECTION_RADIUS);
				}
			}
		}
	}

	#[test]
	fn connection_opacity_tracks_distance_and_energy() {
		let mut engine = EngineState::new(quiet_config(), 3);
		engine.resize(400.0, 400.0);
		*engine.graph_mut() = Graph::from_positions(&[(100.0, 200.0), (200.0, 200.0)], (400.0, 400.0));

		let scene = engine.advance(1234.0).clone();
		assert_eq!(scene.connections.len(), 2);
		let (a, b) = (&scene.nodes[0], &scene.nodes[1]);
		let d = distance(a.position, b.position);
		let expected = (CONNECTION_RADIUS - d) / CONNECTION_RADIUS * (a.energy + b.energy) / 2.0;
		for conn in &scene.connections {
			assert!((conn.opacity - expected).abs() < 1e-9);
			let mid = ((conn.from.0 + conn.to.0) / 2.0, (conn.from.1 + conn.to.1) / 2.0);
			assert!((conn.control.0 - mid.0).abs() <= CONNECTION_JITTER + 1e-9);
			assert!((conn.control.1 - mid.1).abs() <= CONNECTION_JITTER + 1e-9);
		}
	}

	#[test]
	fn stretched_edge_is_hidden_but_kept() {
		let mut engine = EngineState::new(quiet_config(), 4);
		engine.resize(600.0, 600.0);
		*engine.graph_mut() = Graph::from_positions(&[(100.0, 100.0), (150.0, 100.0)], (600.0, 600.0));
		for node in engine.graph_mut().nodes_mut() {
			node.position.0 *= 4.0;
			node.target = node.position;
		}
		let scene = engine.advance(0.0);
		assert!(scene.connections.is_empty());
		assert_eq!(engine.graph().nodes()[0].neighbors, vec![1]);
	}

	#[test]
	fn clicks_burst_and_expire_on_the_frame_clock() {
		let mut engine = EngineState::new(quiet_config(), 5);
		engine.resize(800.0, 600.0);
		engine.advance(1000.0);
		engine.trigger(50.0, 50.0);
		let count = engine.arcs().len();
		assert!((3..=5).contains(&count));
		assert!(engine.arcs().arcs().all(|a| a.created_at == 1000.0 && a.end == (50.0, 50.0)));

		let scene = engine.advance(1500.0);
		assert_eq!(scene.arcs.len(), count);
		for stroke in &scene.arcs {
			assert_eq!(*stroke.points.last().unwrap(), (50.0, 50.0));
		}

		engine.advance(2200.0);
		assert!(engine.arcs().is_empty());
	}

	#[test]
	fn click_before_first_frame_is_stamped_by_it() {
		let mut engine = EngineState::new(quiet_config(), 11);
		engine.resize(800.0, 600.0);
		engine.trigger(120.0, 80.0);
		assert!(engine.arcs().is_empty());

		let scene = engine.advance(5000.0);
		let count = scene.arcs.len();
		assert!((3..=5).contains(&count));
		assert_eq!(engine.arcs().len(), count);
		assert!(engine.arcs().arcs().all(|a| a.created_at == 5000.0 && a.end == (120.0, 80.0)));

		engine.advance(5400.0);
		assert_eq!(engine.arcs().len(), count);
	}

	#[test]
	fn particles_follow_the_node_count() {
		let mut engine = EngineState::new(quiet_config(), 12);
		engine.resize(0.0, 0.0);
		assert!(engine.particles().is_empty());

		engine.resize(800.0, 600.0);
		assert_eq!(engine.particles().len(), 160);
		for frame in 0..300 {
			let scene = engine.advance(frame as f64 * 16.0);
			assert_eq!(scene.particles.len(), 160);
			assert!(scene.particles.iter().all(|p| {
				(0.0..800.0).contains(&p.position.0)
					&& (0.0..600.0).contains(&p.position.1)
					&& (0.0..=1.0).contains(&p.alpha)
			}));
		}
	}

	#[test]
	fn rapid_clicks_are_capped() {
		let config = EngineConfig {
			max_arcs: 30,
			..quiet_config()
		};
		let mut engine = EngineState::new(config, 6);
		engine.resize(800.0, 600.0);
		engine.advance(0.0);
		for i in 0..40 {
			engine.trigger(i as f64 * 10.0, 100.0);
		}
		assert_eq!(engine.arcs().len(), 30);
	}

	#[test]
	fn ambient_arcs_fire_on_schedule() {
		let mut engine = EngineState::new(EngineConfig::default(), 7);
		engine.resize(800.0, 600.0);
		engine.advance(0.0);
		assert!(engine.arcs().is_empty());
		engine.advance(AMBIENT_ARC_MAX_MS);
		assert!(!engine.arcs().is_empty());

		let mut quiet = EngineState::new(quiet_config(), 7);
		quiet.resize(800.0, 600.0);
		let mut now = 0.0;
		while now < 20_000.0 {
			quiet.advance(now);
			assert!(quiet.arcs().is_empty());
			now += 250.0;
		}
	}

	#[test]
	fn style_cycle_runs_inside_the_tick() {
		let config = EngineConfig {
			style_cycle: Some(1000.0),
			..quiet_config()
		};
		let mut engine = EngineState::new(config, 8);
		engine.resize(300.0, 300.0);
		assert_eq!(engine.advance(0.0).style, StyleId::Classic.config());
		assert_eq!(engine.advance(999.0).style, StyleId::Classic.config());
		assert_eq!(engine.advance(1000.0).style, StyleId::Plasma.config());
		assert_eq!(engine.style_id(), StyleId::Plasma);
	}

	#[test]
	fn style_swap_is_wholesale() {
		let mut engine = EngineState::new(quiet_config(), 9);
		engine.set_style(StyleId::Fire);
		assert_eq!(engine.style(), StyleId::Fire.config());
		engine.resize(300.0, 300.0);
		assert_eq!(engine.advance(0.0).style, StyleId::Fire.config());
	}

	#[test]
	fn pointer_leave_stops_attraction() {
		let mut engine = EngineState::new(quiet_config(), 10);
		engine.resize(400.0, 400.0);
		*engine.graph_mut() = Graph::from_positions(&[(200.0, 200.0)], (400.0, 400.0));
		engine.update_pointer(250.0, 200.0);
		engine.clear_pointer();
		engine.advance(0.0);
		let node = &engine.graph().nodes()[0];
		assert!(distance(node.target, (200.0, 200.0)) <= 2.0);
	}

	#[test]
	fn pulse_rides_the_curve() {
		let (p0, c, p2) = ((0.0, 0.0), (50.0, 50.0), (100.0, 0.0));
		assert_eq!(quadratic_point(p0, c, p2, 0.0), p0);
		assert_eq!(quadratic_point(p0, c, p2, 1.0), p2);
		assert_eq!(quadratic_point(p0, c, p2, 0.5), (50.0, 25.0));
	}
}
