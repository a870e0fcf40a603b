//! Node positions and fixed neighbor topology.
//!
//! Topology is computed once when the graph is seeded and never changes until
//! the next seed. Adjacency is directed: a node lists its own nearest
//! neighbors, which need not list it back.

use std::f64::consts::TAU;

use rand::Rng;

use super::pointer::PointerField;

/// Minimum distance kept between a node and the surface edge.
pub const MARGIN: f64 = 10.0;
/// Nodes closer than this are eligible to be connected.
pub const CONNECTION_RADIUS: f64 = 150.0;
pub const MAX_NEIGHBORS: usize = 3;
/// Furthest ahead of a node its target is placed toward the pointer.
pub const MAX_POINTER_OFFSET: f64 = 50.0;
/// Fraction of the remaining distance to target covered each tick.
pub const EASING: f64 = 0.02;
/// Per-tick random walk applied to targets outside the pointer's reach.
pub const DRIFT_JITTER: f64 = 1.0;

pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub position: (f64, f64),
	pub target: (f64, f64),
	pub neighbors: Vec<NodeId>,
	/// Pulse level in `0..=1`, recomputed from elapsed time every tick.
	pub energy: f64,
	pub phase: f64,
}

/// Oscillating pulse level for a node. Pure in its inputs, so it cannot drift.
pub fn energy_at(time: f64, phase: f64) -> f64 {
	(((time + phase).sin() + 1.0) / 2.0).clamp(0.0, 1.0)
}

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	(dx * dx + dy * dy).sqrt()
}

fn clamp_axis(v: f64, len: f64) -> f64 {
	let margin = MARGIN.min(len / 2.0);
	v.clamp(margin, len - margin)
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	width: f64,
	height: f64,
}

impl Graph {
	/// Scatters `count` nodes uniformly over the surface. A zero-sized surface
	/// yields an empty graph.
	pub fn seed<R: Rng>(count: usize, (width, height): (f64, f64), rng: &mut R) -> Self {
		if width <= 0.0 || height <= 0.0 {
			return Self::default();
		}
		let (mx, my) = (MARGIN.min(width / 2.0), MARGIN.min(height / 2.0));
		let nodes = (0..count)
			.map(|_| {
				let x = if width > 2.0 * mx {
					rng.gen_range(mx..width - mx)
				} else {
					width / 2.0
				};
				let y = if height > 2.0 * my {
					rng.gen_range(my..height - my)
				} else {
					height / 2.0
				};
				let phase = rng.gen_range(0.0..TAU);
				Node {
					position: (x, y),
					target: (x, y),
					neighbors: Vec::new(),
					energy: energy_at(0.0, phase),
					phase,
				}
			})
			.collect();
		let mut graph = Self {
			nodes,
			width,
			height,
		};
		graph.link_neighbors();
		graph
	}

	/// Builds a graph from explicit positions, all with phase zero.
	pub fn from_positions(positions: &[(f64, f64)], (width, height): (f64, f64)) -> Self {
		let nodes = positions
			.iter()
			.map(|&(x, y)| {
				let p = (clamp_axis(x, width), clamp_axis(y, height));
				Node {
					position: p,
					target: p,
					neighbors: Vec::new(),
					energy: energy_at(0.0, 0.0),
					phase: 0.0,
				}
			})
			.collect();
		let mut graph = Self {
			nodes,
			width,
			height,
		};
		graph.link_neighbors();
		graph
	}

	fn link_neighbors(&mut self) {
		let positions: Vec<(f64, f64)> = self.nodes.iter().map(|n| n.position).collect();
		for (i, node) in self.nodes.iter_mut().enumerate() {
			let mut near: Vec<(f64, NodeId)> = positions
				.iter()
				.enumerate()
				.filter(|&(j, _)| j != i)
				.map(|(j, &p)| (distance(node.position, p), j))
				.filter(|&(d, _)| d < CONNECTION_RADIUS)
				.collect();
			near.sort_by(|a, b| a.0.total_cmp(&b.0));
			node.neighbors = near.into_iter().take(MAX_NEIGHBORS).map(|(_, j)| j).collect();
		}
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn clamp(&self, (x, y): (f64, f64)) -> (f64, f64) {
		(clamp_axis(x, self.width), clamp_axis(y, self.height))
	}

	/// Advances every node one tick. `time` is the pulse clock in seconds.
	pub fn step<R: Rng>(&mut self, time: f64, pointer: &PointerField, rng: &mut R) {
		if self.width <= 0.0 || self.height <= 0.0 {
			return;
		}
		for i in 0..self.nodes.len() {
			let node = &self.nodes[i];
			let target = match pointer.influence_at(node.position) {
				// Biased from the current position so pushes never stack up.
				Some(inf) => {
					let push = MAX_POINTER_OFFSET * inf.magnitude;
					(
						node.position.0 + inf.direction.0 * push,
						node.position.1 + inf.direction.1 * push,
					)
				}
				None => (
					node.target.0 + rng.gen_range(-DRIFT_JITTER..=DRIFT_JITTER),
					node.target.1 + rng.gen_range(-DRIFT_JITTER..=DRIFT_JITTER),
				),
			};
			let target = self.clamp(target);
			let position = self.clamp((
				node.position.0 + (target.0 - node.position.0) * EASING,
				node.position.1 + (target.1 - node.position.1) * EASING,
			));
			let node = &mut self.nodes[i];
			node.target = target;
			node.position = position;
			node.energy = energy_at(time, node.phase);
		}
	}

	#[cfg(test)]
	pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}
}
