//! Engine configuration supplied by the host.

use log::warn;

use super::palette::StyleId;

/// Hard ceiling on node count; seeding is an O(n²) scan.
pub const MAX_NODES: usize = 120;

/// Default cap on concurrently active arcs.
pub const DEFAULT_MAX_ARCS: usize = 30;

/// Host-selected density tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Intensity {
	Low,
	#[default]
	Medium,
	High,
}

impl Intensity {
	pub fn node_count(self) -> usize {
		match self {
			Intensity::Low => 50,
			Intensity::Medium => 80,
			Intensity::High => 120,
		}
	}

	/// Parses `low | medium | high`; anything else is `medium`.
	pub fn from_id(id: &str) -> Intensity {
		match id.trim().to_ascii_lowercase().as_str() {
			"low" => Intensity::Low,
			"medium" => Intensity::Medium,
			"high" => Intensity::High,
			other => {
				warn!("backdrop: unknown intensity {:?}, using medium", other);
				Intensity::Medium
			}
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
	pub intensity: Intensity,
	/// Percentage applied to the tier's node count.
	pub density: f64,
	/// Multiplier on the energy pulse rate.
	pub speed: f64,
	pub style: StyleId,
	pub max_arcs: usize,
	/// Fire arc bursts on a timer in addition to clicks.
	pub ambient_arcs: bool,
	/// Advance to the next style every this many milliseconds.
	pub style_cycle: Option<f64>,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			intensity: Intensity::default(),
			density: 100.0,
			speed: 1.0,
			style: StyleId::default(),
			max_arcs: DEFAULT_MAX_ARCS,
			ambient_arcs: true,
			style_cycle: None,
		}
	}
}

impl EngineConfig {
	/// Node count for this session, always within `1..=MAX_NODES`.
	pub fn node_count(&self) -> usize {
		let density = if self.density.is_finite() {
			self.density.max(0.0)
		} else {
			100.0
		};
		let scaled = (self.intensity.node_count() as f64 * density / 100.0).round() as usize;
		scaled.clamp(1, MAX_NODES)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tiers_map_to_node_counts() {
		assert_eq!(Intensity::Low.node_count(), 50);
		assert_eq!(Intensity::Medium.node_count(), 80);
		assert_eq!(Intensity::High.node_count(), 120);
	}

	#[test]
	fn intensity_parsing_falls_back_to_medium() {
		assert_eq!(Intensity::from_id("HIGH"), Intensity::High);
		assert_eq!(Intensity::from_id("low"), Intensity::Low);
		assert_eq!(Intensity::from_id("extreme"), Intensity::Medium);
	}

	#[test]
	fn density_scales_and_clamps() {
		let mut config = EngineConfig {
			intensity: Intensity::Medium,
			density: 50.0,
			..Default::default()
		};
		assert_eq!(config.node_count(), 40);

		config.intensity = Intensity::High;
		config.density = 400.0;
		assert_eq!(config.node_count(), MAX_NODES);

		config.density = 0.0;
		assert_eq!(config.node_count(), 1);

		config.density = f64::NAN;
		assert_eq!(config.node_count(), 120);
	}
}
