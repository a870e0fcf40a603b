//! Named color themes for the backdrop.

use log::warn;

/// An opaque RGB color; alpha is applied at paint time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
	/// CSS `rgba(...)` string with the given alpha, clamped to `0..=1`.
	pub fn rgba(self, alpha: f64) -> String {
		format!(
			"rgba({}, {}, {}, {})",
			self.0,
			self.1,
			self.2,
			alpha.clamp(0.0, 1.0)
		)
	}
}

/// Immutable theme applied uniformly to every element of the backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleConfig {
	pub node_color: Rgb,
	pub connection_color: Rgb,
	pub glow_color: Rgb,
	/// Center and edge stops of the radial background.
	pub background_gradient: [Rgb; 2],
}

/// Style identifiers the host may select.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StyleId {
	#[default]
	Classic,
	Plasma,
	Galaxy,
	Forest,
	Ocean,
	Fire,
	Ice,
	Void,
	Rainbow,
	Matrix,
}

impl StyleId {
	/// Every registered style, in cycling order.
	pub const ALL: [StyleId; 10] = [
		StyleId::Classic,
		StyleId::Plasma,
		StyleId::Galaxy,
		StyleId::Forest,
		StyleId::Ocean,
		StyleId::Fire,
		StyleId::Ice,
		StyleId::Void,
		StyleId::Rainbow,
		StyleId::Matrix,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			StyleId::Classic => "classic",
			StyleId::Plasma => "plasma",
			StyleId::Galaxy => "galaxy",
			StyleId::Forest => "forest",
			StyleId::Ocean => "ocean",
			StyleId::Fire => "fire",
			StyleId::Ice => "ice",
			StyleId::Void => "void",
			StyleId::Rainbow => "rainbow",
			StyleId::Matrix => "matrix",
		}
	}

	/// Looks up a style by its host id. Unknown ids resolve to the default style.
	pub fn from_id(id: &str) -> StyleId {
		let id = id.trim();
		Self::ALL
			.into_iter()
			.find(|s| s.as_str().eq_ignore_ascii_case(id))
			.unwrap_or_else(|| {
				warn!("backdrop: unknown style {:?}, using {}", id, StyleId::default().as_str());
				StyleId::default()
			})
	}

	/// The style after this one, wrapping around.
	pub fn next(self) -> StyleId {
		let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
		Self::ALL[(idx + 1) % Self::ALL.len()]
	}

	pub fn config(self) -> StyleConfig {
		let (node, connection, glow, center, edge) = match self {
			StyleId::Classic => (
				Rgb(0, 255, 136),
				Rgb(0, 200, 120),
				Rgb(120, 255, 200),
				Rgb(0, 20, 10),
				Rgb(0, 0, 0),
			),
			StyleId::Plasma => (
				Rgb(200, 80, 255),
				Rgb(160, 60, 230),
				Rgb(255, 140, 255),
				Rgb(25, 0, 40),
				Rgb(5, 0, 12),
			),
			StyleId::Galaxy => (
				Rgb(100, 150, 255),
				Rgb(70, 110, 220),
				Rgb(180, 200, 255),
				Rgb(5, 5, 30),
				Rgb(0, 0, 8),
			),
			StyleId::Forest => (
				Rgb(120, 200, 90),
				Rgb(80, 160, 70),
				Rgb(190, 240, 140),
				Rgb(5, 20, 5),
				Rgb(0, 6, 0),
			),
			StyleId::Ocean => (
				Rgb(0, 180, 220),
				Rgb(0, 130, 180),
				Rgb(120, 230, 255),
				Rgb(0, 15, 35),
				Rgb(0, 3, 12),
			),
			StyleId::Fire => (
				Rgb(255, 90, 30),
				Rgb(220, 60, 20),
				Rgb(255, 200, 80),
				Rgb(35, 5, 0),
				Rgb(8, 0, 0),
			),
			StyleId::Ice => (
				Rgb(180, 230, 255),
				Rgb(140, 200, 240),
				Rgb(240, 250, 255),
				Rgb(10, 20, 35),
				Rgb(2, 6, 12),
			),
			StyleId::Void => (
				Rgb(140, 100, 200),
				Rgb(90, 60, 140),
				Rgb(200, 160, 255),
				Rgb(8, 0, 15),
				Rgb(0, 0, 0),
			),
			StyleId::Rainbow => (
				Rgb(255, 100, 200),
				Rgb(100, 200, 255),
				Rgb(255, 230, 120),
				Rgb(15, 5, 25),
				Rgb(0, 0, 5),
			),
			StyleId::Matrix => (
				Rgb(0, 255, 70),
				Rgb(0, 180, 50),
				Rgb(150, 255, 150),
				Rgb(0, 12, 0),
				Rgb(0, 0, 0),
			),
		};
		StyleConfig {
			node_color: node,
			connection_color: connection,
			glow_color: glow,
			background_gradient: [center, edge],
		}
	}
}

impl Default for StyleConfig {
	fn default() -> Self {
		StyleId::default().config()
	}
}
