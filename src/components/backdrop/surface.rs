//! Canvas ownership and sizing.

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::engine::EngineState;
use super::palette::StyleId;
use super::render;

/// How the canvas picks its size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sizing {
	/// Track the browser viewport.
	Viewport,
	/// Fixed dimensions, falling back to the parent element per axis.
	Fixed {
		width: Option<f64>,
		height: Option<f64>,
	},
}

fn acquire_context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.map_err(|e| anyhow!("get_context failed: {:?}", e))?
		.context("2d context unavailable")?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| anyhow!("context is not a CanvasRenderingContext2d"))
}

pub fn viewport_size() -> Result<(f64, f64)> {
	let window = web_sys::window().context("no window")?;
	let read = |v: std::result::Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
		v.ok().and_then(|v| v.as_f64()).context("viewport size unavailable")
	};
	Ok((read(window.inner_width())?, read(window.inner_height())?))
}

/// Owns the drawing surface and the engine that paints on it.
pub struct SurfaceManager {
	canvas: HtmlCanvasElement,
	ctx: Option<CanvasRenderingContext2d>,
	sizing: Sizing,
	engine: EngineState,
	context_warned: bool,
}

impl SurfaceManager {
	/// Sizes the canvas and seeds the engine. The 2d context is acquired lazily.
	pub fn create(canvas: HtmlCanvasElement, sizing: Sizing, engine: EngineState) -> Self {
		let mut surface = Self {
			canvas,
			ctx: None,
			sizing,
			engine,
			context_warned: false,
		};
		surface.resize();
		info!(
			"backdrop: mounted {} nodes, style {}",
			surface.engine.graph().len(),
			surface.engine.style_id().as_str()
		);
		surface
	}

	fn measure(&self) -> (f64, f64) {
		match self.sizing {
			Sizing::Viewport => viewport_size().unwrap_or_else(|e| {
				warn!("backdrop: {:#}", e);
				(0.0, 0.0)
			}),
			Sizing::Fixed { width, height } => {
				let parent = self.canvas.parent_element();
				(
					width.unwrap_or_else(|| {
						parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(0.0)
					}),
					height.unwrap_or_else(|| {
						parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(0.0)
					}),
				)
			}
		}
	}

	/// Re-measures, resizes the canvas and reseeds the graph.
	pub fn resize(&mut self) {
		let (w, h) = self.measure();
		let laid_out = w > 0.0 && h > 0.0;
		if (w, h) == self.engine.surface() && (self.engine.is_seeded() || !laid_out) {
			return;
		}
		self.canvas.set_width(w as u32);
		self.canvas.set_height(h as u32);
		debug!("backdrop: surface resized to {}x{}", w, h);
		self.engine.resize(w, h);
	}

	fn context(&mut self) -> Option<&CanvasRenderingContext2d> {
		if self.ctx.is_none() {
			match acquire_context(&self.canvas) {
				Ok(ctx) => {
					if self.context_warned {
						info!("backdrop: drawing context ready");
					}
					self.context_warned = false;
					self.ctx = Some(ctx);
				}
				Err(e) => {
					if !self.context_warned {
						warn!("backdrop: surface not ready: {:#}", e);
						self.context_warned = true;
					}
				}
			}
		}
		self.ctx.as_ref()
	}

	/// Runs one animation frame. Without a context the state still advances
	/// and painting resumes once one can be acquired.
	pub fn frame(&mut self, now: f64) {
		// A surface mounted before layout seeds on the first non-zero frame.
		if !self.engine.is_seeded() {
			self.resize();
		}
		if self.context().is_none() {
			self.engine.advance(now);
			return;
		}
		let scene = self.engine.advance(now);
		if let Some(ctx) = self.ctx.as_ref() {
			render::paint(scene, ctx);
		}
	}

	pub fn update_pointer(&mut self, client_x: f64, client_y: f64) {
		let rect = self.canvas.get_bounding_client_rect();
		self.engine
			.update_pointer(client_x - rect.left(), client_y - rect.top());
	}

	pub fn clear_pointer(&mut self) {
		self.engine.clear_pointer();
	}

	pub fn trigger(&mut self, client_x: f64, client_y: f64) {
		let rect = self.canvas.get_bounding_client_rect();
		self.engine.trigger(client_x - rect.left(), client_y - rect.top());
	}

	pub fn set_style(&mut self, id: StyleId) {
		self.engine.set_style(id);
	}
}
