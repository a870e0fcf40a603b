use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use leptos::prelude::*;
use log::{info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlCanvasElement, MouseEvent, Window};

use super::config::{EngineConfig, Intensity};
use super::engine::EngineState;
use super::palette::StyleId;
use super::surface::{Sizing, SurfaceManager};

type SharedSurface = Rc<RefCell<Option<SurfaceManager>>>;
type FrameCallback = Closure<dyn FnMut(f64)>;

struct Listener {
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

/// Everything acquired on mount. Dropping it releases all of it.
struct Mount {
	window: Window,
	surface: SharedSurface,
	frame_id: Rc<Cell<Option<i32>>>,
	animate: Rc<RefCell<Option<FrameCallback>>>,
	listeners: Vec<Listener>,
}

impl Mount {
	fn listen(&mut self, event: &'static str, handler: impl FnMut(Event) + 'static) -> Result<()> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		self.window
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.map_err(|e| anyhow!("failed to listen for {}: {:?}", event, e))?;
		self.listeners.push(Listener { event, callback });
		Ok(())
	}
}

impl Drop for Mount {
	fn drop(&mut self) {
		if let Some(id) = self.frame_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		for listener in self.listeners.drain(..) {
			let _ = self.window.remove_event_listener_with_callback(
				listener.event,
				listener.callback.as_ref().unchecked_ref(),
			);
		}
		// Breaks the frame callback's reference to itself.
		self.animate.borrow_mut().take();
		self.surface.borrow_mut().take();
		info!("backdrop: unmounted");
	}
}

fn request_frame(window: &Window, cb: &FrameCallback) -> Result<i32> {
	window
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.map_err(|e| anyhow!("request_animation_frame failed: {:?}", e))
}

fn mount(
	canvas: HtmlCanvasElement,
	sizing: Sizing,
	config: EngineConfig,
	surface: SharedSurface,
) -> Result<Mount> {
	let window = web_sys::window().context("no window")?;
	let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
	*surface.borrow_mut() = Some(SurfaceManager::create(
		canvas,
		sizing,
		EngineState::new(config, seed),
	));

	let mut guard = Mount {
		window: window.clone(),
		surface: surface.clone(),
		frame_id: Rc::new(Cell::new(None)),
		animate: Rc::new(RefCell::new(None)),
		listeners: Vec::new(),
	};

	let surface_resize = surface.clone();
	guard.listen("resize", move |_| {
		if let Some(s) = surface_resize.borrow_mut().as_mut() {
			s.resize();
		}
	})?;

	let surface_move = surface.clone();
	guard.listen("pointermove", move |ev| {
		let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
			return;
		};
		if let Some(s) = surface_move.borrow_mut().as_mut() {
			s.update_pointer(ev.client_x() as f64, ev.client_y() as f64);
		}
	})?;

	let surface_out = surface.clone();
	guard.listen("mouseout", move |ev| {
		let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
			return;
		};
		// Only a null related target means the pointer left the window.
		if ev.related_target().is_some() {
			return;
		}
		if let Some(s) = surface_out.borrow_mut().as_mut() {
			s.clear_pointer();
		}
	})?;

	let surface_click = surface.clone();
	guard.listen("click", move |ev| {
		let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
			return;
		};
		if let Some(s) = surface_click.borrow_mut().as_mut() {
			s.trigger(ev.client_x() as f64, ev.client_y() as f64);
		}
	})?;

	let (surface_anim, animate_inner, frame_inner) =
		(surface.clone(), guard.animate.clone(), guard.frame_id.clone());
	*guard.animate.borrow_mut() = Some(Closure::new(move |now: f64| {
		if let Some(s) = surface_anim.borrow_mut().as_mut() {
			s.frame(now);
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *animate_inner.borrow() {
			match request_frame(&window, cb) {
				Ok(id) => frame_inner.set(Some(id)),
				Err(e) => warn!("backdrop: {:#}", e),
			}
		}
	}));
	let first = guard
		.animate
		.borrow()
		.as_ref()
		.map(|cb| request_frame(&window, cb))
		.transpose();
	guard.frame_id.set(first?);

	Ok(guard)
}

/// Decorative animated background: a drifting node graph that leans toward
/// the pointer and throws lightning at clicks.
#[component]
pub fn NeuralBackdrop(
	#[prop(into, default = Signal::stored(StyleId::default()))] style: Signal<StyleId>,
	#[prop(default = Intensity::Medium)] intensity: Intensity,
	#[prop(default = 100.0)] density: f64,
	#[prop(default = 1.0)] speed: f64,
	#[prop(default = true)] ambient_arcs: bool,
	#[prop(default = None)] style_cycle: Option<f64>,
	#[prop(default = true)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let surface: SharedSurface = Rc::new(RefCell::new(None));
	let (surface_init, surface_style) = (surface.clone(), surface.clone());
	let sizing = if fullscreen {
		Sizing::Viewport
	} else {
		Sizing::Fixed { width, height }
	};

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let config = EngineConfig {
			intensity,
			density,
			speed,
			style: style.get_untracked(),
			ambient_arcs,
			style_cycle,
			..Default::default()
		};
		match mount(canvas, sizing, config, surface_init.clone()) {
			Ok(guard) => {
				let guard = SendWrapper::new(guard);
				on_cleanup(move || drop(guard));
			}
			Err(e) => {
				warn!("backdrop: mount failed: {:#}", e);
				surface_init.borrow_mut().take();
			}
		}
	});

	Effect::new(move |_| {
		let id = style.get();
		if let Some(s) = surface_style.borrow_mut().as_mut() {
			s.set_style(id);
		}
	});

	let css = if fullscreen {
		"position: fixed; inset: 0; z-index: -10; display: block; pointer-events: none;"
	} else {
		"display: block; pointer-events: none;"
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="neural-backdrop"
			aria-hidden="true"
			style=css
		/>
	}
}
