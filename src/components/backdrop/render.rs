use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::engine::Scene;

/// Alpha of the per-frame background wash. Low values leave motion trails.
pub const FADE_ALPHA: f64 = 0.05;
const CORE_RADIUS: f64 = 2.0;
const GLOW_RADIUS: f64 = 6.0;

pub fn paint(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	if scene.width <= 0.0 || scene.height <= 0.0 {
		return;
	}
	fade(scene, ctx);
	draw_particles(scene, ctx);
	draw_arcs(scene, ctx);
	draw_connections(scene, ctx);
	draw_nodes(scene, ctx);
}

fn fade(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (scene.width, scene.height);
	let [center, edge] = scene.style.background_gradient;
	match ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) / 2.0) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &center.rgba(FADE_ALPHA));
			let _ = gradient.add_color_stop(1.0, &edge.rgba(FADE_ALPHA));
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&edge.rgba(FADE_ALPHA)),
	}
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_particles(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	for p in &scene.particles {
		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", p.alpha * 0.3));
		ctx.begin_path();
		let _ = ctx.arc(p.position.0, p.position.1, p.size, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn draw_arcs(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	let glow = scene.style.glow_color;
	ctx.set_line_cap("round");
	ctx.set_line_join("round");
	for arc in &scene.arcs {
		let Some((&(x0, y0), rest)) = arc.points.split_first() else {
			continue;
		};
		let opacity = arc.opacity.clamp(0.0, 1.0);

		ctx.set_shadow_color(&glow.rgba(opacity));
		ctx.set_shadow_blur(20.0 * opacity);
		ctx.set_stroke_style_str(&glow.rgba(opacity));
		ctx.set_line_width(1.0 + 3.0 * arc.opacity.max(0.0));
		ctx.begin_path();
		ctx.move_to(x0, y0);
		for &(x, y) in rest {
			ctx.line_to(x, y);
		}
		ctx.stroke();

		// Hot white core over the colored bolt.
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", opacity * 0.8));
		ctx.set_line_width(1.0 + arc.opacity.max(0.0));
		ctx.stroke();
	}
	ctx.set_shadow_blur(0.0);
	ctx.set_shadow_color("transparent");
}

fn draw_connections(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	let (color, glow) = (scene.style.connection_color, scene.style.glow_color);
	ctx.set_line_width(1.0);
	for conn in &scene.connections {
		ctx.set_stroke_style_str(&color.rgba(conn.opacity));
		ctx.begin_path();
		ctx.move_to(conn.from.0, conn.from.1);
		ctx.quadratic_curve_to(conn.control.0, conn.control.1, conn.to.0, conn.to.1);
		ctx.stroke();

		ctx.set_fill_style_str(&glow.rgba(conn.opacity * 1.5));
		ctx.begin_path();
		let _ = ctx.arc(conn.pulse.0, conn.pulse.1, 1.5, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	let (color, glow) = (scene.style.node_color, scene.style.glow_color);
	for node in &scene.nodes {
		let (x, y) = node.position;
		let glow_radius = GLOW_RADIUS * (1.0 + 2.0 * node.energy);

		if let Ok(gradient) = ctx.create_radial_gradient(x, y, 0.0, x, y, glow_radius) {
			let _ = gradient.add_color_stop(0.0, &glow.rgba(0.3 + 0.5 * node.energy));
			let _ = gradient.add_color_stop(0.5, &glow.rgba(0.15 * node.energy));
			let _ = gradient.add_color_stop(1.0, &glow.rgba(0.0));
			ctx.begin_path();
			let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, CORE_RADIUS + node.energy, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&color.rgba(0.7 + 0.3 * node.energy));
		ctx.fill();
	}
}
