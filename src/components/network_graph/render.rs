use std::collections::HashMap;
use std::f64::consts::PI;

use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::geometry::{ARROW_LENGTH, EdgePath};
use super::icons::OsIcon;
use super::state::{EntityData, EntityFrame, NetworkGraphState, RenderFeed};

const BACKGROUND: &str = "#f8fafc";
const EDGE_COLOR: &str = "#4a4a4a";
const LABEL_COLOR: &str = "#1f2937";
const CONNECTION_FILL: &str = "#e0e7ff";
const CONNECTION_STROKE: &str = "#6366f1";
const PIN_STROKE: &str = "#f97316";

/// OS icons, loaded once per canvas.
pub struct IconCache {
	images: HashMap<OsIcon, HtmlImageElement>,
}

impl IconCache {
	/// Starts loading every icon; images draw once complete.
	pub fn load() -> Self {
		let mut images = HashMap::new();
		for icon in OsIcon::ALL {
			match HtmlImageElement::new() {
				Ok(img) => {
					img.set_src(&icon.path());
					images.insert(icon, img);
				}
				Err(err) => warn!("could not create image for {}: {err:?}", icon.name()),
			}
		}
		Self { images }
	}

	fn ready(&self, icon: OsIcon) -> Option<&HtmlImageElement> {
		self.images
			.get(&icon)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}
}

/// Draws one frame: background, then edges, hosts and connections.
pub fn render(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d, icons: &IconCache) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let transform = state.transform();
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	let feed = state.render_feed();
	draw_edges(&feed, ctx);
	for entity in &feed.entities {
		match entity.data {
			EntityData::Node(_) => draw_node(entity, ctx, icons),
			EntityData::Connection(_) => draw_connection(entity, ctx),
		}
	}
	ctx.restore();
}

fn draw_edges(feed: &RenderFeed<'_>, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.set_fill_style_str(EDGE_COLOR);
	ctx.set_line_width(2.0);

	for path in &feed.edges {
		if path.is_degenerate() || path.length() == 0.0 {
			continue;
		}
		draw_edge(path, ctx);
	}
}

fn draw_edge(path: &EdgePath, ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	ctx.move_to(path.start.0, path.start.1);
	ctx.line_to(path.end.0, path.end.1);
	ctx.stroke();

	let (ux, uy) = (path.ux, path.uy);
	let (px, py) = (-uy * ARROW_LENGTH * 0.5, ux * ARROW_LENGTH * 0.5);
	let (back_x, back_y) = path.end;
	ctx.begin_path();
	ctx.move_to(path.tip.0, path.tip.1);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_node(entity: &EntityFrame<'_>, ctx: &CanvasRenderingContext2d, icons: &IconCache) {
	let EntityData::Node(node) = entity.data else {
		return;
	};
	let (x, y, r) = (entity.x, entity.y, entity.radius);
	let icon = OsIcon::for_os(&node.os);

	match icons.ready(icon) {
		Some(img) => {
			let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
				img,
				x - r,
				y - r,
				r * 2.0,
				r * 2.0,
			);
		}
		None => {
			ctx.begin_path();
			let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(icon.fallback_color());
			ctx.fill();
		}
	}

	if entity.pinned {
		draw_pin_ring(x, y, r + 3.0, ctx);
	}

	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font("10px sans-serif");
	ctx.set_text_align("left");
	let _ = ctx.fill_text(&node.id, x + r + 4.0, y + 4.0);
}

fn draw_connection(entity: &EntityFrame<'_>, ctx: &CanvasRenderingContext2d) {
	let EntityData::Connection(conn) = entity.data else {
		return;
	};
	let (x, y, r) = (entity.x, entity.y, entity.radius);

	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(CONNECTION_FILL);
	ctx.fill();
	ctx.set_stroke_style_str(CONNECTION_STROKE);
	ctx.set_line_width(1.5);
	ctx.stroke();
	if entity.pinned {
		draw_pin_ring(x, y, r + 3.0, ctx);
	}

	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font("8px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&conn.protocol, x, y - r - 5.0);
	let _ = ctx.fill_text(
		&format!("{}->{}", conn.source_port, conn.target_port),
		x,
		y + r + 5.0 + 8.0,
	);
}

/// Dashed ring around an entity held by the pointer.
fn draw_pin_ring(x: f64, y: f64, r: f64, ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(PIN_STROKE);
	ctx.set_line_width(1.5);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(4.0),
		&JsValue::from_f64(3.0),
	));
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}
