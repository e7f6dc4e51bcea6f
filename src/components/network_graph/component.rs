use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::filter::Filter;
use super::render::{self, IconCache};
use super::state::{FrameClock, NetworkGraphState};
use super::types::Topology;

type SharedState = Rc<RefCell<Option<NetworkGraphState>>>;

/// Everything one animation frame needs. Owned only by the pending frame
/// callback, so it is dropped after the last frame runs.
struct FrameLoop {
	state: SharedState,
	ctx: CanvasRenderingContext2d,
	icons: IconCache,
	alive: Arc<AtomicBool>,
	clock: Cell<FrameClock>,
}

/// Steps the shared state by one frame. Once the view is unmounted the state
/// is torn down and false is returned; the caller must not reschedule then.
fn advance_frame(state: &SharedState, alive: &AtomicBool, clock: &Cell<FrameClock>, now: f64) -> bool {
	let mut guard = state.borrow_mut();
	let live = alive.load(Ordering::Relaxed);
	if let Some(s) = guard.as_mut() {
		if !live {
			s.teardown();
		} else {
			let mut c = clock.get();
			s.tick(c.step(now));
			clock.set(c);
		}
	}
	live
}

fn run_frame(frame: Rc<FrameLoop>) {
	if !advance_frame(&frame.state, &frame.alive, &frame.clock, js_sys::Date::now()) {
		return;
	}
	if let Some(ref s) = *frame.state.borrow() {
		render::render(s, &frame.ctx, &frame.icons);
	}
	request_animation_frame(move || run_frame(frame));
}

/// Canvas size: the window when fullscreen, else the fixed size or the
/// parent's client box.
fn measure(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let window = web_sys::window();
		let dim = |v: Option<Result<JsValue, JsValue>>, fallback| {
			v.and_then(Result::ok)
				.and_then(|v| v.as_f64())
				.unwrap_or(fallback)
		};
		return (
			dim(window.as_ref().map(|w| w.inner_width()), 800.0),
			dim(window.as_ref().map(|w| w.inner_height()), 600.0),
		);
	}
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
		height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
	)
}

fn pointer_position(canvas: Option<HtmlCanvasElement>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let rect = canvas?.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Interactive network topology view: nodes and connections laid out by the
/// force simulation, with drag, pan, wheel zoom and zoom buttons.
#[component]
pub fn NetworkGraphCanvas(
	/// Topology to lay out; changes rebuild the model in place
	#[prop(into)]
	topology: Signal<Topology>,
	/// Active filter; an invalid pattern keeps the previous view
	#[prop(into, default = Signal::stored(Filter::default()))]
	filter: Signal<Filter>,
	/// Receives the message of a rejected filter pattern
	#[prop(optional)]
	on_filter_error: Option<Callback<String>>,
	/// Size the canvas to the window
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width; defaults to the parent's width
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height; defaults to the parent's height
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));

	{
		let alive = alive.clone();
		on_cleanup(move || alive.store(false, Ordering::Relaxed));
	}

	let (state_init, alive_init) = (state.clone(), alive.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		if web_sys::window().is_none() {
			warn!("no window; network graph not started");
			return;
		}

		let (w, h) = measure(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("2d canvas context unavailable");
			return;
		};

		let mut initial = NetworkGraphState::new(&topology.get_untracked(), w, h);
		if let Err(err) = initial.apply_filter(filter.get_untracked()) {
			warn!("{err}");
		}
		info!("network graph started at {w}x{h}");
		*state_init.borrow_mut() = Some(initial);

		// One re-center and re-heat per resize event
		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		let resize = window_event_listener(leptos::ev::resize, move |_| {
			let (nw, nh) = measure(&canvas_resize, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		});
		on_cleanup(move || resize.remove());

		let frame = Rc::new(FrameLoop {
			state: state_init.clone(),
			ctx,
			icons: IconCache::load(),
			alive: alive_init.clone(),
			clock: Cell::new(FrameClock::default()),
		});
		request_animation_frame(move || run_frame(frame));
	});

	let state_topology = state.clone();
	Effect::new(move |_| {
		let topology = topology.get();
		if let Some(ref mut s) = *state_topology.borrow_mut() {
			let issues = s.set_topology(&topology);
			if !issues.is_empty() {
				warn!("{} topology entries skipped", issues.len());
			}
		}
	});

	let state_filter = state.clone();
	Effect::new(move |_| {
		let filter = filter.get();
		let mut guard = state_filter.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		if s.filter() == &filter {
			return;
		}
		if let Err(err) = s.apply_filter(filter) {
			warn!("{err}");
			if let Some(cb) = on_filter_error {
				cb.run(err.to_string());
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref.get(), &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref.get(), &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref.get(), &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y(), x, y);
		}
	};

	let state_zi = state.clone();
	let zoom_in = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zi.borrow_mut() {
			s.zoom_in();
		}
	};

	let state_zo = state.clone();
	let zoom_out = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zo.borrow_mut() {
			s.zoom_out();
		}
	};

	view! {
		<div class="network-graph">
			<canvas
				node_ref=canvas_ref
				class="network-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="zoom-controls">
				<button class="zoom-button" title="Zoom in" on:click=zoom_in>"+"</button>
				<button class="zoom-button" title="Zoom out" on:click=zoom_out>"−"</button>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::types::{Connection, HostNode, RawEdge};

	fn shared() -> SharedState {
		let topology = Topology {
			nodes: vec![
				HostNode {
					id: "db".into(),
					os: "Linux".into(),
					node_type: "server".into(),
				},
				HostNode {
					id: "app".into(),
					os: "Linux".into(),
					node_type: "server".into(),
				},
			],
			connections: vec![Connection {
				id: "pg".into(),
				protocol: "TCP".into(),
				source_port: "40000".into(),
				target_port: "5432".into(),
				description: String::new(),
			}],
			edges: vec![RawEdge {
				source: "app".into(),
				target: "db".into(),
				connection: "pg".into(),
			}],
		};
		Rc::new(RefCell::new(Some(NetworkGraphState::new(&topology, 800.0, 600.0))))
	}

	#[test]
	fn test_frame_advances_while_mounted() {
		let state = shared();
		let (alive, clock) = (AtomicBool::new(true), Cell::new(FrameClock::default()));

		assert!(advance_frame(&state, &alive, &clock, 0.0));
		assert!(advance_frame(&state, &alive, &clock, 16.0));
		let guard = state.borrow();
		let s = guard.as_ref().unwrap();
		assert!(s.simulation().alpha() < 1.0);
		assert!(!s.is_torn_down());
	}

	#[test]
	fn test_frame_after_unmount_tears_down_and_stops() {
		let state = shared();
		let (alive, clock) = (AtomicBool::new(true), Cell::new(FrameClock::default()));
		assert!(advance_frame(&state, &alive, &clock, 0.0));

		alive.store(false, Ordering::Relaxed);
		assert!(!advance_frame(&state, &alive, &clock, 16.0));
		assert!(state.borrow().as_ref().unwrap().is_torn_down());
		assert!(!advance_frame(&state, &alive, &clock, 32.0));
	}
}
