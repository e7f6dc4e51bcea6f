use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use crate::api::{fetch_topology, sample_topology};
use crate::components::network_graph::{Filter, FilterSidebar, NetworkGraphCanvas, Topology};

const TOPOLOGY_URL: &str = "/api/graph-data";

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let topology = RwSignal::new(Topology::default());
	let filter = RwSignal::new(Filter::default());
	let filter_error = RwSignal::new(None::<String>);
	let sidebar_open = RwSignal::new(false);

	// Backend first; the bundled sample keeps the page usable without one
	spawn_local(async move {
		match fetch_topology(TOPOLOGY_URL).await {
			Ok(data) => {
				info!("loaded topology from {TOPOLOGY_URL}");
				topology.set(data);
			}
			Err(err) => {
				warn!("could not load {TOPOLOGY_URL}: {err}; using sample topology");
				topology.set(sample_topology());
			}
		}
	});

	let on_apply = Callback::new(move |next: Filter| {
		filter_error.set(None);
		filter.set(next);
	});
	let on_filter_error = Callback::new(move |msg: String| filter_error.set(Some(msg)));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<FilterSidebar open=sidebar_open on_apply=on_apply error=filter_error />
				<Show when=move || !sidebar_open.get()>
					<button
						class="menu-button"
						title="Filters"
						on:click=move |_: MouseEvent| sidebar_open.set(true)
					>
						"☰"
					</button>
				</Show>
				<NetworkGraphCanvas
					topology=topology
					filter=filter
					on_filter_error=on_filter_error
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Network Topology"</h1>
					<p class="subtitle">
						"Drag hosts to reposition. Scroll or use +/− to zoom. Drag background to pan."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
