use std::collections::BTreeSet;

use leptos::ev::MouseEvent;
use leptos::prelude::*;

use super::filter::Filter;

/// Node types offered as checkboxes.
pub const NODE_TYPES: [&str; 3] = ["server", "client", "network"];

fn capitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Slide-in panel collecting a type selection and an id pattern. Nothing is
/// applied until the apply button is pressed.
#[component]
pub fn FilterSidebar(
	/// Slid in while true; the close button clears it
	open: RwSignal<bool>,
	/// Called with the selection when "Apply Filters" is pressed
	on_apply: Callback<Filter>,
	/// Shown under the button, e.g. a rejected pattern
	#[prop(into)]
	error: Signal<Option<String>>,
) -> impl IntoView {
	let selected = RwSignal::new(BTreeSet::<String>::new());
	let pattern = RwSignal::new(String::new());

	let apply = move |_: MouseEvent| {
		let pattern = pattern.get_untracked();
		on_apply.run(Filter {
			types: selected.get_untracked(),
			pattern: (!pattern.is_empty()).then_some(pattern),
		});
	};

	let checkboxes = NODE_TYPES
		.iter()
		.map(|&node_type| {
			view! {
				<label class="type-option">
					<input
						type="checkbox"
						prop:checked=move || selected.with(|s| s.contains(node_type))
						on:change=move |ev| {
							let checked = event_target_checked(&ev);
							selected
								.update(|s| {
									if checked {
										s.insert(node_type.to_string());
									} else {
										s.remove(node_type);
									}
								});
						}
					/>
					{capitalize(node_type)}
				</label>
			}
		})
		.collect_view();

	view! {
		<aside class="filter-sidebar" class:open=move || open.get()>
			<header class="filter-header">
				<h2>"Filters"</h2>
				<button class="close-button" title="Close" on:click=move |_| open.set(false)>
					"×"
				</button>
			</header>
			<fieldset class="filter-types">
				<legend>"Node Types"</legend>
				{checkboxes}
			</fieldset>
			<label for="regex-filter">"Regex Filter"</label>
			<input
				id="regex-filter"
				type="text"
				placeholder="Enter regex..."
				prop:value=move || pattern.get()
				on:input=move |ev| pattern.set(event_target_value(&ev))
			/>
			<button class="apply-button" on:click=apply>
				"Apply Filters"
			</button>
			{move || error.get().map(|msg| view! { <p class="filter-error">{msg}</p> })}
		</aside>
	}
}
