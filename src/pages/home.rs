use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::backdrop::{Intensity, NeuralBackdrop, StyleId};

/// Default Home Page
///
/// The backdrop is configured from the URL, e.g. `/?style=plasma&intensity=high&cycle=8000`.
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let style = Signal::derive(move || {
		query
			.read()
			.get("style")
			.map(|id| StyleId::from_id(&id))
			.unwrap_or_default()
	});
	let (intensity, style_cycle) = query.with_untracked(|q| {
		(
			q.get("intensity")
				.map(|id| Intensity::from_id(&id))
				.unwrap_or_default(),
			q.get("cycle").and_then(|ms| ms.parse::<f64>().ok()),
		)
	});

	view! {
		<div class="fullscreen-backdrop">
			<NeuralBackdrop style=style intensity=intensity style_cycle=style_cycle />
			<div class="backdrop-overlay">
				<h1>"Neural Backdrop"</h1>
				<p class="subtitle">"Move the pointer to pull the network. Click to strike."</p>
			</div>
		</div>
	}
}
