use leptos::prelude::*;

use crate::components::backdrop::{Intensity, NeuralBackdrop, StyleId};

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<NeuralBackdrop style=StyleId::Void intensity=Intensity::Low ambient_arcs=false />
		<h1>"Uh oh!" <br /> "We couldn't find that page!"</h1>
	}
}
