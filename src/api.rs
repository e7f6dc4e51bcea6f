//! Topology loading: the backend endpoint, plus a bundled sample for when the
//! backend is not reachable.

use log::{debug, warn};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::components::network_graph::Topology;

const SAMPLE_TOPOLOGY: &str = include_str!("sample_topology.json");

/// Why a topology could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
	/// Not running in a browser
	#[error("no browser window")]
	NoWindow,

	/// A browser API call failed
	#[error("{context}: {message}")]
	Js {
		/// Which step failed
		context: &'static str,
		/// Debug rendering of the thrown value
		message: String,
	},

	/// Non-2xx response
	#[error("HTTP {0}")]
	Status(u16),

	/// Body is not a topology document
	#[error("invalid topology document: {0}")]
	Decode(#[from] serde_json::Error),
}

impl FetchError {
	fn js(context: &'static str, value: wasm_bindgen::JsValue) -> Self {
		FetchError::Js {
			context,
			message: format!("{value:?}"),
		}
	}
}

/// GETs a topology document from `url`.
pub async fn fetch_topology(url: &str) -> Result<Topology, FetchError> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_mode(RequestMode::SameOrigin);

	let request = Request::new_with_str_and_init(url, &opts)
		.map_err(|e| FetchError::js("request error", e))?;

	let window = web_sys::window().ok_or(FetchError::NoWindow)?;
	let resp_value = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| FetchError::js("fetch error", e))?;

	let resp: Response = resp_value
		.dyn_into()
		.map_err(|e| FetchError::js("response is not a Response", e))?;

	if !resp.ok() {
		return Err(FetchError::Status(resp.status()));
	}

	let text = JsFuture::from(resp.text().map_err(|e| FetchError::js("text promise error", e))?)
		.await
		.map_err(|e| FetchError::js("text error", e))?;
	let body = text.as_string().unwrap_or_default();

	let topology: Topology = serde_json::from_str(&body)?;
	debug!(
		"fetched topology from {url}: {} nodes, {} connections, {} edges",
		topology.nodes.len(),
		topology.connections.len(),
		topology.edges.len()
	);
	Ok(topology)
}

/// The bundled demo network.
pub fn sample_topology() -> Topology {
	serde_json::from_str(SAMPLE_TOPOLOGY).unwrap_or_else(|err| {
		warn!("bundled sample topology is invalid: {err}");
		Topology::default()
	})
}
