//! Force-directed graph widgets for notebook output cells.
//!
//! A graph (nodes + links) and a handful of force-layout parameters are turned
//! into a self-contained HTML document that carries the prebuilt NOVA Graph
//! bundle, then shown in an iframe through the notebook's rich display.
//!
//! ```no_run
//! use novagraph::{GraphData, GraphLink, LayoutParams, visualize};
//!
//! let mut graph = GraphData::new();
//! graph
//!     .add_node("a", "1")
//!     .add_node("b", "2")
//!     .add_link(GraphLink::new("a", "b"));
//!
//! visualize(&graph, &LayoutParams::default())?;
//! # Ok::<(), novagraph::Error>(())
//! ```

pub mod assets;
pub mod config;
pub mod display;
pub mod error;
pub mod html;
pub mod params;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use assets::{AssetProvider, BundledAssets, DirAssets};
pub use config::WidgetConfig;
pub use display::{DisplaySink, EvcxrSink, FixedId, IdSource, RandomIds, RecordingSink, SeededIds};
pub use error::{Error, Result};
pub use html::{Document, HtmlBuilder, Injection};
pub use params::LayoutParams;

pub use novagraph_graph::{GraphData, GraphLink, GraphNode, GraphSummary};

/// Validates, builds and displays widgets with injected collaborators.
#[derive(Debug)]
pub struct Embedder<A, I, S> {
    builder: HtmlBuilder<A>,
    ids: I,
    sink: S,
}

impl Embedder<BundledAssets, RandomIds, EvcxrSink> {
    /// Bundled assets, random iframe ids, evcxr display on stdout.
    pub fn notebook() -> Self {
        Self::new(BundledAssets, RandomIds, EvcxrSink::stdout())
    }
}

impl<A, I, S> Embedder<A, I, S>
where
    A: AssetProvider,
    I: IdSource,
    S: DisplaySink,
{
    pub fn new(assets: A, ids: I, sink: S) -> Self {
        Self {
            builder: HtmlBuilder::new(assets),
            ids,
            sink,
        }
    }

    pub fn with_injection(mut self, injection: Injection) -> Self {
        self.builder = self.builder.with_injection(injection);
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Build the document for `data` and show it in an iframe.
    ///
    /// Nothing reaches the sink unless validation and building succeed.
    pub fn render<T>(&mut self, data: &T, params: &LayoutParams) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_value(data)?;
        params::validate(&data, params)?;
        log_diagnostics(&data);

        let doc = self.builder.build(&data, params)?;
        display::emit(&doc.escaped(), params.height, &mut self.ids, &mut self.sink)
    }
}

/// Render `data` in the current notebook output cell.
pub fn visualize<T>(data: &T, params: &LayoutParams) -> Result<()>
where
    T: Serialize + ?Sized,
{
    Embedder::notebook().render(data, params)
}

/// Validate and build the widget document without displaying it.
///
/// Identical inputs produce byte-identical documents. Non-finite floats have
/// no JSON form and reach the bundle as `null`, which it treats like a missing
/// value.
pub fn build_html<T, A>(
    data: &T,
    params: &LayoutParams,
    assets: A,
    injection: Injection,
) -> Result<Document>
where
    T: Serialize + ?Sized,
    A: AssetProvider,
{
    let data = serde_json::to_value(data)?;
    params::validate(&data, params)?;
    log_diagnostics(&data);

    HtmlBuilder::new(assets)
        .with_injection(injection)
        .build(&data, params)
}

/// Warn about graphs the bundle will render poorly. Loosely shaped data is
/// passed through untouched.
fn log_diagnostics(data: &Value) {
    let graph = match GraphData::deserialize(data) {
        Ok(graph) => graph,
        Err(err) => {
            tracing::debug!(%err, "graph data does not match the typed model, skipping diagnostics");
            return;
        }
    };

    let summary = graph.summary();
    for link in &summary.dangling_links {
        tracing::warn!(source = %link.source, target = %link.target, "link references an unknown node");
    }
    for id in &summary.duplicate_ids {
        tracing::warn!(%id, "duplicate node id");
    }
    if summary.exceeds_palette() {
        tracing::warn!(
            groups = summary.groups.len(),
            "more node groups than palette colours, some groups will share a colour"
        );
    }
}
