use std::collections::{BTreeSet, HashMap};
use std::fmt;

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::{GraphData, GraphLink, GraphNode};

/// Number of distinct colours in the bundle's categorical palette.
pub const PALETTE_SIZE: usize = 10;

/// Structural diagnostics for a [`GraphData`] payload.
///
/// The bundle resolves link endpoints by node id and gives up on the whole
/// simulation when one is missing, so dangling links are worth surfacing
/// before the data leaves Rust.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSummary {
    pub node_count: usize,
    pub link_count: usize,
    pub groups: BTreeSet<String>,
    pub duplicate_ids: Vec<String>,
    pub dangling_links: Vec<GraphLink>,
    pub isolated_nodes: Vec<String>,
    pub components: usize,
}

/// Build an undirected petgraph graph from node/link lists.
///
/// Links whose endpoints are unknown are skipped. Later duplicates of a node
/// id resolve to the first occurrence.
pub fn build_graph(
    nodes: &[GraphNode],
    links: &[GraphLink],
) -> (UnGraph<String, ()>, HashMap<String, NodeIndex>) {
    let mut graph = UnGraph::<String, ()>::new_undirected();
    let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

    for node in nodes {
        if node_map.contains_key(&node.id) {
            continue;
        }
        let idx = graph.add_node(node.id.clone());
        node_map.insert(node.id.clone(), idx);
    }

    for link in links {
        if let (Some(&source_idx), Some(&target_idx)) =
            (node_map.get(&link.source), node_map.get(&link.target))
        {
            graph.add_edge(source_idx, target_idx, ());
        }
    }

    (graph, node_map)
}

impl GraphSummary {
    pub fn from_graph(data: &GraphData) -> Self {
        let (graph, node_map) = build_graph(&data.nodes, &data.links);

        let mut seen = BTreeSet::new();
        let mut duplicate_ids = Vec::new();
        for node in &data.nodes {
            if !seen.insert(node.id.as_str()) && !duplicate_ids.contains(&node.id) {
                duplicate_ids.push(node.id.clone());
            }
        }

        let dangling_links = data
            .links
            .iter()
            .filter(|l| !node_map.contains_key(&l.source) || !node_map.contains_key(&l.target))
            .cloned()
            .collect();

        let isolated_nodes = graph
            .node_indices()
            .filter(|&idx| graph.neighbors(idx).next().is_none())
            .filter_map(|idx| graph.node_weight(idx).cloned())
            .collect();

        Self {
            node_count: data.nodes.len(),
            link_count: data.links.len(),
            groups: data.nodes.iter().map(|n| n.group.clone()).collect(),
            duplicate_ids,
            dangling_links,
            isolated_nodes,
            components: connected_components(&graph),
        }
    }

    /// More groups than palette colours means some groups share a colour.
    pub fn exceeds_palette(&self) -> bool {
        self.groups.len() > PALETTE_SIZE
    }

    /// True when the bundle can resolve every link endpoint unambiguously.
    pub fn is_renderable(&self) -> bool {
        self.dangling_links.is_empty() && self.duplicate_ids.is_empty()
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes: {}", self.node_count)?;
        writeln!(f, "links: {}", self.link_count)?;
        writeln!(f, "groups: {}", self.groups.len())?;
        writeln!(f, "components: {}", self.components)?;
        writeln!(f, "isolated nodes: {}", self.isolated_nodes.len())?;
        for id in &self.duplicate_ids {
            writeln!(f, "duplicate node id: {id}")?;
        }
        for link in &self.dangling_links {
            writeln!(f, "dangling link: {} -> {}", link.source, link.target)?;
        }
        Ok(())
    }
}
