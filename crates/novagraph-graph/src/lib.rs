use serde::{Deserialize, Serialize};

pub mod summary;

pub use summary::GraphSummary;

/// Graph node as consumed by the visualization bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// Category used by the bundle's colour scale.
    pub group: String,
}

/// Graph link as consumed by the visualization bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    /// Optional weight; drives link stroke width in the bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Complete graph payload handed to the visualization bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
        }
    }
}

impl GraphLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

impl GraphData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: impl Into<String>, group: impl Into<String>) -> &mut Self {
        self.nodes.push(GraphNode::new(id, group));
        self
    }

    pub fn add_link(&mut self, link: GraphLink) -> &mut Self {
        self.links.push(link);
        self
    }

    /// Compute structural diagnostics for this graph.
    pub fn summary(&self) -> GraphSummary {
        GraphSummary::from_graph(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_serializes_in_field_order() {
        let node = GraphNode::new("a", "1");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"id":"a","group":"1"}"#);
    }

    #[test]
    fn test_link_omits_missing_value() {
        let link = GraphLink::new("a", "b");
        assert_eq!(
            serde_json::to_string(&link).unwrap(),
            r#"{"source":"a","target":"b"}"#
        );

        let weighted = GraphLink::new("a", "b").with_value(2.5);
        assert_eq!(
            serde_json::to_string(&weighted).unwrap(),
            r#"{"source":"a","target":"b","value":2.5}"#
        );
    }

    #[test]
    fn test_graph_data_round_trips_bundle_shape() {
        let json = r#"{"nodes":[{"id":"a","group":"x"}],"links":[{"source":"a","target":"a","value":1.0}]}"#;
        let data: GraphData = serde_json::from_str(json).unwrap();

        assert_eq!(data.nodes, vec![GraphNode::new("a", "x")]);
        assert_eq!(data.links[0].value, Some(1.0));
    }

    #[test]
    fn test_builder_methods() {
        let mut data = GraphData::new();
        data.add_node("a", "1")
            .add_node("b", "2")
            .add_link(GraphLink::new("a", "b"));

        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.links.len(), 1);
    }
}
