//! In-memory road network with the filters applied before solving.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::source::{NetworkSource, SourceEdge, SourceNode};
use crate::error::PostmanResult;
use crate::graph::{connected_components, Graph, Position};

/// Highway classes excluded from a drivable inspection route by default.
pub const MOTORWAY_CLASSES: [&str; 2] = ["motorway", "motorway_link"];

/// Descriptive attributes of a road segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadAttributes {
    /// Road class, e.g. `"residential"` or `"motorway"`.
    pub highway: String,
    /// Street name, if known.
    pub name: Option<String>,
    /// Upstream way identifier, if known.
    pub way_id: Option<u64>,
}

impl RoadAttributes {
    /// Creates attributes with only a road class set.
    pub fn new(highway: impl Into<String>) -> Self {
        Self {
            highway: highway.into(),
            name: None,
            way_id: None,
        }
    }

    /// Sets the street name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the upstream way identifier.
    pub fn with_way_id(mut self, way_id: u64) -> Self {
        self.way_id = Some(way_id);
        self
    }
}

/// A road node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadNode {
    /// External node key.
    pub key: u64,
    /// Optional planar position.
    pub position: Option<Position>,
}

/// An undirected road segment between two node keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    /// Key of one endpoint.
    pub from: u64,
    /// Key of the other endpoint.
    pub to: u64,
    /// Segment length.
    pub length: f64,
    /// Road attributes.
    pub attributes: RoadAttributes,
}

/// A road network held in memory.
///
/// Retrieval is left to the caller; this type only carries the data and
/// the reductions applied before handing it to the solver.
///
/// # Examples
///
/// ```
/// use u_postman::network::{RoadAttributes, RoadNetwork, MOTORWAY_CLASSES};
///
/// let mut net = RoadNetwork::new();
/// for key in 1..=3 {
///     net.add_node(key, None);
/// }
/// net.add_segment(1, 2, 100.0, RoadAttributes::new("residential"));
/// net.add_segment(2, 3, 250.0, RoadAttributes::new("motorway"));
///
/// let local = net.without_highway_classes(&MOTORWAY_CLASSES).largest_component();
/// assert_eq!(local.node_count(), 2);
/// assert_eq!(local.segment_count(), 1);
///
/// let graph = local.into_graph().unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadNetwork {
    nodes: Vec<RoadNode>,
    segments: Vec<RoadSegment>,
}

impl RoadNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. Re-adding a key is a no-op.
    pub fn add_node(&mut self, key: u64, position: Option<Position>) {
        if !self.nodes.iter().any(|n| n.key == key) {
            self.nodes.push(RoadNode { key, position });
        }
    }

    /// Adds a segment between two node keys.
    pub fn add_segment(&mut self, from: u64, to: u64, length: f64, attributes: RoadAttributes) {
        self.segments.push(RoadSegment {
            from,
            to,
            length,
            attributes,
        });
    }

    /// Returns the nodes.
    pub fn nodes(&self) -> &[RoadNode] {
        &self.nodes
    }

    /// Returns the segments.
    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Sum of segment lengths.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// Returns a copy without segments whose road class is listed.
    ///
    /// Nodes are kept; pair with [`largest_component`](Self::largest_component)
    /// to drop the ones left stranded.
    pub fn without_highway_classes(&self, classes: &[&str]) -> RoadNetwork {
        RoadNetwork {
            nodes: self.nodes.clone(),
            segments: self
                .segments
                .iter()
                .filter(|s| !classes.contains(&s.attributes.highway.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Returns the connected component with the most nodes.
    ///
    /// Ties go to the component containing the earliest-added node.
    /// Segments referencing unknown keys are dropped.
    pub fn largest_component(&self) -> RoadNetwork {
        let index: HashMap<u64, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.key, i))
            .collect();
        let known: Vec<(usize, usize)> = self
            .segments
            .iter()
            .filter_map(|s| Some((*index.get(&s.from)?, *index.get(&s.to)?)))
            .collect();

        let components = connected_components(self.nodes.len(), known.into_iter());
        let Some(largest) = components
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.len().cmp(&b.len()).then(ib.cmp(ia)))
            .map(|(_, c)| c)
        else {
            return RoadNetwork::new();
        };

        let mut keep = vec![false; self.nodes.len()];
        for &i in largest {
            keep[i] = true;
        }
        let in_component = |key: &u64| index.get(key).is_some_and(|&i| keep[i]);

        RoadNetwork {
            nodes: self
                .nodes
                .iter()
                .enumerate()
                .filter(|&(i, _)| keep[i])
                .map(|(_, n)| n.clone())
                .collect(),
            segments: self
                .segments
                .iter()
                .filter(|s| in_component(&s.from) && in_component(&s.to))
                .cloned()
                .collect(),
        }
    }

    /// Builds the solver graph.
    ///
    /// # Errors
    ///
    /// Whatever [`Graph::from_source`] reports, notably
    /// [`InvalidGraph`](crate::error::PostmanError::InvalidGraph) when the
    /// network is not connected.
    pub fn into_graph(self) -> PostmanResult<Graph<RoadAttributes>> {
        Graph::from_source(&self)
    }
}

impl NetworkSource for RoadNetwork {
    type Payload = RoadAttributes;

    fn nodes(&self) -> Vec<SourceNode> {
        self.nodes
            .iter()
            .map(|n| SourceNode {
                key: n.key,
                position: n.position,
            })
            .collect()
    }

    fn edges(&self) -> Vec<SourceEdge<RoadAttributes>> {
        self.segments
            .iter()
            .map(|s| SourceEdge {
                from: s.from,
                to: s.to,
                length: s.length,
                payload: s.attributes.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PostmanError;

    /// Two residential loops joined only by a motorway link.
    fn sample() -> RoadNetwork {
        let mut net = RoadNetwork::new();
        for key in 1..=6 {
            net.add_node(key, Some(Position::new(key as f64, 0.0)));
        }
        let res = |name: &str| RoadAttributes::new("residential").with_name(name);
        net.add_segment(1, 2, 10.0, res("Addison St"));
        net.add_segment(2, 3, 10.0, res("Addison St"));
        net.add_segment(3, 1, 10.0, res("Clark St"));
        net.add_segment(3, 4, 50.0, RoadAttributes::new("motorway_link").with_way_id(99));
        net.add_segment(4, 5, 5.0, res("Belmont Ave"));
        net.add_segment(5, 4, 6.0, res("Belmont Ave"));
        net
    }

    #[test]
    fn test_add_node_dedupes() {
        let mut net = RoadNetwork::new();
        net.add_node(5, None);
        net.add_node(5, None);
        assert_eq!(net.node_count(), 1);
    }

    #[test]
    fn test_filter_highway_classes() {
        let net = sample().without_highway_classes(&MOTORWAY_CLASSES);
        assert_eq!(net.segment_count(), 5);
        assert_eq!(net.node_count(), 6);
        assert!(net
            .segments()
            .iter()
            .all(|s| s.attributes.highway == "residential"));
    }

    #[test]
    fn test_filtered_network_is_disconnected() {
        let net = sample().without_highway_classes(&MOTORWAY_CLASSES);
        let err = net.into_graph().unwrap_err();
        assert!(matches!(err, PostmanError::InvalidGraph(_)));
    }

    #[test]
    fn test_largest_component() {
        let net = sample()
            .without_highway_classes(&MOTORWAY_CLASSES)
            .largest_component();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.segment_count(), 3);
        assert!((net.total_length() - 30.0).abs() < 1e-10);

        let g = net.into_graph().unwrap();
        assert!(g.is_even());
        assert_eq!(g.edge(2).unwrap().payload().name.as_deref(), Some("Clark St"));
    }

    #[test]
    fn test_largest_component_tie_prefers_first() {
        let mut net = RoadNetwork::new();
        for key in [10, 20, 30, 40] {
            net.add_node(key, None);
        }
        net.add_segment(30, 40, 1.0, RoadAttributes::new("service"));
        net.add_segment(10, 20, 1.0, RoadAttributes::new("service"));
        let net = net.largest_component();
        let keys: Vec<u64> = net.nodes().iter().map(|n| n.key).collect();
        assert_eq!(keys, vec![10, 20]);
    }

    #[test]
    fn test_largest_component_of_empty() {
        assert_eq!(RoadNetwork::new().largest_component().node_count(), 0);
    }

    #[test]
    fn test_json_roundtrip_into_graph() {
        let json = serde_json::to_string(&sample()).unwrap();
        let net: RoadNetwork = serde_json::from_str(&json).unwrap();
        assert_eq!(net, sample());
        // Node 6 has no segments, so the full network is not connected.
        let g = net.largest_component().into_graph().unwrap();
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 6);
        assert_eq!(g.edge(3).unwrap().payload().way_id, Some(99));
    }
}
