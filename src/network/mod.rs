//! Road network input.
//!
//! - [`NetworkSource`]: trait any data provider implements to feed
//!   [`Graph::from_source`](crate::graph::Graph::from_source)
//! - [`RoadNetwork`]: in-memory nodes and segments with [`RoadAttributes`],
//!   road-class filtering and largest-component reduction

mod road;
mod source;

pub use road::{RoadAttributes, RoadNetwork, RoadNode, RoadSegment, MOTORWAY_CLASSES};
pub use source::{NetworkSource, SourceEdge, SourceNode};
