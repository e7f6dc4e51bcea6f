mod component;
mod error;
mod filter;
mod geometry;
mod icons;
mod interaction;
mod model;
mod render;
mod sidebar;
mod simulation;
mod state;
mod types;
mod viewport;

pub use component::NetworkGraphCanvas;
pub use error::{InvalidPattern, MalformedTopology};
pub use filter::Filter;
pub use geometry::{ARROW_LENGTH, EDGE_PADDING, EdgePath, resolve_edge};
pub use icons::OsIcon;
pub use interaction::{Gesture, InteractionController};
pub use model::{CONNECTION_RADIUS, GraphModel, MAX_NODE_SIZE, MIN_NODE_SIZE, node_size};
pub use sidebar::{FilterSidebar, NODE_TYPES};
pub use simulation::{Entity, ForceConfig, ForceSimulation};
pub use state::{EntityData, EntityFrame, NetworkGraphState, RenderFeed};
pub use types::{Chain, Connection, EntityKey, EntityKind, HostNode, Link, RawEdge, Topology};
pub use viewport::{MAX_SCALE, MIN_SCALE, ViewTransform, ZoomAnimation};
