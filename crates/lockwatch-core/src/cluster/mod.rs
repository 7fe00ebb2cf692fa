mod node;
mod snapshot;
mod view;

pub use node::{NodeEndpoint, NodeId, NodeRegistry};
pub use snapshot::{NodeSnapshot, StatusReport};
pub use view::{aggregate, ClusterView};
