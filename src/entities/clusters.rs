use serde::{Deserialize, Serialize};

use super::{impl_scoped, LabelOp, Labels};
use crate::secret::Secret;

/// Identifies a cluster within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterId {
    /// Owning organization
    pub organization_id: String,
    /// Cluster identifier
    pub cluster_id: String,
}

impl ClusterId {
    /// Creates a cluster id.
    pub fn new(organization_id: impl Into<String>, cluster_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            cluster_id: cluster_id.into(),
        }
    }
}

/// Infrastructure status reported for clusters and nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfraStatus {
    /// Up and serving
    Running,
    /// Being installed
    #[default]
    Installing,
    /// Failed
    Error,
}

/// Kind of cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterType {
    /// Kubernetes cluster
    #[default]
    Kubernetes,
    /// Single Docker host
    DockerNode,
}

/// A cluster as stored by the infrastructure backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterInfo {
    pub organization_id: String,
    pub cluster_id: String,
    pub name: String,
    pub description: String,
    pub cluster_type: ClusterType,
    pub multitenant: bool,
    pub status: InfraStatus,
    pub labels: Labels,
}

/// A node of a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub organization_id: String,
    pub cluster_id: String,
    pub node_id: String,
    pub ip: String,
    pub labels: Labels,
    pub status: InfraStatus,
}

/// Nodes of one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeList {
    pub nodes: Vec<Node>,
}

/// A cluster enriched with node counts.
///
/// Built from one [`ClusterInfo`] and the node list of that cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub organization_id: String,
    pub cluster_id: String,
    pub name: String,
    pub description: String,
    pub cluster_type: ClusterType,
    pub multitenant: bool,
    pub status: InfraStatus,
    pub labels: Labels,
    /// Number of nodes in the cluster
    pub total_nodes: u64,
    /// Number of nodes whose status is [`InfraStatus::Running`]
    pub running_nodes: u64,
}

impl Cluster {
    /// Merges a cluster record with its nodes.
    pub fn with_node_stats(info: ClusterInfo, nodes: &[Node]) -> Self {
        let running = nodes
            .iter()
            .filter(|node| node.status == InfraStatus::Running)
            .count();

        Self {
            organization_id: info.organization_id,
            cluster_id: info.cluster_id,
            name: info.name,
            description: info.description,
            cluster_type: info.cluster_type,
            multitenant: info.multitenant,
            status: info.status,
            labels: info.labels,
            total_nodes: nodes.len() as u64,
            running_nodes: running as u64,
        }
    }
}

/// Clusters of an organization, in backend order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClusterList {
    pub clusters: Vec<Cluster>,
}

/// Changes the name, description or labels of a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateClusterRequest {
    pub organization_id: String,
    pub cluster_id: String,
    /// New name; empty keeps the current one
    pub name: String,
    /// New description; empty keeps the current one
    pub description: String,
    pub label_op: LabelOp,
    pub labels: Labels,
}

/// Installs the platform on a set of hosts, creating a new cluster.
///
/// `private_key` authenticates `username` on the target hosts.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InstallRequest {
    pub organization_id: String,
    /// Cluster to install into; empty lets the backend allocate one
    pub cluster_id: String,
    pub cluster_type: ClusterType,
    pub hostname: String,
    pub username: String,
    pub private_key: Secret<String>,
    /// Addresses of the hosts to install
    pub nodes: Vec<String>,
}

/// Progress of an install operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallState {
    #[default]
    Registered,
    InProgress,
    Error,
    Finished,
}

/// Handle of a started install.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallResponse {
    pub organization_id: String,
    pub cluster_id: String,
    pub install_id: String,
    pub state: InstallState,
}

/// Changes the labels of a node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateNodeRequest {
    pub organization_id: String,
    pub node_id: String,
    pub label_op: LabelOp,
    pub labels: Labels,
}

impl_scoped!(ClusterId, UpdateClusterRequest, InstallRequest, UpdateNodeRequest);

#[cfg(test)]
mod tests {
    use super::*;

    fn node(status: InfraStatus) -> Node {
        Node {
            status,
            ..Node::default()
        }
    }

    #[test]
    fn node_stats_count_running_nodes_only() {
        let info = ClusterInfo {
            cluster_id: "c1".to_string(),
            name: "prod".to_string(),
            ..ClusterInfo::default()
        };
        let nodes = [
            node(InfraStatus::Running),
            node(InfraStatus::Error),
            node(InfraStatus::Running),
            node(InfraStatus::Installing),
        ];

        let cluster = Cluster::with_node_stats(info, &nodes);
        assert_eq!(cluster.cluster_id, "c1");
        assert_eq!(cluster.total_nodes, 4);
        assert_eq!(cluster.running_nodes, 2);
    }

    #[test]
    fn cluster_without_nodes_has_zero_counts() {
        let cluster = Cluster::with_node_stats(ClusterInfo::default(), &[]);
        assert_eq!((cluster.total_nodes, cluster.running_nodes), (0, 0));
    }
}
