use std::sync::Arc;

use super::{call, fan_out};
use crate::backend::{ClustersClient, NodesClient};
use crate::context::Ctx;
use crate::entities::{
    Cluster, ClusterId, ClusterList, InstallRequest, InstallResponse, OrganizationId,
    UpdateClusterRequest,
};
use crate::error::BackendFailure;
use crate::verified::Verified;

/// Cluster operations. Listing and info merge cluster records with node
/// statistics from the nodes backend.
#[derive(Clone)]
pub struct ClustersManager {
    clusters: Arc<dyn ClustersClient>,
    nodes: Arc<dyn NodesClient>,
}

impl ClustersManager {
    /// Creates a manager over the given clients.
    pub fn new(clusters: Arc<dyn ClustersClient>, nodes: Arc<dyn NodesClient>) -> Self {
        Self { clusters, nodes }
    }

    /// Lists the clusters of an organization with their node counts.
    ///
    /// The cluster list is fetched first, then the node list of every
    /// cluster concurrently. Clusters keep the order of the primary list.
    ///
    /// # Errors
    ///
    /// Fails if the primary call or any node lookup fails, or if the request
    /// deadline expires. No partial list is returned.
    pub async fn list(
        &self,
        ctx: &Ctx,
        request: Verified<OrganizationId>,
    ) -> Result<ClusterList, BackendFailure> {
        let organization = request.into_inner();
        let organization_id = organization.organization_id.clone();

        let records = call(ctx, "list_clusters", self.clusters.list_clusters(organization)).await?;
        let ids: Vec<ClusterId> = records
            .iter()
            .map(|record| ClusterId::new(organization_id.clone(), record.cluster_id.clone()))
            .collect();

        let nodes = Arc::clone(&self.nodes);
        let node_lists = fan_out(ctx, "list_nodes", ids, move |cluster| {
            let nodes = Arc::clone(&nodes);
            async move { nodes.list_nodes(cluster).await }
        })
        .await?;

        let clusters: Vec<Cluster> = records
            .into_iter()
            .zip(node_lists)
            .map(|(record, nodes)| Cluster::with_node_stats(record, &nodes))
            .collect();

        ctx.log()
            .debug(format_args!("merged node statistics of {} clusters", clusters.len()));
        Ok(ClusterList { clusters })
    }

    /// Returns one cluster with its node counts.
    ///
    /// The cluster record and its node list are fetched concurrently.
    ///
    /// # Errors
    ///
    /// Fails if either call fails.
    pub async fn info(&self, ctx: &Ctx, request: Verified<ClusterId>) -> Result<Cluster, BackendFailure> {
        let cluster = request.into_inner();

        let (record, nodes) = tokio::try_join!(
            call(ctx, "get_cluster", self.clusters.get_cluster(cluster.clone())),
            call(ctx, "list_nodes", self.nodes.list_nodes(cluster)),
        )?;

        Ok(Cluster::with_node_stats(record, &nodes))
    }

    /// Updates name, description or labels of a cluster.
    ///
    /// # Errors
    ///
    /// Fails if the backend call fails.
    pub async fn update(
        &self,
        ctx: &Ctx,
        request: Verified<UpdateClusterRequest>,
    ) -> Result<(), BackendFailure> {
        call(ctx, "update_cluster", self.clusters.update_cluster(request.into_inner())).await
    }

    /// Starts installing a new cluster.
    ///
    /// # Errors
    ///
    /// Fails if the backend call fails.
    pub async fn install(
        &self,
        ctx: &Ctx,
        request: Verified<InstallRequest>,
    ) -> Result<InstallResponse, BackendFailure> {
        call(ctx, "install", self.clusters.install(request.into_inner())).await
    }
}
