use crate::entities::{
    Cluster, ClusterId, ClusterList, InstallRequest, InstallResponse, Node, NodeList,
    OrganizationId, UpdateClusterRequest, UpdateNodeRequest,
};
use crate::error::GatewayError;
use crate::manager::{ClustersManager, NodesManager};

use super::{Pipeline, RequestContext};

/// Cluster endpoints.
#[derive(Clone)]
pub struct ClustersHandler {
    pipeline: Pipeline,
    manager: ClustersManager,
}

impl ClustersHandler {
    /// Creates the handler.
    pub fn new(pipeline: Pipeline, manager: ClustersManager) -> Self {
        Self { pipeline, manager }
    }

    /// Lists the clusters of the caller's organization with node counts.
    pub async fn list(
        &self,
        request: &RequestContext,
        organization: OrganizationId,
    ) -> Result<ClusterList, GatewayError> {
        let (ctx, organization) = self.pipeline.admit("clusters.list", request, organization)?;
        Ok(self.manager.list(&ctx, organization).await?)
    }

    /// Returns one cluster with node counts.
    pub async fn info(&self, request: &RequestContext, cluster: ClusterId) -> Result<Cluster, GatewayError> {
        let (ctx, cluster) = self.pipeline.admit("clusters.info", request, cluster)?;
        Ok(self.manager.info(&ctx, cluster).await?)
    }

    /// Updates name, description or labels of a cluster.
    pub async fn update(
        &self,
        request: &RequestContext,
        update: UpdateClusterRequest,
    ) -> Result<(), GatewayError> {
        let (ctx, update) = self.pipeline.admit("clusters.update", request, update)?;
        Ok(self.manager.update(&ctx, update).await?)
    }

    /// Starts a cluster installation.
    pub async fn install(
        &self,
        request: &RequestContext,
        install: InstallRequest,
    ) -> Result<InstallResponse, GatewayError> {
        let (ctx, install) = self.pipeline.admit("clusters.install", request, install)?;
        Ok(self.manager.install(&ctx, install).await?)
    }
}

/// Node endpoints.
#[derive(Clone)]
pub struct NodesHandler {
    pipeline: Pipeline,
    manager: NodesManager,
}

impl NodesHandler {
    /// Creates the handler.
    pub fn new(pipeline: Pipeline, manager: NodesManager) -> Self {
        Self { pipeline, manager }
    }

    /// Lists the nodes of a cluster.
    pub async fn list(&self, request: &RequestContext, cluster: ClusterId) -> Result<NodeList, GatewayError> {
        let (ctx, cluster) = self.pipeline.admit("nodes.list", request, cluster)?;
        Ok(self.manager.list(&ctx, cluster).await?)
    }

    /// Adds or removes node labels.
    pub async fn update(
        &self,
        request: &RequestContext,
        update: UpdateNodeRequest,
    ) -> Result<Node, GatewayError> {
        let (ctx, update) = self.pipeline.admit("nodes.update", request, update)?;
        Ok(self.manager.update(&ctx, update).await?)
    }
}
