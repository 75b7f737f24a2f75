use std::sync::Arc;

use super::call;
use crate::backend::NodesClient;
use crate::context::Ctx;
use crate::entities::{ClusterId, Node, NodeList, UpdateNodeRequest};
use crate::error::BackendFailure;
use crate::verified::Verified;

/// Node operations. Both are pass-through.
#[derive(Clone)]
pub struct NodesManager {
    nodes: Arc<dyn NodesClient>,
}

impl NodesManager {
    /// Creates a manager over the nodes client.
    pub fn new(nodes: Arc<dyn NodesClient>) -> Self {
        Self { nodes }
    }

    /// Lists the nodes of a cluster.
    pub async fn list(&self, ctx: &Ctx, request: Verified<ClusterId>) -> Result<NodeList, BackendFailure> {
        let nodes = call(ctx, "list_nodes", self.nodes.list_nodes(request.into_inner())).await?;
        Ok(NodeList { nodes })
    }

    /// Updates the labels of a node.
    pub async fn update(
        &self,
        ctx: &Ctx,
        request: Verified<UpdateNodeRequest>,
    ) -> Result<Node, BackendFailure> {
        call(ctx, "update_node", self.nodes.update_node(request.into_inner())).await
    }
}
