use super::{require, require_labels_for, Validate};
use crate::entities::{ClusterId, InstallRequest, UpdateClusterRequest, UpdateNodeRequest};
use crate::error::ValidationFailure;

impl Validate for ClusterId {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.cluster_id, "cluster_id")
    }
}

impl Validate for UpdateClusterRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.cluster_id, "cluster_id")?;
        require_labels_for(self.label_op, &self.labels)
    }
}

impl Validate for InstallRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")
    }
}

impl Validate for UpdateNodeRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.node_id, "node_id")?;
        require_labels_for(self.label_op, &self.labels)
    }
}
