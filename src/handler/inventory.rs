use crate::entities::{
    Asset, AssetId, EdgeController, EdgeControllerExtendedInfo, EdgeControllerId,
    InstallAgentRequest, InstallAgentResponse, InventoryDevice, InventoryDeviceId, InventoryList,
    InventorySummary, OrganizationId, QueryMetricsRequest, QueryMetricsResult, UpdateAssetRequest,
    UpdateDeviceLocationRequest, UpdateEdgeControllerRequest, UpdateGeolocationRequest,
};
use crate::error::GatewayError;
use crate::manager::InventoryManager;

use super::{Pipeline, RequestContext};

/// Inventory endpoints: edge controllers, assets, devices and metrics.
#[derive(Clone)]
pub struct InventoryHandler {
    pipeline: Pipeline,
    manager: InventoryManager,
}

impl InventoryHandler {
    /// Creates the handler.
    pub fn new(pipeline: Pipeline, manager: InventoryManager) -> Self {
        Self { pipeline, manager }
    }

    /// Lists every inventory item of the caller's organization.
    pub async fn list(
        &self,
        request: &RequestContext,
        organization: OrganizationId,
    ) -> Result<InventoryList, GatewayError> {
        let (ctx, organization) = self.pipeline.admit("inventory.list", request, organization)?;
        Ok(self.manager.list(&ctx, organization).await?)
    }

    /// Aggregated capacity of the caller's organization.
    pub async fn summary(
        &self,
        request: &RequestContext,
        organization: OrganizationId,
    ) -> Result<InventorySummary, GatewayError> {
        let (ctx, organization) = self.pipeline.admit("inventory.summary", request, organization)?;
        Ok(self.manager.summary(&ctx, organization).await?)
    }

    /// Returns an edge controller with the assets it manages.
    pub async fn controller_extended_info(
        &self,
        request: &RequestContext,
        controller: EdgeControllerId,
    ) -> Result<EdgeControllerExtendedInfo, GatewayError> {
        let (ctx, controller) =
            self.pipeline.admit("inventory.controller_extended_info", request, controller)?;
        Ok(self.manager.controller_extended_info(&ctx, controller).await?)
    }

    /// Returns one asset.
    pub async fn asset_info(&self, request: &RequestContext, asset: AssetId) -> Result<Asset, GatewayError> {
        let (ctx, asset) = self.pipeline.admit("inventory.asset_info", request, asset)?;
        Ok(self.manager.asset_info(&ctx, asset).await?)
    }

    /// Returns one inventory device.
    pub async fn device_info(
        &self,
        request: &RequestContext,
        device: InventoryDeviceId,
    ) -> Result<InventoryDevice, GatewayError> {
        let (ctx, device) = self.pipeline.admit("inventory.device_info", request, device)?;
        Ok(self.manager.device_info(&ctx, device).await?)
    }

    /// Adds or removes asset labels.
    pub async fn update_asset(
        &self,
        request: &RequestContext,
        update: UpdateAssetRequest,
    ) -> Result<Asset, GatewayError> {
        let (ctx, update) = self.pipeline.admit("inventory.update_asset", request, update)?;
        Ok(self.manager.update_asset(&ctx, update).await?)
    }

    /// Sets or clears the location of a device.
    pub async fn update_device_location(
        &self,
        request: &RequestContext,
        update: UpdateDeviceLocationRequest,
    ) -> Result<InventoryDevice, GatewayError> {
        let (ctx, update) = self.pipeline.admit("inventory.update_device_location", request, update)?;
        Ok(self.manager.update_device_location(&ctx, update).await?)
    }

    /// Adds or removes edge controller labels.
    pub async fn update_edge_controller(
        &self,
        request: &RequestContext,
        update: UpdateEdgeControllerRequest,
    ) -> Result<EdgeController, GatewayError> {
        let (ctx, update) = self.pipeline.admit("inventory.update_edge_controller", request, update)?;
        Ok(self.manager.update_edge_controller(&ctx, update).await?)
    }

    /// Sets the geolocation of an edge controller.
    pub async fn update_geolocation(
        &self,
        request: &RequestContext,
        update: UpdateGeolocationRequest,
    ) -> Result<EdgeController, GatewayError> {
        let (ctx, update) = self.pipeline.admit("inventory.update_geolocation", request, update)?;
        Ok(self.manager.update_geolocation(&ctx, update).await?)
    }

    /// Installs an agent through an edge controller.
    pub async fn install_agent(
        &self,
        request: &RequestContext,
        install: InstallAgentRequest,
    ) -> Result<InstallAgentResponse, GatewayError> {
        let (ctx, install) = self.pipeline.admit("inventory.install_agent", request, install)?;
        Ok(self.manager.install_agent(&ctx, install).await?)
    }

    /// Queries asset metrics.
    ///
    /// The organization is taken from the asset selector; a query without a
    /// selector is refused by the organization guard.
    pub async fn query_metrics(
        &self,
        request: &RequestContext,
        query: QueryMetricsRequest,
    ) -> Result<QueryMetricsResult, GatewayError> {
        let (ctx, query) = self.pipeline.admit("inventory.query_metrics", request, query)?;
        Ok(self.manager.query_metrics(&ctx, query).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entities::{AggregationType, AssetSelector, TimeRange};
    use crate::error::ErrorCode;
    use crate::handler::MetadataIdentityResolver;
    use crate::testing::StubBackends;

    fn handler(stub: &Arc<StubBackends>) -> InventoryHandler {
        let pipeline = Pipeline::new(Arc::new(MetadataIdentityResolver::default()), None);
        InventoryHandler::new(pipeline, InventoryManager::new(stub.backend_set().inventory))
    }

    fn caller() -> RequestContext {
        RequestContext::new("req-1")
            .with_metadata("organization_id", "org-1")
            .with_metadata("user_id", "alice@example.com")
    }

    #[tokio::test]
    async fn metrics_query_without_selector_is_refused() {
        let stub = Arc::new(StubBackends::new());
        let query = QueryMetricsRequest {
            metrics: vec!["cpu".to_string()],
            ..QueryMetricsRequest::default()
        };

        let error = handler(&stub).query_metrics(&caller(), query).await.unwrap_err();

        assert_eq!(error.code(), ErrorCode::PermissionDenied);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn metrics_query_for_own_assets_reaches_backend() {
        let stub = Arc::new(StubBackends::new());
        let query = QueryMetricsRequest {
            assets: Some(AssetSelector {
                organization_id: "org-1".to_string(),
                asset_ids: vec!["a1".to_string()],
                ..AssetSelector::default()
            }),
            metrics: vec!["cpu".to_string()],
            time_range: Some(TimeRange::window(100, 200, 10)),
            aggregation: AggregationType::Avg,
        };

        handler(&stub).query_metrics(&caller(), query).await.expect("query runs");

        assert_eq!(stub.calls_to("query_metrics"), 1);
    }
}
