use std::sync::Arc;

use super::call;
use crate::backend::InventoryClient;
use crate::context::Ctx;
use crate::entities::{
    Asset, AssetId, EdgeController, EdgeControllerExtendedInfo, EdgeControllerId,
    InstallAgentRequest, InstallAgentResponse, InventoryDevice, InventoryDeviceId, InventoryList,
    InventorySummary, OrganizationId, QueryMetricsRequest, QueryMetricsResult, UpdateAssetRequest,
    UpdateDeviceLocationRequest, UpdateEdgeControllerRequest, UpdateGeolocationRequest,
};
use crate::error::BackendFailure;
use crate::verified::Verified;

/// Inventory operations: edge controllers, assets, devices and metrics.
#[derive(Clone)]
pub struct InventoryManager {
    inventory: Arc<dyn InventoryClient>,
}

impl InventoryManager {
    /// Creates a manager over the inventory manager client.
    pub fn new(inventory: Arc<dyn InventoryClient>) -> Self {
        Self { inventory }
    }

    /// Lists controllers, assets and devices of an organization.
    pub async fn list(
        &self,
        ctx: &Ctx,
        request: Verified<OrganizationId>,
    ) -> Result<InventoryList, BackendFailure> {
        call(ctx, "list_inventory", self.inventory.list(request.into_inner())).await
    }

    /// Aggregated capacity of an organization.
    pub async fn summary(
        &self,
        ctx: &Ctx,
        request: Verified<OrganizationId>,
    ) -> Result<InventorySummary, BackendFailure> {
        call(ctx, "inventory_summary", self.inventory.summary(request.into_inner())).await
    }

    /// Returns a controller with the assets it manages.
    pub async fn controller_extended_info(
        &self,
        ctx: &Ctx,
        request: Verified<EdgeControllerId>,
    ) -> Result<EdgeControllerExtendedInfo, BackendFailure> {
        let request = request.into_inner();
        call(
            ctx,
            "get_controller_extended_info",
            self.inventory.get_controller_extended_info(request),
        )
        .await
    }

    /// Returns one asset.
    pub async fn asset_info(&self, ctx: &Ctx, request: Verified<AssetId>) -> Result<Asset, BackendFailure> {
        call(ctx, "get_asset_info", self.inventory.get_asset_info(request.into_inner())).await
    }

    /// Returns one inventory device.
    pub async fn device_info(
        &self,
        ctx: &Ctx,
        request: Verified<InventoryDeviceId>,
    ) -> Result<InventoryDevice, BackendFailure> {
        call(ctx, "get_device_info", self.inventory.get_device_info(request.into_inner())).await
    }

    /// Changes the labels of an asset.
    pub async fn update_asset(
        &self,
        ctx: &Ctx,
        request: Verified<UpdateAssetRequest>,
    ) -> Result<Asset, BackendFailure> {
        call(ctx, "update_asset", self.inventory.update_asset(request.into_inner())).await
    }

    /// Sets or clears the location of a device.
    pub async fn update_device_location(
        &self,
        ctx: &Ctx,
        request: Verified<UpdateDeviceLocationRequest>,
    ) -> Result<InventoryDevice, BackendFailure> {
        let request = request.into_inner();
        call(ctx, "update_device_location", self.inventory.update_device_location(request)).await
    }

    /// Changes the labels of an edge controller.
    pub async fn update_edge_controller(
        &self,
        ctx: &Ctx,
        request: Verified<UpdateEdgeControllerRequest>,
    ) -> Result<EdgeController, BackendFailure> {
        let request = request.into_inner();
        call(ctx, "update_edge_controller", self.inventory.update_edge_controller(request)).await
    }

    /// Sets the geolocation of an edge controller.
    pub async fn update_geolocation(
        &self,
        ctx: &Ctx,
        request: Verified<UpdateGeolocationRequest>,
    ) -> Result<EdgeController, BackendFailure> {
        let request = request.into_inner();
        call(ctx, "update_geolocation", self.inventory.update_geolocation(request)).await
    }

    /// Asks an edge controller to install an agent on a host.
    pub async fn install_agent(
        &self,
        ctx: &Ctx,
        request: Verified<InstallAgentRequest>,
    ) -> Result<InstallAgentResponse, BackendFailure> {
        call(ctx, "install_agent", self.inventory.install_agent(request.into_inner())).await
    }

    /// Runs a metrics query.
    pub async fn query_metrics(
        &self,
        ctx: &Ctx,
        request: Verified<QueryMetricsRequest>,
    ) -> Result<QueryMetricsResult, BackendFailure> {
        call(ctx, "query_metrics", self.inventory.query_metrics(request.into_inner())).await
    }
}
