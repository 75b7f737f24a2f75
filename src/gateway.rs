use std::sync::Arc;

use crate::backend::BackendSet;
use crate::config::GatewayConfig;
use crate::handler::{
    ApplicationsHandler, ClustersHandler, DevicesHandler, InventoryHandler,
    MetadataIdentityResolver, NodesHandler, Pipeline, ResolveIdentity, UsersHandler,
};
use crate::manager::{
    ApplicationsManager, ClustersManager, DevicesManager, InventoryManager, NodesManager,
    UsersManager,
};
use crate::validate::warm_descriptor_schema;

/// All handlers wired to one set of backends.
///
/// Built once at startup and cloned freely; clones share the backends.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use gateway_core::config::GatewayConfig;
/// use gateway_core::testing::StubBackends;
/// use gateway_core::Gateway;
///
/// let backends = Arc::new(StubBackends::new());
/// let gateway = Gateway::new(&GatewayConfig::default(), backends.backend_set());
/// let _users = gateway.users();
/// ```
#[derive(Clone)]
pub struct Gateway {
    clusters: ClustersHandler,
    nodes: NodesHandler,
    applications: ApplicationsHandler,
    devices: DevicesHandler,
    users: UsersHandler,
    inventory: InventoryHandler,
}

impl Gateway {
    /// Wires the handlers, reading callers from request metadata with the
    /// key names in `config.identity`.
    pub fn new(config: &GatewayConfig, backends: BackendSet) -> Self {
        let resolver = MetadataIdentityResolver::from_config(&config.identity);
        Self::with_resolver(config, backends, Arc::new(resolver))
    }

    /// Wires the handlers with a custom identity resolver.
    pub fn with_resolver(
        config: &GatewayConfig,
        backends: BackendSet,
        resolver: Arc<dyn ResolveIdentity>,
    ) -> Self {
        // A broken schema only affects descriptor registration.
        if let Err(failure) = warm_descriptor_schema() {
            tracing::error!(error = %failure, "descriptor schema unavailable");
        }

        let pipeline = Pipeline::new(resolver, config.request_timeout());
        let BackendSet {
            clusters,
            nodes,
            applications,
            devices,
            users,
            inventory,
        } = backends;

        Self {
            clusters: ClustersHandler::new(
                pipeline.clone(),
                ClustersManager::new(clusters, Arc::clone(&nodes)),
            ),
            nodes: NodesHandler::new(pipeline.clone(), NodesManager::new(nodes)),
            applications: ApplicationsHandler::new(
                pipeline.clone(),
                ApplicationsManager::new(applications),
            ),
            devices: DevicesHandler::new(pipeline.clone(), DevicesManager::new(devices)),
            users: UsersHandler::new(pipeline.clone(), UsersManager::new(users)),
            inventory: InventoryHandler::new(pipeline, InventoryManager::new(inventory)),
        }
    }

    /// Cluster endpoints.
    pub fn clusters(&self) -> &ClustersHandler {
        &self.clusters
    }

    /// Node endpoints.
    pub fn nodes(&self) -> &NodesHandler {
        &self.nodes
    }

    /// Application endpoints.
    pub fn applications(&self) -> &ApplicationsHandler {
        &self.applications
    }

    /// Device endpoints.
    pub fn devices(&self) -> &DevicesHandler {
        &self.devices
    }

    /// User endpoints.
    pub fn users(&self) -> &UsersHandler {
        &self.users
    }

    /// Inventory endpoints.
    pub fn inventory(&self) -> &InventoryHandler {
        &self.inventory
    }
}
