//! Request handling.
//!
//! Every operation runs the same sequence:
//!
//! ```text
//! RequestContext + payload
//!   ↓ ResolveIdentity        (unknown caller     → Authorization/Unauthenticated)
//! Ctx<Identified>
//!   ↓ organization guard     (foreign tenant     → Authorization/CrossOrganization)
//! Ctx<Authorized>
//!   ↓ validate               (broken rule        → Validation)
//! Verified<payload>
//!   ↓ manager                (failed or late call → Backend)
//! result
//! ```
//!
//! The first failure ends the request. Nothing is retried and no state is
//! kept between requests.
//!
//! This module has no transport dependency. A gRPC or HTTP layer builds a
//! [`RequestContext`] from its own request type, decodes the payload and
//! calls the matching handler method.

mod adapter;
mod applications;
mod clusters;
mod devices;
mod inventory;
mod pipeline;
mod resolve;
mod users;

pub use adapter::RequestContext;
pub use applications::ApplicationsHandler;
pub use clusters::{ClustersHandler, NodesHandler};
pub use devices::DevicesHandler;
pub use inventory::InventoryHandler;
pub use pipeline::Pipeline;
pub use resolve::{MetadataIdentityResolver, ResolveIdentity};
pub use users::UsersHandler;
