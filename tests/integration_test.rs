use std::sync::Arc;
use std::time::Duration;

use gateway_core::config::GatewayConfig;
use gateway_core::entities::{
    AddUserRequest, AssignRoleRequest, ClusterId, DeviceGroupId, LabelOp, Labels,
    OrganizationId, UpdateClusterRequest, UserId,
};
use gateway_core::handler::RequestContext;
use gateway_core::testing::{cluster_info, nodes, user, StubBackends};
use gateway_core::{
    AuthorizationKind, BackendError, BackendErrorKind, ErrorCode, Gateway, GatewayError, Secret,
};
use tokio::time::Instant;

fn caller(org: &str) -> RequestContext {
    RequestContext::new("req-it")
        .with_metadata("organization_id", org)
        .with_metadata("user_id", "alice@example.com")
        .with_metadata("roles", "Owner")
}

fn gateway(backends: &Arc<StubBackends>) -> Gateway {
    Gateway::new(&GatewayConfig::default(), backends.backend_set())
}

fn two_clusters() -> StubBackends {
    StubBackends::new()
        .with_cluster(cluster_info("org-1", "c1", "prod"), nodes("org-1", "c1", 5, 3))
        .with_cluster(cluster_info("org-1", "c2", "dev"), nodes("org-1", "c2", 2, 2))
}

#[tokio::test]
async fn cluster_list_reports_node_counts() {
    let backends = Arc::new(two_clusters());

    let list = gateway(&backends)
        .clusters()
        .list(&caller("org-1"), OrganizationId::new("org-1"))
        .await
        .expect("own organization");

    let counts: Vec<_> = list
        .clusters
        .iter()
        .map(|cluster| (cluster.cluster_id.clone(), cluster.total_nodes, cluster.running_nodes))
        .collect();
    assert_eq!(
        counts,
        vec![("c1".to_string(), 5, 3), ("c2".to_string(), 2, 2)]
    );
}

#[tokio::test]
async fn cross_tenant_request_makes_no_backend_call() {
    let backends = Arc::new(two_clusters());

    let error = gateway(&backends)
        .devices()
        .remove_group(&caller("org-1"), DeviceGroupId::new("org-2", "g1"))
        .await
        .unwrap_err();

    match &error {
        GatewayError::Authorization(failure) => {
            assert_eq!(failure.kind(), AuthorizationKind::CrossOrganization);
            assert_eq!(failure.message(), "cannot access requested organization");
        }
        other => panic!("expected authorization failure, got {other:?}"),
    }
    assert_eq!(error.code(), ErrorCode::PermissionDenied);
    assert!(error.is_rejection());
    assert_eq!(backends.call_count(), 0);
}

#[tokio::test]
async fn anonymous_request_is_unauthenticated() {
    let backends = Arc::new(two_clusters());

    let error = gateway(&backends)
        .nodes()
        .list(&RequestContext::generated(), ClusterId::new("org-1", "c1"))
        .await
        .unwrap_err();

    assert_eq!(error.code(), ErrorCode::Unauthenticated);
    assert_eq!(backends.call_count(), 0);
}

#[tokio::test]
async fn missing_field_is_named_and_nothing_is_called() {
    let backends = Arc::new(two_clusters());

    let error = gateway(&backends)
        .clusters()
        .info(&caller("org-1"), ClusterId::new("org-1", ""))
        .await
        .unwrap_err();

    match error {
        GatewayError::Validation(failure) => {
            assert_eq!(failure.field(), Some("cluster_id"));
            assert_eq!(failure.message(), "cluster_id cannot be empty");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(backends.call_count(), 0);
}

#[tokio::test]
async fn conflicting_label_flags_are_rejected() {
    let backends = Arc::new(two_clusters());
    let label_op = LabelOp::from_flags(true, true);
    assert!(label_op.is_err());

    // A well-formed update goes through.
    let update = UpdateClusterRequest {
        organization_id: "org-1".to_string(),
        cluster_id: "c1".to_string(),
        label_op: LabelOp::from_flags(false, true).expect("remove only"),
        labels: Labels::from([("tier".to_string(), "gold".to_string())]),
        ..UpdateClusterRequest::default()
    };
    gateway(&backends)
        .clusters()
        .update(&caller("org-1"), update)
        .await
        .expect("update accepted");
    assert_eq!(backends.calls_to("update_cluster"), 1);
}

#[tokio::test]
async fn one_failed_node_lookup_fails_the_listing() {
    let backends = Arc::new(
        two_clusters().failing_node_list("c1", BackendError::unavailable("infrastructure manager down")),
    );

    let error = gateway(&backends)
        .clusters()
        .list(&caller("org-1"), OrganizationId::new("org-1"))
        .await
        .unwrap_err();

    match error {
        GatewayError::Backend(failure) => {
            assert_eq!(failure.operation(), "list_nodes");
            assert_eq!(failure.error().kind(), BackendErrorKind::Unavailable);
        }
        other => panic!("expected backend failure, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn transport_deadline_bounds_the_fan_out() {
    let backends = Arc::new(two_clusters().with_latency("list_nodes", Duration::from_secs(60)));
    let request = caller("org-1").with_deadline(Instant::now() + Duration::from_secs(2));

    let error = gateway(&backends)
        .clusters()
        .list(&request, OrganizationId::new("org-1"))
        .await
        .unwrap_err();

    assert_eq!(error.code(), ErrorCode::DeadlineExceeded);
}

#[tokio::test(start_paused = true)]
async fn configured_timeout_applies_without_transport_deadline() {
    let backends = Arc::new(StubBackends::new().with_latency("list_users", Duration::from_secs(10)));
    let config = GatewayConfig::from_toml_str("request_timeout_ms = 500").expect("valid toml");
    let gateway = Gateway::new(&config, backends.backend_set());

    let error = gateway
        .users()
        .list(&caller("org-1"), OrganizationId::new("org-1"))
        .await
        .unwrap_err();

    assert_eq!(error.code(), ErrorCode::DeadlineExceeded);
}

#[tokio::test]
async fn user_lifecycle_round_trip() {
    let backends = Arc::new(StubBackends::new().with_user(user("org-1", "bob@example.com", "Operator")));
    let gateway = gateway(&backends);
    let request = caller("org-1");

    let created = gateway
        .users()
        .add(
            &request,
            AddUserRequest {
                organization_id: "org-1".to_string(),
                email: "carol@example.com".to_string(),
                password: Secret::new("s3cret-pass".to_string()),
                name: "Carol".to_string(),
                role_name: "Owner".to_string(),
            },
        )
        .await
        .expect("new user");
    assert_eq!(created.role_id, "role-Owner");

    let bob = gateway
        .users()
        .info(&request, UserId::new("org-1", "bob@example.com"))
        .await
        .expect("existing user");
    assert_eq!(bob.role_name, "Operator");

    let promoted = gateway
        .users()
        .assign_role(
            &request,
            AssignRoleRequest {
                organization_id: "org-1".to_string(),
                email: "bob@example.com".to_string(),
                role_id: "role-Owner".to_string(),
            },
        )
        .await
        .expect("role assigned");
    assert_eq!(promoted.role_name, "Owner");

    let missing = gateway
        .users()
        .remove(&request, UserId::new("org-1", "nobody@example.com"))
        .await
        .unwrap_err();
    assert_eq!(missing.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn injected_backend_error_keeps_its_kind() {
    let backends = Arc::new(StubBackends::new().failing(
        "list_roles",
        BackendError::new(BackendErrorKind::PermissionDenied, "role store locked"),
    ));

    let error = gateway(&backends)
        .users()
        .list_roles(&caller("org-1"), OrganizationId::new("org-1"))
        .await
        .unwrap_err();

    assert_eq!(error.code(), ErrorCode::PermissionDenied);
    assert!(!error.is_rejection());
    assert!(error.to_string().contains("role store locked"));
}

#[tokio::test]
async fn json_descriptor_answers_identity_and_guard_before_schema() {
    let backends = Arc::new(StubBackends::new());
    let gateway = gateway(&backends);
    // Fails the schema: no name.
    let payload = br#"{"organization_id": "org-2", "groups": []}"#;

    let anonymous = gateway
        .applications()
        .add_descriptor_json(&RequestContext::new("req-anon"), payload)
        .await
        .unwrap_err();
    assert_eq!(anonymous.code(), ErrorCode::Unauthenticated);

    let foreign = gateway
        .applications()
        .add_descriptor_json(&caller("org-1"), payload)
        .await
        .unwrap_err();
    assert_eq!(foreign.code(), ErrorCode::PermissionDenied);

    let own = gateway
        .applications()
        .add_descriptor_json(&caller("org-2"), payload)
        .await
        .unwrap_err();
    match own {
        GatewayError::Validation(failure) => assert!(failure.message().contains("name")),
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(backends.call_count(), 0);
}
