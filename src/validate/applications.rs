use super::{require, require_labels_for, validate_descriptor_format, Validate};
use crate::entities::{
    AddAppDescriptorRequest, AddConnectionRequest, AppDescriptorId, AppInstanceId, DeployRequest,
    DescriptorDocument, RemoveConnectionRequest, UpdateAppDescriptorRequest,
};
use crate::error::ValidationFailure;

impl Validate for AppDescriptorId {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.app_descriptor_id, "app_descriptor_id")
    }
}

impl Validate for AppInstanceId {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.app_instance_id, "app_instance_id")
    }
}

impl Validate for AddAppDescriptorRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;

        if self.groups.is_empty() {
            return Err(ValidationFailure::new(
                "groups",
                "expecting at least one service group",
            ));
        }
        if let Some(group) = self.groups.iter().find(|group| group.services.is_empty()) {
            return Err(ValidationFailure::new(
                "groups",
                format!("group {} has no services", group.name),
            ));
        }
        // Device group access is granted after deployment, never in the descriptor.
        if let Some(rule) = self.rules.iter().find(|rule| !rule.device_group_ids.is_empty()) {
            return Err(ValidationFailure::new(
                "rules",
                format!("rule {} cannot have device_group_ids", rule.name),
            ));
        }

        Ok(())
    }
}

impl Validate for DescriptorDocument {
    fn validate(&self) -> Result<(), ValidationFailure> {
        validate_descriptor_format(self.document())?;
        self.request().validate()
    }
}

impl Validate for UpdateAppDescriptorRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.app_descriptor_id, "app_descriptor_id")?;
        require_labels_for(self.label_op, &self.labels)
    }
}

impl Validate for DeployRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.app_descriptor_id, "app_descriptor_id")
    }
}

impl Validate for AddConnectionRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.source_instance_id, "source_instance_id")?;
        require(&self.outbound_name, "outbound_name")?;
        require(&self.target_instance_id, "target_instance_id")?;
        require(&self.inbound_name, "inbound_name")
    }
}

impl Validate for RemoveConnectionRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.source_instance_id, "source_instance_id")?;
        require(&self.outbound_name, "outbound_name")?;
        require(&self.target_instance_id, "target_instance_id")?;
        require(&self.inbound_name, "inbound_name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{SecurityRule, Service, ServiceGroup};

    fn group(name: &str, services: usize) -> ServiceGroup {
        ServiceGroup {
            name: name.to_string(),
            services: (0..services)
                .map(|i| Service {
                    name: format!("svc-{i}"),
                    image: "nginx:1.25".to_string(),
                    replicas: 1,
                    ..Service::default()
                })
                .collect(),
        }
    }

    fn descriptor(groups: Vec<ServiceGroup>) -> AddAppDescriptorRequest {
        AddAppDescriptorRequest {
            organization_id: "org-1".to_string(),
            name: "web".to_string(),
            groups,
            ..AddAppDescriptorRequest::default()
        }
    }

    #[test]
    fn descriptor_needs_a_group() {
        let failure = descriptor(vec![]).validate().unwrap_err();
        assert_eq!(failure.message(), "expecting at least one service group");
    }

    #[test]
    fn first_empty_group_is_named() {
        let request = descriptor(vec![group("frontend", 1), group("backend", 0), group("jobs", 0)]);
        let failure = request.validate().unwrap_err();
        assert_eq!(failure.message(), "group backend has no services");
    }

    #[test]
    fn rules_cannot_reference_device_groups() {
        let mut request = descriptor(vec![group("frontend", 2)]);
        request.rules.push(SecurityRule {
            name: "allow-sensors".to_string(),
            device_group_ids: vec!["dg-1".to_string()],
            ..SecurityRule::default()
        });

        let failure = request.validate().unwrap_err();
        assert_eq!(failure.message(), "rule allow-sensors cannot have device_group_ids");
    }

    #[test]
    fn organization_reported_before_groups() {
        let mut request = descriptor(vec![]);
        request.organization_id.clear();
        assert_eq!(request.validate().unwrap_err().field(), Some("organization_id"));
    }

    #[test]
    fn instance_id_message() {
        let failure = AppInstanceId::new("org-1", "").validate().unwrap_err();
        assert_eq!(failure.message(), "app_instance_id cannot be empty");
    }

    #[test]
    fn deploy_requires_descriptor() {
        let request = DeployRequest {
            organization_id: "org-1".to_string(),
            name: "web-prod".to_string(),
            ..DeployRequest::default()
        };
        assert_eq!(
            request.validate().unwrap_err().message(),
            "app_descriptor_id cannot be empty"
        );
    }

    #[test]
    fn document_runs_schema_before_typed_rules() {
        let document = DescriptorDocument::from_json(br#"{"organization_id": "org-1", "groups": []}"#)
            .expect("parses");

        // The schema wants a name; the typed rules would complain about groups.
        let failure = document.validate().unwrap_err();
        assert!(failure.message().contains("name"));
        assert_eq!(failure.field(), None);
    }

    #[test]
    fn document_passing_schema_gets_typed_rules() {
        let document = DescriptorDocument::from_json(
            br#"{"organization_id": "org-1", "name": "web", "groups": []}"#,
        )
        .expect("parses");

        let failure = document.validate().unwrap_err();
        assert_eq!(failure.message(), "expecting at least one service group");
    }

    #[test]
    fn connection_fields_checked_in_order() {
        let mut request = AddConnectionRequest {
            organization_id: "org-1".to_string(),
            source_instance_id: "i-1".to_string(),
            target_instance_id: "i-2".to_string(),
            ..AddConnectionRequest::default()
        };
        assert_eq!(request.validate().unwrap_err().field(), Some("outbound_name"));

        request.outbound_name = "db".to_string();
        assert_eq!(
            request.validate().unwrap_err().message(),
            "inbound_name cannot be empty"
        );

        request.inbound_name = "sql".to_string();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn removal_does_not_require_confirmation() {
        let request = RemoveConnectionRequest {
            organization_id: "org-1".to_string(),
            source_instance_id: "i-1".to_string(),
            outbound_name: "db".to_string(),
            target_instance_id: "i-2".to_string(),
            inbound_name: "sql".to_string(),
            user_confirmation: false,
        };
        assert!(request.validate().is_ok());
    }
}
