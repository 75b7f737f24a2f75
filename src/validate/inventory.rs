use super::{require, require_labels_for, Validate};
use crate::entities::{
    AggregationType, AssetId, AssetSelector, EdgeControllerId, InstallAgentRequest,
    InventoryDeviceId, QueryMetricsRequest, TimeRange, UpdateAssetRequest,
    UpdateDeviceLocationRequest, UpdateEdgeControllerRequest, UpdateGeolocationRequest,
};
use crate::error::ValidationFailure;

impl Validate for EdgeControllerId {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.edge_controller_id, "edge_controller_id")
    }
}

impl Validate for AssetId {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.asset_id, "asset_id")
    }
}

impl Validate for InventoryDeviceId {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.asset_device_id, "asset_device_id")
    }
}

impl Validate for UpdateAssetRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.asset_id, "asset_id")?;
        require_labels_for(self.label_op, &self.labels)
    }
}

impl Validate for UpdateEdgeControllerRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.edge_controller_id, "edge_controller_id")?;
        require_labels_for(self.label_op, &self.labels)
    }
}

impl Validate for UpdateGeolocationRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.edge_controller_id, "edge_controller_id")
    }
}

impl Validate for UpdateDeviceLocationRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.asset_device_id, "asset_device_id")?;
        match &self.location {
            Some(location) => require(&location.geolocation, "geolocation"),
            None => Ok(()),
        }
    }
}

impl Validate for InstallAgentRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.edge_controller_id, "edge_controller_id")?;
        require(&self.target_host, "target_host")
    }
}

impl Validate for AssetSelector {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")
    }
}

impl Validate for TimeRange {
    fn validate(&self) -> Result<(), ValidationFailure> {
        if self.timestamp != 0 {
            if self.time_start != 0 || self.time_end != 0 || self.resolution != 0 {
                return Err(ValidationFailure::new(
                    "time_range",
                    "timestamp is set; start, end and resolution should be 0",
                ));
            }
        } else if self.time_start == 0 && self.time_end == 0 {
            return Err(ValidationFailure::new(
                "time_range",
                "timestamp is not set; either start, end or both should be set",
            ));
        }
        Ok(())
    }
}

impl Validate for QueryMetricsRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        let selector = self
            .assets
            .as_ref()
            .ok_or_else(|| ValidationFailure::new("assets", "empty asset selector"))?;
        selector.validate()?;

        self.time_range.unwrap_or_default().validate()?;

        if selector.asset_ids.len() != 1 && self.aggregation == AggregationType::None {
            return Err(ValidationFailure::new(
                "aggregation",
                "metrics for more than one asset requested without aggregation method",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{InventoryLocation, LabelOp};

    fn metrics(asset_ids: &[&str], aggregation: AggregationType) -> QueryMetricsRequest {
        QueryMetricsRequest {
            assets: Some(AssetSelector {
                organization_id: "org-1".to_string(),
                asset_ids: asset_ids.iter().map(|id| id.to_string()).collect(),
                ..AssetSelector::default()
            }),
            metrics: vec!["cpu".to_string()],
            time_range: Some(TimeRange::at(1_700_000_000)),
            aggregation,
        }
    }

    #[test]
    fn timestamp_excludes_window_fields() {
        let range = TimeRange {
            timestamp: 10,
            resolution: 60,
            ..TimeRange::default()
        };
        assert_eq!(
            range.validate().unwrap_err().message(),
            "timestamp is set; start, end and resolution should be 0"
        );
    }

    #[test]
    fn window_needs_start_or_end() {
        assert_eq!(
            TimeRange::default().validate().unwrap_err().message(),
            "timestamp is not set; either start, end or both should be set"
        );
        assert!(TimeRange::window(100, 0, 0).validate().is_ok());
        assert!(TimeRange::window(0, 200, 10).validate().is_ok());
        assert!(TimeRange::at(42).validate().is_ok());
    }

    #[test]
    fn missing_selector_is_reported_first() {
        let request = QueryMetricsRequest {
            time_range: Some(TimeRange::default()),
            ..QueryMetricsRequest::default()
        };
        assert_eq!(request.validate().unwrap_err().message(), "empty asset selector");
    }

    #[test]
    fn missing_time_range_counts_as_unset() {
        let mut request = metrics(&["a-1"], AggregationType::None);
        request.time_range = None;
        assert_eq!(
            request.validate().unwrap_err().message(),
            "timestamp is not set; either start, end or both should be set"
        );
    }

    #[test]
    fn single_asset_or_aggregation() {
        assert!(metrics(&["a-1"], AggregationType::None).validate().is_ok());
        assert!(metrics(&["a-1", "a-2"], AggregationType::Avg).validate().is_ok());
        assert!(metrics(&[], AggregationType::Sum).validate().is_ok());

        let failure = metrics(&["a-1", "a-2"], AggregationType::None)
            .validate()
            .unwrap_err();
        assert_eq!(
            failure.message(),
            "metrics for more than one asset requested without aggregation method"
        );
        assert!(metrics(&[], AggregationType::None).validate().is_err());
    }

    #[test]
    fn device_location_checks_geolocation_only_when_given() {
        let mut request = UpdateDeviceLocationRequest {
            organization_id: "org-1".to_string(),
            asset_device_id: "dev-1".to_string(),
            location: None,
        };
        assert!(request.validate().is_ok());

        request.location = Some(InventoryLocation::default());
        assert_eq!(request.validate().unwrap_err().message(), "geolocation cannot be empty");
    }

    #[test]
    fn install_agent_requires_target_host() {
        let request = InstallAgentRequest {
            organization_id: "org-1".to_string(),
            edge_controller_id: "ec-1".to_string(),
            ..InstallAgentRequest::default()
        };
        assert_eq!(request.validate().unwrap_err().message(), "target_host cannot be empty");
    }

    #[test]
    fn asset_label_edit_needs_labels() {
        let request = UpdateAssetRequest {
            organization_id: "org-1".to_string(),
            asset_id: "a-1".to_string(),
            label_op: LabelOp::Remove,
            ..UpdateAssetRequest::default()
        };
        assert_eq!(request.validate().unwrap_err().message(), "labels cannot be empty");

        let untouched = UpdateAssetRequest {
            label_op: LabelOp::Unset,
            ..request
        };
        assert!(untouched.validate().is_ok());
    }

    #[test]
    fn edge_controller_label_edit_needs_labels() {
        let request = UpdateEdgeControllerRequest {
            organization_id: "org-1".to_string(),
            edge_controller_id: "ec-1".to_string(),
            label_op: LabelOp::Add,
            ..UpdateEdgeControllerRequest::default()
        };
        assert_eq!(request.validate().unwrap_err().field(), Some("labels"));
    }
}
