use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ApiServerSource watches the listed API resource kinds and forwards
/// their changes as events to a sink.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    kind = "ApiServerSource",
    group = "sources.eventing.knative.dev",
    version = "v1alpha1",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ApiServerSourceSpec {
    /// Resource kinds to watch, in the order the adapter receives them.
    #[serde(default)]
    pub resources: Vec<ApiServerResource>,
    /// Service account the receive adapter pod runs as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiServerResource {
    pub api_version: String,
    pub kind: String,
    /// Only forward events for objects owned by one of these kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_references: Option<Vec<OwnerReferenceFilter>>,
}

impl ApiServerResource {
    pub fn new(api_version: &str, kind: &str) -> Self {
        Self {
            api_version: api_version.to_owned(),
            kind: kind.to_owned(),
            owner_references: None,
        }
    }

    pub fn owned_by(mut self, api_version: &str, kind: &str) -> Self {
        self.owner_references
            .get_or_insert_with(Vec::new)
            .push(OwnerReferenceFilter {
                api_version: api_version.to_owned(),
                kind: kind.to_owned(),
            });
        self
    }

    /// Owner reference filters; an absent list reads as empty.
    pub fn owner_filters(&self) -> &[OwnerReferenceFilter] {
        self.owner_references.as_deref().unwrap_or(&[])
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReferenceFilter {
    pub api_version: String,
    pub kind: String,
}
