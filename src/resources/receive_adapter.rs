use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::core::ObjectMeta;

use crate::apis::ApiServerSource;
use crate::resources::env::make_env;

pub const CONTAINER_NAME: &str = "receive-adapter";
pub const SIDECAR_INJECT_ANNOTATION: &str = "sidecar.istio.io/inject";

/// Arguments needed to create an ApiServer receive adapter.
/// Every field is required.
#[derive(Debug, Clone)]
pub struct ReceiveAdapterArgs<'a> {
    pub image: String,
    pub source: &'a ApiServerSource,
    pub labels: BTreeMap<String, String>,
    pub sink_uri: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiveAdapterError {
    #[error("receive adapter image is empty")]
    Image,
    #[error("source has no name")]
    SourceName,
    #[error("source {0} has no namespace")]
    SourceNamespace(String),
    #[error("receive adapter label set is empty")]
    Labels,
    #[error("sink URI is empty")]
    SinkUri,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Generates (but does not submit) the receive adapter Deployment of an
/// ApiServerSource.
pub fn make_receive_adapter(
    args: &ReceiveAdapterArgs,
) -> Result<Deployment, ReceiveAdapterError> {
    if args.image.is_empty() {
        return Err(ReceiveAdapterError::Image);
    }
    let name = non_empty(args.source.metadata.name.as_deref())
        .ok_or(ReceiveAdapterError::SourceName)?;
    let namespace = non_empty(args.source.metadata.namespace.as_deref())
        .ok_or_else(|| ReceiveAdapterError::SourceNamespace(name.to_owned()))?;
    // an empty selector would match every pod in the namespace
    if args.labels.is_empty() {
        return Err(ReceiveAdapterError::Labels);
    }
    if args.sink_uri.is_empty() {
        return Err(ReceiveAdapterError::SinkUri);
    }

    let env = make_env(&args.sink_uri, &args.source.spec);
    tracing::debug!(
        source = %name,
        namespace = %namespace,
        env_vars = env.len(),
        "rendering receive adapter"
    );

    Ok(Deployment {
        metadata: ObjectMeta {
            namespace: Some(namespace.to_owned()),
            generate_name: Some(format!("apiserver-{}-", name)),
            labels: Some(args.labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_expressions: None,
                match_labels: Some(args.labels.clone()),
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    annotations: Some(BTreeMap::from([(
                        SIDECAR_INJECT_ANNOTATION.to_owned(),
                        "true".to_owned(),
                    )])),
                    labels: Some(args.labels.clone()),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    service_account_name: args.source.spec.service_account_name.clone(),
                    containers: vec![Container {
                        name: CONTAINER_NAME.to_owned(),
                        image: Some(args.image.clone()),
                        env: Some(env),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    })
}
