use std::collections::BTreeMap;

use actix_web::{post, web, HttpResponse};
use kube::ResourceExt;

use crate::apis::ApiServerSource;
use crate::configuration::AdapterSettings;
use crate::errors::AppError;
use crate::resources::{make_receive_adapter, source_labels, ReceiveAdapterArgs};

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub image: Option<String>,
    pub source: ApiServerSource,
    pub labels: Option<BTreeMap<String, String>>,
    pub sink_uri: String,
}

#[derive(serde::Deserialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(serde::Deserialize, Debug)]
pub struct RenderQuery {
    #[serde(default)]
    pub format: RenderFormat,
}

#[post("/receive-adapter")]
#[tracing::instrument(
    name = "Rendering receive adapter",
    skip(req, query, adapter),
    fields(
        source_name = %req.source.name_any(),
        source_namespace = %req.source.namespace().unwrap_or_default(),
    )
)]
pub async fn render_receive_adapter(
    req: web::Json<RenderRequest>,
    query: web::Query<RenderQuery>,
    adapter: web::Data<AdapterSettings>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let labels = req
        .labels
        .unwrap_or_else(|| source_labels(&req.source.name_any()));
    let args = ReceiveAdapterArgs {
        image: req.image.unwrap_or_else(|| adapter.image.clone()),
        source: &req.source,
        labels,
        sink_uri: req.sink_uri,
    };

    let deployment = match make_receive_adapter(&args) {
        Ok(d) => d,
        Err(why) => {
            tracing::warn!("rejected render request: {}", why);
            return Err(why.into());
        }
    };

    match query.format {
        RenderFormat::Json => Ok(HttpResponse::Ok().json(deployment)),
        RenderFormat::Yaml => Ok(HttpResponse::Ok()
            .content_type("application/yaml")
            .body(serde_yaml::to_string(&deployment)?)),
    }
}
