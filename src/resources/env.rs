//! Environment contract between the controller and the receive adapter.
//!
//! The watched resources are flattened into index-encoded variables:
//!
//! ```text
//! SINK_URI
//! APIVERSION_<i>              KIND_<i>
//! OWNEREF_<j>_APIVERSION_<i>  OWNEREF_<j>_KIND_<i>
//! ```
//!
//! `i` is the position of the resource and `j` the position of the owner
//! reference filter within that resource, both zero-based.

use k8s_openapi::api::core::v1::EnvVar;

use crate::apis::ApiServerSourceSpec;

pub const SINK_URI: &str = "SINK_URI";
pub const APIVERSION_PREFIX: &str = "APIVERSION_";
pub const KIND_PREFIX: &str = "KIND_";
pub const OWNEREF_PREFIX: &str = "OWNEREF_";

pub fn api_version_name(i: usize) -> String {
    format!("{}{}", APIVERSION_PREFIX, i)
}

pub fn kind_name(i: usize) -> String {
    format!("{}{}", KIND_PREFIX, i)
}

pub fn owner_api_version_name(j: usize, i: usize) -> String {
    format!("{}{}_{}{}", OWNEREF_PREFIX, j, APIVERSION_PREFIX, i)
}

pub fn owner_kind_name(j: usize, i: usize) -> String {
    format!("{}{}_{}{}", OWNEREF_PREFIX, j, KIND_PREFIX, i)
}

fn env_var(name: String, value: &str) -> EnvVar {
    EnvVar {
        name,
        value: Some(value.to_owned()),
        ..Default::default()
    }
}

/// Build the receive adapter environment. `SINK_URI` always comes first,
/// the rest follows the order of `spec.resources`.
pub fn make_env(sink_uri: &str, spec: &ApiServerSourceSpec) -> Vec<EnvVar> {
    let mut env_vars = vec![env_var(SINK_URI.to_owned(), sink_uri)];

    for (i, res) in spec.resources.iter().enumerate() {
        env_vars.push(env_var(api_version_name(i), &res.api_version));
        env_vars.push(env_var(kind_name(i), &res.kind));

        for (j, owner) in res.owner_filters().iter().enumerate() {
            env_vars.push(env_var(owner_api_version_name(j, i), &owner.api_version));
            env_vars.push(env_var(owner_kind_name(j, i), &owner.kind));
        }
    }

    env_vars
}
