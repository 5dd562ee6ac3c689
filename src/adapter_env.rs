//! Receive adapter side of the environment contract: rebuilds the watched
//! resources from the variables rendered by [`crate::resources::make_env`].

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

use crate::apis::{ApiServerResource, OwnerReferenceFilter};
use crate::resources::env::{self, APIVERSION_PREFIX, KIND_PREFIX, OWNEREF_PREFIX, SINK_URI};

#[derive(thiserror::Error, Debug)]
pub enum AdapterEnvError {
    #[error("SINK_URI is not set")]
    MissingSinkUri,
    #[error("{0} is not set")]
    MissingVariable(String),
    #[error("owner reference {0} refers to a resource that is not set")]
    DanglingOwnerReference(String),
    #[error("index of {0} is out of range")]
    InvalidIndex(String),
    #[error("value of {0} is not valid unicode")]
    NonUnicodeValue(String),
    #[error("failed to compile variable pattern")]
    Pattern(#[from] regex::Error),
}

/// Watched resources as seen by the receive adapter.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdapterEnv {
    pub sink_uri: String,
    pub resources: Vec<ApiServerResource>,
}

#[derive(Default)]
struct Pair {
    api_version: Option<String>,
    kind: Option<String>,
}

impl Pair {
    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::ApiVersion => self.api_version = Some(value),
            Field::Kind => self.kind = Some(value),
        }
    }
}

#[derive(Default)]
struct Slot {
    resource: Pair,
    owners: BTreeMap<usize, Pair>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    ApiVersion,
    Kind,
}

/// A variable that belongs to the contract.
#[derive(Debug, PartialEq)]
enum Var {
    SinkUri,
    Resource { i: usize, field: Field },
    Owner { i: usize, j: usize, field: Field },
}

// Indices are written the way `make_env` writes them: no leading zeros, so
// `KIND_00` is not another spelling of `KIND_0`.
const INDEX: &str = "0|[1-9][0-9]*";

struct Patterns {
    resource: Regex,
    owner: Regex,
}

impl Patterns {
    fn new() -> Result<Self, AdapterEnvError> {
        let resource = Regex::new(&format!(
            r"^(?<field>{}|{})(?<i>{})$",
            APIVERSION_PREFIX, KIND_PREFIX, INDEX
        ))?;
        let owner = Regex::new(&format!(
            r"^{}(?<j>{})_(?<field>{}|{})(?<i>{})$",
            OWNEREF_PREFIX, INDEX, APIVERSION_PREFIX, KIND_PREFIX, INDEX
        ))?;
        Ok(Self { resource, owner })
    }

    /// `Ok(None)` for variables outside the contract.
    fn classify(&self, name: &str) -> Result<Option<Var>, AdapterEnvError> {
        if name == SINK_URI {
            return Ok(Some(Var::SinkUri));
        }
        if let Some(caps) = self.owner.captures(name) {
            return Ok(Some(Var::Owner {
                i: parse_index(&caps["i"], name)?,
                j: parse_index(&caps["j"], name)?,
                field: parse_field(&caps["field"]),
            }));
        }
        if let Some(caps) = self.resource.captures(name) {
            return Ok(Some(Var::Resource {
                i: parse_index(&caps["i"], name)?,
                field: parse_field(&caps["field"]),
            }));
        }
        Ok(None)
    }
}

fn parse_field(raw: &str) -> Field {
    if raw == APIVERSION_PREFIX {
        Field::ApiVersion
    } else {
        Field::Kind
    }
}

fn parse_index(raw: &str, name: &str) -> Result<usize, AdapterEnvError> {
    raw.parse()
        .map_err(|_| AdapterEnvError::InvalidIndex(name.to_owned()))
}

// BTreeMap keys must be exactly 0..len, otherwise the first hole is reported.
fn first_gap<V>(map: &BTreeMap<usize, V>) -> Option<usize> {
    map.keys().enumerate().find(|(pos, idx)| pos != *idx).map(|(pos, _)| pos)
}

impl AdapterEnv {
    /// Read the process environment. Variables with a non-unicode name are
    /// never part of the contract and are skipped, as are unrelated
    /// variables with a non-unicode value.
    pub fn from_env() -> Result<Self, AdapterEnvError> {
        let patterns = Patterns::new()?;
        let mut vars = Vec::new();

        for (name, value) in std::env::vars_os() {
            let Some(name) = name.to_str() else { continue };
            let Some(var) = patterns.classify(name)? else { continue };
            match value.into_string() {
                Ok(value) => vars.push((var, value)),
                Err(_) => return Err(AdapterEnvError::NonUnicodeValue(name.to_owned())),
            }
        }

        Self::decode(vars)
    }

    /// Rebuild from `(name, value)` pairs in any order. Variables outside
    /// the contract are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, AdapterEnvError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let patterns = Patterns::new()?;
        let mut classified = Vec::new();

        for (name, value) in vars {
            if let Some(var) = patterns.classify(name.as_ref())? {
                classified.push((var, value.into()));
            }
        }

        Self::decode(classified)
    }

    fn decode(vars: Vec<(Var, String)>) -> Result<Self, AdapterEnvError> {
        let mut sink_uri: Option<String> = None;
        let mut slots: BTreeMap<usize, Slot> = BTreeMap::new();

        for (var, value) in vars {
            match var {
                Var::SinkUri => sink_uri = Some(value),
                Var::Resource { i, field } => {
                    slots.entry(i).or_default().resource.set(field, value)
                }
                Var::Owner { i, j, field } => slots
                    .entry(i)
                    .or_default()
                    .owners
                    .entry(j)
                    .or_default()
                    .set(field, value),
            }
        }

        let sink_uri = sink_uri.ok_or(AdapterEnvError::MissingSinkUri)?;

        if let Some(i) = first_gap(&slots) {
            return Err(AdapterEnvError::MissingVariable(env::api_version_name(i)));
        }

        let mut resources = Vec::with_capacity(slots.len());
        for (i, slot) in slots {
            let (api_version, kind) = match (slot.resource.api_version, slot.resource.kind) {
                (Some(a), Some(k)) => (a, k),
                (None, None) => {
                    let j = slot.owners.keys().next().copied().unwrap_or_default();
                    return Err(AdapterEnvError::DanglingOwnerReference(
                        env::owner_api_version_name(j, i),
                    ));
                }
                (None, Some(_)) => {
                    return Err(AdapterEnvError::MissingVariable(env::api_version_name(i)))
                }
                (Some(_), None) => {
                    return Err(AdapterEnvError::MissingVariable(env::kind_name(i)))
                }
            };

            if let Some(j) = first_gap(&slot.owners) {
                return Err(AdapterEnvError::MissingVariable(
                    env::owner_api_version_name(j, i),
                ));
            }
            let mut owners = Vec::with_capacity(slot.owners.len());
            for (j, owner) in slot.owners {
                owners.push(OwnerReferenceFilter {
                    api_version: owner.api_version.ok_or_else(|| {
                        AdapterEnvError::MissingVariable(env::owner_api_version_name(j, i))
                    })?,
                    kind: owner.kind.ok_or_else(|| {
                        AdapterEnvError::MissingVariable(env::owner_kind_name(j, i))
                    })?,
                });
            }

            resources.push(ApiServerResource {
                api_version,
                kind,
                owner_references: if owners.is_empty() { None } else { Some(owners) },
            });
        }

        Ok(Self { sink_uri, resources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::ApiServerSourceSpec;
    use crate::resources::make_env;

    fn decode(vars: &[(&str, &str)]) -> Result<AdapterEnv, AdapterEnvError> {
        AdapterEnv::from_vars(vars.iter().map(|(k, v)| (*k, *v)))
    }

    #[test]
    fn decodes_rendered_environment() {
        let resources = vec![
            ApiServerResource::new("v1", "Event"),
            ApiServerResource::new("v1", "Pod")
                .owned_by("apps/v1", "ReplicaSet")
                .owned_by("batch/v1", "Job"),
            ApiServerResource::new("v1", "Event"),
        ];
        let spec = ApiServerSourceSpec {
            resources: resources.clone(),
            ..Default::default()
        };
        let vars = make_env("http://sink/", &spec)
            .into_iter()
            .map(|e| (e.name, e.value.unwrap_or_default()));

        let decoded = AdapterEnv::from_vars(vars).unwrap();
        assert_eq!(decoded.sink_uri, "http://sink/");
        assert_eq!(decoded.resources, resources);
    }

    #[test]
    fn order_and_unrelated_variables_do_not_matter() {
        let decoded = decode(&[
            ("KIND_1", "Pod"),
            ("PATH", "/usr/bin"),
            ("OWNEREF_0_KIND_1", "ReplicaSet"),
            ("APIVERSION_0", "v1"),
            ("SINK_URI", "http://sink/"),
            ("OWNEREF_0_APIVERSION_1", "apps/v1"),
            ("APIVERSION_1", "v1"),
            ("KIND_0", "Event"),
            ("MY_KIND_0", "ignored"),
        ])
        .unwrap();

        assert_eq!(
            decoded.resources,
            vec![
                ApiServerResource::new("v1", "Event"),
                ApiServerResource::new("v1", "Pod").owned_by("apps/v1", "ReplicaSet"),
            ]
        );
    }

    #[test]
    fn only_sink() {
        let decoded = decode(&[("SINK_URI", "http://sink/")]).unwrap();
        assert!(decoded.resources.is_empty());
    }

    #[test]
    fn serializes_as_ordered_records() {
        let decoded = decode(&[
            ("SINK_URI", "http://sink/"),
            ("APIVERSION_0", "v1"),
            ("KIND_0", "Pod"),
        ])
        .unwrap();
        assert_eq!(
            serde_json::to_value(&decoded).unwrap(),
            serde_json::json!({
                "sinkUri": "http://sink/",
                "resources": [{"apiVersion": "v1", "kind": "Pod"}],
            })
        );
    }

    #[test]
    fn missing_sink() {
        let err = decode(&[("APIVERSION_0", "v1"), ("KIND_0", "Pod")]).unwrap_err();
        assert!(matches!(err, AdapterEnvError::MissingSinkUri));
    }

    #[test]
    fn half_a_resource() {
        let err = decode(&[("SINK_URI", "http://sink/"), ("APIVERSION_0", "v1")]).unwrap_err();
        assert!(matches!(err, AdapterEnvError::MissingVariable(ref n) if n == "KIND_0"));
    }

    #[test]
    fn gap_in_resources() {
        let err = decode(&[
            ("SINK_URI", "http://sink/"),
            ("APIVERSION_0", "v1"),
            ("KIND_0", "Pod"),
            ("APIVERSION_2", "v1"),
            ("KIND_2", "Event"),
        ])
        .unwrap_err();
        assert!(matches!(err, AdapterEnvError::MissingVariable(ref n) if n == "APIVERSION_1"));
    }

    #[test]
    fn gap_in_owner_references() {
        let err = decode(&[
            ("SINK_URI", "http://sink/"),
            ("APIVERSION_0", "v1"),
            ("KIND_0", "Pod"),
            ("OWNEREF_1_APIVERSION_0", "apps/v1"),
            ("OWNEREF_1_KIND_0", "ReplicaSet"),
        ])
        .unwrap_err();
        assert!(
            matches!(err, AdapterEnvError::MissingVariable(ref n) if n == "OWNEREF_0_APIVERSION_0")
        );
    }

    #[test]
    fn owner_reference_without_resource() {
        let err = decode(&[
            ("SINK_URI", "http://sink/"),
            ("OWNEREF_0_APIVERSION_0", "apps/v1"),
            ("OWNEREF_0_KIND_0", "ReplicaSet"),
        ])
        .unwrap_err();
        assert!(matches!(err, AdapterEnvError::DanglingOwnerReference(_)));
    }

    #[test]
    fn index_overflow() {
        let err = decode(&[
            ("SINK_URI", "http://sink/"),
            ("KIND_99999999999999999999999999", "Pod"),
        ])
        .unwrap_err();
        assert!(matches!(err, AdapterEnvError::InvalidIndex(_)));
    }

    #[test]
    fn leading_zero_indices_are_not_contract_names() {
        let decoded = decode(&[
            ("SINK_URI", "http://sink/"),
            ("APIVERSION_0", "v1"),
            ("KIND_0", "Pod"),
            ("KIND_00", "Event"),
            ("APIVERSION_01", "v2"),
            ("OWNEREF_00_KIND_0", "ReplicaSet"),
            ("OWNEREF_0_APIVERSION_00", "apps/v1"),
        ])
        .unwrap();
        assert_eq!(decoded.resources, vec![ApiServerResource::new("v1", "Pod")]);
    }

    #[test]
    fn classifies_canonical_names() {
        let patterns = Patterns::new().unwrap();
        assert_eq!(patterns.classify("SINK_URI").unwrap(), Some(Var::SinkUri));
        assert_eq!(
            patterns.classify("KIND_10").unwrap(),
            Some(Var::Resource { i: 10, field: Field::Kind })
        );
        assert_eq!(
            patterns.classify("OWNEREF_2_APIVERSION_0").unwrap(),
            Some(Var::Owner { i: 0, j: 2, field: Field::ApiVersion })
        );
        assert_eq!(patterns.classify("KIND_010").unwrap(), None);
        assert_eq!(patterns.classify("KIND_").unwrap(), None);
    }
}
