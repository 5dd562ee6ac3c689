use std::collections::BTreeMap;

pub const CONTROLLER_AGENT_NAME: &str = "apiserver-source-controller";

pub const SOURCE_LABEL: &str = "eventing.knative.dev/source";
pub const SOURCE_NAME_LABEL: &str = "eventing.knative.dev/sourceName";

/// Labels a controller puts on the receive adapter of `source_name`.
pub fn source_labels(source_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (SOURCE_LABEL.to_owned(), CONTROLLER_AGENT_NAME.to_owned()),
        (SOURCE_NAME_LABEL.to_owned(), source_name.to_owned()),
    ])
}
