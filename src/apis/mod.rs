mod api_server_source;

pub use api_server_source::{
    ApiServerResource, ApiServerSource, ApiServerSourceSpec, OwnerReferenceFilter,
};
