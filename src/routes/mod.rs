mod health_check;
mod receive_adapter;
mod version;

pub use health_check::health_check;
pub use receive_adapter::{render_receive_adapter, RenderFormat, RenderQuery, RenderRequest};
pub use version::build_version;
