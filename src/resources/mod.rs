pub mod env;
pub mod labels;
mod receive_adapter;

pub use env::make_env;
pub use labels::source_labels;
pub use receive_adapter::{make_receive_adapter, ReceiveAdapterArgs, ReceiveAdapterError};
