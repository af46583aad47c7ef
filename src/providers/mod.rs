pub mod flow_server;

pub use flow_server::FlowServerProvider;
