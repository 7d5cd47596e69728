pub mod handlers;
pub mod server;

pub use handlers::{
    AlertExample, BridgeErrorResponse, BridgeResponse, MethodNotAllowedResponse,
    OrderPlacedResponse, OrderRejectedResponse, ServiceEndpoints, ServiceInfo,
};
pub use server::ApiServer;
