pub mod context;
pub mod entities;
pub mod errors;
pub mod kafka_error;
pub mod ports;
pub mod registry;
pub mod services;

pub use context::{CancelHandle, Interrupted, RequestContext};
pub use entities::*;
pub use errors::{ErrorClass, GatewayError, OperationResult};
pub use kafka_error::{KafkaErrorCode, KafkaProtocolError};
pub use ports::{ClusterHandle, ClusterRegistry, ConnectClient, KafkaAdminClient};
pub use registry::StaticClusterRegistry;
pub use services::*;
