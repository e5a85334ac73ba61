// Library exports for testing and external use

pub mod app;
pub mod authority;
pub mod channel;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod replica;
pub mod root_history;
pub mod root_source;
pub mod storage;
pub mod telemetry;
pub mod traits;
pub mod transport;
pub mod types;

// Re-export commonly used types and traits
pub use authority::AdminRole;
pub use config::BaseConfig;
pub use dispatcher::{ChannelConfig, DispatchReport, PropagationDispatcher};
pub use error::{AuthorityError, ChannelError, DispatchError, ReplicaError, RootError};
pub use replica::{ExecutionCosts, Replica};
pub use root_history::{RootHistory, RootStatus};
pub use storage::RootHistoryStore;
pub use traits::{Channel, EventSink, RootSource, Transport};
pub use types::{Address, Authority, BudgetKind, Budgets, Event, Origin, RemoteMessage, Root};

// Re-export variant enums for convenience
pub use channel::{ChannelVariant, MessengerChannel, TunnelChannel};
pub use codec::WireFormat;
pub use events::{EventSinkVariant, MockSink};
pub use root_source::{InMemoryRootSource, RootSourceVariant};
pub use transport::{InProcessTransport, MockTransport, TransportVariant};
