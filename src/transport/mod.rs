pub mod in_process;
pub mod mock;
pub mod variant;

pub use in_process::InProcessTransport;
pub use mock::MockTransport;
pub use mock::Submission;
pub use variant::TransportVariant;
