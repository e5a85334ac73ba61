use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::traits::Transport;
use crate::types::Address;
use crate::types::GasUnits;

/// A payload accepted by `MockTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub destination: Address,
    pub budget: GasUnits,
    pub payload: Vec<u8>,
}

/// Mock transport for testing.
/// Records accepted submissions and can be switched into a failing state.
#[derive(Clone, Default)]
pub struct MockTransport {
    pub submitted: Arc<Mutex<Vec<Submission>>>,
    failing: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that rejects every submission.
    pub fn failing() -> Self {
        let transport = Self::default();
        transport.set_failing(true);
        transport
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all accepted submissions (for testing/verification).
    pub fn get_submitted(&self) -> Vec<Submission> {
        self.submitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        "mock-transport"
    }

    async fn submit(
        &self,
        destination: Address,
        budget: GasUnits,
        payload: Vec<u8>,
    ) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected {
                destination,
                reason: "mock transport is failing".to_string(),
            });
        }
        self.submitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Submission {
                destination,
                budget,
                payload,
            });
        Ok(())
    }
}
