//! Serializing host.
//!
//! The consensus core assumes each operation runs to completion against the
//! state left by the previous one. [`SuretyHost`] provides that guarantee for
//! concurrent async callers by funnelling every call through one mutex.

use crate::core::{Address, Amount, Result};
use crate::events::JournalEntry;
use crate::oracle::FlightStatus;
use crate::surety::{FlightSurety, Receipt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Cloneable handle serializing access to one [`FlightSurety`].
#[derive(Clone)]
pub struct SuretyHost {
    inner: Arc<Mutex<FlightSurety>>,
}

impl SuretyHost {
    pub fn new(surety: FlightSurety) -> Self {
        Self {
            inner: Arc::new(Mutex::new(surety)),
        }
    }

    /// Run one mutating operation atomically.
    pub async fn apply<T>(&self, op: impl FnOnce(&mut FlightSurety) -> T) -> T {
        let mut surety = self.inner.lock().await;
        op(&mut surety)
    }

    /// Run a query against a consistent snapshot.
    pub async fn read<T>(&self, query: impl FnOnce(&FlightSurety) -> T) -> T {
        let surety = self.inner.lock().await;
        query(&surety)
    }

    pub async fn register_airline(&self, candidate: Address, caller: Address) -> Result<Receipt<()>> {
        self.apply(|surety| surety.register_airline(candidate, caller))
            .await
    }

    pub async fn post_funding(&self, airline: Address, amount: Amount) -> Result<()> {
        self.apply(|surety| surety.post_funding(airline, amount).map(|_| ()))
            .await
    }

    pub async fn submit_oracle_response(
        &self,
        oracle: Address,
        airline: Address,
        flight: String,
        timestamp: u64,
        index: u8,
        status_code: u8,
    ) -> Result<Receipt<Option<FlightStatus>>> {
        self.apply(|surety| {
            surety.submit_oracle_response(oracle, airline, &flight, timestamp, index, status_code)
        })
        .await
    }

    /// Journal entries from `sequence` onwards, for event consumers.
    pub async fn events_since(&self, sequence: u64) -> Vec<JournalEntry> {
        let entries = self.read(|surety| surety.journal().since(sequence).to_vec()).await;
        debug!(from = sequence, count = entries.len(), "events delivered");
        entries
    }
}
