//! Shared test doubles: a scripted broker, a self-describing test message
//! and a counting handler with failure, delay and gating modes.

#![allow(dead_code)]

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::time::Instant;

use sync_core::messaging::{
    BrokerError, BrokerReceiver, DeadLetterReason, DecodeError, Delivery,
};
use sync_core::pubsub::{Discriminator, Handler, Message};
use sync_core::subscriber::PartitionKeyFn;

pub const TEST_DISCRIMINATOR: Discriminator = Discriminator::from_static("Test_Message");

/// One recorded settlement attempt, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Completed,
    Abandoned,
    DeadLettered { reason: String },
}

#[derive(Default)]
struct MockState {
    batches: VecDeque<Vec<Delivery>>,
    receive_error: Option<BrokerError>,
    complete_errors: HashMap<String, BrokerError>,
    abandon_errors: HashMap<String, BrokerError>,
    dead_letter_errors: HashMap<String, BrokerError>,
    settlements: Vec<(String, Settlement)>,
}

/// Scripted in-memory broker: hand it batches up front, inject per-message
/// settlement errors, and inspect the settlement log afterwards.
#[derive(Default)]
pub struct MockReceiver {
    state: Mutex<MockState>,
}

impl MockReceiver {
    pub fn new() -> Arc<Self> {
        Arc::new(MockReceiver::default())
    }

    pub fn push_batch(&self, deliveries: Vec<Delivery>) {
        self.state.lock().unwrap().batches.push_back(deliveries);
    }

    /// Fail every receive once the scripted batches run out.
    pub fn fail_receive_when_drained(&self, error: BrokerError) {
        self.state.lock().unwrap().receive_error = Some(error);
    }

    pub fn fail_complete(&self, message_id: &str, error: BrokerError) {
        self.state
            .lock()
            .unwrap()
            .complete_errors
            .insert(message_id.to_owned(), error);
    }

    pub fn fail_abandon(&self, message_id: &str, error: BrokerError) {
        self.state
            .lock()
            .unwrap()
            .abandon_errors
            .insert(message_id.to_owned(), error);
    }

    pub fn fail_dead_letter(&self, message_id: &str, error: BrokerError) {
        self.state
            .lock()
            .unwrap()
            .dead_letter_errors
            .insert(message_id.to_owned(), error);
    }

    pub fn settlements(&self) -> Vec<(String, Settlement)> {
        self.state.lock().unwrap().settlements.clone()
    }

    fn ids_with(&self, wanted: impl Fn(&Settlement) -> bool) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .settlements
            .iter()
            .filter(|(_, settlement)| wanted(settlement))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn completed_ids(&self) -> Vec<String> {
        self.ids_with(|s| matches!(s, Settlement::Completed))
    }

    pub fn abandoned_ids(&self) -> Vec<String> {
        self.ids_with(|s| matches!(s, Settlement::Abandoned))
    }

    pub fn dead_lettered_ids(&self) -> Vec<String> {
        self.ids_with(|s| matches!(s, Settlement::DeadLettered { .. }))
    }

    fn record(&self, message_id: &str, settlement: Settlement) {
        self.state
            .lock()
            .unwrap()
            .settlements
            .push((message_id.to_owned(), settlement));
    }
}

#[async_trait]
impl BrokerReceiver for MockReceiver {
    async fn receive_batch(&self, _limit: usize) -> Result<Vec<Delivery>, BrokerError> {
        let mut state = self.state.lock().unwrap();
        match state.batches.pop_front() {
            Some(batch) => Ok(batch),
            None => match &state.receive_error {
                Some(error) => Err(error.clone()),
                None => Ok(Vec::new()),
            },
        }
    }

    async fn complete(&self, delivery: &Delivery) -> Result<(), BrokerError> {
        self.record(&delivery.message_id, Settlement::Completed);
        let injected = {
            let state = self.state.lock().unwrap();
            state.complete_errors.get(&delivery.message_id).cloned()
        };
        match injected {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn abandon(&self, delivery: &Delivery) -> Result<(), BrokerError> {
        self.record(&delivery.message_id, Settlement::Abandoned);
        let injected = {
            let state = self.state.lock().unwrap();
            state.abandon_errors.get(&delivery.message_id).cloned()
        };
        match injected {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn dead_letter(
        &self,
        delivery: &Delivery,
        reason: DeadLetterReason,
    ) -> Result<(), BrokerError> {
        self.record(
            &delivery.message_id,
            Settlement::DeadLettered {
                reason: reason.reason,
            },
        );
        let injected = {
            let state = self.state.lock().unwrap();
            state.dead_letter_errors.get(&delivery.message_id).cloned()
        };
        match injected {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Self-describing pipeline test message carrying its own routing key and a
/// per-key sequence number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestMessage {
    pub r#type: String,
    pub key: String,
    pub seq: u64,
}

impl TestMessage {
    pub fn new(key: &str, seq: u64) -> Self {
        TestMessage {
            r#type: TEST_DISCRIMINATOR.as_str().to_owned(),
            key: key.to_owned(),
            seq,
        }
    }
}

impl Message for TestMessage {
    fn discriminator(&self) -> Discriminator {
        Discriminator::from(self.r#type.as_str())
    }

    fn decode_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        *self = serde_json::from_slice(body)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn test_delivery(message_id: &str, message: &TestMessage) -> Delivery {
    Delivery::new(message_id, serde_json::to_vec(message).unwrap())
}

/// Routing key for [`TestMessage`] pipelines: the message's own key field.
pub fn test_partition_key() -> PartitionKeyFn {
    Arc::new(|message| {
        message
            .as_any()
            .downcast_ref::<TestMessage>()
            .map(|test| test.key.clone())
            .ok_or(sync_core::messaging::RoutingError::InvalidEnvelope)
    })
}

/// Handler recording `(key, seq)` in processing order. Optional modes: fail
/// every message, sleep per message, or block on a semaphore gate until the
/// test releases permits.
#[derive(Default)]
pub struct CountingHandler {
    handled: Mutex<Vec<(String, u64)>>,
    fail: bool,
    delay: Option<Duration>,
    gate: Option<Arc<Semaphore>>,
}

impl CountingHandler {
    pub fn new() -> Self {
        CountingHandler::default()
    }

    pub fn failing() -> Self {
        CountingHandler {
            fail: true,
            ..CountingHandler::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        CountingHandler {
            delay: Some(delay),
            ..CountingHandler::default()
        }
    }

    pub fn with_gate(gate: Arc<Semaphore>) -> Self {
        CountingHandler {
            gate: Some(gate),
            ..CountingHandler::default()
        }
    }

    pub fn handled(&self) -> Vec<(String, u64)> {
        self.handled.lock().unwrap().clone()
    }

    pub fn handled_count(&self) -> usize {
        self.handled.lock().unwrap().len()
    }

    /// Sequence numbers in processing order for one key.
    pub fn sequence_for(&self, key: &str) -> Vec<u64> {
        self.handled
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, seq)| *seq)
            .collect()
    }
}

#[async_trait]
impl Handler for CountingHandler {
    fn discriminator(&self) -> Discriminator {
        TEST_DISCRIMINATOR
    }

    fn create(&self) -> Box<dyn Message> {
        Box::<TestMessage>::default()
    }

    async fn handle(&self, message: &dyn Message) -> anyhow::Result<()> {
        let test = message
            .as_any()
            .downcast_ref::<TestMessage>()
            .ok_or_else(|| anyhow::anyhow!("not a test message"))?;

        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            anyhow::bail!("handler rejected {}#{}", test.key, test.seq);
        }

        self.handled
            .lock()
            .unwrap()
            .push((test.key.clone(), test.seq));

        Ok(())
    }
}

/// Poll `condition` every 10ms until it holds or `deadline` elapses.
pub async fn wait_until(deadline: Duration, condition: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
