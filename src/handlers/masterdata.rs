//! Handlers for master-data events.

use async_trait::async_trait;
use tracing::info;

use super::unwrap_event;
use crate::events::masterdata::{
    CircleEvent, CityEvent, ZoneEvent, DISCRIMINATOR_CIRCLE, DISCRIMINATOR_CITY,
    DISCRIMINATOR_ZONE,
};
use crate::pubsub::{Discriminator, Handler, Message};

pub struct CityEventHandler;

#[async_trait]
impl Handler for CityEventHandler {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_CITY
    }

    fn create(&self) -> Box<dyn Message> {
        Box::<CityEvent>::default()
    }

    async fn handle(&self, message: &dyn Message) -> anyhow::Result<()> {
        let event = unwrap_event::<CityEvent>(message)?;

        info!(
            operation = %event.event.event.operation,
            tenant_group = %event.event.tenant_group_name,
            payload = %serde_json::to_string_pretty(event)?,
            "city event received"
        );

        Ok(())
    }
}

pub struct CircleEventHandler;

#[async_trait]
impl Handler for CircleEventHandler {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_CIRCLE
    }

    fn create(&self) -> Box<dyn Message> {
        Box::<CircleEvent>::default()
    }

    async fn handle(&self, message: &dyn Message) -> anyhow::Result<()> {
        let event = unwrap_event::<CircleEvent>(message)?;

        info!(
            operation = %event.event.event.operation,
            tenant_group = %event.event.tenant_group_name,
            payload = %serde_json::to_string_pretty(event)?,
            "circle event received"
        );

        Ok(())
    }
}

pub struct ZoneEventHandler;

#[async_trait]
impl Handler for ZoneEventHandler {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_ZONE
    }

    fn create(&self) -> Box<dyn Message> {
        Box::<ZoneEvent>::default()
    }

    async fn handle(&self, message: &dyn Message) -> anyhow::Result<()> {
        let event = unwrap_event::<ZoneEvent>(message)?;

        info!(
            operation = %event.event.event.operation,
            tenant_group = %event.event.tenant_group_name,
            payload = %serde_json::to_string_pretty(event)?,
            "zone event received"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::masterdata::CityData;
    use crate::events::{OPERATION_ADD, VERSION_1};
    use crate::messaging::ReceivedEnvelope;
    use crate::pubsub::EmptyMessage;

    #[tokio::test]
    async fn handles_enveloped_city_event() {
        let event = CityEvent::new(
            VERSION_1,
            OPERATION_ADD,
            "2024-05-01T00:00:00Z",
            "Alpha",
            CityData {
                code: "C001".into(),
                ..CityData::default()
            },
        );
        let envelope = ReceivedEnvelope::new(Box::new(event));

        assert!(CityEventHandler.handle(&envelope).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_bare_message() {
        let event = CityEvent::default();

        assert!(CityEventHandler.handle(&event).await.is_err());
    }

    #[tokio::test]
    async fn rejects_payload_of_wrong_type() {
        let envelope = ReceivedEnvelope::new(Box::new(EmptyMessage::new(DISCRIMINATOR_CITY)));

        assert!(CityEventHandler.handle(&envelope).await.is_err());
    }

    #[test]
    fn create_yields_decodable_shell() {
        let shell = CityEventHandler.create();
        assert_eq!(shell.discriminator(), DISCRIMINATOR_CITY);
    }
}
