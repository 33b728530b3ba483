//! Handlers for partner events.

use async_trait::async_trait;
use tracing::info;

use super::unwrap_event;
use crate::events::partner::{
    PartnerEvent, PartnerGroupEvent, DISCRIMINATOR_PARTNER, DISCRIMINATOR_PARTNER_GROUP,
};
use crate::pubsub::{Discriminator, Handler, Message};

pub struct PartnerGroupEventHandler;

#[async_trait]
impl Handler for PartnerGroupEventHandler {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_PARTNER_GROUP
    }

    fn create(&self) -> Box<dyn Message> {
        Box::<PartnerGroupEvent>::default()
    }

    async fn handle(&self, message: &dyn Message) -> anyhow::Result<()> {
        let event = unwrap_event::<PartnerGroupEvent>(message)?;

        info!(
            operation = %event.event.event.operation,
            tenant_group = %event.event.tenant_group_name,
            payload = %serde_json::to_string_pretty(event)?,
            "partner group event received"
        );

        Ok(())
    }
}

pub struct PartnerEventHandler;

#[async_trait]
impl Handler for PartnerEventHandler {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_PARTNER
    }

    fn create(&self) -> Box<dyn Message> {
        Box::<PartnerEvent>::default()
    }

    async fn handle(&self, message: &dyn Message) -> anyhow::Result<()> {
        let event = unwrap_event::<PartnerEvent>(message)?;

        info!(
            operation = %event.event.event.operation,
            tenant_group = %event.event.tenant_group_name,
            payload = %serde_json::to_string_pretty(event)?,
            "partner event received"
        );

        Ok(())
    }
}
