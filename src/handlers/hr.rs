//! Handlers for HR events.

use async_trait::async_trait;
use tracing::info;

use super::unwrap_event;
use crate::events::hr::{
    EmployeeEvent, PositionEvent, RoleEvent, DISCRIMINATOR_EMPLOYEE, DISCRIMINATOR_POSITION,
    DISCRIMINATOR_ROLE,
};
use crate::pubsub::{Discriminator, Handler, Message};

pub struct EmployeeEventHandler;

#[async_trait]
impl Handler for EmployeeEventHandler {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_EMPLOYEE
    }

    fn create(&self) -> Box<dyn Message> {
        Box::<EmployeeEvent>::default()
    }

    async fn handle(&self, message: &dyn Message) -> anyhow::Result<()> {
        let event = unwrap_event::<EmployeeEvent>(message)?;

        info!(
            operation = %event.event.event.operation,
            tenant_group = %event.event.tenant_group_name,
            payload = %serde_json::to_string_pretty(event)?,
            "employee event received"
        );

        Ok(())
    }
}

pub struct PositionEventHandler;

#[async_trait]
impl Handler for PositionEventHandler {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_POSITION
    }

    fn create(&self) -> Box<dyn Message> {
        Box::<PositionEvent>::default()
    }

    async fn handle(&self, message: &dyn Message) -> anyhow::Result<()> {
        let event = unwrap_event::<PositionEvent>(message)?;

        info!(
            operation = %event.event.event.operation,
            tenant_group = %event.event.tenant_group_name,
            payload = %serde_json::to_string_pretty(event)?,
            "position event received"
        );

        Ok(())
    }
}

pub struct RoleEventHandler;

#[async_trait]
impl Handler for RoleEventHandler {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_ROLE
    }

    fn create(&self) -> Box<dyn Message> {
        Box::<RoleEvent>::default()
    }

    async fn handle(&self, message: &dyn Message) -> anyhow::Result<()> {
        let event = unwrap_event::<RoleEvent>(message)?;

        info!(
            operation = %event.event.event.operation,
            tenant_group = %event.event.tenant_group_name,
            payload = %serde_json::to_string_pretty(event)?,
            "role event received"
        );

        Ok(())
    }
}
