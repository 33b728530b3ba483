//! # Event Handlers
//!
//! One handler per synchronization event type, plus the partition-key
//! function that routes those events onto lanes. The key shape is
//! `{tenant_group}~{type}~{code}`, so updates to the same entity always
//! serialize onto the same lane while distinct entities fan out.

pub mod hr;
pub mod masterdata;
pub mod partner;

use std::any::Any;
use std::sync::Arc;

use crate::events::hr::{
    EmployeeEvent, PositionEvent, RoleEvent, DISCRIMINATOR_EMPLOYEE, DISCRIMINATOR_POSITION,
    DISCRIMINATOR_ROLE,
};
use crate::events::masterdata::{
    CircleEvent, CityEvent, ZoneEvent, DISCRIMINATOR_CIRCLE, DISCRIMINATOR_CITY,
    DISCRIMINATOR_ZONE,
};
use crate::events::partner::{
    PartnerEvent, PartnerGroupEvent, DISCRIMINATOR_PARTNER, DISCRIMINATOR_PARTNER_GROUP,
};
use crate::events::TenantGroupEvent;
use crate::messaging::{ReceivedEnvelope, RoutingError};
use crate::pubsub::{Discriminator, Dispatcher, EmptyMessage, Message};
use crate::subscriber::PartitionKeyFn;

/// Register every known event handler on the dispatcher.
pub fn register_all(dispatcher: &mut Dispatcher) {
    dispatcher.register(Arc::new(masterdata::CityEventHandler));
    dispatcher.register(Arc::new(masterdata::CircleEventHandler));
    dispatcher.register(Arc::new(masterdata::ZoneEventHandler));
    dispatcher.register(Arc::new(partner::PartnerGroupEventHandler));
    dispatcher.register(Arc::new(partner::PartnerEventHandler));
    dispatcher.register(Arc::new(hr::EmployeeEventHandler));
    dispatcher.register(Arc::new(hr::PositionEventHandler));
    dispatcher.register(Arc::new(hr::RoleEventHandler));
}

/// Compute the lane-routing key for a received synchronization event.
///
/// Events of unknown type route with the empty key, which is valid and maps
/// them all onto one lane; only a structural mismatch between envelope,
/// discriminator and concrete type is an error.
pub fn partition_key(message: &dyn Message) -> Result<String, RoutingError> {
    let envelope = message
        .as_any()
        .downcast_ref::<ReceivedEnvelope>()
        .ok_or(RoutingError::InvalidEnvelope)?;

    let inner = envelope.message.as_ref();
    let discriminator = inner.discriminator();
    let any = inner.as_any();

    // a placeholder shell can carry any tag (registry-driven decode yields
    // one for unregistered types); it routes like an unknown type so the
    // consumer's not-found policy can complete it instead of the producer
    // abandoning it into endless redelivery
    if any.downcast_ref::<EmptyMessage>().is_some() {
        return Ok(String::new());
    }

    let key = if discriminator == DISCRIMINATOR_CITY {
        let event = downcast::<CityEvent>(any, &discriminator)?;
        scoped_key(&event.event, event.data.as_ref().map(|d| d.code.as_str()))
    } else if discriminator == DISCRIMINATOR_CIRCLE {
        let event = downcast::<CircleEvent>(any, &discriminator)?;
        scoped_key(&event.event, event.data.as_ref().map(|d| d.code.as_str()))
    } else if discriminator == DISCRIMINATOR_ZONE {
        let event = downcast::<ZoneEvent>(any, &discriminator)?;
        scoped_key(&event.event, event.data.as_ref().map(|d| d.code.as_str()))
    } else if discriminator == DISCRIMINATOR_PARTNER_GROUP {
        let event = downcast::<PartnerGroupEvent>(any, &discriminator)?;
        scoped_key(&event.event, event.data.as_ref().map(|d| d.code.as_str()))
    } else if discriminator == DISCRIMINATOR_PARTNER {
        let event = downcast::<PartnerEvent>(any, &discriminator)?;
        scoped_key(&event.event, event.data.as_ref().map(|d| d.code.as_str()))
    } else if discriminator == DISCRIMINATOR_EMPLOYEE {
        let event = downcast::<EmployeeEvent>(any, &discriminator)?;
        scoped_key(&event.event, event.data.as_ref().map(|d| d.code.as_str()))
    } else if discriminator == DISCRIMINATOR_POSITION {
        let event = downcast::<PositionEvent>(any, &discriminator)?;
        scoped_key(&event.event, event.data.as_ref().map(|d| d.code.as_str()))
    } else if discriminator == DISCRIMINATOR_ROLE {
        let event = downcast::<RoleEvent>(any, &discriminator)?;
        scoped_key(&event.event, event.data.as_ref().map(|d| d.code.as_str()))
    } else {
        String::new()
    };

    Ok(key)
}

/// [`partition_key`] behind the subscriber's injectable function type.
pub fn partition_key_fn() -> PartitionKeyFn {
    Arc::new(partition_key)
}

fn scoped_key(scope: &TenantGroupEvent, code: Option<&str>) -> String {
    format!(
        "{}~{}~{}",
        scope.tenant_group_name,
        scope.event.r#type,
        code.unwrap_or_default()
    )
}

fn downcast<'a, T: Any>(
    any: &'a dyn Any,
    discriminator: &Discriminator,
) -> Result<&'a T, RoutingError> {
    any.downcast_ref::<T>()
        .ok_or_else(|| RoutingError::invalid_discriminator(discriminator.as_str()))
}

/// Unwrap the envelope and downcast its payload to the handler's event type.
pub(crate) fn unwrap_event<T: Any>(message: &dyn Message) -> Result<&T, RoutingError> {
    let envelope = message
        .as_any()
        .downcast_ref::<ReceivedEnvelope>()
        .ok_or(RoutingError::InvalidEnvelope)?;

    let discriminator = envelope.discriminator();

    downcast::<T>(envelope.message.as_any(), &discriminator)
}
