//! Master-data events: cities, circles and zones.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{Event, TenantGroupEvent};
use crate::messaging::DecodeError;
use crate::pubsub::{Discriminator, Message};

pub const DISCRIMINATOR_CITY: Discriminator = Discriminator::from_static("MasterData_City");
pub const DISCRIMINATOR_CIRCLE: Discriminator = Discriminator::from_static("MasterData_Circle");
pub const DISCRIMINATOR_ZONE: Discriminator = Discriminator::from_static("MasterData_Zone");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CityData {
    pub code: String,
    pub name: String,
    pub tenant_name: String,
    pub state_name: String,
    pub coverage_map: bool,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CityEvent {
    #[serde(flatten)]
    pub event: TenantGroupEvent,
    pub data: Option<CityData>,
}

impl CityEvent {
    pub fn new(
        version: &str,
        operation: &str,
        timestamp: &str,
        tenant_group_name: &str,
        data: CityData,
    ) -> Self {
        CityEvent {
            event: TenantGroupEvent {
                event: Event::new(DISCRIMINATOR_CITY.as_str(), version, operation, timestamp),
                tenant_group_name: tenant_group_name.to_owned(),
            },
            data: Some(data),
        }
    }
}

impl Message for CityEvent {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_CITY
    }

    fn decode_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        *self = serde_json::from_slice(body)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CircleData {
    pub code: String,
    pub name: String,
    pub tenant_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CircleEvent {
    #[serde(flatten)]
    pub event: TenantGroupEvent,
    pub data: Option<CircleData>,
}

impl CircleEvent {
    pub fn new(
        version: &str,
        operation: &str,
        timestamp: &str,
        tenant_group_name: &str,
        data: CircleData,
    ) -> Self {
        CircleEvent {
            event: TenantGroupEvent {
                event: Event::new(DISCRIMINATOR_CIRCLE.as_str(), version, operation, timestamp),
                tenant_group_name: tenant_group_name.to_owned(),
            },
            data: Some(data),
        }
    }
}

impl Message for CircleEvent {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_CIRCLE
    }

    fn decode_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        *self = serde_json::from_slice(body)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneData {
    pub code: String,
    pub name: String,
    pub tenant_name: String,
    pub circle_code: String,
    pub circle_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneEvent {
    #[serde(flatten)]
    pub event: TenantGroupEvent,
    pub data: Option<ZoneData>,
}

impl ZoneEvent {
    pub fn new(
        version: &str,
        operation: &str,
        timestamp: &str,
        tenant_group_name: &str,
        data: ZoneData,
    ) -> Self {
        ZoneEvent {
            event: TenantGroupEvent {
                event: Event::new(DISCRIMINATOR_ZONE.as_str(), version, operation, timestamp),
                tenant_group_name: tenant_group_name.to_owned(),
            },
            data: Some(data),
        }
    }
}

impl Message for ZoneEvent {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_ZONE
    }

    fn decode_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        *self = serde_json::from_slice(body)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
