//! HR events: employees, positions and roles.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{Event, TenantGroupEvent};
use crate::messaging::DecodeError;
use crate::pubsub::{Discriminator, Message};

pub const DISCRIMINATOR_EMPLOYEE: Discriminator = Discriminator::from_static("HR_Employee");
pub const DISCRIMINATOR_POSITION: Discriminator = Discriminator::from_static("HR_Position");
pub const DISCRIMINATOR_ROLE: Discriminator = Discriminator::from_static("HR_Role");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmployeeData {
    pub code: String,
    pub name: String,
    pub tenant_name: String,
    pub user_id: String,
    pub user_name: String,
    pub email: String,
    pub position_code: String,
    pub position_name: String,
    pub role_code: String,
    pub role_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmployeeEvent {
    #[serde(flatten)]
    pub event: TenantGroupEvent,
    pub data: Option<EmployeeData>,
}

impl EmployeeEvent {
    pub fn new(
        version: &str,
        operation: &str,
        timestamp: &str,
        tenant_group_name: &str,
        data: EmployeeData,
    ) -> Self {
        EmployeeEvent {
            event: TenantGroupEvent {
                event: Event::new(DISCRIMINATOR_EMPLOYEE.as_str(), version, operation, timestamp),
                tenant_group_name: tenant_group_name.to_owned(),
            },
            data: Some(data),
        }
    }
}

impl Message for EmployeeEvent {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_EMPLOYEE
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
pub struct PositionData {
    pub code: String,
    pub name: String,
    pub tenant_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PositionEvent {
    #[serde(flatten)]
    pub event: TenantGroupEvent,
    pub data: Option<PositionData>,
}

impl PositionEvent {
    pub fn new(
        version: &str,
        operation: &str,
        timestamp: &str,
        tenant_group_name: &str,
        data: PositionData,
    ) -> Self {
        PositionEvent {
            event: TenantGroupEvent {
                event: Event::new(DISCRIMINATOR_POSITION.as_str(), version, operation, timestamp),
                tenant_group_name: tenant_group_name.to_owned(),
            },
            data: Some(data),
        }
    }
}

impl Message for PositionEvent {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_POSITION
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
pub struct RoleData {
    pub code: String,
    pub name: String,
    pub tenant_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleEvent {
    #[serde(flatten)]
    pub event: TenantGroupEvent,
    pub data: Option<RoleData>,
}

impl RoleEvent {
    pub fn new(
        version: &str,
        operation: &str,
        timestamp: &str,
        tenant_group_name: &str,
        data: RoleData,
    ) -> Self {
        RoleEvent {
            event: TenantGroupEvent {
                event: Event::new(DISCRIMINATOR_ROLE.as_str(), version, operation, timestamp),
                tenant_group_name: tenant_group_name.to_owned(),
            },
            data: Some(data),
        }
    }
}

impl Message for RoleEvent {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_ROLE
    }

    fn decode_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        *self = serde_json::from_slice(body)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
