//! Partner events: partner groups and partners.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{Event, TenantGroupEvent};
use crate::messaging::DecodeError;
use crate::pubsub::{Discriminator, Message};

pub const DISCRIMINATOR_PARTNER_GROUP: Discriminator =
    Discriminator::from_static("Partner_PartnerGroup");
pub const DISCRIMINATOR_PARTNER: Discriminator = Discriminator::from_static("Partner_Partner");

pub const SCOPE_NONE: i32 = 0;
pub const SCOPE_TENANT_GROUP: i32 = 1;
pub const SCOPE_PARTNER_GROUP: i32 = 2;

// Flags for infrastructures
pub const INFRASTRUCTURES_NONE: i32 = 0;
pub const INFRASTRUCTURES_LAN: i32 = 1;
pub const INFRASTRUCTURES_EXCITEL_FIBER: i32 = 1 << 1;
pub const INFRASTRUCTURES_ERP_FIBER: i32 = 1 << 2;

// Flags for services
pub const SERVICES_NONE: i32 = 0;
pub const SERVICES_INTERNET: i32 = 1;
pub const SERVICES_CABLE_TV: i32 = 1 << 1;

pub const STATUS_NONE: i32 = 0;
pub const STATUS_ACTIVE: i32 = 1;
pub const STATUS_INACTIVE: i32 = 2;
pub const STATUS_TERMINATED: i32 = 3;

pub const CONTACT_TYPE_NONE: i32 = 0;
pub const CONTACT_TYPE_GENERAL: i32 = 1;
pub const CONTACT_TYPE_TECHNICAL: i32 = 2;
pub const CONTACT_TYPE_OWNER: i32 = 3;
pub const CONTACT_TYPE_BILLING: i32 = 4;
pub const CONTACT_TYPE_SHIPPING: i32 = 5;

// Flags for payment types
pub const PAYMENT_TYPES_NONE: i32 = 0;
pub const PAYMENT_TYPES_CASH: i32 = 1;
pub const PAYMENT_TYPES_DIGITAL: i32 = 1 << 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartnerGroupData {
    pub code: String,
    pub name: String,
    pub tenant_name: String,
    pub credit_limit: f64,
    pub group_owner_code: String,
    pub group_owner_user_id: String,
    pub group_owner_user_name: String,
    pub group_owner_scope: i32,
    pub created_by_user_id: String,
    pub created_by_user_name: String,
    pub modified_by_user_id: String,
    pub modified_by_user_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartnerGroupEvent {
    #[serde(flatten)]
    pub event: TenantGroupEvent,
    pub data: Option<PartnerGroupData>,
}

impl PartnerGroupEvent {
    pub fn new(
        version: &str,
        operation: &str,
        timestamp: &str,
        tenant_group_name: &str,
        data: PartnerGroupData,
    ) -> Self {
        PartnerGroupEvent {
            event: TenantGroupEvent {
                event: Event::new(
                    DISCRIMINATOR_PARTNER_GROUP.as_str(),
                    version,
                    operation,
                    timestamp,
                ),
                tenant_group_name: tenant_group_name.to_owned(),
            },
            data: Some(data),
        }
    }
}

impl Message for PartnerGroupEvent {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_PARTNER_GROUP
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
pub struct EmployeeRelation {
    pub user_id: String,
    pub user_name: String,
    pub code: String,
    pub scope: i32,
    pub position_code: String,
    pub position_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartnerTenantGroupEmployee {
    #[serde(flatten)]
    pub relation: EmployeeRelation,
    pub acting_position_code: String,
    pub acting_position_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Contact {
    pub contact_type: i32,
    pub name: String,
    pub primary_phone: String,
    pub secondary_phone: String,
    pub landline_phone: String,
    pub email: String,
    pub city_code: String,
    pub city_name: String,
    pub state_name: String,
    pub subarea_name: String,
    pub postal_code: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartnerData {
    pub code: String,
    pub name: String,
    pub tenant_name: String,
    pub partner_group_code: String,
    pub partner_group_name: String,
    pub created_time: String,
    pub nickname: String,
    pub infrastructures: i32,
    pub services: i32,
    pub status: i32,
    pub exclusive: bool,
    pub active_for_sales: bool,
    pub plan_book_code: String,
    pub plan_book_name: String,
    #[serde(rename = "GSTIN")]
    pub gstin: String,
    #[serde(rename = "PAN")]
    pub pan: String,
    pub legal_entity: String,
    pub city_code: String,
    pub city_name: String,
    pub state_name: String,
    pub circle_code: String,
    pub circle_name: String,
    pub zone_code: String,
    pub zone_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub unlocked_devices: bool,
    pub homepass: u64,
    pub tenant_group_employees: Vec<PartnerTenantGroupEmployee>,
    pub contacts: Vec<Contact>,
    pub created_by_user_id: String,
    pub created_by_user_name: String,
    pub modified_by_user_id: String,
    pub modified_by_user_name: String,
    pub subscriber_payment_types: i32,
    pub new_subscriber_payment_types: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartnerEvent {
    #[serde(flatten)]
    pub event: TenantGroupEvent,
    pub data: Option<PartnerData>,
}

impl PartnerEvent {
    pub fn new(
        version: &str,
        operation: &str,
        timestamp: &str,
        tenant_group_name: &str,
        data: PartnerData,
    ) -> Self {
        PartnerEvent {
            event: TenantGroupEvent {
                event: Event::new(DISCRIMINATOR_PARTNER.as_str(), version, operation, timestamp),
                tenant_group_name: tenant_group_name.to_owned(),
            },
            data: Some(data),
        }
    }
}

impl Message for PartnerEvent {
    fn discriminator(&self) -> Discriminator {
        DISCRIMINATOR_PARTNER
    }

    fn decode_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        *self = serde_json::from_slice(body)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
