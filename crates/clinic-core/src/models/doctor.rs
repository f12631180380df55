//! Doctor records.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Nested occupancy view: calendar date to the set of taken time labels.
pub type SlotMap = BTreeMap<String, BTreeSet<String>>;

/// A doctor record.
///
/// `slots_booked` is a materialized read of the slot index; occupancy is only
/// ever changed through the reservation coordinator, never by editing this
/// struct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    /// Opaque unique id
    pub doctor_id: String,
    /// Display name
    pub name: String,
    /// Speciality shown on the booking page
    pub speciality: Option<String>,
    /// Fee per booking in major currency units; stamped onto new appointments
    pub fee: i64,
    /// Whether the doctor accepts new bookings at all
    pub available: bool,
    /// Occupied slots, date -> time labels
    #[serde(default)]
    pub slots_booked: SlotMap,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Doctor {
    /// Create a new doctor accepting bookings.
    pub fn new(name: String, fee: i64) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            doctor_id: uuid::Uuid::new_v4().to_string(),
            name,
            speciality: None,
            fee,
            available: true,
            slots_booked: SlotMap::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
