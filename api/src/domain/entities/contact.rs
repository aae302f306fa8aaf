//! Contact domain entity
//!
//! Read-only identity from the contact directory, including the waiting lists
//! the contact is queued in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Waiting list kinds kept by the leasing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitingListType {
    Housing,
    ParkingSpace,
    Storage,
}

impl std::fmt::Display for WaitingListType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitingListType::Housing => write!(f, "housing"),
            WaitingListType::ParkingSpace => write!(f, "parking_space"),
            WaitingListType::Storage => write!(f, "storage"),
        }
    }
}

/// Queue membership holding queue points and queue time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingList {
    pub waiting_list_type: WaitingListType,
    pub queue_points: i32,
    pub queue_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub contact_code: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub waiting_lists: Vec<WaitingList>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_in_waiting_list(&self, list: WaitingListType) -> bool {
        self.waiting_lists
            .iter()
            .any(|w| w.waiting_list_type == list)
    }

    /// Email address, ignoring blank values from the directory
    pub fn email(&self) -> Option<&str> {
        self.email_address
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
