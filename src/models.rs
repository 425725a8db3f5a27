use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Bookings

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub doctor_id: String,
    pub service_id: String,
    /// Civil date, `YYYY-MM-DD`.
    pub date: String,
    /// Zero-padded 24h `HH:MM`, clinic-local. Padding keeps lexicographic
    /// order equal to chronological order.
    pub start_time: String,
    pub end_time: String,
    pub patient_id: String,
    pub patient_name: String,
    pub status: String,
    pub notes: Option<String>,
}

// Directory

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: Option<String>,
    /// Absent token means the doctor cannot be notified. Not an error.
    pub push_token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: Option<String>,
    pub push_token: Option<String>,
}

// Chats

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    /// Exactly two participant ids for a well-formed chat.
    pub participants: Vec<String>,
    pub doctor_id: String,
    pub patient_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender_id: String,
    pub text: String,
    pub sent_at: Option<DateTime<Utc>>,
}
