use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use async_trait::async_trait;
use chrono_tz::Tz;

use crate::{
    api::{
        push::{PushGateway, PushMessage},
        store::ClinicStore,
    },
    app_state::AppState,
    config::AppConfig,
    models::{Booking, Chat, Doctor, Patient},
};

#[derive(Default)]
pub struct FakeStore {
    pub bookings: Vec<Booking>,
    pub doctors: HashMap<String, Doctor>,
    pub patients: HashMap<String, Patient>,
    pub chats: HashMap<String, Chat>,
}

#[async_trait]
impl ClinicStore for FakeStore {
    async fn bookings_on(&self, date: &str) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|booking| booking.date == date)
            .cloned()
            .collect())
    }

    async fn doctor(&self, id: &str) -> Result<Option<Doctor>> {
        Ok(self.doctors.get(id).cloned())
    }

    async fn patient(&self, id: &str) -> Result<Option<Patient>> {
        Ok(self.patients.get(id).cloned())
    }

    async fn chat(&self, id: &str) -> Result<Option<Chat>> {
        Ok(self.chats.get(id).cloned())
    }
}

/// Records every accepted send; tokens listed in `failing_tokens` reject
/// instead, still counting as attempts.
#[derive(Default)]
pub struct RecordingPush {
    pub sent: Mutex<Vec<PushMessage>>,
    pub attempts: Mutex<usize>,
    pub failing_tokens: Vec<String>,
}

#[async_trait]
impl PushGateway for RecordingPush {
    async fn send(&self, message: PushMessage) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        if self.failing_tokens.contains(&message.token) {
            anyhow::bail!("push relay rejected token {}", message.token);
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

pub fn test_state(store: FakeStore, push: Arc<RecordingPush>) -> AppState {
    AppState {
        store: Arc::new(store),
        push,
        config: AppConfig {
            port: 0,
            clinic_tz: Tz::Africa__Johannesburg,
            reminder_interval_secs: 300,
            reminder_lookahead_mins: 15,
        },
    }
}

pub fn booking(id: &str, doctor_id: &str, date: &str, start_time: &str) -> Booking {
    Booking {
        id: id.into(),
        doctor_id: doctor_id.into(),
        service_id: "general-checkup".into(),
        date: date.into(),
        start_time: start_time.into(),
        end_time: "18:00".into(),
        patient_id: "p1".into(),
        patient_name: "Jane Mokoena".into(),
        status: "CONFIRMED".into(),
        notes: None,
    }
}

pub fn doctor(id: &str, push_token: Option<&str>) -> Doctor {
    Doctor {
        id: id.into(),
        name: Some("Dr. Naidoo".into()),
        push_token: push_token.map(Into::into),
    }
}

pub fn patient(id: &str, push_token: Option<&str>) -> Patient {
    Patient {
        id: id.into(),
        name: Some("Thandi Dlamini".into()),
        push_token: push_token.map(Into::into),
    }
}
