use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::{
    api::push::PushMessage,
    app_state::AppState,
    models::{Chat, ChatMessage},
};

const PREVIEW_MAX_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

/// How a message notification invocation resolved. The skip variants are
/// expected absences, not failures.
#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotifyOutcome {
    Sent,
    SkippedMissingChat,
    SkippedNoRecipient,
    SkippedMissingProfile,
    SkippedNoToken,
}

/// Resolve the recipient of a freshly created message and send them one push.
///
/// Missing chat, unresolvable recipient and missing profile or token are
/// logged and skipped; store and dispatch errors propagate to the caller.
pub async fn notify_new_message(
    state: &AppState,
    chat_id: &str,
    message_id: &str,
    message: &ChatMessage,
) -> Result<NotifyOutcome> {
    let Some(chat) = state.store.chat(chat_id).await? else {
        warn!("Message {message_id} arrived for unknown chat {chat_id}");
        return Ok(NotifyOutcome::SkippedMissingChat);
    };

    let Some(recipient_id) = recipient_of(&chat, &message.sender_id) else {
        warn!(
            "Sender {} is not a participant of chat {chat_id}",
            message.sender_id
        );
        return Ok(NotifyOutcome::SkippedNoRecipient);
    };

    // The chat knows which of the pair is the doctor; everyone else is a
    // patient.
    let recipient_is_doctor = recipient_id == chat.doctor_id;
    let token = if recipient_is_doctor {
        match state.store.doctor(recipient_id).await? {
            Some(doctor) => doctor.push_token,
            None => {
                warn!("Recipient doctor {recipient_id} of chat {chat_id} has no profile");
                return Ok(NotifyOutcome::SkippedMissingProfile);
            }
        }
    } else {
        match state.store.patient(recipient_id).await? {
            Some(patient) => patient.push_token,
            None => {
                warn!("Recipient patient {recipient_id} of chat {chat_id} has no profile");
                return Ok(NotifyOutcome::SkippedMissingProfile);
            }
        }
    };
    let Some(token) = token else {
        warn!("Recipient {recipient_id} of chat {chat_id} has no push token");
        return Ok(NotifyOutcome::SkippedNoToken);
    };

    let sender_name = sender_display_name(state, &chat, &message.sender_id).await?;

    state
        .push
        .send(PushMessage {
            token,
            title: format!("New message from {sender_name}"),
            body: preview(&message.text),
            sound: Some("default".to_string()),
            data: Some(json!({
                "chatId": chat_id,
                "type": "NEW_MESSAGE",
                "senderId": message.sender_id,
            })),
        })
        .await?;

    info!(
        "Notified {} {recipient_id} about message {message_id} in chat {chat_id}",
        if recipient_is_doctor { "doctor" } else { "patient" }
    );
    Ok(NotifyOutcome::Sent)
}

/// The non-sender half of the participant pair. A sender outside the pair
/// (or a malformed pair) resolves to nobody.
fn recipient_of<'a>(chat: &'a Chat, sender_id: &str) -> Option<&'a str> {
    match chat.participants.as_slice() {
        [a, b] if a == sender_id => Some(b.as_str()),
        [a, b] if b == sender_id => Some(a.as_str()),
        _ => None,
    }
}

async fn sender_display_name(state: &AppState, chat: &Chat, sender_id: &str) -> Result<String> {
    let name = if sender_id == chat.doctor_id {
        state
            .store
            .doctor(sender_id)
            .await?
            .and_then(|doctor| doctor.name)
            .unwrap_or_else(|| "Doctor".to_string())
    } else if sender_id == chat.patient_id {
        state
            .store
            .patient(sender_id)
            .await?
            .and_then(|patient| patient.name)
            .unwrap_or_else(|| "Patient".to_string())
    } else {
        "User".to_string()
    };
    Ok(name)
}

/// Notification body preview: text over `PREVIEW_MAX_CHARS` characters is cut
/// to 97 characters plus `...`, landing exactly on the limit.
fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_MAX_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(PREVIEW_MAX_CHARS - ELLIPSIS.len()).collect();
    format!("{head}{ELLIPSIS}")
}
