pub mod chat_notifier;
pub mod reminders;
