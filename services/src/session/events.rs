//! Events the session manager publishes on the live attendance topic.

use db::models::attendance_record::MarkMethod;
use serde::Serialize;
use util::ws::Event;

/// Every presenter and observer subscribes here.
pub const LIVE_TOPIC: &str = "attendance:live";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub roll_number: String,
    pub name: String,
    pub is_present: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStarted {
    pub subject: String,
    pub classroom: String,
    pub lecturer_name: String,
    pub roster: Vec<RosterEntry>,
}

impl Event for SessionStarted {
    const NAME: &'static str = "sessionStarted";
    fn topic_path(&self) -> String {
        LIVE_TOPIC.into()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQrCode {
    pub code: String,
    pub rotation_seconds: u64,
}

impl Event for NewQrCode {
    const NAME: &'static str = "newQRCode";
    fn topic_path(&self) -> String {
        LIVE_TOPIC.into()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMarked {
    pub roll_number: String,
    pub subject: String,
    pub method: MarkMethod,
}

impl Event for StudentMarked {
    const NAME: &'static str = "studentMarked";
    fn topic_path(&self) -> String {
        LIVE_TOPIC.into()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClosed {
    pub subject: String,
    pub classroom: String,
}

impl Event for SessionClosed {
    const NAME: &'static str = "sessionClosed";
    fn topic_path(&self) -> String {
        LIVE_TOPIC.into()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReset {
    pub roll_number: String,
}

impl Event for DeviceReset {
    const NAME: &'static str = "deviceReset";
    fn topic_path(&self) -> String {
        LIVE_TOPIC.into()
    }
}

/// Sent only to the presenter whose `startSession` failed.
pub const SESSION_ERROR: &str = "sessionError";
/// Sent only to the presenter whose other command failed.
pub const COMMAND_ERROR: &str = "commandError";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub command: &'static str,
    pub message: String,
}
