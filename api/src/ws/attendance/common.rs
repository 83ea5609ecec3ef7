use serde::Deserialize;

/// Commands a presenter can send, tagged by `type`:
///
/// ```json
/// { "type": "startSession", "room": "SY-CS-A" }
/// { "type": "markManual", "rollNumber": "104" }
/// { "type": "closeSession" }
/// { "type": "resetDevice", "rollNumber": "104" }
/// ```
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PresenterIncoming {
    StartSession { room: String },
    MarkManual { roll_number: String },
    CloseSession,
    ResetDevice { roll_number: String },
}

impl PresenterIncoming {
    pub fn name(&self) -> &'static str {
        match self {
            PresenterIncoming::StartSession { .. } => "startSession",
            PresenterIncoming::MarkManual { .. } => "markManual",
            PresenterIncoming::CloseSession => "closeSession",
            PresenterIncoming::ResetDevice { .. } => "resetDevice",
        }
    }
}
