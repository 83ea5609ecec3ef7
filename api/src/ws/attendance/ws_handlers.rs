use chrono::Local;
use services::AppError;
use services::session::{COMMAND_ERROR, DeviceReset, ErrorPayload, SESSION_ERROR};
use util::ws::emit_event;
use util::ws::handler_trait::WsHandler;
use util::ws::runtime::WsContext;

use super::common::PresenterIncoming;
use crate::error::client_message;
use crate::state::AppState;

pub struct PresenterWsHandler {
    state: AppState,
}

impl PresenterWsHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn fail(&self, ctx: &WsContext, command: &'static str, err: AppError) {
        let event = if command == "startSession" {
            SESSION_ERROR
        } else {
            COMMAND_ERROR
        };
        let payload = ErrorPayload {
            command,
            message: client_message(&err),
        };
        tracing::info!(connection_id = ctx.connection_id, command, "Presenter command failed: {err}");
        let _ = ctx.reply_event(event, &payload).await;
    }

    async fn handle(&self, ctx: &WsContext, msg: PresenterIncoming) -> Result<(), AppError> {
        let sessions = self.state.sessions();
        match msg {
            PresenterIncoming::StartSession { room } => {
                let now = Local::now().naive_local();
                sessions
                    .start_session(ctx.connection_id, room.trim(), now)
                    .await?;
            }
            PresenterIncoming::MarkManual { roll_number } => {
                sessions
                    .mark_manual(ctx.connection_id, roll_number.trim())
                    .await?;
            }
            PresenterIncoming::CloseSession => {
                sessions.require_owner(ctx.connection_id).await?;
                if !sessions.close(ctx.connection_id).await {
                    return Err(AppError::NoActiveSession);
                }
            }
            PresenterIncoming::ResetDevice { roll_number } => {
                // Unbinding is only trusted from the presenter running the lecture.
                sessions.require_owner(ctx.connection_id).await?;
                let roll_number = roll_number.trim().to_owned();
                self.state.binding().reset(&roll_number).await?;
                emit_event(self.state.ws(), &DeviceReset { roll_number }).await;
            }
        }
        Ok(())
    }
}

impl WsHandler for PresenterWsHandler {
    type In = PresenterIncoming;

    async fn on_message(&self, ctx: &WsContext, msg: Self::In) {
        let command = msg.name();
        if let Err(err) = self.handle(ctx, msg).await {
            self.fail(ctx, command, err).await;
        }
    }

    async fn on_close(&self, ctx: &WsContext) {
        if self.state.sessions().close(ctx.connection_id).await {
            tracing::info!(connection_id = ctx.connection_id, "Presenter disconnected, session closed");
        }
    }
}
