//! WebSocket upgrade + message loop. The connection owns at most one
//! composition session: messages are handled serially and answered with a
//! single JSON reply each, so wizard mutations cannot interleave and a
//! finalize in flight cannot be doubled. Closing the socket discards the
//! draft.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{error, info, instrument};

use crate::domain::Role;
use crate::protocol::{to_out, to_wizard_out, ClientWsMessage, ServerWsMessage, WizardOut};
use crate::state::AppState;
use crate::util::trunc_for_log;
use crate::wizard::WizardSession;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "aula_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "aula_backend", "WebSocket connected");
  // One composition session per connection; dropped with the socket.
  let mut session: Option<WizardSession> = None;

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => handle_client_ws(incoming, &state, &mut session).await,
          Err(e) => {
            error!(target: "wizard", payload = %trunc_for_log(&txt, 256), error = %e, "Invalid WS message");
            ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }
          }
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "aula_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "aula_backend", had_open_session = session.is_some(), "WebSocket disconnected");
}

/// Full wizard snapshot: draft fields + objective list for the selected
/// course/subject + live difficulty of the current selection.
async fn snapshot(state: &AppState, s: &WizardSession) -> WizardOut {
  let available = if s.course_id.is_empty() || s.subject_id.is_empty() {
    Vec::new()
  } else {
    state.objectives_for(&s.course_id, &s.subject_id).await
  };
  let difficulty = state.difficulty_for(&s.questions).await;
  to_wizard_out(s, available, difficulty)
}

#[instrument(level = "info", skip(state, session))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  state: &AppState,
  session: &mut Option<WizardSession>,
) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::OpenWizard { user_id, role } => {
      let role = match role.parse::<Role>() {
        Ok(r) => r,
        Err(e) => return ServerWsMessage::Error { message: e },
      };
      match WizardSession::open(&user_id, role, crate::util::today(), state.policy.max_score) {
        Ok(s) => {
          info!(target: "wizard", %user_id, %role, "Wizard session opened");
          let out = snapshot(state, &s).await;
          *session = Some(s);
          ServerWsMessage::Wizard { wizard: out }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::Configure { title, course_id, subject_id, date, eval_type } => {
      match session.as_mut() {
        Some(s) => {
          s.configure(title, course_id, subject_id, date, eval_type);
          ServerWsMessage::Wizard { wizard: snapshot(state, s).await }
        }
        None => no_session(),
      }
    }

    ClientWsMessage::NextStep => match session.as_mut() {
      Some(s) => match s.next() {
        Ok(step) => {
          info!(target: "wizard", step, "Wizard advanced");
          ServerWsMessage::Wizard { wizard: snapshot(state, s).await }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      },
      None => no_session(),
    },

    ClientWsMessage::PrevStep => match session.as_mut() {
      Some(s) => {
        s.back();
        ServerWsMessage::Wizard { wizard: snapshot(state, s).await }
      }
      None => no_session(),
    },

    ClientWsMessage::ToggleObjective { text } => match session.as_mut() {
      Some(s) => {
        s.toggle_objective(&text);
        ServerWsMessage::Wizard { wizard: snapshot(state, s).await }
      }
      None => no_session(),
    },

    ClientWsMessage::ToggleQuestion { question_id } => match session.as_mut() {
      Some(s) => {
        s.toggle_question(&question_id);
        ServerWsMessage::Wizard { wizard: snapshot(state, s).await }
      }
      None => no_session(),
    },

    ClientWsMessage::Finalize => {
      let Some(s) = session.as_ref() else { return no_session() };
      let draft = match s.finalize(state.policy.min_questions) {
        Ok(d) => d,
        Err(e) => return ServerWsMessage::Error { message: e.to_string() },
      };
      let (actor_id, role) = (s.actor_id.clone(), s.role);
      match state.create_evaluation(&actor_id, role, draft).await {
        Ok(ev) => {
          // Only now is the session consumed; a failed creation keeps the
          // draft for retry.
          info!(target: "wizard", evaluation = %ev.id, "Wizard finalized");
          *session = None;
          ServerWsMessage::Created { evaluation: to_out(&ev) }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::CancelWizard => {
      *session = None;
      info!(target: "wizard", "Wizard session cancelled");
      ServerWsMessage::Closed
    }
  }
}

fn no_session() -> ServerWsMessage {
  ServerWsMessage::Error { message: "no open wizard session".into() }
}
