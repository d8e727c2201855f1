//! Per-connection member form session.
//!
//! Each connection owns one [`MemberForm`]; client messages are processed
//! strictly in arrival order on a single task. An in-flight submission runs
//! on a spawned task and is joined through the session's select loop, so
//! heartbeats and edit frames keep flowing while the workflow awaits its
//! collaborators. Framing stays at this edge while form behaviour lives in
//! the domain. The public WebSocket contract pings every 5s and considers a
//! connection idle after 10s without client traffic; tests shorten both
//! intervals to speed up feedback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::rt;
use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::warn;

use crate::domain::ports::ProvisionMember;
use crate::domain::{MemberForm, ProvisionError};
use crate::inbound::ws::messages::{FormClientMessage, FormServerMessage};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_form_session(
    provisioning: Arc<dyn ProvisionMember>,
    session: Session,
    stream: MessageStream,
) {
    FormSession::new(provisioning).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

/// One wake-up of the session loop.
enum SessionEvent {
    Heartbeat,
    Provisioned(Result<(), ProvisionError>),
    Frame(Result<Message, ProtocolError>),
}

type Flight = Option<JoinHandle<Result<(), ProvisionError>>>;

struct FormSession {
    provisioning: Arc<dyn ProvisionMember>,
    form: MemberForm,
}

impl FormSession {
    fn new(provisioning: Arc<dyn ProvisionMember>) -> Self {
        Self {
            provisioning,
            form: MemberForm::new(),
        }
    }

    async fn run(&mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);
        let mut in_flight: Flight = None;

        loop {
            let event = tokio::select! {
                _ = heartbeat.tick() => SessionEvent::Heartbeat,
                outcome = next_flight_outcome(&mut in_flight) => {
                    SessionEvent::Provisioned(outcome)
                }
                message = stream.recv() => {
                    let Some(message) = message else {
                        break;
                    };
                    SessionEvent::Frame(message)
                }
            };

            let result = match event {
                SessionEvent::Heartbeat => heartbeat_tick(&mut session, last_heartbeat).await,
                SessionEvent::Provisioned(outcome) => {
                    self.form.complete_submission(outcome);
                    self.send_status(&mut session).await
                }
                SessionEvent::Frame(frame) => {
                    last_heartbeat = Instant::now();
                    match frame {
                        Ok(message) => {
                            self.handle_message(&mut session, &mut in_flight, message).await
                        }
                        Err(error) => Err(SessionError::Protocol(error)),
                    }
                }
            };

            if let Err(error) = result {
                // A workflow still in flight keeps running detached; the
                // two external writes are never cancelled midway.
                shutdown(session, error).await;
                return;
            }
        }
    }

    async fn handle_message(
        &mut self,
        session: &mut Session,
        in_flight: &mut Flight,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => session.pong(&payload).await.map_err(SessionError::Network),
            Message::Text(text) => {
                self.handle_text_message(session, in_flight, text.as_ref())
                    .await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &mut self,
        session: &mut Session,
        in_flight: &mut Flight,
        text: &str,
    ) -> Result<(), SessionError> {
        let message = match serde_json::from_str::<FormClientMessage>(text) {
            Ok(message) => message,
            Err(error) => {
                warn!(error = %error, "Rejected malformed form payload");
                return Err(SessionError::InvalidPayload);
            }
        };

        match message {
            FormClientMessage::Edit { field, value } => {
                self.form.update_field(field, value);
                self.send_status(session).await
            }
            FormClientMessage::Submit => self.handle_submit(session, in_flight).await,
        }
    }

    async fn handle_submit(
        &mut self,
        session: &mut Session,
        in_flight: &mut Flight,
    ) -> Result<(), SessionError> {
        if let Some(field) = self.form.draft().missing_required() {
            let frame = FormServerMessage::invalid(field, format!("{field} must not be empty"));
            return self.send_frame(session, &frame).await;
        }

        let Some(snapshot) = self.form.try_begin_submission() else {
            // Duplicate submit; report the in-flight status without starting
            // a second workflow.
            return self.send_status(session).await;
        };

        // Busy indication before the workflow starts.
        self.send_status(session).await?;
        let provisioning = Arc::clone(&self.provisioning);
        *in_flight = Some(rt::spawn(
            async move { provisioning.provision(&snapshot).await },
        ));
        Ok(())
    }

    async fn send_status(&self, session: &mut Session) -> Result<(), SessionError> {
        let frame = FormServerMessage::from_form(&self.form);
        self.send_frame(session, &frame).await
    }

    async fn send_frame(
        &self,
        session: &mut Session,
        frame: &FormServerMessage,
    ) -> Result<(), SessionError> {
        match serde_json::to_string(frame) {
            Ok(body) => session.text(body).await.map_err(SessionError::Network),
            Err(error) => {
                warn!(error = %error, "Failed to serialise form frame");
                Ok(())
            }
        }
    }
}

/// Join the in-flight submission, or park until one exists.
///
/// Leaves the handle in place when another branch wins the select; the
/// spawned workflow is unaffected by the dropped join future.
async fn next_flight_outcome(flight: &mut Flight) -> Result<(), ProvisionError> {
    match flight {
        Some(handle) => {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(error) => Err(ProvisionError::unexpected(error.to_string())),
            };
            *flight = None;
            outcome
        }
        None => std::future::pending().await,
    }
}

async fn heartbeat_tick(session: &mut Session, last_heartbeat: Instant) -> Result<(), SessionError> {
    if Instant::now().duration_since(last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionError::HeartbeatTimeout);
    }
    session.ping(b"").await.map_err(SessionError::Network)
}

async fn shutdown(session: Session, error: SessionError) {
    let close_reason = match error {
        SessionError::HeartbeatTimeout => {
            warn!("Form session heartbeat timeout; closing connection");
            Some(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            }))
        }
        SessionError::Protocol(error) => {
            warn!(error = %error, "Form session protocol error");
            Some(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            }))
        }
        SessionError::InvalidPayload => Some(Some(CloseReason {
            code: CloseCode::Policy,
            description: Some("invalid payload".to_owned()),
        })),
        SessionError::ClientClosed(reason) => Some(reason),
        SessionError::Network(_) => None,
    };

    if let Some(reason) = close_reason {
        if let Err(error) = session.close(reason).await {
            warn!(error = %error, "Failed to close form session");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
