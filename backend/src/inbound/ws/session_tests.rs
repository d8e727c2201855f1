//! Form session handler tests.

use super::*;
use crate::domain::MemberDraft;
use crate::domain::ports::FixtureProvisionMember;
use crate::inbound::ws;
use crate::inbound::ws::state::WsState;
use actix_web::{App, HttpServer, dev::Server, dev::ServerHandle, http::header};
use async_trait::async_trait;
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message as WsMessage};
use futures_util::{SinkExt, StreamExt};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, oneshot};

/// Workflow double that counts calls and can park on a gate until the test
/// releases it.
struct StubWorkflow {
    calls: Arc<AtomicUsize>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    outcome: Result<(), ProvisionError>,
}

impl StubWorkflow {
    fn completing_with(outcome: Result<(), ProvisionError>) -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let workflow = Arc::new(Self {
            calls: calls.clone(),
            gate: Mutex::new(None),
            outcome,
        });
        (workflow, calls)
    }

    fn gated(outcome: Result<(), ProvisionError>) -> (Arc<Self>, oneshot::Sender<()>) {
        let (release, gate) = oneshot::channel();
        let workflow = Arc::new(Self {
            calls: Arc::new(AtomicUsize::new(0)),
            gate: Mutex::new(Some(gate)),
            outcome,
        });
        (workflow, release)
    }
}

#[async_trait]
impl ProvisionMember for StubWorkflow {
    async fn provision(&self, _draft: &MemberDraft) -> Result<(), ProvisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.gate.lock().await.take() {
            let _ = gate.await;
        }
        self.outcome.clone()
    }
}

fn start_ws_server(workflow: Arc<dyn ProvisionMember>) -> (String, Server) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let ws_state = WsState::new(workflow);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(actix_web::web::Data::new(ws_state.clone()))
            .service(ws::ws_entry)
    })
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    (format!("http://{addr}"), server)
}

async fn ws_client(
    workflow: Arc<dyn ProvisionMember>,
) -> (actix_codec::Framed<BoxedSocket, Codec>, ServerHandle) {
    let (url, server) = start_ws_server(workflow);
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let (_resp, socket) = awc::Client::default()
        .ws(format!("{url}/ws/member-form"))
        .set_header(header::ORIGIN, "http://localhost:3000")
        .connect()
        .await
        .expect("websocket connect");

    (socket, handle)
}

fn edit_payload(field: &str, value: &str) -> String {
    json!({ "type": "edit", "field": field, "value": value }).to_string()
}

fn submit_payload() -> String {
    json!({ "type": "submit" }).to_string()
}

async fn next_json_frame(socket: &mut actix_codec::Framed<BoxedSocket, Codec>) -> Value {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json"),
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

async fn fill_required_fields(socket: &mut actix_codec::Framed<BoxedSocket, Codec>) {
    for (field, value) in [
        ("email", "a@b.com"),
        ("password", "p"),
        ("displayName", "Alice"),
    ] {
        socket
            .send(WsMessage::Text(edit_payload(field, value).into()))
            .await
            .expect("send edit");
        let frame = next_json_frame(socket).await;
        assert_eq!(frame["status"], "idle");
    }
}

#[actix_rt::test]
async fn submit_reports_submitting_then_succeeded() {
    let (mut socket, _server) = ws_client(Arc::new(FixtureProvisionMember)).await;
    fill_required_fields(&mut socket).await;

    socket
        .send(WsMessage::Text(submit_payload().into()))
        .await
        .expect("send submit");

    let busy = next_json_frame(&mut socket).await;
    assert_eq!(busy["status"], "submitting");

    let done = next_json_frame(&mut socket).await;
    assert_eq!(done["status"], "succeeded");
    assert_eq!(done["message"], "Member account created successfully.");
}

#[actix_rt::test]
async fn empty_draft_submit_is_rejected_before_the_workflow() {
    let (workflow, calls) = StubWorkflow::completing_with(Ok(()));
    let (mut socket, _server) = ws_client(workflow).await;

    socket
        .send(WsMessage::Text(submit_payload().into()))
        .await
        .expect("send submit");

    let frame = next_json_frame(&mut socket).await;
    assert_eq!(frame["type"], "invalid");
    assert_eq!(frame["field"], "email");
    assert_eq!(frame["message"], "email must not be empty");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[actix_rt::test]
async fn partial_draft_submit_names_the_missing_field() {
    let (workflow, calls) = StubWorkflow::completing_with(Ok(()));
    let (mut socket, _server) = ws_client(workflow).await;

    socket
        .send(WsMessage::Text(edit_payload("email", "a@b.com").into()))
        .await
        .expect("send edit");
    assert_eq!(next_json_frame(&mut socket).await["status"], "idle");

    socket
        .send(WsMessage::Text(submit_payload().into()))
        .await
        .expect("send submit");

    let frame = next_json_frame(&mut socket).await;
    assert_eq!(frame["type"], "invalid");
    assert_eq!(frame["field"], "password");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case(
    ProvisionError::identity_creation("Email already in use"),
    "identity",
    "Identity error: Email already in use"
)]
#[case(
    ProvisionError::profile_insert("Simulated database error"),
    "profile",
    "Profile error: Simulated database error"
)]
#[actix_rt::test]
async fn failures_are_reported_with_their_phase(
    #[case] outcome: ProvisionError,
    #[case] phase: &str,
    #[case] message: &str,
) {
    let (workflow, _calls) = StubWorkflow::completing_with(Err(outcome));
    let (mut socket, _server) = ws_client(workflow).await;
    fill_required_fields(&mut socket).await;

    socket
        .send(WsMessage::Text(submit_payload().into()))
        .await
        .expect("send submit");
    assert_eq!(next_json_frame(&mut socket).await["status"], "submitting");

    let failed = next_json_frame(&mut socket).await;
    assert_eq!(failed["status"], "failed");
    assert_eq!(failed["phase"], phase);
    assert_eq!(failed["message"], message);
}

#[actix_rt::test]
async fn edits_are_answered_while_provisioning_is_in_flight() {
    let (workflow, release) = StubWorkflow::gated(Ok(()));
    let (mut socket, _server) = ws_client(workflow).await;
    fill_required_fields(&mut socket).await;

    socket
        .send(WsMessage::Text(submit_payload().into()))
        .await
        .expect("send submit");
    assert_eq!(next_json_frame(&mut socket).await["status"], "submitting");

    // The workflow is parked on the gate; the loop must still answer frames.
    socket
        .send(WsMessage::Text(edit_payload("bio", "Climber").into()))
        .await
        .expect("send edit");
    let during = next_json_frame(&mut socket).await;
    assert_eq!(during["status"], "submitting");

    release.send(()).expect("release workflow");
    let done = next_json_frame(&mut socket).await;
    assert_eq!(done["status"], "succeeded");
}

#[actix_rt::test]
async fn duplicate_submit_reports_the_in_flight_status() {
    let (workflow, release) = StubWorkflow::gated(Ok(()));
    let calls = workflow.calls.clone();
    let (mut socket, _server) = ws_client(workflow).await;
    fill_required_fields(&mut socket).await;

    socket
        .send(WsMessage::Text(submit_payload().into()))
        .await
        .expect("send submit");
    assert_eq!(next_json_frame(&mut socket).await["status"], "submitting");

    socket
        .send(WsMessage::Text(submit_payload().into()))
        .await
        .expect("send duplicate submit");
    assert_eq!(next_json_frame(&mut socket).await["status"], "submitting");

    release.send(()).expect("release workflow");
    assert_eq!(next_json_frame(&mut socket).await["status"], "succeeded");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[actix_rt::test]
async fn closes_on_malformed_json() {
    let (mut socket, _server) = ws_client(Arc::new(FixtureProvisionMember)).await;

    socket
        .send(WsMessage::Text("not-json".into()))
        .await
        .expect("send text");

    let reason = loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Ping(_) | Frame::Pong(_) => continue,
            Frame::Close(reason) => break reason,
            other => panic!("expected close frame, got {other:?}"),
        }
    };
    assert_eq!(reason.expect("reason").code, CloseCode::Policy);
}

#[actix_rt::test]
async fn closes_after_timeout_without_client_messages() {
    let (mut socket, _server) = ws_client(Arc::new(FixtureProvisionMember)).await;
    tokio::time::sleep(CLIENT_TIMEOUT + HEARTBEAT_INTERVAL * 3).await;

    let observed_close = tokio::time::timeout(Duration::from_secs(2), async {
        let mut observed = None;
        while let Some(frame) = socket.next().await {
            let frame = frame.expect("frame");
            match frame {
                Frame::Ping(_) | Frame::Pong(_) => continue,
                Frame::Close(reason) => {
                    observed = reason;
                    break;
                }
                other => panic!("unexpected frame before close: {other:?}"),
            }
        }
        observed
    })
    .await
    .expect("close frame missing within timeout")
    .expect("close frame missing after timeout");

    assert_eq!(observed_close.code, CloseCode::Normal);
    assert_eq!(
        observed_close.description.as_deref(),
        Some("heartbeat timeout")
    );
}
