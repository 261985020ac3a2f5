//! Integration tests for the game relay server.
//!
//! Each test starts the router in-process on an ephemeral port and drives it
//! with real WebSocket and HTTP clients.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use taikyoku_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{CorsOrigin, Server},
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        HandleSessionEventUseCase,
    },
};
use taikyoku_shared::time::FixedClock;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message, client::IntoClientRequest, http::HeaderValue},
};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE: Duration = Duration::from_millis(200);

/// Start a server on 127.0.0.1 with an ephemeral port
async fn start_server(cors_origin: CorsOrigin) -> SocketAddr {
    let repository = Arc::new(InMemoryRoomRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let server = Server::new(
        Arc::new(ConnectSessionUseCase::new(message_pusher.clone())),
        Arc::new(HandleSessionEventUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            Arc::new(FixedClock::new(1672498800123)),
        )),
        Arc::new(DisconnectSessionUseCase::new(
            repository.clone(),
            message_pusher,
        )),
        Arc::new(GetRoomsUseCase::new(repository.clone())),
        Arc::new(GetRoomDetailUseCase::new(repository)),
    );
    let app = server.router(cors_origin);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> WsClient {
    let (ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    ws
}

async fn send_event(ws: &mut WsClient, event: &str, data: Value) {
    let envelope = json!({"event": event, "data": data});
    ws.send(Message::text(envelope.to_string())).await.unwrap();
}

/// Receive the next text frame as JSON
async fn recv_json(ws: &mut WsClient) -> Value {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Assert that nothing arrives within a short window
async fn assert_silent(ws: &mut WsClient) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(SILENCE, ws.next()).await {
        panic!("unexpected message: {}", text);
    }
}

/// Poll `GET /api/rooms/{code}` until it returns the expected status
async fn wait_for_room_status(addr: SocketAddr, code: &str, expected: reqwest::StatusCode) {
    let url = format!("http://{}/api/rooms/{}", addr, code);
    for _ in 0..50 {
        let response = reqwest::get(&url).await.unwrap();
        if response.status() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("room '{}' never reached status {}", code, expected);
}

async fn create_game(addr: SocketAddr, ws: &mut WsClient, host: &str) {
    send_event(ws, "createGame", json!({"playerId": host})).await;
    wait_for_room_status(addr, host, reqwest::StatusCode::OK).await;
}

async fn join_game(ws: &mut WsClient, code: &str, guest: &str) -> Value {
    send_event(
        ws,
        "joinGame",
        json!({"invitationCode": code, "playerId": guest}),
    )
    .await;
    recv_json(ws).await
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが {"status":"ok"} を返す
    // given (前提条件):
    let addr = start_server(CorsOrigin::Any).await;

    // when (操作):
    let response = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_host_guest_scenario() {
    // テスト項目: 作成 → 参加 → 中継 → 退出 → 削除 の一連の流れ
    // given (前提条件):
    let addr = start_server(CorsOrigin::Any).await;
    let mut host = connect(addr).await;
    let mut guest = connect(addr).await;
    create_game(addr, &mut host, "H1").await;

    // when (操作): ゲストが参加する
    let join_result = join_game(&mut guest, "H1", "G1").await;

    // then (期待する結果):
    assert_eq!(
        join_result,
        json!({"event": "notifyJoinResult", "data": {"result": true}})
    );
    assert_eq!(
        recv_json(&mut host).await,
        json!({
            "event": "notifyRoomState",
            "data": {"action": "ENTER", "payload": true, "from": "G1"}
        })
    );

    // when (操作): ホストがアクションを送る
    let action = json!({"move": "7g7f", "nested": {"ply": 1, "list": [1, 2, 3]}});
    send_event(&mut host, "broadcastAction", action.clone()).await;

    // then (期待する結果): ゲストに加工されずに届き、ホスト自身には届かない
    assert_eq!(
        recv_json(&mut guest).await,
        json!({"event": "notifyRoomState", "data": action})
    );
    assert_silent(&mut host).await;

    // when (操作): ゲストが退出する
    send_event(
        &mut guest,
        "leaveGame",
        json!({"playerId": "G1", "invitationCode": "H1"}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(
        recv_json(&mut host).await,
        json!({
            "event": "notifyRoomState",
            "data": {"action": "ENTER", "payload": false, "from": "G1"}
        })
    );
    let room: Value = reqwest::get(format!("http://{}/api/rooms/H1", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(room["guest"], Value::Null);

    // when (操作): ホストがルームを削除する
    send_event(&mut host, "removeGame", json!({"playerId": "H1"})).await;

    // then (期待する結果):
    wait_for_room_status(addr, "H1", reqwest::StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn test_join_rejections() {
    // テスト項目: 存在しないルーム・満室のルームへの参加は理由付きで拒否される
    // given (前提条件):
    let addr = start_server(CorsOrigin::Any).await;
    let mut host = connect(addr).await;
    let mut first_guest = connect(addr).await;
    let mut second_guest = connect(addr).await;
    create_game(addr, &mut host, "H1").await;
    let first = join_game(&mut first_guest, "H1", "G1").await;
    assert_eq!(first["data"]["result"], json!(true));

    // when (操作):
    let full = join_game(&mut second_guest, "H1", "G2").await;
    let not_found = join_game(&mut second_guest, "NOPE", "G2").await;

    // then (期待する結果):
    assert_eq!(
        full,
        json!({"event": "notifyJoinResult", "data": {"result": false, "message": "room full"}})
    );
    assert_eq!(
        not_found,
        json!({"event": "notifyJoinResult", "data": {"result": false, "message": "room not found"}})
    );
}

#[tokio::test]
async fn test_relay_is_scoped_to_room() {
    // テスト項目: 中継は同じルームのメンバーにのみ届く
    // given (前提条件):
    let addr = start_server(CorsOrigin::Any).await;
    let mut host_a = connect(addr).await;
    let mut guest_a = connect(addr).await;
    let mut host_b = connect(addr).await;
    let mut guest_b = connect(addr).await;
    create_game(addr, &mut host_a, "A").await;
    create_game(addr, &mut host_b, "B").await;
    join_game(&mut guest_a, "A", "GA").await;
    join_game(&mut guest_b, "B", "GB").await;
    recv_json(&mut host_a).await;
    recv_json(&mut host_b).await;

    // when (操作):
    send_event(&mut guest_a, "broadcastAction", json!({"resign": true})).await;

    // then (期待する結果):
    assert_eq!(
        recv_json(&mut host_a).await,
        json!({"event": "notifyRoomState", "data": {"resign": true}})
    );
    assert_silent(&mut host_b).await;
    assert_silent(&mut guest_b).await;
}

#[tokio::test]
async fn test_guest_disconnect_frees_seat() {
    // テスト項目: ゲストの切断はホストに通知され、席が空く
    // given (前提条件):
    let addr = start_server(CorsOrigin::Any).await;
    let mut host = connect(addr).await;
    let mut guest = connect(addr).await;
    create_game(addr, &mut host, "H1").await;
    join_game(&mut guest, "H1", "G1").await;
    recv_json(&mut host).await;

    // when (操作):
    guest.close(None).await.unwrap();

    // then (期待する結果):
    assert_eq!(
        recv_json(&mut host).await,
        json!({
            "event": "notifyRoomState",
            "data": {"action": "ENTER", "payload": false, "from": "G1"}
        })
    );
    let mut next_guest = connect(addr).await;
    let result = join_game(&mut next_guest, "H1", "G2").await;
    assert_eq!(result["data"]["result"], json!(true));
}

#[tokio::test]
async fn test_host_disconnect_closes_room() {
    // テスト項目: ホストの切断でルームが削除され、ゲストに通知される
    // given (前提条件):
    let addr = start_server(CorsOrigin::Any).await;
    let mut host = connect(addr).await;
    let mut guest = connect(addr).await;
    create_game(addr, &mut host, "H1").await;
    join_game(&mut guest, "H1", "G1").await;

    // when (操作):
    drop(host);

    // then (期待する結果):
    assert_eq!(
        recv_json(&mut guest).await,
        json!({
            "event": "notifyRoomState",
            "data": {"action": "ENTER", "payload": false, "from": "H1"}
        })
    );
    wait_for_room_status(addr, "H1", reqwest::StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn test_malformed_frames_keep_connection_open() {
    // テスト項目: 不正なフレームは無視され、接続は維持される
    // given (前提条件):
    let addr = start_server(CorsOrigin::Any).await;
    let mut host = connect(addr).await;

    // when (操作):
    host.send(Message::text("not json")).await.unwrap();
    host.send(Message::text(r#"{"event":"unknownEvent","data":{}}"#))
        .await
        .unwrap();
    send_event(&mut host, "createGame", json!({})).await;
    send_event(&mut host, "createGame", json!({"playerId": {"nested": true}})).await;
    send_event(&mut host, "broadcastAction", json!({"x": 1})).await;

    // then (期待する結果): 後続のイベントは通常通り処理される
    create_game(addr, &mut host, "H1").await;
    let rooms: Value = reqwest::get(format!("http://{}/api/rooms", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        rooms,
        json!([{
            "code": "H1",
            "host": "H1",
            "guest": null,
            "createdAt": "2023-01-01T00:00:00.123+09:00"
        }])
    );
}

#[tokio::test]
async fn test_broadcast_without_data_relays_null() {
    // テスト項目: data のない broadcastAction も相手に中継される
    // given (前提条件):
    let addr = start_server(CorsOrigin::Any).await;
    let mut host = connect(addr).await;
    let mut guest = connect(addr).await;
    create_game(addr, &mut host, "H1").await;
    join_game(&mut guest, "H1", "G1").await;
    recv_json(&mut host).await;

    // when (操作):
    host.send(Message::text(r#"{"event":"broadcastAction"}"#))
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(
        recv_json(&mut guest).await,
        json!({"event": "notifyRoomState", "data": null})
    );
}

#[tokio::test]
async fn test_stranded_guest_joins_another_room() {
    // テスト項目: ルームを削除されたゲストが、同じ接続のまま別のルームに参加できる
    // given (前提条件):
    let addr = start_server(CorsOrigin::Any).await;
    let mut host1 = connect(addr).await;
    let mut host2 = connect(addr).await;
    let mut guest = connect(addr).await;
    create_game(addr, &mut host1, "H1").await;
    create_game(addr, &mut host2, "H2").await;
    join_game(&mut guest, "H1", "G1").await;
    send_event(&mut host1, "removeGame", json!({"playerId": "H1"})).await;
    recv_json(&mut guest).await;

    // when (操作):
    let result = join_game(&mut guest, "H2", "G1").await;

    // then (期待する結果):
    assert_eq!(
        result,
        json!({"event": "notifyJoinResult", "data": {"result": true}})
    );
    assert_eq!(
        recv_json(&mut host2).await,
        json!({
            "event": "notifyRoomState",
            "data": {"action": "ENTER", "payload": true, "from": "G1"}
        })
    );
}

#[tokio::test]
async fn test_rejects_disallowed_origin() {
    // テスト項目: 許可されていない Origin からの WebSocket 接続は 403 で拒否される
    // given (前提条件):
    let addr = start_server("https://game.example".parse().unwrap()).await;
    let url = format!("ws://{}/ws", addr);

    // when (操作):
    let mut request = url.as_str().into_client_request().unwrap();
    request
        .headers_mut()
        .insert("Origin", HeaderValue::from_static("https://evil.example"));
    let rejected = connect_async(request).await;
    let mut allowed = url.as_str().into_client_request().unwrap();
    allowed
        .headers_mut()
        .insert("Origin", HeaderValue::from_static("https://game.example"));
    let accepted = connect_async(allowed).await;

    // then (期待する結果):
    match rejected {
        Err(tungstenite::Error::Http(response)) => {
            assert_eq!(response.status().as_u16(), 403);
        }
        other => panic!("expected HTTP 403, got {:?}", other.map(|_| ())),
    }
    assert!(accepted.is_ok());
}
