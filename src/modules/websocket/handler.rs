/// WebSocket HTTP Handler
///
/// Module này xử lý HTTP upgrade request và quản lý bidirectional message flow:
/// - Inbound:  Client → WebSocket → classify Payload → Session Actor → broadcast
/// - Outbound: Server Actor → Session Actor → mpsc channel → WebSocket → Client
///
/// Room được derive từ request path ngay tại đây, trước khi session actor start.
use actix::Addr;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_ws::Message;
use tokio::sync::mpsc;

use super::events::{GetStats, Inbound, PongReceived, Shutdown};
use super::message::{OutboundFrame, Payload, StatsSnapshot};
use super::server::RelayServer;
use super::session::RelaySession;
use crate::api::{error, success};

/// Room mặc định khi path không có segment nào
pub const DEFAULT_ROOM: &str = "default";

/// Derive room identifier từ request path: strip leading separator,
/// phần còn lại giữ nguyên (không validate, không canonicalize).
/// Path rỗng → DEFAULT_ROOM.
pub fn room_from_path(path: &str) -> String {
    let room = path.strip_prefix('/').unwrap_or(path);
    if room.is_empty() {
        DEFAULT_ROOM.to_string()
    } else {
        room.to_string()
    }
}

/// HTTP handler để upgrade connection thành WebSocket
///
/// Endpoint: GET /{room}
///
/// Flow:
/// 1. HTTP handshake → WebSocket connection, room lấy từ path
/// 2. Tạo mpsc channel (session actor → client)
/// 3. Start RelaySession actor (tự register với server)
/// 4. Spawn async task xử lý bidirectional frames
pub async fn websocket_handler(
    req: HttpRequest,
    stream: web::Payload,
    server: web::Data<Addr<RelayServer>>,
) -> Result<HttpResponse, Error> {
    let room = room_from_path(req.path());
    tracing::debug!("WebSocket upgrade request từ {:?} (room '{}')", req.peer_addr(), room);

    // Thực hiện WebSocket handshake
    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, stream)?;

    // Tạo mpsc channel: session actor gửi frames → spawned task → WebSocket → client
    let (tx, mut rx) = mpsc::unbounded_channel::<OutboundFrame>();

    // Tạo session actor với room assignment và outbound channel
    let ws_actor = RelaySession::new(server.get_ref().clone(), room.clone(), tx);

    use actix::Actor;
    let addr = ws_actor.start();

    // Spawn async task xử lý bidirectional frame flow
    let room_for_log = room.clone();
    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                // === INBOUND: Client → Server ===
                msg = msg_stream.recv() => {
                    match msg {
                        // Classify payload một lần tại ingress rồi forward
                        Some(Ok(Message::Text(text))) => {
                            addr.do_send(Inbound { payload: Payload::Text(text.to_string()) });
                        }

                        Some(Ok(Message::Binary(bytes))) => {
                            addr.do_send(Inbound { payload: Payload::Binary(bytes.to_vec()) });
                        }

                        Some(Ok(Message::Ping(data))) => {
                            // Tự động trả lời pong cho client-initiated ping
                            if let Err(e) = ws_session.pong(&data).await {
                                tracing::error!("Không thể gửi pong: {}", e);
                                break;
                            }
                        }

                        Some(Ok(Message::Pong(_))) => {
                            // Client phản hồi liveness probe của sweep
                            addr.do_send(PongReceived);
                        }

                        Some(Ok(Message::Close(reason))) => {
                            tracing::info!("WebSocket close frame (room '{}'): {:?}", room, reason);
                            break;
                        }

                        Some(Ok(Message::Continuation(_) | Message::Nop)) => {}

                        Some(Err(e)) => {
                            // Protocol error chỉ đóng connection này, không crash service
                            tracing::error!("WebSocket protocol error (room '{}'): {}", room, e);
                            break;
                        }

                        // Stream kết thúc (client disconnect)
                        None => break,
                    }
                }

                // === OUTBOUND: Server → Client ===
                Some(frame) = rx.recv() => {
                    let result = match frame {
                        OutboundFrame::Text(text) => ws_session.text(text).await,
                        OutboundFrame::Binary(bytes) => ws_session.binary(bytes).await,
                        OutboundFrame::Ping => ws_session.ping(b"").await,
                        OutboundFrame::Close => break,
                    };

                    if result.is_err() {
                        tracing::error!("Không thể gửi frame tới WebSocket client (room '{}')", room);
                        break;
                    }
                }
            }
        }

        // Cleanup: stop session actor (kích hoạt Disconnect trên server) và đóng ws
        addr.do_send(Shutdown);
        let _ = ws_session.close(None).await;
        tracing::debug!("WebSocket frame loop kết thúc (room '{}')", room);
    });

    tracing::info!("WebSocket connection established (room '{}')", room_for_log);
    Ok(response)
}

/// Monitoring endpoint: snapshot của room registry.
/// Trả về raw JSON shape { totalRooms, totalClients, rooms } cho dashboard.
#[actix_web::get("/stats")]
pub async fn stats(
    server: web::Data<Addr<RelayServer>>,
) -> Result<web::Json<StatsSnapshot>, error::Error> {
    let snapshot = server.send(GetStats).await.map_err(error::SystemError::Mailbox)?;
    Ok(web::Json(snapshot))
}

/// Liveness probe cho load balancer / uptime checks
#[actix_web::get("/healthz")]
pub async fn health_check() -> success::Success<()> {
    success::Success::ok(None).message("Relay server is running")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_from_simple_path() {
        assert_eq!(room_from_path("/mathTutor42"), "mathTutor42");
    }

    #[test]
    fn test_root_path_maps_to_default_room() {
        // Path "/" không có segment → default room, không phải room tên rỗng
        assert_eq!(room_from_path("/"), DEFAULT_ROOM);
        assert_eq!(room_from_path(""), DEFAULT_ROOM);
    }

    #[test]
    fn test_multi_segment_path_kept_verbatim() {
        // Không canonicalize: phần path sau separator đầu giữ nguyên
        assert_eq!(room_from_path("/tutors/math/42"), "tutors/math/42");
    }

    #[test]
    fn test_special_characters_not_sanitized() {
        assert_eq!(room_from_path("/room%20one"), "room%20one");
        assert_eq!(room_from_path("/phòng-học"), "phòng-học");
    }
}
