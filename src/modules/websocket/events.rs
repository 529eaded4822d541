/// WebSocket Actor Events
///
/// Module này định nghĩa các messages được trao đổi giữa các actors
/// trong relay system (giữa Session actors và Server actor).
use actix::prelude::*;
use uuid::Uuid;

use super::message::{Payload, StatsSnapshot};
use super::session::RelaySession;

/// Event: Client connected đến relay server
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    /// Unique session ID
    pub id: Uuid,
    /// Room đã được derive từ request path
    pub room: String,
    /// Address của session actor để có thể gửi payloads
    pub addr: Addr<RelaySession>,
}

/// Event: Client disconnected khỏi relay server
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    /// Session ID cần disconnect
    pub id: Uuid,
}

/// Event: Broadcast payload tới tất cả clients trong room
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct BroadcastToRoom {
    /// Room cần broadcast
    pub room: String,
    /// Payload cần relay
    pub payload: Payload,
    /// Optional: Không gửi đến session này (sender không nhận lại)
    pub skip_session_id: Option<Uuid>,
}

/// Event: Client đã phản hồi liveness probe (pong)
#[derive(Message)]
#[rtype(result = "()")]
pub struct HeartbeatAck {
    /// Session ID vừa phản hồi
    pub id: Uuid,
}

/// Event: Lấy snapshot của registry cho monitoring
#[derive(Message)]
#[rtype(result = "StatsSnapshot")]
pub struct GetStats;

/// Event: Payload từ client vào session actor (transport → session)
#[derive(Message)]
#[rtype(result = "()")]
pub struct Inbound {
    /// Payload đã được phân loại tại ingress
    pub payload: Payload,
}

/// Event: Transport nhận được pong frame từ client
#[derive(Message)]
#[rtype(result = "()")]
pub struct PongReceived;

/// Event: Server yêu cầu session gửi liveness probe tới client
#[derive(Message)]
#[rtype(result = "()")]
pub struct Probe;

/// Event: Server forcibly terminate connection (heartbeat timeout)
#[derive(Message)]
#[rtype(result = "()")]
pub struct Terminate;

/// Event: Transport loop đã kết thúc, session actor phải stop
#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;
