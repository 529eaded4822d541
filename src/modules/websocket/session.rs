/// Relay Session Actor
///
/// Mỗi WebSocket connection có một Session actor riêng.
/// Session actor giữ room assignment (immutable sau khi connect) và gửi
/// frames tới client thông qua mpsc channel được bridge từ handler.rs.
use actix::prelude::*;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::*;
use super::message::{OutboundFrame, Payload};
use super::server::RelayServer;

/// Relay session cho một client
pub struct RelaySession {
    /// Unique session ID
    pub id: Uuid,

    /// Room được derive từ request path lúc connect
    pub room: String,

    /// Address của relay server actor
    pub server: Addr<RelayServer>,

    /// Channel gửi frames tới client (bridge → handler.rs → WebSocket)
    pub tx: mpsc::UnboundedSender<OutboundFrame>,
}

impl RelaySession {
    /// Tạo session mới với room và outbound channel
    pub fn new(
        server: Addr<RelayServer>,
        room: String,
        tx: mpsc::UnboundedSender<OutboundFrame>,
    ) -> Self {
        Self { id: Uuid::now_v7(), room, server, tx }
    }

    /// Đẩy frame xuống client qua channel.
    /// Send lỗi (channel closed) chỉ ảnh hưởng connection này — log và bỏ qua,
    /// các recipients khác của cùng broadcast không bị ảnh hưởng.
    fn forward_frame(&self, frame: OutboundFrame) {
        if let Err(e) = self.tx.send(frame) {
            tracing::error!("Không thể gửi frame tới client (session {}): {}", self.id, e);
        }
    }
}

impl Actor for RelaySession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::debug!("Relay session started: {} (room '{}')", self.id, self.room);

        // Notify server về connection mới cùng room assignment
        self.server.do_send(Connect {
            id: self.id,
            room: self.room.clone(),
            addr: ctx.address(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::debug!("Relay session stopped: {}", self.id);

        // Notify server về disconnect
        self.server.do_send(Disconnect { id: self.id });
    }
}

/// Handler: Nhận payload đã normalize từ server actor → gửi tới client
impl Handler<Payload> for RelaySession {
    type Result = ();

    fn handle(&mut self, msg: Payload, _ctx: &mut Context<Self>) {
        match msg {
            Payload::Text(text) => self.forward_frame(OutboundFrame::Text(text)),
            Payload::Binary(bytes) => self.forward_frame(OutboundFrame::Binary(bytes)),
            // Structured payload chưa qua normalize (direct send) - serialize tại đây
            Payload::Json(value) => match serde_json::to_string(&value) {
                Ok(text) => self.forward_frame(OutboundFrame::Text(text)),
                Err(e) => {
                    tracing::error!(
                        "Không thể serialize payload (session {}): {}",
                        self.id,
                        e
                    );
                }
            },
        }
    }
}

/// Handler: Payload từ client → relay tới các members khác trong room.
/// Sender không bao giờ nhận lại message của chính mình.
impl Handler<Inbound> for RelaySession {
    type Result = ();

    fn handle(&mut self, msg: Inbound, _ctx: &mut Context<Self>) {
        self.server.do_send(BroadcastToRoom {
            room: self.room.clone(),
            payload: msg.payload,
            skip_session_id: Some(self.id),
        });
    }
}

/// Handler: Client pong → báo server để giữ connection alive
impl Handler<PongReceived> for RelaySession {
    type Result = ();

    fn handle(&mut self, _: PongReceived, _ctx: &mut Context<Self>) {
        self.server.do_send(HeartbeatAck { id: self.id });
    }
}

/// Handler: Server yêu cầu gửi liveness probe tới client
impl Handler<Probe> for RelaySession {
    type Result = ();

    fn handle(&mut self, _: Probe, _ctx: &mut Context<Self>) {
        self.forward_frame(OutboundFrame::Ping);
    }
}

/// Handler: Forced termination (heartbeat timeout) → đóng connection và stop.
/// Stop actor kích hoạt disconnect path bình thường trên server.
impl Handler<Terminate> for RelaySession {
    type Result = ();

    fn handle(&mut self, _: Terminate, ctx: &mut Context<Self>) {
        self.forward_frame(OutboundFrame::Close);
        ctx.stop();
    }
}

/// Handler: Transport loop kết thúc (client disconnect) → stop actor
impl Handler<Shutdown> for RelaySession {
    type Result = ();

    fn handle(&mut self, _: Shutdown, ctx: &mut Context<Self>) {
        ctx.stop();
    }
}
