/// Relay Server Actor
///
/// Server actor chịu trách nhiệm quản lý tất cả WebSocket connections,
/// room registry và heartbeat sweep. Nó relay payloads giữa các clients
/// trong cùng một room và reclaim resources cho các dead connections.
///
/// Registry được own độc quyền bởi actor này — mọi mutation đi qua
/// mailbox nên không bao giờ bị observe ở trạng thái partially-updated.
use actix::prelude::*;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use uuid::Uuid;

use super::events::*;
use super::message::{Payload, RoomStats, StatsSnapshot};
use super::session::RelaySession;

/// Heartbeat interval mặc định (reference behavior: 30s)
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Entry của một connection trong session table
struct SessionEntry {
    /// Address của session actor
    addr: Addr<RelaySession>,

    /// Room mà session thuộc về (immutable sau khi connect)
    room: String,

    /// Liveness flag: set false mỗi sweep, set true khi client pong.
    /// Session không phản hồi trong một interval sẽ bị terminate.
    alive: bool,
}

/// Relay server quản lý tất cả client sessions và rooms
pub struct RelayServer {
    /// Map: session_id -> session entry
    /// Lưu tất cả active WebSocket connections (transport-level count)
    sessions: HashMap<Uuid, SessionEntry>,

    /// Map: room -> set of session_ids
    /// Invariant: room tồn tại trong map khi và chỉ khi còn ít nhất 1 member
    rooms: HashMap<String, HashSet<Uuid>>,

    /// Khoảng cách giữa hai lần heartbeat sweep
    heartbeat_interval: Duration,

    /// Handle của sweep task, cancel khi actor stop
    heartbeat_handle: Option<SpawnHandle>,
}

impl RelayServer {
    /// Tạo relay server mới với state rỗng và heartbeat interval cho trước
    pub fn new(heartbeat_interval: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            rooms: HashMap::new(),
            heartbeat_interval,
            heartbeat_handle: None,
        }
    }

    /// Snapshot của registry cho monitoring
    fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_rooms: self.rooms.len(),
            total_clients: self.sessions.len(),
            rooms: self
                .rooms
                .iter()
                .map(|(room, members)| (room.clone(), RoomStats { client_count: members.len() }))
                .collect(),
        }
    }

    /// Heartbeat sweep: chạy mỗi interval trên mọi connection của mọi room.
    /// Session chưa ack probe của tick trước bị forcibly terminate — việc
    /// terminate đi qua disconnect path bình thường nên room cleanup giữ nguyên.
    fn sweep(&mut self) {
        let mut dead: Vec<Uuid> = Vec::new();

        for (id, entry) in self.sessions.iter_mut() {
            if entry.alive {
                entry.alive = false;
                entry.addr.do_send(Probe);
            } else {
                dead.push(*id);
            }
        }

        for id in dead {
            if let Some(entry) = self.sessions.get(&id) {
                tracing::warn!(
                    "Client {} missed heartbeat, terminating (room '{}')",
                    id,
                    entry.room
                );
                entry.addr.do_send(Terminate);
            }
        }
    }
}

impl Actor for RelayServer {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!("Relay server started (heartbeat every {:?})", self.heartbeat_interval);

        let handle = ctx.run_interval(self.heartbeat_interval, |act, _ctx| act.sweep());
        self.heartbeat_handle = Some(handle);
    }

    fn stopped(&mut self, ctx: &mut Self::Context) {
        if let Some(handle) = self.heartbeat_handle.take() {
            ctx.cancel_future(handle);
        }
        tracing::info!("Relay server stopped");
    }
}

/// Handler: Client mới connected
impl Handler<Connect> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) {
        let members = self.rooms.entry(msg.room.clone()).or_default();
        members.insert(msg.id);

        tracing::info!(
            "Client {} joined room '{}' ({} member(s))",
            msg.id,
            msg.room,
            members.len()
        );

        self.sessions.insert(msg.id, SessionEntry { addr: msg.addr, room: msg.room, alive: true });
    }
}

/// Handler: Client disconnected
impl Handler<Disconnect> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        // Idempotent: session đã bị remove trước đó là safe no-op
        let Some(entry) = self.sessions.remove(&msg.id) else {
            return;
        };

        if let Some(members) = self.rooms.get_mut(&entry.room) {
            members.remove(&msg.id);

            tracing::info!(
                "Client {} left room '{}' ({} member(s) remaining)",
                msg.id,
                entry.room,
                members.len()
            );

            // Clean up empty room
            if members.is_empty() {
                self.rooms.remove(&entry.room);
                tracing::info!("Room '{}' empty, removed", entry.room);
            }
        }
    }
}

/// Handler: Client phản hồi liveness probe
impl Handler<HeartbeatAck> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: HeartbeatAck, _: &mut Context<Self>) {
        if let Some(entry) = self.sessions.get_mut(&msg.id) {
            entry.alive = true;
        }
    }
}

/// Handler: Broadcast payload tới room
impl Handler<BroadcastToRoom> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: BroadcastToRoom, _: &mut Context<Self>) {
        let Some(members) = self.rooms.get(&msg.room) else {
            // Room không tồn tại: no-op, không phải error
            tracing::debug!("Broadcast to unknown room '{}', dropped", msg.room);
            return;
        };

        // Normalize một lần duy nhất: mọi recipient nhận cùng một wire form
        let payload = msg.payload.normalize();
        let mut sent_count = 0;

        for session_id in members {
            if msg.skip_session_id == Some(*session_id) {
                continue;
            }

            if let Some(entry) = self.sessions.get(session_id) {
                if entry.addr.connected() {
                    entry.addr.do_send(payload.clone());
                    sent_count += 1;
                }
            }
        }

        tracing::debug!("Broadcast to room '{}': sent to {} client(s)", msg.room, sent_count);
    }
}

/// Handler: Lấy stats snapshot
impl Handler<GetStats> for RelayServer {
    type Result = MessageResult<GetStats>;

    fn handle(&mut self, _: GetStats, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.stats())
    }
}

/// Implement Message trait cho Payload để có thể deliver tới sessions
impl Message for Payload {
    type Result = ();
}

impl Default for RelayServer {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_INTERVAL)
    }
}
