/// WebSocket Payload Protocol
///
/// Module này định nghĩa các payload types được relay giữa các clients
/// trong cùng một room. Relay không parse nội dung payload — mỗi frame
/// được phân loại đúng một lần tại transport boundary (ingress) rồi
/// forward nguyên vẹn tới các recipients.
use serde::Serialize;
use std::collections::HashMap;

/// Payload được relay giữa các clients trong một room.
///
/// Tag được gán tại ingress và giữ nguyên qua broadcast để tránh
/// runtime type inspection lặp lại.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Binary frame (sync updates) - forward từng byte, không re-encode
    Binary(Vec<u8>),

    /// Text frame - forward as-is
    Text(String),

    /// Structured value phía server - serialize thành JSON text trước khi gửi
    Json(serde_json::Value),
}

impl Payload {
    /// Normalize payload trước khi broadcast: `Json` được serialize thành
    /// `Text` đúng một lần (deterministic cho mọi recipient trong cùng một
    /// broadcast). `Binary` và `Text` giữ nguyên.
    ///
    /// Serialization lỗi không propagate — degrade thành best-effort text.
    pub fn normalize(self) -> Self {
        match self {
            Payload::Json(value) => match serde_json::to_string(&value) {
                Ok(text) => Payload::Text(text),
                Err(e) => {
                    tracing::error!("Không thể serialize structured payload: {}", e);
                    Payload::Text("null".to_string())
                }
            },
            other => other,
        }
    }
}

/// Frames được đẩy từ session actor qua mpsc channel xuống WebSocket.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    /// Text frame gửi tới client
    Text(String),

    /// Binary frame gửi tới client
    Binary(Vec<u8>),

    /// Liveness probe (WebSocket ping)
    Ping,

    /// Yêu cầu đóng connection (forced termination)
    Close,
}

/// Snapshot cho monitoring dashboard: tổng số rooms, tổng số connections
/// và member count theo từng room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_rooms: usize,
    pub total_clients: usize,
    pub rooms: HashMap<String, RoomStats>,
}

/// Thống kê của một room
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStats {
    pub client_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Payload normalization ===

    #[test]
    fn test_binary_payload_passes_through_unchanged() {
        let bytes = vec![0u8, 1, 2, 255, 254, 0, 42];
        let payload = Payload::Binary(bytes.clone());
        assert_eq!(payload.normalize(), Payload::Binary(bytes));
    }

    #[test]
    fn test_text_payload_passes_through_unchanged() {
        let payload = Payload::Text("Xin chào room!".to_string());
        assert_eq!(payload.normalize(), Payload::Text("Xin chào room!".to_string()));
    }

    #[test]
    fn test_json_payload_normalized_to_text() {
        let payload = Payload::Json(serde_json::json!({"type": "cursor", "pos": 5}));
        match payload.normalize() {
            Payload::Text(text) => {
                let value: serde_json::Value = serde_json::from_str(&text).unwrap();
                assert_eq!(value, serde_json::json!({"type": "cursor", "pos": 5}));
            }
            other => panic!("Expected Text payload, got {:?}", other),
        }
    }

    #[test]
    fn test_json_normalization_is_deterministic() {
        let value = serde_json::json!({"b": [1, 2, 3], "a": {"nested": true}});
        let first = Payload::Json(value.clone()).normalize();
        let second = Payload::Json(value).normalize();
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_is_idempotent_for_text() {
        let normalized = Payload::Json(serde_json::json!([1, 2])).normalize();
        assert_eq!(normalized.clone().normalize(), normalized);
    }

    // === StatsSnapshot wire shape ===

    #[test]
    fn test_stats_snapshot_serialize_shape() {
        let mut rooms = HashMap::new();
        rooms.insert("mathTutor42".to_string(), RoomStats { client_count: 2 });
        let snapshot = StatsSnapshot { total_rooms: 1, total_clients: 2, rooms };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["totalRooms"], 1);
        assert_eq!(json["totalClients"], 2);
        assert_eq!(json["rooms"]["mathTutor42"]["clientCount"], 2);
    }

    #[test]
    fn test_stats_snapshot_empty_registry() {
        let snapshot = StatsSnapshot { total_rooms: 0, total_clients: 0, rooms: HashMap::new() };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"totalRooms\":0"));
        assert!(json.contains("\"rooms\":{}"));
    }
}
