/// WebSocket Relay Module
///
/// Module này cung cấp real-time relay capability cho collaborative editing
/// thông qua WebSocket protocol. Nó bao gồm:
///
/// - Payload protocol (Payload & OutboundFrame & StatsSnapshot)
/// - Relay Server actor (quản lý connections, rooms và heartbeat sweep)
/// - Relay Session actor (xử lý từng connection)
/// - HTTP handler (upgrade HTTP thành WebSocket, stats endpoint)
pub mod events;
pub mod handler;
pub mod message;
pub mod route;
pub mod server;
pub mod session;
