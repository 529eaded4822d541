use crate::modules::websocket::handler::{health_check, stats, websocket_handler};
use actix_web::web::{self, ServiceConfig};

/// Đăng ký routes của relay: monitoring endpoints trước, WebSocket
/// catch-all sau cùng. Thứ tự này reserve hai path `stats` và `healthz` —
/// chúng không thể dùng làm room identifier.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(stats)
        .service(health_check)
        .service(web::resource("/{room:.*}").route(web::get().to(websocket_handler)));
}
