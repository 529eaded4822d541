pub struct Env {
    pub ip: String,
    pub port: u16,
    pub frontend_url: String,
    pub heartbeat_interval: u64,
}

impl Env {
    fn new() -> Self {
        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        let heartbeat_interval = std::env::var("HEARTBEAT_INTERVAL")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .expect("HEARTBEAT_INTERVAL must be a valid u64 integer (seconds)");
        Env { ip, port, frontend_url, heartbeat_interval }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
