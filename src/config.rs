#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub request_interval_ms: u64,
    pub etf_list_limit: usize,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 30,
            request_interval_ms: 500,
            etf_list_limit: 100,
        }
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_request_interval_ms(mut self, ms: u64) -> Self {
        self.request_interval_ms = ms;
        self
    }

    pub fn with_etf_list_limit(mut self, limit: usize) -> Self {
        self.etf_list_limit = limit;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
