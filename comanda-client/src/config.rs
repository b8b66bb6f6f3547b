//! Client configuration

/// Client configuration for connecting to the backend and the realtime
/// channel
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Realtime channel TCP address (e.g., "localhost:9000")
    pub channel_addr: Option<String>,

    /// Bearer credential for authentication (opaque to the engine)
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Client name reported at channel handshake
    pub client_name: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            channel_addr: None,
            token: None,
            timeout: 30,
            client_name: "comanda-client".to_string(),
        }
    }

    /// Set the realtime channel TCP address
    pub fn with_channel_addr(mut self, addr: impl Into<String>) -> Self {
        self.channel_addr = Some(addr.into());
        self
    }

    /// Set the bearer credential
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the client name reported at handshake
    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
