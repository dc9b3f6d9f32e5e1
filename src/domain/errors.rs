use thiserror::Error;

/// Failures surfaced by the commerce backend and by client-side checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommerceError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Transport { status: u16 },

    /// The request never produced a response (connection refused, reset, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// Top-level `errors` array in an otherwise successful response.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// `ErrorResult` variant of an `Order | ErrorResult` union.
    #[error("{message}")]
    Domain { error_code: String, message: String },

    #[error("Request timeout")]
    Timeout,

    /// Rejected on the client before anything was sent.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("No active order")]
    NoActiveOrder,

    #[error("The cart is empty")]
    EmptyCart,

    /// The active order already left the cart stage.
    #[error("This order has already been processed, please start a new one")]
    OrderAlreadyProcessed,

    #[error("In-store pickup is not available for this order")]
    PickupUnavailable,
}

impl CommerceError {
    /// True when the backend rejected a mutation because the referenced order
    /// line no longer exists. The cart resynchronises before reporting these.
    pub fn is_stale_line(&self) -> bool {
        match self {
            CommerceError::Domain {
                error_code,
                message,
            } => error_code.contains("ORDER_LINE") || message.contains("OrderLine"),
            CommerceError::GraphQl(message) => message.contains("OrderLine"),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for CommerceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CommerceError::Timeout
        } else if let Some(status) = e.status() {
            CommerceError::Transport {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            CommerceError::Decode(e.to_string())
        } else {
            CommerceError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Decode(e.to_string())
    }
}
