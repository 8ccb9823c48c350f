use cosmwasm_schema::cw_serde;

/// The deterministic acknowledgement payload every node must agree on.
/// Serialized with `serde_json` rather than anything float-sensitive, so
/// every validator produces byte-identical bytes for the same `Ack`.
#[cw_serde]
pub enum Ack {
    Success {},
    Error { code: u32, message: String },
}

impl Ack {
    pub fn success() -> Self {
        Ack::Success {}
    }

    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Ack::Error { code, message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Ack::Success {})
    }

    /// Deterministic byte encoding committed into the block result.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("Ack serialization is infallible")
    }
}
