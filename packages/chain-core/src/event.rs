use cosmwasm_schema::cw_serde;

/// A single key/value emitted by a module handler, mirroring the
/// `attr(key, value)` idiom from `cosmwasm_std` (see
/// `contracts/pair/src/contract.rs`'s `Response::new().add_attribute(...)`)
/// but independent of the `Response`/`CosmosMsg` wasm plumbing.
#[cw_serde]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

pub fn attr(key: impl Into<String>, value: impl ToString) -> Attribute {
    Attribute {
        key: key.into(),
        value: value.to_string(),
    }
}

/// An event recorded in the block result. Failed transactions appear in
/// the block with a non-zero result code and a one-line message; successful
/// ones emit structured events like this one for indexers.
#[cw_serde]
pub struct Event {
    pub ty: String,
    pub attributes: Vec<Attribute>,
}

impl Event {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            attributes: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push(attr(key, value));
        self
    }
}
