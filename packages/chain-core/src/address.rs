use cosmwasm_std::Addr;

use crate::error::{ChainError, ErrorKind};

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 64;

/// Validates a raw address string the way `deps.api.addr_validate` would in
/// a wasm host, without requiring one. There is no bech32 checksum here —
/// the consensus/signature layer that delivers transactions to this crate
/// is assumed to have already authenticated the signer — this is
/// only a syntactic sanity check used by `ValidateBasic`-style validators.
pub fn validate_address(input: &str) -> Result<Addr, ChainError> {
    if input.len() < MIN_LEN || input.len() > MAX_LEN {
        return Err(ChainError::new(
            ErrorKind::InvalidAddress,
            format!("address length out of bounds: {input:?}"),
        ));
    }
    if !input
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(ChainError::new(
            ErrorKind::InvalidAddress,
            format!("address contains invalid characters: {input:?}"),
        ));
    }
    Ok(Addr::unchecked(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_address() {
        assert!(validate_address("validator1").is_ok());
    }

    #[test]
    fn rejects_empty_and_short() {
        assert!(validate_address("").is_err());
        assert!(validate_address("ab").is_err());
    }

    #[test]
    fn rejects_uppercase_and_symbols() {
        assert!(validate_address("Alice").is_err());
        assert!(validate_address("alice!").is_err());
    }
}
