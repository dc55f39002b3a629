//! Minimal ABI codec for the static types the token workflow uses.

use crate::utils::error::{DeployError, Result};
use alloy_primitives::{keccak256, Address, Bytes, U256};

pub const TRANSFER: &str = "transfer(address,uint256)";
pub const BALANCE_OF: &str = "balanceOf(address)";
pub const TOTAL_SUPPLY: &str = "totalSupply()";

const WORD: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(U256),
}

impl Token {
    fn to_word(self) -> [u8; WORD] {
        match self {
            Token::Address(address) => address.into_word().0,
            Token::Uint(value) => value.to_be_bytes::<WORD>(),
        }
    }
}

pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub fn encode_arguments(tokens: &[Token]) -> Vec<u8> {
    let mut out = Vec::with_capacity(tokens.len() * WORD);
    for token in tokens {
        out.extend_from_slice(&token.to_word());
    }
    out
}

pub fn encode_call(signature: &str, tokens: &[Token]) -> Bytes {
    let mut out = selector(signature).to_vec();
    out.extend_from_slice(&encode_arguments(tokens));
    Bytes::from(out)
}

pub fn transfer_call(to: Address, amount: U256) -> Bytes {
    encode_call(TRANSFER, &[Token::Address(to), Token::Uint(amount)])
}

pub fn balance_of_call(owner: Address) -> Bytes {
    encode_call(BALANCE_OF, &[Token::Address(owner)])
}

pub fn decode_uint(data: &[u8]) -> Result<U256> {
    if data.len() < WORD {
        return Err(DeployError::DecodeError {
            message: format!("expected a 32-byte word, got {} byte(s)", data.len()),
        });
    }
    Ok(U256::from_be_slice(&data[..WORD]))
}

/// ERC-20 `bool` return; tokens that return nothing count as success.
pub fn decode_bool(data: &[u8]) -> Result<bool> {
    if data.is_empty() {
        return Ok(true);
    }
    Ok(!decode_uint(data)?.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erc20_selectors() {
        assert_eq!(selector(TRANSFER), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector(BALANCE_OF), [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(selector(TOTAL_SUPPLY), [0x18, 0x16, 0x0d, 0xdd]);
    }

    #[test]
    fn test_transfer_call_layout() {
        let to = Address::repeat_byte(0x11);
        let data = transfer_call(to, U256::from(100u64));

        assert_eq!(data.len(), 4 + 2 * WORD);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        // address 左側補零
        assert!(data[4..16].iter().all(|b| *b == 0));
        assert_eq!(&data[16..36], to.as_slice());
        assert_eq!(data[data.len() - 1], 100);
    }

    #[test]
    fn test_decode_uint() {
        let mut word = [0u8; 32];
        word[30] = 0x03;
        word[31] = 0xe8;
        assert_eq!(decode_uint(&word).unwrap(), U256::from(1000u64));
        assert!(decode_uint(&word[..31]).is_err());
    }

    #[test]
    fn test_decode_bool() {
        let mut word = [0u8; 32];
        assert!(!decode_bool(&word).unwrap());
        word[31] = 1;
        assert!(decode_bool(&word).unwrap());
        assert!(decode_bool(&[]).unwrap());
        assert!(decode_bool(&[0x01]).is_err());
    }
}
