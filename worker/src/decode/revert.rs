//! Pure revert-data decoder: selector extraction plus the two standard
//! Solidity error encodings. ABI decoding goes through `ethers::abi`, not a
//! hand-rolled decoder.

use std::str::FromStr;

use ethers::abi::{decode as abi_decode, ParamType};
use ethers::types::Bytes;
use serde_json::{json, Value};

const ERROR_STRING_SELECTOR: &str = "0x08c379a0";
const PANIC_UINT256_SELECTOR: &str = "0x4e487b71";

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRevert {
    pub signature: Option<String>,
    pub message: Option<String>,
    pub params: Option<Value>,
}

fn panic_message(code: u64) -> String {
    match code {
        0x01 => "Assertion failed".to_string(),
        0x11 => "Arithmetic overflow/underflow".to_string(),
        0x12 => "Division by zero".to_string(),
        0x21 => "Invalid enum value".to_string(),
        0x31 => "Pop on empty array".to_string(),
        0x32 => "Array index out of bounds".to_string(),
        0x41 => "Memory allocation failed".to_string(),
        0x51 => "Zero-initialized function pointer".to_string(),
        other => format!("Panic({other})"),
    }
}

/// `data` is a `0x`-prefixed hex blob, as returned in a receipt's revert data.
pub fn decode_revert(data: &str) -> DecodedRevert {
    let bytes = match Bytes::from_str(data) {
        Ok(bytes) if bytes.len() >= 4 => bytes,
        _ => {
            return DecodedRevert {
                signature: None,
                message: Some("Unknown revert".to_string()),
                params: None,
            }
        }
    };

    let selector = format!("0x{}", hex::encode(&bytes[..4]));
    let remainder = &bytes[4..];

    match selector.as_str() {
        ERROR_STRING_SELECTOR => match abi_decode(&[ParamType::String], remainder) {
            Ok(tokens) => {
                let message = tokens
                    .into_iter()
                    .next()
                    .and_then(|token| token.into_string())
                    .unwrap_or_default();
                DecodedRevert {
                    signature: Some(selector),
                    params: Some(json!({ "message": message })),
                    message: Some(message),
                }
            }
            Err(_) => DecodedRevert {
                signature: Some(selector),
                message: Some("Error(string)".to_string()),
                params: None,
            },
        },
        PANIC_UINT256_SELECTOR => match abi_decode(&[ParamType::Uint(256)], remainder) {
            Ok(tokens) => {
                let code = tokens
                    .into_iter()
                    .next()
                    .and_then(|token| token.into_uint())
                    .map(|value| value.as_u64())
                    .unwrap_or(0);
                DecodedRevert {
                    signature: Some(selector),
                    message: Some(panic_message(code)),
                    params: Some(json!({ "code": code })),
                }
            }
            Err(_) => DecodedRevert {
                signature: Some(selector),
                message: Some("Panic(uint256)".to_string()),
                params: None,
            },
        },
        _ => DecodedRevert {
            message: Some(format!("Custom error {selector}")),
            signature: Some(selector),
            params: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use ethers::abi::{encode, Token};
    use ethers::types::U256;

    use super::*;

    #[test]
    fn decodes_error_string() {
        let encoded = encode(&[Token::String("BOOM".to_string())]);
        let data = format!("{}{}", ERROR_STRING_SELECTOR, hex::encode(encoded));
        let result = decode_revert(&data);
        assert_eq!(result.signature, Some(ERROR_STRING_SELECTOR.to_string()));
        assert_eq!(result.message, Some("BOOM".to_string()));
        assert_eq!(result.params, Some(json!({ "message": "BOOM" })));
    }

    #[test]
    fn decodes_panic_code() {
        let encoded = encode(&[Token::Uint(U256::from(0x11))]);
        let data = format!("{}{}", PANIC_UINT256_SELECTOR, hex::encode(encoded));
        let result = decode_revert(&data);
        assert_eq!(result.signature, Some(PANIC_UINT256_SELECTOR.to_string()));
        assert_eq!(result.message, Some("Arithmetic overflow/underflow".to_string()));
        assert_eq!(result.params, Some(json!({ "code": 17 })));
    }

    #[test]
    fn short_input_is_unknown_revert() {
        let result = decode_revert("0x1234");
        assert_eq!(result.signature, None);
        assert_eq!(result.message, Some("Unknown revert".to_string()));
        assert_eq!(result.params, None);
    }

    #[test]
    fn unmatched_selector_is_custom_error() {
        let data = "0xdeadbeef0000000000000000000000000000000000000000000000000000000000000001";
        let result = decode_revert(data);
        assert_eq!(result.signature, Some("0xdeadbeef".to_string()));
        assert_eq!(result.message, Some("Custom error 0xdeadbeef".to_string()));
    }
}
