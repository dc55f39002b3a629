use crate::utils::error::{DeployError, Result};
use alloy_primitives::U256;
use std::str::FromStr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DeployError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 解析十進位或 0x 十六進位的 uint256
pub fn parse_uint256(field_name: &str, value: &str) -> Result<U256> {
    U256::from_str(value.trim()).map_err(|e| DeployError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Not a valid uint256: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("network.url", "http://127.0.0.1:8545").is_ok());
        assert!(validate_url("network.url", "https://rpc.example.com").is_ok());
        assert!(validate_url("network.url", "").is_err());
        assert!(validate_url("network.url", "localhost-8545").is_err());
        assert!(validate_url("network.url", "ws://127.0.0.1:8545").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("network.poll_interval_ms", 200, 1).is_ok());
        assert!(validate_positive_number("network.poll_interval_ms", 0, 1).is_err());
    }

    #[test]
    fn test_parse_uint256() {
        assert_eq!(parse_uint256("supply", "1000").unwrap(), U256::from(1000u64));
        assert_eq!(parse_uint256("supply", "0x3e8").unwrap(), U256::from(1000u64));
        assert!(parse_uint256("supply", "-5").is_err());
        assert!(parse_uint256("supply", "a lot").is_err());
    }
}
