//! Token and network reference data. USD exposure is proxied by USDC and
//! the Bitcoin leg by wrapped BTC, both ERC-20s on Ethereum mainnet.

use serde::{Deserialize, Serialize};

pub const MAINNET_CHAIN_ID: u64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    Usdc,
    Wbtc,
}

impl Token {
    pub fn all() -> &'static [Token] {
        &[Token::Usdc, Token::Wbtc]
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Token::Usdc => "USDC",
            Token::Wbtc => "wBTC",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Token::Usdc => "USD Coin",
            Token::Wbtc => "Wrapped Bitcoin",
        }
    }

    /// Mainnet contract address.
    pub fn address(&self) -> &'static str {
        match self {
            Token::Usdc => "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            Token::Wbtc => "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599",
        }
    }

    /// ERC-20 base-unit decimals.
    pub fn decimals(&self) -> u32 {
        match self {
            Token::Usdc => 6,
            Token::Wbtc => 8,
        }
    }

    /// Fractional digits shown in balance captions, matching each side's
    /// input precision.
    pub fn display_decimals(&self) -> usize {
        match self {
            Token::Usdc => 2,
            Token::Wbtc => 8,
        }
    }

    /// CoinGecko asset id used for USD pricing.
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Token::Usdc => "usd-coin",
            Token::Wbtc => "bitcoin",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Token::Usdc => "$",
            Token::Wbtc => "₿",
        }
    }
}

/// Chains the app can sit on. Only mainnet carries the token contracts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    #[default]
    Mainnet,
}

impl Network {
    pub fn all() -> &'static [Network] {
        &[Network::Mainnet]
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => MAINNET_CHAIN_ID,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "Ethereum Mainnet",
        }
    }

    pub fn native_symbol(&self) -> &'static str {
        match self {
            Network::Mainnet => "ETH",
        }
    }

    pub fn native_decimals(&self) -> u32 {
        match self {
            Network::Mainnet => 18,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_are_checksum_shaped() {
        for token in Token::all() {
            let addr = token.address();
            assert!(addr.starts_with("0x"));
            assert_eq!(addr.len(), 42);
            assert!(addr[2..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_decimals_match_mainnet_contracts() {
        assert_eq!(Token::Usdc.decimals(), 6);
        assert_eq!(Token::Wbtc.decimals(), 8);
        assert_eq!(Network::Mainnet.native_decimals(), 18);
    }
}
