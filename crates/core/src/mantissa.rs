//! Fixed-point scaling for on-chain risk parameters.
//!
//! Risk parameters are entered as whole-number percentages and stored
//! on-chain as 18-decimal mantissas: one percent is 10^16.

use alloy::primitives::U256;

/// Scale a whole-number percentage to an 18-decimal mantissa.
pub fn percent_to_mantissa(percent: u64) -> U256 {
    U256::from(percent) * U256::from(10u64).pow(U256::from(16u64))
}

/// Scale a whole-token amount to the token's smallest unit.
pub fn token_units(amount: u64, decimals: u8) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(decimals as u64))
}

/// Initial exchange-rate mantissa for a new market:
/// `2 * 10^(tokenDecimals + 8)`.
pub fn initial_exchange_rate(token_decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(token_decimals as u64 + 8)) * U256::from(2u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_to_mantissa() {
        assert_eq!(
            percent_to_mantissa(15),
            U256::from(150_000_000_000_000_000u64)
        );
        assert_eq!(percent_to_mantissa(0), U256::ZERO);
        assert_eq!(
            percent_to_mantissa(100),
            U256::from(10u64).pow(U256::from(18u64))
        );
    }

    #[test]
    fn test_token_units() {
        assert_eq!(token_units(5, 6), U256::from(5_000_000u64));
        assert_eq!(token_units(1, 18), U256::from(10u64).pow(U256::from(18u64)));
        assert_eq!(token_units(0, 8), U256::ZERO);
    }

    #[test]
    fn test_initial_exchange_rate() {
        // 6-decimal token: 2 * 10^14
        assert_eq!(
            initial_exchange_rate(6),
            U256::from(200_000_000_000_000u64)
        );
        // 18-decimal token: 2 * 10^26
        assert_eq!(
            initial_exchange_rate(18),
            U256::from(2u64) * U256::from(10u64).pow(U256::from(26u64))
        );
    }
}
