//! Contract interfaces for the lending protocol.
//!
//! All calldata sent or proposed by this tool is encoded through these
//! `sol!` declarations, so the Rust types always match the on-chain ABIs.
//! Governance proposals additionally carry the human-readable signature of
//! each call; those strings live in [`signatures`] and are checked against
//! the generated selectors in tests.

use alloy::sol;

sol! {
    /// The mToken delegator contract: the market itself.
    ///
    /// The constructor mirrors the proxy's deployment interface; the
    /// functions are the admin operations performed after deployment.
    #[derive(Debug)]
    contract MErc20Delegator {
        constructor(
            address underlying_,
            address comptroller_,
            address interestRateModel_,
            uint256 initialExchangeRateMantissa_,
            string name_,
            string symbol_,
            uint8 decimals_,
            address admin_,
            address implementation_,
            bytes becomeImplementationData_
        );

        function _setReserveFactor(uint256 newReserveFactorMantissa) external returns (uint256);
        function _setProtocolSeizeShare(uint256 newProtocolSeizeShareMantissa) external returns (uint256);
        function _setPendingAdmin(address newPendingAdmin) external returns (uint256);
        function _acceptAdmin() external returns (uint256);
    }
}

sol! {
    /// Risk-management contract governing all markets.
    #[derive(Debug)]
    interface Comptroller {
        function _supportMarket(address mToken) external returns (uint256);
        function _setCollateralFactor(address mToken, uint256 newCollateralFactorMantissa) external returns (uint256);
        function _setRewardSpeed(uint8 rewardType, address mToken, uint256 newSupplySpeed, uint256 newBorrowSpeed) external;
        function _setMarketBorrowCaps(address[] mTokens, uint256[] newBorrowCaps) external;
    }

    /// Chainlink proxy oracle keyed by token symbol.
    #[derive(Debug)]
    interface ChainlinkOracle {
        function setFeed(string symbol, address feed) external;
    }
}

sol! {
    /// Minimal ERC-20 surface used to read underlying-token metadata.
    #[sol(rpc)]
    #[derive(Debug)]
    interface Erc20 {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

/// Human-readable function signatures carried in governance proposals.
///
/// The on-chain governance executor re-derives each selector from these
/// strings, so they must hash to exactly the selectors the bindings encode.
pub mod signatures {
    pub const SET_RESERVE_FACTOR: &str = "_setReserveFactor(uint256)";
    pub const SET_PROTOCOL_SEIZE_SHARE: &str = "_setProtocolSeizeShare(uint256)";
    pub const SET_PENDING_ADMIN: &str = "_setPendingAdmin(address)";
    pub const SUPPORT_MARKET: &str = "_supportMarket(address)";
    pub const SET_COLLATERAL_FACTOR: &str = "_setCollateralFactor(address,uint256)";
    pub const SET_REWARD_SPEED: &str = "_setRewardSpeed(uint8,address,uint256,uint256)";
    pub const SET_MARKET_BORROW_CAPS: &str = "_setMarketBorrowCaps(address[],uint256[])";
    pub const SET_FEED: &str = "setFeed(string,address)";
}
