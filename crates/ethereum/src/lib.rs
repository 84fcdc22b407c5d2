pub mod balance;
pub mod treasury;

pub use balance::{BalanceOracleTrait, BalanceReading, DynBalanceOracle, JsonRpcBalanceOracle};
pub use treasury::{
    Distribution, DynKeySelector, DynTreasury, HotWalletTreasury, KeySelectorTrait, TreasuryTrait,
    UniformRandomSelector,
};
