//! A blockchain-agnostic branch-and-bound coin selection engine.
//!
//! Given spendable amounts, a payment target and a feerate, [`select_coin`] picks a subset
//! whose effective value (amount minus the cost of spending it) pays the target and the fee
//! of a single-output transaction, leaving less excess than a change output would cost.
//!
//! ```
//! use bnb_coinselect::{select_coin, CoinSelectionOpt};
//!
//! let options = CoinSelectionOpt::new(50_000, 10);
//! let output = select_coin(&[100_000, 30_000, 23_500], &options).unwrap();
//! assert_eq!(output.selected_inputs, vec![1, 2]);
//! assert_eq!(output.fee, 3400);
//! assert_eq!(output.excess, 100);
//! ```

pub mod algorithms {
    pub mod bnb;
}
pub mod selectcoin;
pub mod types;
pub mod utils;

pub use selectcoin::select_coin;
pub use types::{
    CoinSelectionOpt, EffectiveUnit, MatchParameters, SearchStrategy, SelectionError,
    SelectionOutput, SizeParams,
};
