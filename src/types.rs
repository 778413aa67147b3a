use thiserror::Error;

/// Byte cost of spending one input in a P2PKH-style transaction.
pub const INPUT_COST_BYTES: u64 = 148;
/// Byte cost of one P2PKH-style output.
pub const OUTPUT_COST_BYTES: u64 = 34;
/// Fixed transaction overhead: version, locktime and the in/out counters.
pub const OVERHEAD_BYTES: u64 = 10;

/// Default cap on the number of search nodes visited by [`select_coin_bnb`].
///
/// [`select_coin_bnb`]: crate::algorithms::bnb::select_coin_bnb
pub const DEFAULT_MAX_TRIES: u32 = 1_000_000;

/// Byte costs used to size the transaction.
///
/// Other input/output encodings have different costs, so these are configurable. The
/// defaults are [`SizeParams::P2PKH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeParams {
    /// Bytes added by each input.
    pub input_cost_bytes: u64,
    /// Bytes added by the single payment output.
    pub output_cost_bytes: u64,
    /// Fixed bytes of every transaction.
    pub overhead_bytes: u64,
}

impl SizeParams {
    pub const P2PKH: SizeParams = SizeParams {
        input_cost_bytes: INPUT_COST_BYTES,
        output_cost_bytes: OUTPUT_COST_BYTES,
        overhead_bytes: OVERHEAD_BYTES,
    };
}

impl Default for SizeParams {
    fn default() -> Self {
        SizeParams::P2PKH
    }
}

/// What the search does once it lands inside the acceptance window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Stop at the first combination inside the window. Candidates are visited
    /// largest-first, so this tends to use few, large inputs.
    #[default]
    FirstMatch,
    /// Keep searching and return the combination with the smallest excess.
    LeastExcess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinSelectionOpt {
    /// The payment amount, in the smallest currency unit.
    pub target_value: u64,

    /// The feerate, in currency units per byte.
    pub target_feerate: u64,

    /// Byte costs used to derive effective values, the window and the fee.
    pub size: SizeParams,

    /// Hard cap on search nodes popped before giving up with
    /// [`SelectionError::SearchLimitExceeded`].
    pub max_tries: u32,

    /// Accept policy inside the window.
    pub strategy: SearchStrategy,
}

impl CoinSelectionOpt {
    /// Options with P2PKH sizing, the default try cap and [`SearchStrategy::FirstMatch`].
    pub fn new(target_value: u64, target_feerate: u64) -> Self {
        CoinSelectionOpt {
            target_value,
            target_feerate,
            size: SizeParams::default(),
            max_tries: DEFAULT_MAX_TRIES,
            strategy: SearchStrategy::default(),
        }
    }

    pub fn with_size(mut self, size: SizeParams) -> Self {
        self.size = size;
        self
    }

    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Error describing failure of a selection attempt.
///
/// [`SelectionError::InsufficientFunds`] and [`SelectionError::NoSolutionFound`] are expected
/// outcomes: the pool cannot pay the target at this feerate without a change output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("insufficient funds: needed {needed} effective value, {available} available")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("no combination of inputs lands inside the acceptance window")]
    NoSolutionFound,
    #[error("search limit of {tries} tries exceeded")]
    SearchLimitExceeded { tries: u32 },
}

impl SelectionError {
    /// True when the pool simply cannot cover the target, as opposed to bad input or an
    /// aborted search.
    pub fn is_no_solution(&self) -> bool {
        matches!(
            self,
            SelectionError::InsufficientFunds { .. } | SelectionError::NoSolutionFound
        )
    }
}

/// A spendable input with its post-fee value.
///
/// Only candidates with a strictly positive `effective_value` are ever built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveUnit {
    /// Position of the input in the caller's slice.
    pub index: usize,
    /// Raw amount of the input.
    pub amount: u64,
    /// `amount` minus the fee for spending it.
    pub effective_value: EffectiveValue,
}

/// The result of selection algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutput {
    /// The selected input indices, refers to the indices of the inputs Slice Reference
    pub selected_inputs: Vec<usize>,
    /// Raw amounts of the selected inputs, in the same order as `selected_inputs`.
    pub selected_amounts: Vec<u64>,
    /// Fee of a transaction spending the selection into exactly one output.
    pub fee: u64,
    /// Sum of `selected_amounts`.
    pub total_amount: u64,
    /// `total_amount - target_value - fee`. Left to the fee, no change output is made.
    pub excess: u64,
    /// Summed effective value of the selection.
    pub effective_value: EffectiveValue,
    /// Search nodes popped before the result was settled.
    pub tries: u32,
}

pub type EffectiveValue = u64;

/// Acceptance window and per-unit costs derived from [`CoinSelectionOpt`].
///
/// Any selection whose summed effective value lies in `target..=upper_bound` pays the
/// target plus a single-output fee, and leaves less than the cost of a change output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchParameters {
    pub(crate) target: u64,
    pub(crate) cost_of_change: u64,
    pub(crate) upper_bound: u64,
}

impl MatchParameters {
    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn cost_of_change(&self) -> u64 {
        self.cost_of_change
    }

    pub fn upper_bound(&self) -> u64 {
        self.upper_bound
    }

    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        (self.target..=self.upper_bound).contains(&value)
    }
}
