use crate::{
    algorithms::bnb::BnbMatch,
    types::{
        CoinSelectionOpt, EffectiveUnit, EffectiveValue, MatchParameters, SelectionError,
        SelectionOutput,
    },
};
use log::trace;
use std::cmp::Reverse;

/// Fee for `bytes` at `rate`, or `None` if it overflows `u64`.
#[inline]
pub fn calculate_fee(bytes: u64, rate: u64) -> Option<u64> {
    bytes.checked_mul(rate)
}

/// Returns the effective value of an input, which is the amount minus the fee for spending
/// it, or `None` when the input is dust.
#[inline]
pub fn effective_value(amount: u64, input_fee: u64) -> Option<EffectiveValue> {
    amount.checked_sub(input_fee).filter(|value| *value > 0)
}

/// Rejects inputs the selection cannot reason about.
pub fn validate_inputs(inputs: &[u64], options: &CoinSelectionOpt) -> Result<(), SelectionError> {
    if options.target_value == 0 {
        return Err(SelectionError::InvalidInput("target value must be positive"));
    }
    if inputs.contains(&0) {
        return Err(SelectionError::InvalidInput("input amounts must be positive"));
    }
    inputs
        .iter()
        .try_fold(0u64, |acc, &amount| acc.checked_add(amount))
        .ok_or(SelectionError::InvalidInput("total input amount overflows u64"))?;
    Ok(())
}

/// Builds the candidate set: inputs annotated with their effective value, dust dropped,
/// sorted by effective value in descending order.
///
/// The sort is stable, so inputs of equal effective value keep their original order.
pub fn effective_candidates(
    inputs: &[u64],
    options: &CoinSelectionOpt,
) -> Result<Vec<EffectiveUnit>, SelectionError> {
    let input_fee = calculate_fee(options.size.input_cost_bytes, options.target_feerate)
        .ok_or(SelectionError::InvalidInput("input fee overflows u64"))?;
    let mut candidates: Vec<EffectiveUnit> = inputs
        .iter()
        .enumerate()
        .filter_map(|(index, &amount)| match effective_value(amount, input_fee) {
            Some(effective_value) => Some(EffectiveUnit {
                index,
                amount,
                effective_value,
            }),
            None => {
                trace!("dropping dust input {index}: amount {amount} <= input fee {input_fee}");
                None
            }
        })
        .collect();
    candidates.sort_by_key(|candidate| Reverse(candidate.effective_value));
    Ok(candidates)
}

/// Derives the acceptance window `target..=upper_bound` from the options.
pub fn calculate_match_parameters(
    options: &CoinSelectionOpt,
) -> Result<MatchParameters, SelectionError> {
    let output_bytes = options
        .size
        .output_cost_bytes
        .checked_add(options.size.overhead_bytes)
        .ok_or(SelectionError::InvalidInput("output size overflows u64"))?;
    let cost_of_change = output_bytes
        .checked_mul(options.target_feerate)
        .ok_or(SelectionError::InvalidInput("cost of change overflows u64"))?;
    let target = options
        .target_value
        .checked_add(cost_of_change)
        .ok_or(SelectionError::InvalidInput("target plus fee overflows u64"))?;
    let upper_bound = target
        .checked_add(cost_of_change)
        .ok_or(SelectionError::InvalidInput("upper bound overflows u64"))?;
    Ok(MatchParameters {
        target,
        cost_of_change,
        upper_bound,
    })
}

/// `suffix[i]` is the summed effective value of `candidates[i..]`. The table has one extra
/// trailing zero so that `suffix[candidates.len()]` is valid.
pub fn suffix_sums(candidates: &[EffectiveUnit]) -> Vec<u64> {
    let mut suffix = vec![0; candidates.len() + 1];
    for (i, candidate) in candidates.iter().enumerate().rev() {
        suffix[i] = suffix[i + 1] + candidate.effective_value;
    }
    suffix
}

/// Prices an accepted selection as a transaction with one output and no change.
///
/// `found` must satisfy the window of `options`, which guarantees the excess is
/// non-negative.
pub fn build_selection_output(
    found: &BnbMatch,
    options: &CoinSelectionOpt,
) -> Result<SelectionOutput, SelectionError> {
    let size = &options.size;
    let selection = &found.selection;
    let transaction_size = (selection.len() as u64)
        .checked_mul(size.input_cost_bytes)
        .and_then(|inputs| inputs.checked_add(size.output_cost_bytes))
        .and_then(|bytes| bytes.checked_add(size.overhead_bytes))
        .ok_or(SelectionError::InvalidInput("transaction size overflows u64"))?;
    let fee = calculate_fee(transaction_size, options.target_feerate)
        .ok_or(SelectionError::InvalidInput("fee overflows u64"))?;
    let total_amount: u64 = selection.iter().map(|unit| unit.amount).sum();
    Ok(SelectionOutput {
        selected_inputs: selection.iter().map(|unit| unit.index).collect(),
        selected_amounts: selection.iter().map(|unit| unit.amount).collect(),
        fee,
        total_amount,
        excess: total_amount - options.target_value - fee,
        effective_value: found.acc_eff_value,
        tries: found.tries,
    })
}
