use log::debug;

use crate::{
    algorithms::bnb::select_coin_bnb,
    types::{CoinSelectionOpt, SelectionError, SelectionOutput},
    utils::{
        build_selection_output, calculate_match_parameters, effective_candidates, validate_inputs,
    },
};

/// Selects a subset of `inputs` that pays `options.target_value` plus fees without a change
/// output.
///
/// `inputs` are raw amounts; the indices in the output refer to positions in this slice.
/// The call is pure: identical arguments always produce an identical result.
pub fn select_coin(
    inputs: &[u64],
    options: &CoinSelectionOpt,
) -> Result<SelectionOutput, SelectionError> {
    validate_inputs(inputs, options)?;
    let match_parameters = calculate_match_parameters(options)?;
    let candidates = effective_candidates(inputs, options)?;
    let available: u64 = candidates.iter().map(|c| c.effective_value).sum();

    debug!(
        "target_value = `{}`, feerate = `{}`, window = `{}..={}`, candidates = `{}/{}`, available = `{}`",
        options.target_value,
        options.target_feerate,
        match_parameters.target(),
        match_parameters.upper_bound(),
        candidates.len(),
        inputs.len(),
        available,
    );

    if available < match_parameters.target() {
        return Err(SelectionError::InsufficientFunds {
            needed: match_parameters.target(),
            available,
        });
    }

    let found = select_coin_bnb(&candidates, &match_parameters, options)?;
    let output = build_selection_output(&found, options)?;
    debug!(
        "selected {:?} after {} tries, fee = `{}`, excess = `{}`",
        output.selected_inputs, output.tries, output.fee, output.excess
    );
    Ok(output)
}
