use log::debug;

use crate::{
    types::{CoinSelectionOpt, EffectiveUnit, MatchParameters, SearchStrategy, SelectionError},
    utils::suffix_sums,
};

/// A combination accepted by [`select_coin_bnb`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BnbMatch {
    /// Accepted candidates, in the order they were included.
    pub selection: Vec<EffectiveUnit>,
    /// Summed effective value of `selection`.
    pub acc_eff_value: u64,
    /// Search nodes popped before the match was settled.
    pub tries: u32,
}

/// One pending branch: the next candidate to decide on, the effective value included so
/// far and the positions (into the candidate slice) of the included candidates.
#[derive(Debug)]
struct SearchNode {
    depth: usize,
    acc_eff_value: u64,
    selected: Vec<usize>,
}

/// Perform Coinselection via Branch And Bound algorithm.
///
/// `candidates` must be sorted by effective value in descending order, as produced by
/// [`effective_candidates`]. The search walks an explicit LIFO stack, trying to include each
/// candidate before trying to omit it, and prunes any branch that has overshot
/// `upper_bound` or can no longer reach `target` even with every remaining candidate.
///
/// Returns [`SelectionError::NoSolutionFound`] when the tree is exhausted, and
/// [`SelectionError::SearchLimitExceeded`] when `options.max_tries` nodes were popped first.
/// Under [`SearchStrategy::LeastExcess`] the best match found so far is returned instead of
/// the limit error.
///
/// [`effective_candidates`]: crate::utils::effective_candidates
pub fn select_coin_bnb(
    candidates: &[EffectiveUnit],
    match_parameters: &MatchParameters,
    options: &CoinSelectionOpt,
) -> Result<BnbMatch, SelectionError> {
    let suffix = suffix_sums(candidates);
    let mut stack = vec![SearchNode {
        depth: 0,
        acc_eff_value: 0,
        selected: Vec::new(),
    }];
    let mut best: Option<SearchNode> = None;
    let mut tries: u32 = 0;

    while let Some(node) = stack.pop() {
        if tries == options.max_tries {
            debug!("bnb gave up after {tries} tries");
            return match best {
                Some(best) => Ok(settle(candidates, best, tries)),
                None => Err(SelectionError::SearchLimitExceeded { tries }),
            };
        }
        tries += 1;

        if match_parameters.contains(node.acc_eff_value) {
            match options.strategy {
                SearchStrategy::FirstMatch => return Ok(settle(candidates, node, tries)),
                SearchStrategy::LeastExcess => {
                    // Every descendant sums at least as high, so accepted nodes are leaves.
                    if best
                        .as_ref()
                        .map_or(true, |best| node.acc_eff_value < best.acc_eff_value)
                    {
                        let exact = node.acc_eff_value == match_parameters.target;
                        best = Some(node);
                        if exact {
                            break;
                        }
                    }
                    continue;
                }
            }
        }

        if node.depth >= candidates.len() || node.acc_eff_value > match_parameters.upper_bound {
            continue;
        }
        if node.acc_eff_value + suffix[node.depth] < match_parameters.target {
            continue;
        }
        if let Some(best) = &best {
            if node.acc_eff_value >= best.acc_eff_value {
                continue;
            }
        }

        let candidate = &candidates[node.depth];
        let mut with_this = node.selected.clone();
        with_this.push(node.depth);

        // Omit is pushed first so that include is popped first.
        stack.push(SearchNode {
            depth: node.depth + 1,
            acc_eff_value: node.acc_eff_value,
            selected: node.selected,
        });
        stack.push(SearchNode {
            depth: node.depth + 1,
            acc_eff_value: node.acc_eff_value + candidate.effective_value,
            selected: with_this,
        });
    }

    match best {
        Some(best) => Ok(settle(candidates, best, tries)),
        None => {
            debug!("bnb exhausted the search tree after {tries} tries");
            Err(SelectionError::NoSolutionFound)
        }
    }
}

fn settle(candidates: &[EffectiveUnit], node: SearchNode, tries: u32) -> BnbMatch {
    BnbMatch {
        selection: node.selected.iter().map(|&pos| candidates[pos]).collect(),
        acc_eff_value: node.acc_eff_value,
        tries,
    }
}

#[cfg(test)]
mod test {
    use crate::{
        algorithms::bnb::select_coin_bnb,
        types::{
            CoinSelectionOpt, EffectiveUnit, MatchParameters, SearchStrategy, SelectionError,
        },
    };

    /// Candidates with effective values 5, 4, 3, 2 at original indices 10..13.
    fn setup_candidates() -> Vec<EffectiveUnit> {
        [5, 4, 3, 2]
            .iter()
            .enumerate()
            .map(|(i, &effective_value)| EffectiveUnit {
                index: 10 + i,
                amount: effective_value + 100,
                effective_value,
            })
            .collect()
    }

    fn window(target: u64, upper_bound: u64) -> MatchParameters {
        MatchParameters {
            target,
            cost_of_change: upper_bound - target,
            upper_bound,
        }
    }

    fn indices(selection: &[EffectiveUnit]) -> Vec<usize> {
        selection.iter().map(|unit| unit.index).collect()
    }

    #[test]
    fn test_bnb_accepts_first_match_including_largest_first() {
        let candidates = setup_candidates();
        let options = CoinSelectionOpt::new(1, 0);
        let found = select_coin_bnb(&candidates, &window(5, 6), &options).unwrap();
        assert_eq!(indices(&found.selection), vec![10]);
        assert_eq!(found.acc_eff_value, 5);
        // root, then the include-5 child
        assert_eq!(found.tries, 2);
    }

    #[test]
    fn test_bnb_backtracks_after_overshoot() {
        let candidates = setup_candidates();
        let options = CoinSelectionOpt::new(1, 0);
        let found = select_coin_bnb(&candidates, &window(7, 7), &options).unwrap();
        // 5+4 and 5+3 overshoot, 5+2 lands exactly
        assert_eq!(indices(&found.selection), vec![10, 13]);
        assert_eq!(found.acc_eff_value, 7);
    }

    #[test]
    fn test_bnb_first_match_vs_least_excess() {
        let candidates = setup_candidates();
        let options = CoinSelectionOpt::new(1, 0);

        let first = select_coin_bnb(&candidates, &window(6, 9), &options).unwrap();
        assert_eq!(indices(&first.selection), vec![10, 11]);
        assert_eq!(first.acc_eff_value, 9);

        let options = options.with_strategy(SearchStrategy::LeastExcess);
        let least = select_coin_bnb(&candidates, &window(6, 9), &options).unwrap();
        assert_eq!(indices(&least.selection), vec![11, 13]);
        assert_eq!(least.acc_eff_value, 6);
    }

    #[test]
    fn test_bnb_least_excess_without_exact_match() {
        let candidates = setup_candidates();
        let options = CoinSelectionOpt::new(1, 0);
        // 1 is unreachable, so the best match still carries excess
        let first = select_coin_bnb(&candidates, &window(1, 3), &options).unwrap();
        assert_eq!(indices(&first.selection), vec![12]);

        let options = options.with_strategy(SearchStrategy::LeastExcess);
        let least = select_coin_bnb(&candidates, &window(1, 3), &options).unwrap();
        assert_eq!(indices(&least.selection), vec![13]);
        assert_eq!(least.acc_eff_value, 2);
    }

    #[test]
    fn test_bnb_no_solution() {
        let candidates = setup_candidates();
        let options = CoinSelectionOpt::new(1, 0);
        // Everything sums to 14
        let result = select_coin_bnb(&candidates, &window(15, 30), &options);
        assert_eq!(result, Err(SelectionError::NoSolutionFound));
        // 1 is unreachable since the smallest candidate is 2
        let result = select_coin_bnb(&candidates, &window(1, 1), &options);
        assert_eq!(result, Err(SelectionError::NoSolutionFound));
    }

    #[test]
    fn test_bnb_single_overshooting_candidate() {
        let candidates = vec![EffectiveUnit {
            index: 0,
            amount: 100_000,
            effective_value: 98_520,
        }];
        let options = CoinSelectionOpt::new(50_000, 10);
        let result = select_coin_bnb(&candidates, &window(50_440, 50_880), &options);
        assert_eq!(result, Err(SelectionError::NoSolutionFound));
    }

    #[test]
    fn test_bnb_empty_candidates() {
        let options = CoinSelectionOpt::new(1, 0);
        let result = select_coin_bnb(&[], &window(1, 2), &options);
        assert_eq!(result, Err(SelectionError::NoSolutionFound));
    }

    #[test]
    fn test_bnb_search_limit() {
        let candidates = setup_candidates();
        let options = CoinSelectionOpt::new(1, 0).with_max_tries(1);
        let result = select_coin_bnb(&candidates, &window(7, 7), &options);
        assert_eq!(result, Err(SelectionError::SearchLimitExceeded { tries: 1 }));
    }

    #[test]
    fn test_bnb_search_limit_keeps_best_for_least_excess() {
        let candidates = setup_candidates();
        let options = CoinSelectionOpt::new(1, 0)
            .with_strategy(SearchStrategy::LeastExcess)
            .with_max_tries(3);
        // root, include 5, include 4 (sum 9, accepted) and then the cap
        let found = select_coin_bnb(&candidates, &window(6, 9), &options).unwrap();
        assert_eq!(found.acc_eff_value, 9);
        assert_eq!(found.tries, 3);
    }
}
