use bnb_coinselect::{select_coin, CoinSelectionOpt, SearchStrategy};
use rand::Rng;
use std::time::Instant;

const POOL_SIZE: usize = 60;
const TARGET_VALUE: u64 = 500_000;
const FEERATE: u64 = 12;

fn main() {
    env_logger::init();

    let mut rng = rand::thread_rng();
    let pool: Vec<u64> = (0..POOL_SIZE)
        .map(|_| rng.gen_range(1_000..=150_000))
        .collect();
    println!("pool of {} inputs, total {}", pool.len(), pool.iter().sum::<u64>());

    for strategy in [SearchStrategy::FirstMatch, SearchStrategy::LeastExcess] {
        let options = CoinSelectionOpt::new(TARGET_VALUE, FEERATE)
            .with_strategy(strategy)
            .with_max_tries(200_000);
        let start = Instant::now();
        let result = select_coin(&pool, &options);
        let elapsed = start.elapsed();

        match result {
            Ok(output) => println!(
                "{:?}: {} inputs {:?}, total {}, fee {}, excess {}, {} tries in {:?}",
                strategy,
                output.selected_inputs.len(),
                output.selected_amounts,
                output.total_amount,
                output.fee,
                output.excess,
                output.tries,
                elapsed
            ),
            Err(e) => println!("{:?}: {} (after {:?})", strategy, e, elapsed),
        }
    }
}
