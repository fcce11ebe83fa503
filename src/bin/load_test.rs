//! Load Testing Tool
//!
//! Hammers one in-memory ledger with concurrent typed transactions and
//! checks the overdraft floor afterwards.
//!
//! Run with: cargo run --bin load_test --release -- --transactions 100000 --workers 8

use std::time::Instant;

use core_banking::services::CreateTransactionCommand;
use core_banking::Ledger;

const ACCOUNTS: usize = 16;
const OVERDRAFT_LIMIT: i64 = 500;

fn arg(args: &[String], name: &str, default: u64) -> u64 {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let transaction_count = arg(&args, "--transactions", 100_000);
    let workers = arg(&args, "--workers", 8).max(1);

    println!(
        "Load Test - {} typed transactions on {} workers",
        transaction_count, workers
    );

    let ledger = Ledger::in_memory();
    let mut account_ids = Vec::with_capacity(ACCOUNTS);
    for n in 0..ACCOUNTS {
        let account = ledger.accounts.create_account(&format!("load-doc-{n}"))?;
        ledger
            .accounts
            .set_overdraft_limit(&account.account_id, OVERDRAFT_LIMIT)?;
        account_ids.push(account.account_id);
    }

    let per_worker = transaction_count / workers;
    let start = Instant::now();

    let (succeeded, rejected) = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let ledger = &ledger;
                let account_ids = &account_ids;
                scope.spawn(move || {
                    let mut ok = 0u64;
                    let mut rejected = 0u64;
                    for i in 0..per_worker {
                        let seq = worker * per_worker + i;
                        let account_id = &account_ids[(seq as usize) % account_ids.len()];
                        // Mostly debits so the overdraft floor is actually hit
                        let operation_type_id = (seq % 4) as i32 + 1;
                        let amount = (seq % 97) as i64 + 1;

                        let command =
                            CreateTransactionCommand::new(account_id, operation_type_id, amount);
                        match ledger.transactions.create_transaction(command) {
                            Ok(_) => ok += 1,
                            Err(_) => rejected += 1,
                        }
                    }
                    (ok, rejected)
                })
            })
            .collect();

        handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .fold((0u64, 0u64), |acc, (ok, rej)| (acc.0 + ok, acc.1 + rej))
    });

    let elapsed = start.elapsed();
    let rate = (succeeded + rejected) as f64 / elapsed.as_secs_f64();

    let logged = ledger.transactions.get_all_transactions()?.len() as u64;
    let mut floor_breaches = 0;
    for account_id in &account_ids {
        let balance = ledger.accounts.get_balance(account_id)?;
        if balance + OVERDRAFT_LIMIT < 0 {
            floor_breaches += 1;
        }
    }

    println!("\n=== Load Test Results ===");
    println!("Committed: {}", succeeded);
    println!("Rejected (insufficient funds): {}", rejected);
    println!("Logged transactions: {}", logged);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} ops/sec", rate);

    if logged != succeeded || floor_breaches > 0 {
        anyhow::bail!(
            "ledger inconsistent: {} logged vs {} committed, {} accounts below floor",
            logged,
            succeeded,
            floor_breaches
        );
    }

    println!("Invariants hold.");
    Ok(())
}
