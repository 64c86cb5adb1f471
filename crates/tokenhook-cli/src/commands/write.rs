//! `tokenhook approve`, `tokenhook transfer`, `tokenhook transfer-from`.
//!
//! Each command fires the matching write hook, waits for its result cell to
//! settle and prints the outcome.

use rust_decimal::Decimal;
use tokenhook_evm::amount::parse_units;
use tokenhook_evm::{Address, Approve, TokenHooks, Transfer, TransferFrom, WriteCall, WriteOp};

use super::{open_hooks, resolve_config, Overrides};

/// Run the `approve` subcommand.
pub async fn approve(
    overrides: Overrides,
    spender: Address,
    amount: Decimal,
    skip_confirm: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (hooks, symbol, decimals) = prepare(overrides).await?;
    let raw = parse_units(amount, decimals)?;

    println!("\n=== Approve Summary ===");
    println!("  Token:   {}", hooks.token.address());
    println!("  Spender: {spender}");
    println!("  Amount:  {amount} {symbol}");
    println!("=======================\n");

    if !confirm("approval", skip_confirm)? {
        return Ok(());
    }

    settle(
        &hooks.approve,
        Approve {
            spender,
            amount: raw,
        },
    )
    .await
}

/// Run the `transfer` subcommand.
pub async fn transfer(
    overrides: Overrides,
    to: Address,
    amount: Decimal,
    skip_confirm: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (hooks, symbol, decimals) = prepare(overrides).await?;
    let raw = parse_units(amount, decimals)?;

    println!("\n=== Transfer Summary ===");
    println!("  Token:  {}", hooks.token.address());
    println!("  To:     {to}");
    println!("  Amount: {amount} {symbol}");
    println!("========================\n");

    if !confirm("transfer", skip_confirm)? {
        return Ok(());
    }

    settle(&hooks.transfer, Transfer { to, amount: raw }).await
}

/// Run the `transfer-from` subcommand.
pub async fn transfer_from(
    overrides: Overrides,
    from: Address,
    to: Address,
    amount: Decimal,
    skip_confirm: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (hooks, symbol, decimals) = prepare(overrides).await?;
    let raw = parse_units(amount, decimals)?;

    println!("\n=== Transfer-From Summary ===");
    println!("  Token:  {}", hooks.token.address());
    println!("  From:   {from}");
    println!("  To:     {to}");
    println!("  Amount: {amount} {symbol}");
    println!("=============================\n");

    if !confirm("transfer", skip_confirm)? {
        return Ok(());
    }

    settle(
        &hooks.transfer_from,
        TransferFrom {
            from,
            to,
            amount: raw,
        },
    )
    .await
}

/// Opens the hooks and fetches what the summary needs. Fails early on a
/// read-only connection so nothing is prompted for in vain.
async fn prepare(
    overrides: Overrides,
) -> Result<(TokenHooks, String, u8), Box<dyn std::error::Error>> {
    let config = resolve_config(overrides)?;
    if config.is_read_only() {
        return Err("write commands need a signer (set `signer` in the config or pass --private-key-env)".into());
    }
    let hooks = open_hooks(&config)?;
    let (symbol, decimals) = tokio::try_join!(hooks.token.symbol(), hooks.token.decimals())?;
    Ok((hooks, symbol, decimals))
}

fn confirm(action: &str, skip_confirm: bool) -> Result<bool, Box<dyn std::error::Error>> {
    if skip_confirm {
        return Ok(true);
    }
    eprint!("Confirm {action}? [y/N] ");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    if input.trim().eq_ignore_ascii_case("y") {
        Ok(true)
    } else {
        println!("Cancelled.");
        Ok(false)
    }
}

/// Triggers `op` and waits for the next settlement of its result cell.
async fn settle<A: WriteCall>(op: &WriteOp<A>, args: A) -> Result<(), Box<dyn std::error::Error>> {
    let mut settled = op.subscribe();
    op.trigger(args);
    settled.changed().await?;

    let outcome = settled
        .borrow_and_update()
        .clone()
        .ok_or("result cell changed without an outcome")?;

    let tx_hash = outcome
        .into_result()
        .map_err(|e| format!("{} failed: {e}", A::NAME))?;
    println!("✅ Transaction sent! Hash: {tx_hash}");
    Ok(())
}
