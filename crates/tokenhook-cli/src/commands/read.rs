//! `tokenhook info`, `tokenhook balance`, `tokenhook allowance`: read-only
//! calls against the bound token.

use tokenhook_evm::amount::format_units;
use tokenhook_evm::Address;

use super::{open_hooks, resolve_config, Overrides};

/// Run the `info` subcommand.
pub async fn info(overrides: Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(overrides)?;
    let hooks = open_hooks(&config)?;
    let info = hooks.token.info().await?;

    println!("Token:        {}", hooks.token.address());
    println!("Name:         {}", info.name);
    println!("Symbol:       {}", info.symbol);
    println!("Decimals:     {}", info.decimals);
    println!(
        "Total supply: {} {}",
        format_units(info.total_supply, info.decimals),
        info.symbol
    );
    Ok(())
}

/// Run the `balance` subcommand.
pub async fn balance(overrides: Overrides, owner: Address) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(overrides)?;
    let hooks = open_hooks(&config)?;
    let token = &hooks.token;

    let (raw, decimals, symbol) =
        tokio::try_join!(token.balance_of(owner), token.decimals(), token.symbol())?;

    println!("{} {symbol} ({raw} base units)", format_units(raw, decimals));
    Ok(())
}

/// Run the `allowance` subcommand.
pub async fn allowance(
    overrides: Overrides,
    owner: Address,
    spender: Address,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(overrides)?;
    let hooks = open_hooks(&config)?;
    let token = &hooks.token;

    let (raw, decimals, symbol) = tokio::try_join!(
        token.allowance(owner, spender),
        token.decimals(),
        token.symbol()
    )?;

    println!(
        "{owner} allows {spender} to spend {} {symbol} ({raw} base units)",
        format_units(raw, decimals)
    );
    Ok(())
}
