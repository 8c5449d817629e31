//! Info command - show information about the husk bridge.

use husk_abi::{constants, Constant, ErrorKind, LangVariant};
use husk_bridge::{live_handles, BridgeConfig};

pub fn run() -> miette::Result<()> {
    println!("Husk Bridge");
    println!("===========");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Components:");
    println!("  husk-abi     - Shared constants, error kinds and dialects");
    println!("  husk-bridge  - C ABI for streams, maps, lists and errors");
    println!("  husk-cli     - This tool");
    println!();

    println!("Constants: {} assigned", Constant::ALL.len());
    let kinds: Vec<_> = ErrorKind::ALL.iter().map(|k| k.as_str()).collect();
    println!("  error kinds: {}", kinds.join(", "));
    let langs: Vec<_> = LangVariant::ALL.iter().map(|v| v.name()).collect();
    println!("  dialects:    {}, auto", langs.join(", "));
    println!(
        "  auto code:   {}",
        constants().value(Constant::LangAuto)
    );
    println!();

    let config = BridgeConfig::from_env();
    println!("Configuration:");
    println!("  HUSK_HANDLE_LIMIT = {}", config.handle_limit);
    println!("  HUSK_TRACE_READS  = {}", config.trace_reads);
    println!("  live handles      = {}", live_handles());

    Ok(())
}
