//! Offchain CLI - dashboard server and one-shot actions
//!
//!   offchain serve                      → HTTP dashboard over an emulated ledger
//!   offchain policy                     → {"policy_id", "unit", ...}
//!   offchain contract --address <addr>  → {"owner", "network", "address"}
//!   offchain run mint deposit withdraw  → run actions in order, print outcomes
//!
//! Output format:
//!   --json     Output raw JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use anyhow::{anyhow, Context, Result};
use offchain::core::consts::asset;
use offchain::core::Network;
use offchain::logging::init_logging;
use offchain::{load_dotenv, Action, AppConfig, Dispatcher, Emulator, Recorder};
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{debug, info};

fn main() {
    if let Err(e) = load_dotenv(".env") {
        eprintln!("warning: {:#}", e);
    }
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(args.get(1..).unwrap_or_default());

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("offchain {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("serve") => cmd_serve(&opts),
        Some("policy") => cmd_policy(&opts),
        Some("contract") => cmd_contract(&opts),
        Some("run") => cmd_run(&opts),
        Some("help") | None => {
            print_usage();
            return;
        }
        Some(cmd) => Err(anyhow!("Unknown command: {}", cmd)),
    };

    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());
    match result {
        Ok(output) => {
            println!("{}", render(&output, pretty));
            if output.get("success") == Some(&Value::Bool(false)) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}", render(&json!({"error": format!("{:#}", e)}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    }
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    actions: Vec<String>,
    network: Option<String>,
    address: Option<String>,
    port: Option<u16>,
    funds: Option<i128>,
    // Output options
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--pretty" => opts.pretty = true,
                "--network" | "-n" => {
                    if i + 1 < args.len() {
                        opts.network = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--address" | "-a" => {
                    if i + 1 < args.len() {
                        opts.address = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--port" | "-p" => {
                    if i + 1 < args.len() {
                        opts.port = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                "--funds" => {
                    if i + 1 < args.len() {
                        opts.funds = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => debug!("ignoring unknown flag {}", arg),
            }
            i += 1;
        }

        // First positional is command, the rest are actions
        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        opts.actions = positional;
        opts
    }

    /// Env (and `.env`) first, flags on top.
    fn config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::from_env()?;
        if let Some(network) = self.network.as_deref() {
            config = config.with_network(Network::parse(network).map_err(|e| anyhow!("--network: {}", e))?);
        }
        if let Some(address) = self.address.as_deref() {
            config = config.with_address(address);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(funds) = self.funds {
            config = config.with_funds(funds);
        }
        config.validate()?;
        Ok(config)
    }
}

fn print_usage() {
    println!(
        r#"offchain - mint, burn, deposit and withdraw against two fixed Plutus V3 scripts

USAGE:
    offchain <command> [actions...] [options]

COMMANDS:
    serve                   Start HTTP dashboard (emulated ledger)
    policy                  Print policy id and asset unit
    contract                Print the contract address for --address
    run <action>...         Run actions in order: mint|burn|deposit|withdraw
    help                    Print this message

OPTIONS:
    --address, -a <addr>    Wallet address (env: OFFCHAIN_ADDRESS)
    --network, -n <net>     Network: mainnet|preprod|preview|custom (env: OFFCHAIN_NETWORK)
    --port, -p <port>       Server port (default: 8080, env: OFFCHAIN_PORT)
    --funds <lovelace>      Emulator wallet funds (env: OFFCHAIN_FUNDS)

OUTPUT OPTIONS:
    --json                  Raw JSON output
    --pretty                Pretty-print JSON
    --version, -V           Print version

EXAMPLES:
    offchain policy
    offchain contract --address addr_test1vq... --network preprod
    offchain run mint deposit withdraw burn
    offchain run mint --json | jq '.outcomes[0].tx_hash'
"#
    );
}

fn dispatcher(config: &AppConfig) -> Result<Dispatcher<Emulator, Recorder>> {
    let session = Emulator::new(config.address.clone(), config.emulator())
        .with_context(|| format!("wallet address {}", config.address))?;
    Ok(Dispatcher::new(Arc::new(session), config.address.clone(), Recorder::new()))
}

fn cmd_policy(opts: &ParsedArgs) -> Result<Value> {
    let config = opts.config()?;
    let dispatcher = dispatcher(&config)?;
    Ok(json!({
        "policy_id": dispatcher.policy_id()?,
        "asset_name": asset::NAME,
        "unit": dispatcher.asset_unit()?.to_string(),
    }))
}

fn cmd_contract(opts: &ParsedArgs) -> Result<Value> {
    let config = opts.config()?;
    let dispatcher = dispatcher(&config)?;
    Ok(json!({
        "owner": config.address,
        "network": config.network.as_str(),
        "address": dispatcher.contract_address()?,
    }))
}

fn cmd_run(opts: &ParsedArgs) -> Result<Value> {
    if opts.actions.is_empty() {
        return Err(anyhow!("run needs at least one action: mint|burn|deposit|withdraw"));
    }
    let actions = opts
        .actions
        .iter()
        .map(|name| Action::parse(name).ok_or_else(|| anyhow!("Unknown action: {}", name)))
        .collect::<Result<Vec<_>>>()?;

    let config = opts.config()?;
    let dispatcher = dispatcher(&config)?;
    let contract = dispatcher.contract_address()?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
    rt.block_on(async {
        for action in &actions {
            dispatcher.dispatch(*action).await;
        }
    });

    let outcomes = dispatcher.reporter().outcomes();
    let success = outcomes.iter().all(|o| o.error().is_none());
    let session = dispatcher.session();
    Ok(json!({
        "success": success,
        "outcomes": outcomes,
        "wallet": session.balance_of(&config.address),
        "contract": session.balance_of(&contract),
    }))
}

fn cmd_serve(opts: &ParsedArgs) -> Result<Value> {
    use offchain::server::create_router_with_name;
    use offchain::shutdown_signal;

    let config = opts.config()?;
    let dispatcher = dispatcher(&config)?;
    let session = dispatcher.session().clone();

    let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
    rt.block_on(async {
        let router = create_router_with_name(session, &config.address, &config.app);
        let addr = format!("0.0.0.0:{}", config.port);

        info!("{} listening on http://{}", config.app, addr);
        info!("Endpoints:");
        info!("  GET  /                  - Dashboard");
        info!("  GET  /health            - Health check");
        info!("  POST /actions/:action   - mint | burn | deposit | withdraw");
        debug!("  GET  /actions           - Layout JSON");
        debug!("  GET  /wallet, /contract - Holdings");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        info!("Server stopped");
        Ok::<_, anyhow::Error>(json!({"status": "stopped"}))
    })
}
