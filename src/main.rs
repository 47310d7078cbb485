//! `aogo` command-line client.
//!
//! Every subcommand maps onto one operation of the claim program or the
//! authorization service. Results are printed to stdout as JSON; logs go to
//! stderr.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;

use aogo_client::blockchain::{Amount, ProgramAddresses, TokenBalance, Wallet};
use aogo_client::claims::claim_from_service;
use aogo_client::config::load_or_default;
use aogo_client::observability::logging;
use aogo_client::AogoContext;

#[derive(Parser)]
#[command(name = "aogo")]
#[command(about = "Client for the Aogo token-claim program", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "aogo.toml")]
    config: PathBuf,

    /// Credential file; overrides `wallet.keypair_path`
    #[arg(short, long)]
    keypair: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the wallet address
    Address,
    /// Create the global account and set the claim authorizer
    Initialize {
        #[arg(long)]
        authorizer: String,
    },
    /// Create the vault of a mint
    InitializeVault {
        #[arg(long)]
        mint: String,
    },
    /// Create a name-seeded token with metadata
    CreateToken {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        uri: String,
    },
    /// Mint tokens of a named token to a recipient
    MintToken {
        #[arg(long)]
        name: String,
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        amount: Amount,
    },
    /// Fetch the current voucher and redeem it
    Claim,
    /// Show the claim history of an address (defaults to the wallet)
    ClaimLogs {
        #[arg(long)]
        address: Option<String>,
    },
    /// Withdraw tokens from a vault
    EmergencyWithdraw {
        #[arg(long)]
        mint: String,
        #[arg(long)]
        amount: Amount,
        #[arg(long)]
        recipient: String,
    },
    /// Token balance of an owner's associated account, or of a vault
    Balance {
        #[arg(long)]
        mint: String,
        /// Owner address (defaults to the wallet)
        #[arg(long, conflicts_with = "vault")]
        owner: Option<String>,
        /// Query the vault of the mint instead of an owner
        #[arg(long)]
        vault: bool,
    },
    /// Show the global account
    Global,
    /// Show the per-user account (defaults to the wallet)
    User {
        #[arg(long)]
        address: Option<String>,
    },
    /// Show the metadata of a named token
    Metadata {
        #[arg(long)]
        name: String,
    },
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, Box<dyn std::error::Error>> {
    Pubkey::from_str(value).map_err(|e| format!("invalid {} '{}': {}", field, value, e).into())
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A missing token account is reported as an empty object.
fn balance_output(
    balance: Option<TokenBalance>,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    Ok(match balance {
        Some(balance) => serde_json::to_value(balance)?,
        None => json!({}),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(&cli.config)?;
    logging::init(&config.observability);

    let keypair_path = cli
        .keypair
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.wallet.keypair_path));
    let ctx = AogoContext::new(config)?;
    let builder = ctx.builder();

    let load_wallet = || Wallet::load(&keypair_path);

    match cli.command {
        Commands::Address => {
            let wallet = load_wallet()?;
            print_json(&json!({ "address": wallet.pubkey().to_string() }))?;
        }
        Commands::Initialize { authorizer } => {
            let wallet = load_wallet()?;
            let authorizer = parse_pubkey("authorizer", &authorizer)?;
            let signature = builder.initialize(wallet.keypair(), &authorizer).await?;
            print_json(&json!({
                "signature": signature.to_string(),
                "global": ctx.addresses().global().to_string(),
            }))?;
        }
        Commands::InitializeVault { mint } => {
            let wallet = load_wallet()?;
            let mint = parse_pubkey("mint", &mint)?;
            let signature = builder.initialize_vault(wallet.keypair(), &mint).await?;
            print_json(&json!({
                "signature": signature.to_string(),
                "vault": ctx.addresses().vault(&mint).to_string(),
            }))?;
        }
        Commands::CreateToken { name, symbol, uri } => {
            let wallet = load_wallet()?;
            let mint = ctx.addresses().token_mint(&name)?;
            let signature = builder
                .create_token(wallet.keypair(), &name, &symbol, &uri)
                .await?;
            print_json(&json!({
                "signature": signature.to_string(),
                "mint": mint.to_string(),
                "metadata": ProgramAddresses::metadata(&mint).to_string(),
            }))?;
        }
        Commands::MintToken {
            name,
            recipient,
            amount,
        } => {
            let wallet = load_wallet()?;
            let recipient = parse_pubkey("recipient", &recipient)?;
            let signature = builder
                .mint_token(wallet.keypair(), &name, &recipient, amount)
                .await?;
            print_json(&json!({ "signature": signature.to_string() }))?;
        }
        Commands::Claim => {
            let wallet = load_wallet()?;
            let signature = claim_from_service(ctx.service(), builder, wallet.keypair()).await?;
            print_json(&json!({ "signature": signature.to_string() }))?;
        }
        Commands::ClaimLogs { address } => {
            let address = match address {
                Some(a) => parse_pubkey("address", &a)?,
                None => load_wallet()?.pubkey(),
            };
            let history = ctx.service().fetch_claim_history(&address).await?;
            print_json(&history)?;
        }
        Commands::EmergencyWithdraw {
            mint,
            amount,
            recipient,
        } => {
            let wallet = load_wallet()?;
            let mint = parse_pubkey("mint", &mint)?;
            let recipient = parse_pubkey("recipient", &recipient)?;
            let signature = builder
                .emergency_withdraw(wallet.keypair(), &mint, amount, &recipient)
                .await?;
            print_json(&json!({ "signature": signature.to_string() }))?;
        }
        Commands::Balance { mint, owner, vault } => {
            let mint = parse_pubkey("mint", &mint)?;
            let balance = if vault {
                builder.vault_balance(&mint).await
            } else {
                let owner = match owner {
                    Some(o) => parse_pubkey("owner", &o)?,
                    None => load_wallet()?.pubkey(),
                };
                let token_account = ProgramAddresses::associated_token_account(&owner, &mint);
                builder.get_token_balance(&token_account).await
            };
            print_json(&balance_output(balance)?)?;
        }
        Commands::Global => {
            print_json(&builder.query_global_account().await?)?;
        }
        Commands::User { address } => {
            let address = match address {
                Some(a) => parse_pubkey("address", &a)?,
                None => load_wallet()?.pubkey(),
            };
            print_json(&builder.query_user_account(&address).await?)?;
        }
        Commands::Metadata { name } => {
            print_json(&builder.query_token_metadata(&name).await?)?;
        }
    }

    Ok(())
}
