use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "ledger-cli")]
#[command(about = "Command-line client for the ledger gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "LEDGER_GATEWAY_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the contract balance
    Balance,
    /// Show the contract administrator
    Admin,
    /// Check gateway and chain health
    Health,
    /// Deposit an amount into the contract
    Deposit(WriteArgs),
    /// Withdraw an amount from the contract
    Withdraw(WriteArgs),
}

#[derive(Args)]
struct WriteArgs {
    /// Amount in the contract's smallest unit
    amount: String,

    /// Account private key (hex)
    #[arg(short, long, env = "LEDGER_ACCOUNT_PRIVATE_KEY", hide_env_values = true)]
    key: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Balance => client.get(format!("{}/balance", base)).send().await?,
        Commands::Admin => client.get(format!("{}/admin", base)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Deposit(args) => {
            client
                .post(format!("{}/deposit/{}", base, args.amount))
                .json(&json!({ "accountPrivateKey": args.key }))
                .send()
                .await?
        }
        Commands::Withdraw(args) => {
            client
                .post(format!("{}/withdrawal/{}", base, args.amount))
                .json(&json!({ "accountPrivateKey": args.key }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body: Value = res.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("{}", serde_json::to_string_pretty(&body)?);
        std::process::exit(1);
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
