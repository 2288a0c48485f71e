use clap::{Args, Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use tamper_engine::codec::tag_url;
use tamper_engine::protocol::Command;
use tamper_engine::store::{PatternRegistration, RegexSource};
use tamper_engine::TamperSpec;

#[derive(Parser)]
#[command(name = "tamper-cli")]
#[command(about = "Caller CLI for the tamper engine", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:7878")]
    url: String,

    /// Admin API key, used by `status`.
    #[arg(short, long, default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a tagged URL carrying a one-off spec (offline)
    Tag {
        target: String,
        #[command(flatten)]
        spec: SpecArgs,
    },
    /// Register a pattern association
    Register {
        /// Exact URL to match (repeatable)
        #[arg(long = "match-url")]
        urls: Vec<String>,
        /// Regex to match (repeatable)
        #[arg(long = "regex")]
        regexes: Vec<String>,
        /// Flags applied to every --regex
        #[arg(long, default_value = "")]
        flags: String,
        #[command(flatten)]
        spec: SpecArgs,
    },
    /// Log the engine's store contents
    Print,
    /// Send a background message and print the acknowledgement
    Ping { message: String },
    /// Show engine status (admin)
    Status,
}

#[derive(Args)]
struct SpecArgs {
    /// Request header to set, NAME=VALUE (repeatable)
    #[arg(long = "set", value_parser = parse_pair)]
    set: Vec<(String, String)>,
    /// Request header to null out (repeatable)
    #[arg(long = "unset")]
    unset: Vec<String>,
    /// Request header to remove (repeatable)
    #[arg(long = "remove")]
    remove: Vec<String>,
    /// Response header to set, NAME=VALUE (repeatable)
    #[arg(long = "response-set", value_parser = parse_pair)]
    response_set: Vec<(String, String)>,
    /// Response header to remove (repeatable)
    #[arg(long = "response-remove")]
    response_remove: Vec<String>,
    /// Discard after the first terminal response
    #[arg(long)]
    once: bool,
}

impl SpecArgs {
    fn into_spec(self) -> TamperSpec {
        let mut spec = TamperSpec::new();
        for (name, value) in self.set {
            spec = spec.set_header(name, value);
        }
        for name in self.unset {
            spec = spec.unset_header(name);
        }
        for name in self.remove {
            spec = spec.remove_header(name);
        }
        for (name, value) in self.response_set {
            spec = spec.set_response_header(name, value);
        }
        for name in self.response_remove {
            spec = spec.remove_response_header(name);
        }
        if self.once {
            spec = spec.once();
        }
        spec
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Tag { target, spec } => {
            println!("{}", tag_url(&target, &spec.into_spec())?);
        }
        Commands::Register {
            urls,
            regexes,
            flags,
            spec,
        } => {
            let registration = PatternRegistration {
                regexes: (!regexes.is_empty()).then(|| {
                    regexes
                        .into_iter()
                        .map(|pattern| RegexSource::Pair(pattern, flags.clone()))
                        .collect()
                }),
                urls: (!urls.is_empty()).then_some(urls),
                tamper: Some(spec.into_spec()),
            };
            send_command(&client, &cli.url, Command::MetaTamper(registration)).await?;
        }
        Commands::Print => {
            send_command(&client, &cli.url, Command::Print).await?;
        }
        Commands::Ping { message } => {
            send_command(&client, &cli.url, Command::SendBackground(Value::String(message))).await?;
        }
        Commands::Status => {
            let mut headers = HeaderMap::new();
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
            );
            let res = client
                .get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn send_command(
    client: &reqwest::Client,
    base: &str,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    let res = client
        .post(format!("{}/command", base))
        .json(&command.to_message())
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: engine returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
