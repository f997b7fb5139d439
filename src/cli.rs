use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use wodpush::adapters::HttpServerApi;
use wodpush::config::ClientConfig;
use wodpush::push::key_codec;
use wodpush::push::vapid::{self, VapidKeyPair};
use wodpush::push::{KeyCache, Session};
use wodpush::worker;

#[derive(Parser, Debug)]
#[command(
    name = "wodpush",
    version,
    about = "Push notification enrollment tools for WodBooker"
)]
struct Cli {
    #[arg(long, env = "WODPUSH_CONFIG", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a VAPID key pair for the server
    Init(InitArgs),
    /// Fetch the server's public key and check that browsers can use it
    CheckKey(CheckKeyArgs),
    /// Show the notification a push payload would produce
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Contact address for the VAPID claim
    email: Option<String>,
    /// Reuse an existing private key and print its public half
    #[arg(long, value_name = "PRIVATE_KEY")]
    from_private: Option<String>,
}

#[derive(Args, Debug)]
struct CheckKeyArgs {
    #[arg(long, env = "WODPUSH_SERVER")]
    server: String,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Raw push message text; omit to preview a push without data
    payload: Option<String>,
}

pub(crate) async fn run() -> i32 {
    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };

    match cli.command {
        Command::Init(args) => run_init(args),
        Command::CheckKey(args) => run_check_key(args, &config).await,
        Command::Preview(args) => run_preview(args, &config),
    }
}

fn load_config(path: Option<&Path>) -> Result<ClientConfig, String> {
    let Some(path) = path else {
        return Ok(ClientConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {err}", path.display()))?;
    ClientConfig::from_toml_str(&raw)
        .map_err(|err| format!("invalid config {}: {err}", path.display()))
}

fn run_init(args: InitArgs) -> i32 {
    let keys = match args.from_private.as_deref() {
        Some(private_key) => VapidKeyPair::from_private_key(private_key),
        None => vapid::generate_vapid_keys(),
    };
    let keys = match keys {
        Ok(keys) => keys,
        Err(err) => {
            eprintln!("failed to prepare VAPID keys: {err}");
            return 1;
        }
    };
    let claim = vapid::claim_email(args.email.as_deref());

    println!("VAPID keys ready.");
    println!();
    println!("VAPID_PUBLIC_KEY=\"{}\"", keys.public_key);
    println!("VAPID_PRIVATE_KEY=\"{}\"", keys.private_key);
    println!("VAPID_CLAIM_EMAIL=\"{claim}\"");
    println!();
    println!("Keep VAPID_PRIVATE_KEY secret.");
    0
}

async fn run_check_key(args: CheckKeyArgs, config: &ClientConfig) -> i32 {
    let api = match HttpServerApi::new(&args.server) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };
    let cache = KeyCache::new(api, config.key_endpoint.clone());
    let session: Session<()> = Session::new();

    let key = match cache.get_public_key(&session).await {
        Ok(key) => key,
        Err(err) => {
            eprintln!("key fetch failed: {err}");
            return 1;
        }
    };
    match describe_key(key.as_str()) {
        Ok(report) => {
            println!("{report}");
            0
        }
        Err(report) => {
            eprintln!("{report}");
            1
        }
    }
}

fn describe_key(key: &str) -> Result<String, String> {
    let bytes = key_codec::decode_public_key(key).map_err(|err| format!("public key: {key}\n{err}"))?;
    let valid = key_codec::is_uncompressed_p256_point(&bytes);
    let report = format!(
        "public key: {key}\ndecoded length: {} bytes\nuncompressed P-256 point: {}",
        bytes.len(),
        if valid { "yes" } else { "no" }
    );
    if valid { Ok(report) } else { Err(report) }
}

fn run_preview(args: PreviewArgs, config: &ClientConfig) -> i32 {
    match render_preview(args.payload.as_deref(), config) {
        Ok(rendered) => {
            println!("{rendered}");
            0
        }
        Err(err) => {
            eprintln!("failed to render preview: {err}");
            1
        }
    }
}

fn render_preview(payload: Option<&str>, config: &ClientConfig) -> Result<String, serde_json::Error> {
    let notification = worker::resolve(
        worker::parse_payload(payload, &config.notification),
        &config.notification,
    );
    serde_json::to_string_pretty(&notification)
}
