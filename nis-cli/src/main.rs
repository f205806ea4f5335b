//! NIS command-line host.
//!
//! Drives the push-identity SDK the way a platform integration would:
//! deliver tokens, manage topics and user association, inspect state.
//!
//! Usage:
//!   nis --bundle-id com.example.app token <PUSH_TOKEN>
//!   nis --bundle-id com.example.app subscribe news sports
//!   nis --bundle-id com.example.app status
//!
//! The device identity is kept encrypted under `--store-dir`. The key is
//! either a base64 key in `NIS_STORE_KEY` (see `nis keygen`) or derived from
//! `NIS_PASSPHRASE`. With the `os-keyring` feature, `--keyring` keeps the
//! identity in the OS keyring instead.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use nis_sdk::{
    BundleInfo, Configuration, CustomEnvironment, DeviceStorage, Environment, LogLevel,
    NotificationClient, TokenState, TokenTransition,
};
use nis_crypto::generate_random_key;
use nis_storage::{EncryptedFileStore, FileStore, KeyValueStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "nis")]
#[command(about = "Push-notification identity SDK command-line host")]
struct Args {
    /// Host application bundle id (also the storage namespace)
    #[arg(short, long, env = "NIS_BUNDLE_ID")]
    bundle_id: String,

    /// Host application display name
    #[arg(long, default_value = "NIS CLI")]
    app_name: String,

    /// Host application version
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    app_version: String,

    /// Backend API key
    #[arg(long, env = "NIS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Talk to a self-hosted backend instead of the configured environment
    #[arg(long)]
    base_url: Option<String>,

    /// Directory holding the identity and topic files
    #[arg(long, default_value = ".nis")]
    store_dir: PathBuf,

    /// Base64 256-bit key protecting the stored identity (see `keygen`)
    #[arg(long, env = "NIS_STORE_KEY", hide_env_values = true, conflicts_with = "passphrase")]
    store_key: Option<String>,

    /// Passphrase protecting the stored identity
    #[arg(long, env = "NIS_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Keep the identity in the OS keyring instead of an encrypted file
    #[arg(long)]
    keyring: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deliver a push token, registering or updating the device
    Token { token: String },
    /// Subscribe to one or more topics
    Subscribe {
        #[arg(required = true)]
        topics: Vec<String>,
    },
    /// Unsubscribe from one or more topics
    Unsubscribe {
        #[arg(required = true)]
        topics: Vec<String>,
    },
    /// List locally recorded topics
    Topics,
    /// Forget local topics without contacting the backend
    ClearTopics,
    /// Associate the device with a user
    Associate { user_id: String },
    /// Remove the device's user association
    Dissociate,
    /// Record the notification permission state
    Permission {
        #[arg(action = clap::ArgAction::Set)]
        granted: bool,
    },
    /// Show the device identity and subscriptions
    Status,
    /// Forget the device identity and topics
    Reset,
    /// Print the effective configuration as TOML
    Config,
    /// Print a fresh base64 key for NIS_STORE_KEY
    Keygen,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config.log_level
    };
    nis_sdk::logging::init(level);

    match args.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            return Ok(());
        }
        Command::Keygen => {
            println!("{}", generate_random_key().to_base64());
            return Ok(());
        }
        _ => {}
    }

    let bundle = BundleInfo::new(&args.bundle_id, &args.app_name, &args.app_version);
    let storage = open_storage(&args)?;
    let client = NotificationClient::new(config, bundle, storage)?;
    if let Some(api_key) = &args.api_key {
        client.configure(api_key.as_str()).await?;
    } else {
        debug!("no API key given; backend calls will fail");
    }

    run(&client, args.command).await
}

async fn run(client: &NotificationClient, command: Command) -> Result<()> {
    match command {
        Command::Token { token } => match client.handle_new_token(&token).await? {
            TokenTransition::Unchanged => println!("token unchanged"),
            TokenTransition::Registered {
                device_id,
                default_topics,
            } => {
                println!("registered device {device_id}");
                if !default_topics.is_empty() {
                    println!("default topics: {}", default_topics.join(", "));
                }
            }
            TokenTransition::Updated { device_id } => println!("updated token for {device_id}"),
        },
        Command::Subscribe { topics } => {
            client.subscribe_many(&topics).await?;
            println!("subscribed: {}", topics.join(", "));
        }
        Command::Unsubscribe { topics } => {
            client.unsubscribe_many(&topics).await?;
            println!("unsubscribed: {}", topics.join(", "));
        }
        Command::Topics => {
            for topic in client.subscribed_topics().iter() {
                println!("{topic}");
            }
        }
        Command::ClearTopics => {
            client.clear_topics().await?;
            println!("local topics cleared");
        }
        Command::Associate { user_id } => {
            client.associate_user(&user_id).await?;
            println!("associated user {user_id}");
        }
        Command::Dissociate => {
            client.remove_user_association().await?;
            println!("user association removed");
        }
        Command::Permission { granted } => {
            client.handle_permission_change(granted);
            println!("permission granted: {granted}");
        }
        Command::Status => print_status(client),
        Command::Reset => {
            client.reset().await?;
            println!("device identity and topics cleared");
        }
        Command::Config | Command::Keygen => {}
    }
    Ok(())
}

fn print_status(client: &NotificationClient) {
    let topics = client.subscribed_topics();
    println!("\n========================================");
    println!("  NIS Device Status");
    println!("========================================");
    println!("  Environment: {}", client.configuration().environment);
    println!("  Bundle:      {}", client.bundle().bundle_id);
    match client.token_state() {
        TokenState::Registered { device_id, token } => {
            println!("  Device:      {device_id}");
            println!("  Token:       {}", redact(&token));
        }
        other => println!("  State:       {other:?}"),
    }
    println!("  Topics:      {}", topics.len());
    for topic in topics.iter() {
        println!("    - {topic}");
    }
    println!("========================================\n");
}

fn redact(token: &str) -> String {
    let visible: String = token.chars().take(6).collect();
    if token.chars().count() > 6 {
        format!("{visible}…")
    } else {
        visible
    }
}

fn load_config(args: &Args) -> Result<Configuration> {
    let mut config = match &args.config {
        Some(path) => Configuration::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Configuration::production(),
    };
    if let Some(base_url) = &args.base_url {
        let mut custom = CustomEnvironment::new(base_url);
        if base_url.starts_with("http://") {
            custom = custom.without_ssl_pinning();
        }
        config.environment = Environment::Custom(custom);
    }
    Ok(config)
}

fn open_storage(args: &Args) -> Result<DeviceStorage> {
    let namespace = args.bundle_id.as_str();
    let prefs = FileStore::open(&args.store_dir, namespace)
        .with_context(|| format!("opening topic store in {}", args.store_dir.display()))?;
    let secure = secure_store(args)?;
    Ok(DeviceStorage::new(namespace, secure, Arc::new(prefs)))
}

#[cfg(feature = "os-keyring")]
fn secure_store(args: &Args) -> Result<Arc<dyn KeyValueStore>> {
    if args.keyring {
        return Ok(Arc::new(nis_storage::KeyringStore::new(&args.bundle_id)));
    }
    encrypted_store(args)
}

#[cfg(not(feature = "os-keyring"))]
fn secure_store(args: &Args) -> Result<Arc<dyn KeyValueStore>> {
    if args.keyring {
        bail!("this build has no OS keyring support; rebuild with --features os-keyring");
    }
    encrypted_store(args)
}

fn encrypted_store(args: &Args) -> Result<Arc<dyn KeyValueStore>> {
    let store = match (&args.store_key, &args.passphrase) {
        (Some(key), _) => {
            EncryptedFileStore::open_with_encoded_key(&args.store_dir, &args.bundle_id, key)
        }
        (None, Some(passphrase)) => {
            EncryptedFileStore::open_with_passphrase(&args.store_dir, &args.bundle_id, passphrase)
        }
        (None, None) => bail!(
            "set NIS_STORE_KEY or NIS_PASSPHRASE (or --store-key / --passphrase) to protect the stored identity"
        ),
    }
    .with_context(|| format!("opening identity store in {}", args.store_dir.display()))?;
    Ok(Arc::new(store))
}
