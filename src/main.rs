use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use criptes::cli::{self, Context, PASSWORD_ENV};
use criptes::crypto::{HashAlgorithm, SymmetricAlgorithm};
use criptes::Result;

#[derive(Parser)]
#[command(name = "criptes")]
#[command(version)]
#[command(about = "Educational cryptography toolkit: ciphers, RSA, hashes and steganography", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt text with a password
    Encrypt {
        text: String,
        /// aes, des, 3des or chacha20
        #[arg(short, long)]
        algorithm: Option<SymmetricAlgorithm>,
        #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Decrypt a base64 envelope with a password
    Decrypt {
        envelope: String,
        #[arg(short, long)]
        algorithm: Option<SymmetricAlgorithm>,
        #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// List supported algorithms
    Algorithms,

    /// RSA-2048 key pairs and OAEP encryption
    Rsa {
        #[command(subcommand)]
        action: RsaCommands,
    },

    /// Digests, verification and identification
    Hash {
        #[command(subcommand)]
        action: HashCommands,
    },

    /// Hide text in images
    Stego {
        #[command(subcommand)]
        action: StegoCommands,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum RsaCommands {
    /// Generate and store a new key pair
    Keygen {
        /// Replace an existing pair without asking
        #[arg(long)]
        force: bool,
    },
    /// Print the stored public key
    Pubkey,
    /// Encrypt short text (max 200 characters)
    Encrypt {
        text: String,
        /// Public key PEM file instead of the stored one
        #[arg(long)]
        key: Option<PathBuf>,
    },
    /// Decrypt base64 ciphertext
    Decrypt {
        ciphertext: String,
        /// Private key PEM file instead of the stored one
        #[arg(long)]
        key: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum HashCommands {
    /// Hex digest of text
    Digest {
        text: String,
        /// md5, sha1, sha256 or sha512
        #[arg(short, long)]
        algorithm: Option<HashAlgorithm>,
    },
    /// Digest with every algorithm
    All { text: String },
    /// Compare text against an expected digest
    Verify {
        text: String,
        expected: String,
        #[arg(short, long)]
        algorithm: Option<HashAlgorithm>,
    },
    /// Guess the algorithm from a digest's length
    Identify { hex: String },
}

#[derive(Subcommand)]
enum StegoCommands {
    /// How many characters an image can hide
    Capacity { image: PathBuf },
    /// Hide a message and write the result as PNG
    Embed {
        image: PathBuf,
        message: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Recover a hidden message
    Extract { image: PathBuf },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the data directory and current settings
    Show,
    /// Change one setting
    Set { key: String, value: String },
}

fn init_logging(verbose: u8, configured: Option<&str>) {
    let level = match verbose {
        0 => configured.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG takes precedence over both -v and the settings file
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let context = Context::load();

    init_logging(
        cli.verbose,
        context.as_ref().ok().map(|c| c.settings.log_level.as_str()),
    );

    let result = context.and_then(|ctx| run(cli.command, &ctx));

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, ctx: &Context) -> Result<ExitCode> {
    match command {
        Commands::Encrypt { text, algorithm, password } => {
            cli::cipher::encrypt(ctx, &text, algorithm, password)?
        }
        Commands::Decrypt { envelope, algorithm, password } => {
            cli::cipher::decrypt(ctx, &envelope, algorithm, password)?
        }
        Commands::Algorithms => cli::cipher::algorithms(ctx)?,
        Commands::Rsa { action } => match action {
            RsaCommands::Keygen { force } => cli::rsa::keygen(ctx, force)?,
            RsaCommands::Pubkey => cli::rsa::pubkey(ctx)?,
            RsaCommands::Encrypt { text, key } => cli::rsa::encrypt(ctx, &text, key.as_deref())?,
            RsaCommands::Decrypt { ciphertext, key } => {
                cli::rsa::decrypt(ctx, &ciphertext, key.as_deref())?
            }
        },
        Commands::Hash { action } => match action {
            HashCommands::Digest { text, algorithm } => cli::hash::digest(ctx, &text, algorithm)?,
            HashCommands::All { text } => cli::hash::all(&text)?,
            HashCommands::Verify { text, expected, algorithm } => {
                if !cli::hash::verify(ctx, &text, &expected, algorithm)? {
                    return Ok(ExitCode::FAILURE);
                }
            }
            HashCommands::Identify { hex } => cli::hash::identify(&hex)?,
        },
        Commands::Stego { action } => match action {
            StegoCommands::Capacity { image } => cli::stego::capacity(&image)?,
            StegoCommands::Embed { image, message, output } => {
                cli::stego::embed(&image, &message, &output)?
            }
            StegoCommands::Extract { image } => cli::stego::extract(&image)?,
        },
        Commands::Config { action } => match action {
            ConfigCommands::Show => cli::settings::show(ctx)?,
            ConfigCommands::Set { key, value } => cli::settings::set(ctx, &key, &value)?,
        },
    }

    Ok(ExitCode::SUCCESS)
}
