//! `jkr` CLI — convert Balatro `.jkr` save files to and from JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Decode a save file to pretty-printed JSON
//! jkr decode -i meta.jkr -o meta.json
//!
//! # Encode edited JSON back into a save file
//! jkr encode -i meta.json -o meta.jkr
//!
//! # Encode to a base64 JSON envelope for an HTTP body
//! jkr encode --payload -i meta.json
//!
//! # Inspect the raw table literal inside a save file
//! jkr unpack -i profile.jkr
//!
//! # Compress hand-edited table literal text
//! jkr pack -i profile.lua -o profile.jkr
//!
//! # Show what kind of save a file is and how big it is
//! jkr info -i profile.jkr
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG` (default `warn`) or pass `-v` for debug output.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jkr_core::transport::{self, JkrPayload};
use jkr_core::{EncodeOptions, SaveKind, SerializeOptions, StringStyle};
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jkr",
    version,
    about = "Balatro .jkr save file converter"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log codec activity at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a .jkr file to JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Input is base64 text or a base64 JSON envelope instead of raw bytes
        #[arg(long)]
        base64: bool,
        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Encode JSON into a .jkr file
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write bare base64 text instead of raw bytes
        #[arg(long, conflicts_with = "payload")]
        base64: bool,
        /// Write a base64 JSON envelope ({"jkr_content": ..., "encoding": "base64"})
        #[arg(long)]
        payload: bool,
        /// DEFLATE level, 0-9
        #[arg(long, default_value_t = jkr_core::container::DEFAULT_LEVEL,
              value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,
        /// Escape quotes, backslashes and control characters inside strings
        #[arg(long)]
        escape_strings: bool,
    },
    /// Inflate a .jkr file to its raw table literal text
    Unpack {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compress table literal text into a .jkr file
    Pack {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// DEFLATE level, 0-9
        #[arg(long, default_value_t = jkr_core::container::DEFAULT_LEVEL,
              value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,
    },
    /// Show save kind and sizes of a .jkr file
    Info {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Decode {
            input,
            output,
            base64,
            compact,
        } => {
            let raw = read_input(input.as_deref())?;
            let bytes = if base64 {
                decode_base64_input(&raw)?
            } else {
                raw
            };
            let json = jkr_core::from_jkr(&bytes).context("Failed to decode JKR to JSON")?;
            let text = if compact {
                serde_json::to_string(&json)?
            } else {
                serde_json::to_string_pretty(&json)?
            };
            write_output(output.as_deref(), text.as_bytes())?;
        }
        Commands::Encode {
            input,
            output,
            base64,
            payload,
            level,
            escape_strings,
        } => {
            let raw = read_input_text(input.as_deref())?;
            let json: serde_json::Value =
                serde_json::from_str(&raw).context("Failed to parse input as JSON")?;
            if SaveKind::detect(&json).is_none() {
                tracing::warn!("input does not look like meta.jkr or profile.jkr data");
            }

            let options = EncodeOptions {
                serialize: SerializeOptions {
                    strings: if escape_strings {
                        StringStyle::Escaped
                    } else {
                        StringStyle::Verbatim
                    },
                },
                level,
            };
            let bytes =
                jkr_core::to_jkr_with(&json, &options).context("Failed to encode JSON to JKR")?;

            if payload {
                let envelope = serde_json::to_string(&JkrPayload::from_bytes(&bytes))?;
                write_output(output.as_deref(), envelope.as_bytes())?;
            } else if base64 {
                write_output(output.as_deref(), transport::to_base64(&bytes).as_bytes())?;
            } else {
                write_output(output.as_deref(), &bytes)?;
            }
        }
        Commands::Unpack { input, output } => {
            let bytes = read_input(input.as_deref())?;
            let text = jkr_core::decompress(&bytes).context("Failed to inflate JKR data")?;
            write_output(output.as_deref(), text.as_bytes())?;
        }
        Commands::Pack {
            input,
            output,
            level,
        } => {
            let text = read_input_text(input.as_deref())?;
            jkr_core::deserialize(&text).context("Input is not a valid table literal")?;
            let bytes = jkr_core::container::compress_with_level(&text, level)
                .context("Failed to compress table literal")?;
            write_output(output.as_deref(), &bytes)?;
        }
        Commands::Info { input } => {
            let bytes = read_input(input.as_deref())?;
            let text = jkr_core::decompress(&bytes).context("Failed to inflate JKR data")?;
            let value = jkr_core::deserialize(&text).context("Failed to parse table literal")?;
            let json = value
                .to_tagged_json()
                .and_then(jkr_core::decode_keys)
                .context("Failed to decode JKR to JSON")?;
            let kind = SaveKind::detect(&json)
                .map(|k| k.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let keys = json.as_object().map(|m| m.len()).unwrap_or(0);
            println!("Kind:       {}", kind);
            println!("JKR size:   {} bytes", bytes.len());
            println!("Text size:  {} bytes", text.len());
            println!("Top-level:  {} keys", keys);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Accept either bare base64 or a `{"jkr_content": ...}` envelope.
fn decode_base64_input(raw: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(raw).context("Base64 input is not valid UTF-8")?;
    let text = text.trim();
    if text.starts_with('{') {
        let payload: JkrPayload =
            serde_json::from_str(text).context("Failed to parse base64 JSON envelope")?;
        payload.to_bytes().context("Envelope content is not valid base64")
    } else {
        transport::from_base64(text).context("Input is not valid base64")
    }
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn read_input_text(path: Option<&str>) -> Result<String> {
    let bytes = read_input(path)?;
    String::from_utf8(bytes).context("Input is not valid UTF-8")
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
