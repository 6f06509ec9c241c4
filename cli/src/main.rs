// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # MARK Developer Tool
//!
//! Entry point for the `mark-cli` binary. Parses CLI arguments, initializes
//! logging and dispatches to a subcommand:
//!
//! - `keygen`  — generate a keypair (runs the crypto self test first)
//! - `inspect` — identify a WIF and print what it derives to
//! - `asset`   — fixed-point arithmetic on MARK amounts
//! - `decode`  — decode a hex RPC message
//! - `version` — print build and wire version information

mod cli;
mod logging;

use std::cmp::Ordering;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;

use mark_protocol::codec::ByteBuffer;
use mark_protocol::config::{BLOCK_VERSION_V0, PUB_ADDRESS_PREFIX, TX_VERSION_V0};
use mark_protocol::crypto::{self, KeyPair, PublicKey, ScriptHash};
use mark_protocol::{Asset, Msg};

use cli::{AssetArgs, AssetOp, Commands, DecodeArgs, InspectArgs, KeygenArgs, MarkCli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = MarkCli::parse();
    let directive = logging::filter_directive(&cli.log_level, cli.verbose);
    logging::init_logging(&directive, cli.log_format)?;

    let output = match cli.command {
        Commands::Keygen(args) => keygen(args).await?,
        Commands::Inspect(args) => inspect(&args)?,
        Commands::Asset(args) => asset(&args)?,
        Commands::Decode(args) => decode(&args)?,
        Commands::Version => version(),
    };
    println!("{output}");
    Ok(())
}

async fn keygen(args: KeygenArgs) -> Result<String> {
    let ready = crypto::init()
        .await
        .context("crypto backend failed its self test")?;
    let key_pair = crypto::generate_keypair(&ready);
    tracing::info!(public_key = %key_pair.public_key, "generated keypair");

    Ok(describe_key_pair(&key_pair, args.json))
}

fn describe_key_pair(key_pair: &KeyPair, as_json: bool) -> String {
    let address = key_pair.public_key.to_script().hash();
    if as_json {
        json!({
            "kind": "private_key",
            "private_key": key_pair.private_key.to_wif(),
            "public_key": key_pair.public_key,
            "address": address,
        })
        .to_string()
    } else {
        format!(
            "Private key : {}\nPublic key  : {}\nAddress     : {}",
            key_pair.private_key.to_wif(),
            key_pair.public_key,
            address,
        )
    }
}

/// Private WIFs carry no tag. Tagged WIFs are a public key or a script hash,
/// told apart by their prefix byte.
fn inspect(args: &InspectArgs) -> Result<String> {
    let wif = args.wif.trim();
    if !wif.starts_with(PUB_ADDRESS_PREFIX) {
        let key_pair = KeyPair::from_wif(wif).context("not a private key WIF")?;
        return Ok(describe_key_pair(&key_pair, args.json));
    }

    if let Ok(public_key) = PublicKey::from_wif(wif) {
        let address = public_key.to_script().hash();
        return Ok(if args.json {
            json!({
                "kind": "public_key",
                "public_key": public_key,
                "public_key_hex": hex::encode(public_key.as_bytes()),
                "address": address,
            })
            .to_string()
        } else {
            format!(
                "Public key  : {}\nHex         : {}\nAddress     : {}",
                public_key,
                hex::encode(public_key.as_bytes()),
                address,
            )
        });
    }

    match ScriptHash::from_wif(wif) {
        Ok(hash) => Ok(if args.json {
            json!({
                "kind": "script_hash",
                "address": hash,
                "hash_hex": hash.0.to_hex(),
            })
            .to_string()
        } else {
            format!("Address     : {}\nHash        : {}", hash, hash.0.to_hex())
        }),
        Err(e) => bail!("not a public key or script hash WIF: {e}"),
    }
}

fn asset(args: &AssetArgs) -> Result<String> {
    let lhs: Asset = args
        .lhs
        .parse()
        .with_context(|| format!("bad left operand {:?}", args.lhs))?;

    let rhs = || -> Result<Asset> {
        args.rhs
            .parse()
            .with_context(|| format!("bad right operand {:?}", args.rhs))
    };

    let result = match args.op {
        AssetOp::Add => &lhs + &rhs()?,
        AssetOp::Sub => &lhs - &rhs()?,
        AssetOp::Mul => lhs.mul(&rhs()?),
        AssetOp::Div => lhs.div(&rhs()?)?,
        AssetOp::Pow => {
            let exp: u32 = args
                .rhs
                .parse()
                .with_context(|| format!("bad exponent {:?}", args.rhs))?;
            lhs.pow(exp)?
        }
        AssetOp::Cmp => {
            let symbol = match lhs.cmp(&rhs()?) {
                Ordering::Less => "<",
                Ordering::Equal => "=",
                Ordering::Greater => ">",
            };
            return Ok(symbol.to_string());
        }
    };
    Ok(result.to_string())
}

fn decode(args: &DecodeArgs) -> Result<String> {
    let text = args.hex.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(text).context("input is not valid hex")?;

    let mut buf = ByteBuffer::from(bytes);
    let msg = Msg::deserialize(&mut buf).context("failed to decode message")?;
    if buf.remaining() > 0 {
        tracing::warn!(trailing = buf.remaining(), "message has trailing bytes");
    }
    Ok(format!("{msg:#?}"))
}

fn version() -> String {
    format!(
        "mark-cli {}\ntx version    {}\nblock version {}",
        env!("CARGO_PKG_VERSION"),
        TX_VERSION_V0,
        BLOCK_VERSION_V0,
    )
}
