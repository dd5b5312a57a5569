//! Ethereum key provisioning for marketplace client mode.
//!
//! The node signs marketplace transactions with the private key in
//! `codexRoot/eth.key`. The key file must be readable by the operator only.
//! The matching EIP-55 address goes to `codexRoot/eth.address` so the
//! operator knows which account to fund.

use std::io::Write;
use std::path::{Path, PathBuf};

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use rand::RngCore;
use sha3::{Digest, Keccak256};
use tracing::{info, warn};

use crate::config::ConfigStore;
use crate::error::{CodexError, PersistenceError};
use crate::shell::ShellRunner;

pub const ETH_FAUCET_URL: &str = "https://faucet-eth.testnet.codex.storage/";
pub const TST_FAUCET_URL: &str = "https://faucet-tst.testnet.codex.storage/";
pub const DISCORD_SERVER_URL: &str = "https://discord.gg/codex-storage";
pub const DISCORD_BOT_CHANNEL_URL: &str =
    "https://discord.com/channels/895609329053474826/1230785221553819669";

/// Key material locations plus the address, when one has been recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthKey {
    pub private_key_path: PathBuf,
    pub address_path: PathBuf,
    pub address: Option<String>,
    /// `true` when this call generated the key.
    pub created: bool,
}

/// Return the existing key, generating one first if `eth.key` is missing.
pub async fn get_or_create_eth_key(
    config: &ConfigStore,
    shell: &dyn ShellRunner,
) -> Result<EthKey, CodexError> {
    let paths = config.eth_key_file_paths();
    let created = if paths.key.is_file() {
        false
    } else {
        std::fs::create_dir_all(&config.get().codex_root)
            .map_err(|e| PersistenceError::io(&config.get().codex_root, e))?;
        let key = generate_private_key();
        write_private_key(&paths.key, &key)?;
        if config.platform().is_windows() {
            restrict_windows_acl(&paths.key, shell).await;
        }
        info!(path = %paths.key.display(), "generated marketplace key");
        write_address(&paths.address, address_from_private_key(&key).as_deref())?;
        true
    };

    let mut address = read_trimmed(&paths.address);
    if address.is_none() {
        // Keys from older setups may lack the address file.
        let derived = read_trimmed(&paths.key).and_then(|key| address_from_private_key(&key));
        write_address(&paths.address, derived.as_deref())?;
        address = derived;
    }

    Ok(EthKey {
        private_key_path: paths.key,
        address_path: paths.address,
        address,
        created,
    })
}

fn read_trimmed(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn write_address(path: &Path, address: Option<&str>) -> Result<(), PersistenceError> {
    let Some(address) = address else {
        warn!(path = %path.display(), "key is not a valid secp256k1 scalar; no address written");
        return Ok(());
    };
    std::fs::write(path, address).map_err(|e| PersistenceError::io(path, e))
}

/// EIP-55 address of a `0x`-prefixed hex private key.
///
/// Returns `None` unless the key is 32 hex bytes and a valid secp256k1 scalar.
pub fn address_from_private_key(key: &str) -> Option<String> {
    let hex = key.trim().trim_start_matches("0x");
    if hex.len() != 64 {
        return None;
    }
    let bytes = (0..32)
        .map(|i| u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    let secret = SecretKey::from_slice(&bytes).ok()?;
    let point = secret.public_key().to_encoded_point(false);
    // Uncompressed SEC1 is 0x04 || X || Y; the address hashes X || Y.
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    let lower: String = digest[12..].iter().map(|b| format!("{b:02x}")).collect();
    Some(to_checksum_address(&lower))
}

/// Mixed-case checksum encoding of a 40-char lowercase hex address.
pub fn to_checksum_address(lower_hex: &str) -> String {
    let lower = lower_hex.trim_start_matches("0x").to_ascii_lowercase();
    let hash = Keccak256::digest(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// 32 random bytes as `0x`-prefixed lowercase hex.
pub fn generate_private_key() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut out = String::with_capacity(66);
    out.push_str("0x");
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(unix)]
fn write_private_key(path: &Path, key: &str) -> Result<(), PersistenceError> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
        .map_err(|e| PersistenceError::io(path, e))?;
    file.write_all(key.as_bytes())
        .map_err(|e| PersistenceError::io(path, e))?;
    // umask can only narrow the mode; re-apply in case the file existed as 0644.
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| PersistenceError::io(path, e))
}

#[cfg(not(unix))]
fn write_private_key(path: &Path, key: &str) -> Result<(), PersistenceError> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| PersistenceError::io(path, e))?;
    file.write_all(key.as_bytes())
        .map_err(|e| PersistenceError::io(path, e))
}

/// Strip inherited ACLs so only the current user can read the key.
async fn restrict_windows_acl(path: &Path, shell: &dyn ShellRunner) {
    let user = std::env::var("USERNAME").unwrap_or_default();
    let key = path.display();
    let commands = [
        format!("icacls \"{key}\" /inheritance:r >nul 2>&1"),
        format!("icacls \"{key}\" /grant:r {user}:F >nul 2>&1"),
        format!("icacls \"{key}\" /remove SYSTEM >nul 2>&1"),
        format!("icacls \"{key}\" /remove Administrators >nul 2>&1"),
    ];
    for command in commands {
        if let Err(err) = shell.run(&command).await {
            warn!(%err, "icacls failed");
        }
    }
}
