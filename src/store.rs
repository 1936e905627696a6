#![cfg(feature = "std")]

//! Replay persistence.
//!
//! Plain replays are the bincode encoding of a [`Replay`] (fixed-width
//! little-endian integers). Encrypted replays wrap the same bytes as
//!
//! ```text
//! salt (16 bytes) || iv (16 bytes) || AES-256-CBC ciphertext (PKCS#7)
//! ```
//!
//! with the key derived by PBKDF2-HMAC-SHA256 from a password and the salt.
//! Nothing authenticates the ciphertext, so a wrong password shows up only as
//! a padding or decoding failure, both reported as
//! [`StoreError::DecryptionFailed`].

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use bincode::Options;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::config::{
    FILE_STAMP_FORMAT, IV_SIZE, KEY_SIZE, MAX_REPLAY_BYTES, PBKDF2_ITERATIONS, SALT_SIZE,
};
use crate::replay::Replay;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const BLOCK_SIZE: usize = 16;

/// Extension of plain replay files.
pub const PLAIN_EXTENSION: &str = "replay";
/// Extension of encrypted replay files.
pub const ENCRYPTED_EXTENSION: &str = "encrypted";

/// Errors from saving or loading replays and ship layouts.
///
/// None of these touch the game in progress; only the file operation fails.
#[derive(Debug)]
pub enum StoreError {
    /// The file could not be opened, read or written.
    FileUnavailable(io::Error),
    /// A ship layout line is malformed or cannot be placed.
    MalformedLayout { line: usize, reason: String },
    /// The bytes are not a valid replay.
    MalformedReplay(bincode::Error),
    /// Wrong password or corrupted ciphertext.
    DecryptionFailed,
    /// The file exceeds the accepted size.
    TooLarge { len: u64 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::FileUnavailable(e) => write!(f, "File unavailable: {}", e),
            StoreError::MalformedLayout { line, reason } => {
                write!(f, "Malformed layout at line {}: {}", line, reason)
            }
            StoreError::MalformedReplay(e) => write!(f, "Malformed replay: {}", e),
            StoreError::DecryptionFailed => {
                write!(f, "Decryption failed (wrong password or corrupted file)")
            }
            StoreError::TooLarge { len } => write!(f, "File too large ({} bytes)", len),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::FileUnavailable(e) => Some(e),
            StoreError::MalformedReplay(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::FileUnavailable(err)
    }
}

fn codec() -> impl Options {
    bincode::options()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_REPLAY_BYTES)
}

/// Serialize a replay into its binary record.
pub fn encode_replay(replay: &Replay) -> Result<Vec<u8>, StoreError> {
    codec().serialize(replay).map_err(StoreError::MalformedReplay)
}

/// Parse a binary record produced by [`encode_replay`]. A record that
/// decodes but describes an impossible fleet or move is also
/// [`StoreError::MalformedReplay`].
pub fn decode_replay(bytes: &[u8]) -> Result<Replay, StoreError> {
    if bytes.len() as u64 > MAX_REPLAY_BYTES {
        return Err(StoreError::TooLarge {
            len: bytes.len() as u64,
        });
    }
    let replay: Replay = codec()
        .deserialize(bytes)
        .map_err(StoreError::MalformedReplay)?;
    replay.check_integrity().map_err(|reason| {
        StoreError::MalformedReplay(Box::new(bincode::ErrorKind::Custom(reason.to_owned())))
    })?;
    Ok(replay)
}

/// Derive the cipher key from a password and salt.
fn derive_key(password: &str, salt: &[u8; SALT_SIZE]) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key[..]);
    key
}

/// Encrypt `plaintext` under `password` into `salt || iv || ciphertext`.
pub fn encrypt(plaintext: &[u8], password: &str) -> Vec<u8> {
    let mut salt = [0u8; SALT_SIZE];
    let mut iv = [0u8; IV_SIZE];
    let mut rng = rand::rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut iv);

    let key = derive_key(password, &salt);
    let ciphertext = Aes256CbcEnc::new(
        GenericArray::from_slice(&key[..]),
        GenericArray::from_slice(&iv),
    )
    .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut out = Vec::with_capacity(SALT_SIZE + IV_SIZE + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    out
}

/// Reverse [`encrypt`]. The ciphertext length is whatever follows the salt
/// and IV.
pub fn decrypt(data: &[u8], password: &str) -> Result<Zeroizing<Vec<u8>>, StoreError> {
    if data.len() < SALT_SIZE + IV_SIZE + BLOCK_SIZE {
        return Err(StoreError::DecryptionFailed);
    }
    let (salt, rest) = data.split_at(SALT_SIZE);
    let (iv, ciphertext) = rest.split_at(IV_SIZE);
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(StoreError::DecryptionFailed);
    }
    let mut salt_buf = [0u8; SALT_SIZE];
    salt_buf.copy_from_slice(salt);

    let key = derive_key(password, &salt_buf);
    Aes256CbcDec::new(GenericArray::from_slice(&key[..]), GenericArray::from_slice(iv))
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| StoreError::DecryptionFailed)
}

/// Encrypt a replay into the on-disk encrypted layout.
pub fn seal_replay(replay: &Replay, password: &str) -> Result<Vec<u8>, StoreError> {
    let plaintext = Zeroizing::new(encode_replay(replay)?);
    Ok(encrypt(&plaintext, password))
}

/// Decrypt and decode an encrypted replay.
///
/// A record that decrypts but does not decode is treated as a wrong
/// password.
pub fn open_replay(data: &[u8], password: &str) -> Result<Replay, StoreError> {
    let plaintext = decrypt(data, password)?;
    decode_replay(&plaintext).map_err(|err| {
        log::debug!("decrypted replay did not decode: {}", err);
        StoreError::DecryptionFailed
    })
}

/// Directory of saved replays.
#[derive(Debug, Clone)]
pub struct ReplayStore {
    dir: PathBuf,
}

impl ReplayStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a plain replay as `game_<timestamp>.replay`.
    pub fn save_plain(&self, replay: &Replay) -> Result<PathBuf, StoreError> {
        let bytes = encode_replay(replay)?;
        let path = self.write_new(PLAIN_EXTENSION, &bytes)?;
        log::info!("replay saved to {}", path.display());
        Ok(path)
    }

    /// Write an encrypted replay as `game_<timestamp>.encrypted`.
    pub fn save_encrypted(&self, replay: &Replay, password: &str) -> Result<PathBuf, StoreError> {
        let bytes = seal_replay(replay, password)?;
        let path = self.write_new(ENCRYPTED_EXTENSION, &bytes)?;
        log::info!("encrypted replay saved to {}", path.display());
        Ok(path)
    }

    /// Load a plain replay file.
    pub fn load_plain(path: impl AsRef<Path>) -> Result<Replay, StoreError> {
        let bytes = read_limited(path.as_ref())?;
        let replay = decode_replay(&bytes)?;
        log::info!(
            "loaded replay {} ({} moves)",
            path.as_ref().display(),
            replay.moves().len()
        );
        Ok(replay)
    }

    /// Load and decrypt an encrypted replay file.
    pub fn load_encrypted(path: impl AsRef<Path>, password: &str) -> Result<Replay, StoreError> {
        let bytes = read_limited(path.as_ref())?;
        let replay = open_replay(&bytes, password)?;
        log::info!(
            "decrypted replay {} ({} moves)",
            path.as_ref().display(),
            replay.moves().len()
        );
        Ok(replay)
    }

    /// Saved replay files, plain and encrypted, sorted by name.
    pub fn list(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let known = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == PLAIN_EXTENSION || ext == ENCRYPTED_EXTENSION);
            if known && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Create a fresh file named after the current local time. A numeric
    /// suffix is added when a file from the same second already exists.
    fn write_new(&self, extension: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir)?;
        let stamp = chrono::Local::now().format(FILE_STAMP_FORMAT).to_string();
        let mut suffix = 0u32;
        loop {
            let name = if suffix == 0 {
                format!("game_{}.{}", stamp, extension)
            } else {
                format!("game_{}_{}.{}", stamp, suffix, extension)
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(bytes)?;
                    file.sync_all()?;
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => suffix += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Read a whole file, refusing anything larger than a replay can be.
fn read_limited(path: &Path) -> Result<Vec<u8>, StoreError> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    let limit = MAX_REPLAY_BYTES + (SALT_SIZE + IV_SIZE + BLOCK_SIZE) as u64;
    if len > limit {
        return Err(StoreError::TooLarge { len });
    }
    let mut bytes = Vec::with_capacity(len as usize);
    file.take(limit + 1).read_to_end(&mut bytes)?;
    Ok(bytes)
}
