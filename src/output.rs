//! Identity file persistence.
//!
//! The binary identity file is the 64-byte private blob used by Reticulum
//! (X25519 private key followed by the Ed25519 seed). A human-readable
//! report with import strings is written next to it as `<path>.txt`.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use data_encoding::{BASE32, BASE64};

use crate::crypto::{AddressDeriver, Identity, PRIVATE_BLOB_LEN};

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: identity file must be {expected} bytes, got {actual}", .path.display(), expected = PRIVATE_BLOB_LEN)]
    InvalidLength { path: PathBuf, actual: usize },
}

/// Returns the report path for an identity file (`<path>.txt`).
pub fn report_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".txt");
    PathBuf::from(name)
}

/// Writes the identity file and its report. Returns the report path.
pub fn save_identity(identity: &Identity, path: impl AsRef<Path>) -> Result<PathBuf, PersistError> {
    let path = path.as_ref();
    fs::write(path, identity.private_bytes()).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    let info_path = report_path(path);
    fs::write(&info_path, render_report(identity)).map_err(|source| PersistError::Write {
        path: info_path.clone(),
        source,
    })?;

    Ok(info_path)
}

/// Reads an identity file and recomputes its keys and address.
pub fn load_identity(path: impl AsRef<Path>, deriver: &AddressDeriver) -> Result<Identity, PersistError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| PersistError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let blob: [u8; PRIVATE_BLOB_LEN] =
        data.as_slice()
            .try_into()
            .map_err(|_| PersistError::InvalidLength {
                path: path.to_path_buf(),
                actual: data.len(),
            })?;

    Ok(Identity::from_private_bytes(&blob, deriver))
}

/// Renders the human-readable identity report.
pub fn render_report(identity: &Identity) -> String {
    let blob = identity.private_bytes();

    format!(
        "LXMF Vanity Address Identity\n\
         ============================\n\
         \n\
         Address (LXMF): {address}\n\
         Identity Hash:  {fingerprint}\n\
         \n\
         Public Key (X25519 + Ed25519):\n\
         \x20 X25519 Public:  {exchange_public}\n\
         \x20 Ed25519 Public: {signing_public}\n\
         \n\
         Private Key (X25519 + Ed25519):\n\
         \x20 X25519 Private: {exchange_private}\n\
         \x20 Ed25519 Seed:   {signing_seed}\n\
         \n\
         --- Import formats ---\n\
         Base64 (MeshChat import string):\n\
         {base64}\n\
         Base32 (Sideband import string):\n\
         {base32}\n",
        address = identity.address(),
        fingerprint = identity.fingerprint(),
        exchange_public = hex::encode(identity.exchange_public()),
        signing_public = hex::encode(identity.signing_public()),
        exchange_private = hex::encode(identity.exchange_private()),
        signing_seed = hex::encode(identity.signing_seed()),
        base64 = BASE64.encode(&blob),
        base32 = BASE32.encode(&blob),
    )
}
