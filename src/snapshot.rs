//! Durable snapshot/restore: plain `postcard::to_stdvec` /
//! `postcard::from_bytes` over a `Serialize`/`Deserialize` index, with a
//! leading version byte so a future format change has somewhere to
//! branch from.

use crate::error::Error;
use crate::index::Index;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Current snapshot format version. Bump on any breaking change to the
/// encoded shape and branch on the stored byte in [`Index::restore`].
const FORMAT_VERSION: u8 = 1;

impl<M> Index<M>
where
    M: Serialize + DeserializeOwned,
{
    /// Encode this index as a versioned snapshot.
    pub fn snapshot(&self) -> Result<Vec<u8>, Error> {
        let body = postcard::to_stdvec(self).map_err(|e| Error::IndexCorrupt(e.to_string()))?;
        let mut out = Vec::with_capacity(body.len() + 1);
        out.push(FORMAT_VERSION);
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Decode a snapshot produced by [`Index::snapshot`].
    pub fn restore(bytes: &[u8]) -> Result<Self, Error> {
        let (&version, body) = bytes
            .split_first()
            .ok_or_else(|| Error::IndexCorrupt("empty snapshot".to_string()))?;
        if version != FORMAT_VERSION {
            return Err(Error::IndexCorrupt(format!(
                "unsupported snapshot format version {version}"
            )));
        }
        let index: Index<M> =
            postcard::from_bytes(body).map_err(|e| Error::IndexCorrupt(e.to_string()))?;
        index.validate()?;
        Ok(index)
    }
}
