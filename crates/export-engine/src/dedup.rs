//! Content-addressed drawing deduplication.
//!
//! Clone keyframes and repeated exposures render to byte-identical pixels.
//! Each exported layer owns a cache mapping a pixel fingerprint to the drawing
//! number first assigned to it, so identical content is written only once.
//! Caches are never shared between layers.

use std::collections::HashMap;
use std::fmt;

use toonport_scene_model::report::AssetId;

/// BLAKE3 digest of raw pixel bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentFingerprint([u8; 32]);

impl ContentFingerprint {
    pub fn of(pixels: &[u8]) -> Self {
        Self(*blake3::hash(pixels).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentFingerprint({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex()[..16])
    }
}

/// Outcome of [`DedupCache::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub asset_id: AssetId,
    /// The drawing has not been seen before and must be rendered.
    pub is_new: bool,
}

/// Per-layer fingerprint → drawing number map. Ids are dense and start at 1.
#[derive(Debug, Default)]
pub struct DedupCache {
    assets: HashMap<ContentFingerprint, AssetId>,
    counter: u32,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, fingerprint: ContentFingerprint) -> Resolution {
        if let Some(asset_id) = self.assets.get(&fingerprint) {
            return Resolution {
                asset_id: *asset_id,
                is_new: false,
            };
        }
        self.counter += 1;
        let asset_id = AssetId(self.counter);
        self.assets.insert(fingerprint, asset_id);
        Resolution {
            asset_id,
            is_new: true,
        }
    }

    pub fn get(&self, fingerprint: &ContentFingerprint) -> Option<AssetId> {
        self.assets.get(fingerprint).copied()
    }

    /// Distinct drawings assigned so far.
    pub fn len(&self) -> u32 {
        self.counter
    }

    pub fn is_empty(&self) -> bool {
        self.counter == 0
    }
}
