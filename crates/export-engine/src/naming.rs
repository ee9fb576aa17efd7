//! Collision-free level names and on-disk file naming.

use std::collections::HashSet;

use toonport_scene_model::report::AssetId;

/// Characters that are unsafe in file names on at least one platform.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Names already handed out during one export operation.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `candidate` if unused, else the first free `candidate_N` (N = 1, 2, ...).
    /// The returned name is registered.
    pub fn unique_name(&mut self, candidate: &str) -> String {
        if self.used.insert(candidate.to_string()) {
            return candidate.to_string();
        }
        let mut counter = 1u32;
        loop {
            let name = format!("{candidate}_{counter}");
            if self.used.insert(name.clone()) {
                return name;
            }
            counter += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Make a layer or scene name safe to use as a file name.
///
/// Spaces become underscores, forbidden characters are dropped, and leading or
/// trailing dots and spaces are trimmed. Falls back to `"unnamed"`.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .replace(' ', "_")
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect();
    let trimmed = sanitized.trim_matches(|c| c == '.' || c == ' ');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<layer>.<NNNN>.<ext>`.
pub fn asset_file_name(layer_name: &str, asset_id: AssetId, extension: &str) -> String {
    format!("{layer_name}.{asset_id}.{extension}")
}
