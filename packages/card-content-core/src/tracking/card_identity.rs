/// Stable keys for home and guideline cards.
///
/// On the wire a `CardItem` has no identifier and is addressed by its
/// description. The editor attaches an internal key on load and on add so a
/// single card can be removed even when descriptions repeat.
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::CardDocument;

static KID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// New 8-hex-char key from a process-wide counter and the clock.
pub fn generate_kid() -> String {
    use sha2::{Digest, Sha256};
    let seq = KID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut hasher = Sha256::new();
    hasher.update(seq.to_le_bytes());
    hasher.update(ts.to_le_bytes());
    let hash = hasher.finalize();
    hex::encode(&hash[..4])
}

/// Give every keyless card item a fresh key. Returns how many were assigned.
pub fn assign_missing_kids(doc: &mut CardDocument) -> usize {
    let mut assigned = 0;
    for item in doc.all_items_mut() {
        if item.kid.is_none() {
            item.kid = Some(generate_kid());
            assigned += 1;
        }
    }
    assigned
}
