//! Order digest
//!
//! A SHA256 fingerprint of every resolved extension point and its action
//! names, in nexus order. Two builds of the same declarations produce the
//! same digest; any change in resolved order changes it.
//!
//! ## Canonical form
//!
//! JSON array of `[extension_point, [action, ...]]` pairs, serialized with
//! `serde_json` (no whitespace). Node ids never enter the digest.

use sha2::{Digest, Sha256};

use crate::errors::Result;

/// Compute the digest of resolved orders
///
/// ## Arguments
///
/// - `order`: `(extension point, action names)` pairs in nexus order
///
/// ## Returns
///
/// Hex-encoded SHA256 digest (64 characters)
///
/// ## Errors
///
/// Returns `WeaveError::Serialization` if JSON serialization fails.
///
/// ## Example
///
/// ```
/// use weave_core::digest::compute_order_digest;
///
/// let order = vec![(
///     "RuntimeInit".to_string(),
///     vec!["clk_init".to_string(), "timer_init".to_string()],
/// )];
/// let digest = compute_order_digest(&order).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
pub fn compute_order_digest(order: &[(String, Vec<String>)]) -> Result<String> {
    let canonical = serde_json::to_string(order)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(pairs: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
        pairs
            .iter()
            .map(|(ep, names)| {
                (
                    ep.to_string(),
                    names.iter().map(|n| n.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_digest_is_stable() {
        let a = order(&[("Init", &["a", "b"]), ("MainLoop", &["c"])]);
        let b = order(&[("Init", &["a", "b"]), ("MainLoop", &["c"])]);
        assert_eq!(
            compute_order_digest(&a).unwrap(),
            compute_order_digest(&b).unwrap()
        );
    }

    #[test]
    fn test_digest_is_order_sensitive() {
        let a = order(&[("Init", &["a", "b"])]);
        let b = order(&[("Init", &["b", "a"])]);
        assert_ne!(
            compute_order_digest(&a).unwrap(),
            compute_order_digest(&b).unwrap()
        );
    }

    #[test]
    fn test_digest_of_empty_order() {
        let digest = compute_order_digest(&[]).unwrap();
        // sha256("[]")
        assert_eq!(
            digest,
            "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
        );
    }
}
