//! Memoizing avatar lookup.
//!
//! Avatars are rendered by hosts from `data:` URIs. The first lookup per
//! user id goes to the backend; every later one is served from the cache.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::backend::PullRequestBackend;

/// Encode raw image bytes as a `data:` URI hosts can render directly.
pub(crate) fn image_data_uri(bytes: &[u8]) -> String {
    format!("data:image/*;base64,{}", STANDARD.encode(bytes))
}

#[derive(Debug, Default)]
pub struct AvatarCache {
    cached: HashMap<String, String>,
}

impl AvatarCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data URI for a user's avatar, or `None` when the id is absent or
    /// the backend has no image. Only successful lookups are memoized.
    pub fn profile_pic(
        &mut self,
        backend: &dyn PullRequestBackend,
        user_id: Option<&str>,
    ) -> Option<String> {
        let id = user_id?;
        if let Some(uri) = self.cached.get(id) {
            return Some(uri.clone());
        }

        match backend.get_avatar(id) {
            Ok(Some(bytes)) => {
                let uri = image_data_uri(&bytes);
                self.cached.insert(id.to_string(), uri.clone());
                Some(uri)
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(user_id = id, "avatar lookup failed: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    #[test]
    fn second_lookup_is_served_from_the_cache() {
        let backend = MockBackend::new();
        backend.set_avatar("u1", b"png-bytes".to_vec());
        let mut cache = AvatarCache::new();

        let first = cache.profile_pic(&backend, Some("u1")).unwrap();
        let second = cache.profile_pic(&backend, Some("u1")).unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("data:image/*;base64,"));
        assert_eq!(backend.calls_named("get_avatar").len(), 1);
    }

    #[test]
    fn missing_id_and_missing_image_yield_none() {
        let backend = MockBackend::new();
        let mut cache = AvatarCache::new();
        assert!(cache.profile_pic(&backend, None).is_none());
        assert!(cache.profile_pic(&backend, Some("ghost")).is_none());
    }
}
