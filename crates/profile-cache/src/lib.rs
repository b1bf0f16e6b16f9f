//! In-memory display-name cache.
//!
//! Names are learned from incoming envelopes and expire after a TTL, so a
//! renamed contact is picked up again on their next message. The cache is
//! bounded; when full, the entry closest to expiry is evicted.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// How often expired entries are swept.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

struct ProfileEntry {
    display_name: String,
    expires_at: Instant,
}

type ProfileMap = HashMap<String, ProfileEntry>;

/// Shared display-name cache with TTL expiration.
#[derive(Clone)]
pub struct ProfileCache {
    profiles: Arc<RwLock<ProfileMap>>,
    max_entries: usize,
    ttl: Duration,
}

impl ProfileCache {
    /// Create a new cache.
    ///
    /// Spawns a background task that sweeps expired entries until the last
    /// handle to the cache is dropped.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        let cache = Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
            max_entries: max_entries.max(1),
            ttl,
        };

        let profiles = Arc::downgrade(&cache.profiles);
        tokio::spawn(async move {
            cleanup_loop(profiles).await;
        });

        info!(
            "Profile cache initialized (max_entries={}, ttl={:?})",
            cache.max_entries, ttl
        );

        cache
    }

    /// Record the display name a user is currently using.
    #[instrument(skip(self, display_name))]
    pub async fn remember(&self, user_id: &str, display_name: &str) {
        let mut profiles = self.profiles.write().await;
        let expires_at = Instant::now() + self.ttl;

        if !profiles.contains_key(user_id) && profiles.len() >= self.max_entries {
            evict_oldest(&mut profiles);
        }

        profiles.insert(
            user_id.to_string(),
            ProfileEntry {
                display_name: display_name.to_string(),
                expires_at,
            },
        );
    }

    /// Cached display name for a user, if present and not expired.
    pub async fn get(&self, user_id: &str) -> Option<String> {
        let profiles = self.profiles.read().await;
        let now = Instant::now();

        profiles
            .get(user_id)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.display_name.clone())
    }

    /// Display name for a user, falling back to a name derived from the ID.
    pub async fn display_name(&self, user_id: &str) -> String {
        match self.get(user_id).await {
            Some(name) => name,
            None => fallback_name(user_id),
        }
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let profiles = self.profiles.read().await;
        let now = Instant::now();
        profiles.values().filter(|e| e.expires_at > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Name to show for a user with no known profile name.
///
/// Matrix-style IDs (`@name:server`) are reduced to the localpart; anything
/// else (phone numbers, UUIDs) is shown as-is.
pub fn fallback_name(user_id: &str) -> String {
    user_id
        .strip_prefix('@')
        .and_then(|rest| rest.split(':').next())
        .filter(|local| !local.is_empty())
        .unwrap_or(user_id)
        .to_string()
}

fn evict_oldest(profiles: &mut ProfileMap) {
    let oldest = profiles
        .iter()
        .min_by_key(|(_, entry)| entry.expires_at)
        .map(|(id, _)| id.clone());

    if let Some(id) = oldest {
        profiles.remove(&id);
        debug!("Evicted cached profile for {}", id);
    }
}

async fn cleanup_loop(profiles: Weak<RwLock<ProfileMap>>) {
    loop {
        tokio::time::sleep(CLEANUP_INTERVAL).await;

        let Some(profiles) = profiles.upgrade() else {
            return;
        };

        let now = Instant::now();
        let mut profiles = profiles.write().await;
        let before = profiles.len();

        profiles.retain(|_, entry| entry.expires_at > now);

        let removed = before - profiles.len();
        if removed > 0 {
            debug!("Cleaned up {} expired profiles", removed);
        }
    }
}
