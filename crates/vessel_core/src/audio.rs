//! Audio player handles
//!
//! Each [`AudioPlayerHandle`] owns one host playback object. A failed
//! [`play`](AudioPlayerHandleManager::play) poisons the handle: the host
//! object is released right away and every later play fails without touching
//! the host. The handle itself stays valid until
//! [`destroy`](AudioPlayerHandleManager::destroy).

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;
use vessel_platform::{AssetPath, HostPlayer, HostRuntime, PlatformError};

new_key_type! {
    /// Table key behind an audio player handle
    pub struct AudioPlayerId;
}

/// Audio player errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("invalid audio path '{0}': must be non-empty and start with '/'")]
    InvalidPath(String),

    #[error("host audio failure: {0}")]
    Host(#[source] PlatformError),

    #[error("audio player was invalidated by an earlier failure")]
    Invalidated,
}

/// Result type for audio operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// A created audio player
///
/// Not `Clone`: exactly one owner may destroy it.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "an audio player holds host resources until it is destroyed"]
pub struct AudioPlayerHandle {
    id: AudioPlayerId,
}

impl AudioPlayerHandle {
    /// Table key of this handle
    pub fn id(&self) -> AudioPlayerId {
        self.id
    }
}

enum PlayerSlot {
    Live(Box<dyn HostPlayer>),
    Invalidated,
}

/// Creates, plays, and destroys host audio players
pub struct AudioPlayerHandleManager {
    host: Arc<dyn HostRuntime>,
    table: Mutex<SlotMap<AudioPlayerId, PlayerSlot>>,
}

impl AudioPlayerHandleManager {
    /// Create an empty manager backed by `host`
    pub fn new(host: Arc<dyn HostRuntime>) -> Self {
        Self {
            host,
            table: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Create a player for a bundled audio asset
    pub fn create(&self, path: &str) -> Result<AudioPlayerHandle> {
        let path = AssetPath::parse(path).map_err(|_| AudioError::InvalidPath(path.to_string()))?;

        let player = self.host.create_player(&path).map_err(|e| {
            tracing::warn!("Failed to create audio player for {}: {}", path, e);
            AudioError::Host(e)
        })?;

        let id = self.table.lock().insert(PlayerSlot::Live(player));
        tracing::debug!("Created audio player {:?} for {}", id, path);
        Ok(AudioPlayerHandle { id })
    }

    /// Start playback
    ///
    /// On failure the handle is invalidated and its host object released.
    pub fn play(&self, handle: &AudioPlayerHandle) -> Result<()> {
        let mut table = self.table.lock();
        let Some(slot) = table.get_mut(handle.id) else {
            return Err(AudioError::Invalidated);
        };

        let result = match slot {
            PlayerSlot::Live(player) => self.host.play_player(player.as_mut()),
            PlayerSlot::Invalidated => return Err(AudioError::Invalidated),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("Audio player {:?} failed to play: {}", handle.id, e);
                let failed = std::mem::replace(slot, PlayerSlot::Invalidated);
                drop(table);
                if let PlayerSlot::Live(player) = failed {
                    self.release(handle.id, player);
                }
                Err(AudioError::Host(e))
            }
        }
    }

    /// Check if a player can still be played
    pub fn is_playable(&self, handle: &AudioPlayerHandle) -> bool {
        matches!(self.table.lock().get(handle.id), Some(PlayerSlot::Live(_)))
    }

    /// Destroy a player
    ///
    /// Best effort: host failures are logged and swallowed.
    pub fn destroy(&self, handle: AudioPlayerHandle) {
        let slot = self.table.lock().remove(handle.id);
        if let Some(PlayerSlot::Live(player)) = slot {
            self.release(handle.id, player);
        }
    }

    /// Number of handles not yet destroyed, invalidated ones included
    pub fn live_count(&self) -> usize {
        self.table.lock().len()
    }

    /// Destroy every player still in the table
    pub fn release_all(&self) {
        let drained: Vec<_> = self.table.lock().drain().collect();
        for (id, slot) in drained {
            if let PlayerSlot::Live(player) = slot {
                self.release(id, player);
            }
        }
    }

    fn release(&self, id: AudioPlayerId, player: Box<dyn HostPlayer>) {
        if let Err(e) = self.host.destroy_player(player) {
            tracing::debug!("Ignoring failure to destroy audio player {:?}: {}", id, e);
        }
    }
}
