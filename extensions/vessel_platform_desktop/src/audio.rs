//! Simulated audio playback
//!
//! The desktop host has no mixer. A player only remembers which asset it was
//! created for and logs each play.

use vessel_platform::{AssetPath, HostPlayer, Result};

/// Audio player that logs instead of producing sound
#[derive(Debug)]
pub struct DesktopPlayer {
    path: AssetPath,
    plays: u32,
}

impl DesktopPlayer {
    pub fn new(path: AssetPath) -> Self {
        Self { path, plays: 0 }
    }

    /// The asset this player was created for
    pub fn path(&self) -> &AssetPath {
        &self.path
    }

    /// How many times play was requested
    pub fn plays(&self) -> u32 {
        self.plays
    }
}

impl HostPlayer for DesktopPlayer {
    fn play(&mut self) -> Result<()> {
        self.plays += 1;
        tracing::info!("play {} (#{})", self.path, self.plays);
        Ok(())
    }

    fn release(self: Box<Self>) -> Result<()> {
        tracing::debug!("release player for {}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_plays() {
        let mut player = DesktopPlayer::new(AssetPath::parse("/sfx/boom.ogg").unwrap());
        player.play().unwrap();
        player.play().unwrap();
        assert_eq!(player.plays(), 2);
        assert_eq!(player.path().as_str(), "/sfx/boom.ogg");
    }
}
