//! UseCase: エピソード変更の同期

use crate::domain::{AnimeId, ClientEvent, EpisodeId, NavigationIntent, WatchLocation};

use super::{effect::SessionEffect, error::SessionError, session::WatchPartySession};

impl WatchPartySession {
    /// Broadcast an episode change to the room.
    ///
    /// Returns the navigation the host itself should perform, or `None` when
    /// it is already on that episode.
    ///
    /// # Errors
    ///
    /// * `Validation` - empty episode or anime id
    /// * `NoActiveRoom` / `NotHost` - only the host of an active room may change episodes
    /// * `NotConnected` - no live connection
    pub fn broadcast_episode_change(
        &mut self,
        episode_id: &str,
        anime_id: &str,
    ) -> Result<Option<NavigationIntent>, SessionError> {
        let episode_id = EpisodeId::new(episode_id)?;
        let anime_id = AnimeId::new(anime_id)?;
        let code = self.hosted_room()?.code.clone();
        let transport = self.live_transport()?.clone();

        tracing::info!("Broadcasting episode change to {}/{}", anime_id, episode_id);
        transport.send(ClientEvent::ChangeEpisode {
            episode_id: episode_id.clone(),
            anime_id: anime_id.clone(),
        })?;

        let target = WatchLocation::new(anime_id, episode_id, Some(code));
        Ok(self.navigate_if_elsewhere(target))
    }

    pub(super) fn on_change_episode(
        &mut self,
        episode_id: EpisodeId,
        anime_id: AnimeId,
    ) -> Vec<SessionEffect> {
        let Some(room) = &self.room else {
            tracing::debug!("Ignoring episode change outside a room");
            return Vec::new();
        };
        let target = WatchLocation::new(anime_id, episode_id, Some(room.code.clone()));
        match self.navigate_if_elsewhere(target) {
            Some(intent) => vec![SessionEffect::Navigate(intent)],
            None => Vec::new(),
        }
    }

    /// Navigate only when the target differs from where we already are
    fn navigate_if_elsewhere(&mut self, target: WatchLocation) -> Option<NavigationIntent> {
        if self.location.as_ref() == Some(&target) {
            tracing::debug!("Already viewing {}, not navigating", target);
            return None;
        }
        tracing::info!("Navigating to {}", target);
        self.location = Some(target.clone());
        Some(NavigationIntent::Navigate(target))
    }
}
