use crate::{EntityId, UserId, UserRecord};

/// A user as returned by the backend, trimmed to the fields the built-in lists read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// The user's id.
    pub user_id: UserId,
    /// The user's handle.
    pub handle: String,
    /// The user's display name.
    pub name: String,
    /// How many users follow this user.
    pub follower_count: usize,
    /// How many users this user follows.
    pub followee_count: usize,
    /// How many users followed by the signed in user also follow this user.
    pub current_user_followee_follow_count: usize,
    /// Whether the signed in user follows this user.
    pub does_current_user_follow: bool,
}

impl User {
    /// Create a user with only an id and handle set.
    pub fn new(user_id: impl Into<UserId>, handle: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            handle: handle.into(),
            ..Default::default()
        }
    }

    /// This user as the owner of a list.
    pub fn entity_id(&self) -> EntityId {
        self.user_id.into()
    }
}

impl UserRecord for User {
    fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// A track as returned by the backend, trimmed to the fields the built-in lists read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    /// The track's id.
    pub track_id: EntityId,
    /// The uploader.
    pub owner_id: UserId,
    /// The track's title.
    pub title: String,
    /// How many users reposted the track.
    pub repost_count: usize,
    /// How many users favorited the track.
    pub save_count: usize,
    /// Whether the signed in user reposted the track.
    pub has_current_user_reposted: bool,
    /// Whether the signed in user favorited the track.
    pub has_current_user_saved: bool,
    /// Users followed by the signed in user who reposted the track, inlined by the backend.
    pub followee_reposts: Vec<UserId>,
    /// Users followed by the signed in user who favorited the track, inlined by the backend.
    pub followee_saves: Vec<UserId>,
}

impl Track {
    /// Create a track with only an id and owner set.
    pub fn new(track_id: impl Into<EntityId>, owner_id: impl Into<UserId>) -> Self {
        Self {
            track_id: track_id.into(),
            owner_id: owner_id.into(),
            ..Default::default()
        }
    }
}

/// A playlist or album as returned by the backend, trimmed to the fields the built-in lists read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    /// The playlist's id.
    pub playlist_id: EntityId,
    /// The playlist's creator.
    pub owner_id: UserId,
    /// The playlist's name.
    pub name: String,
    /// How many users reposted the playlist.
    pub repost_count: usize,
    /// How many users favorited the playlist.
    pub save_count: usize,
    /// Whether the signed in user reposted the playlist.
    pub has_current_user_reposted: bool,
    /// Whether the signed in user favorited the playlist.
    pub has_current_user_saved: bool,
    /// Users followed by the signed in user who reposted the playlist, inlined by the backend.
    pub followee_reposts: Vec<UserId>,
    /// Users followed by the signed in user who favorited the playlist, inlined by the backend.
    pub followee_saves: Vec<UserId>,
}

impl Playlist {
    /// Create a playlist with only an id and owner set.
    pub fn new(playlist_id: impl Into<EntityId>, owner_id: impl Into<UserId>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            owner_id: owner_id.into(),
            ..Default::default()
        }
    }
}
