use crate::{
    EntityId, FetchParams, FetchResult, Playlist, Track, User, UserId, UserListBackend,
    UserListFlavor, UserListStore,
};

/// The user lists backed by a [`UserListStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserListKind {
    /// Users following a profile.
    Followers,
    /// Users a profile follows.
    Following,
    /// Followers of a profile who the signed in user also follows.
    Mutuals,
    /// Users who reposted a track.
    Reposts,
    /// Users who favorited a track.
    Favorites,
    /// Users who reposted a playlist or album.
    PlaylistReposts,
    /// Users who favorited a playlist or album.
    PlaylistFavorites,
}

impl UserListKind {
    /// A short lowercase name, used in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Following => "following",
            Self::Mutuals => "mutuals",
            Self::Reposts => "reposts",
            Self::Favorites => "favorites",
            Self::PlaylistReposts => "playlist reposts",
            Self::PlaylistFavorites => "playlist favorites",
        }
    }
}

impl std::fmt::Display for UserListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`UserListFlavor`] whose gathered ids live in a [`UserListStore`] list.
pub trait StoredUserList: UserListFlavor<State = UserListStore> {
    /// The store list holding this flavor's ids.
    const KIND: UserListKind;
}

macro_rules! define {
    (
        $(#[$meta:meta])*
        $name:ident,
        entity: $entity:ty,
        lookup: |$store:ident, $id:ident| $lookup:expr,
        population: |$pop_entity:ident| $population:expr,
        include_current_user: |$inc_entity:ident| $include:expr,
        subset: |$subset_entity:ident| $subset:expr,
        fetch: |$backend:ident, $params:ident| $fetch:expr $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<B> {
            backend: B,
        }

        impl<B> $name<B> {
            /// Create the list over a backend.
            pub fn new(backend: B) -> Self {
                Self { backend }
            }

            /// The backend this list fetches from.
            pub fn backend(&self) -> &B {
                &self.backend
            }
        }

        impl<B: UserListBackend> UserListFlavor for $name<B> {
            type State = UserListStore;
            type Entity = $entity;
            type User = User;
            type Error = B::Error;

            fn get_existing_entity(&self, $store: &UserListStore, $id: EntityId) -> Option<$entity> {
                $lookup
            }

            fn extract_user_id_subset_from_entity(&self, $subset_entity: &$entity) -> Vec<UserId> {
                $subset
            }

            async fn fetch_all_users_for_entity(
                &self,
                $params: FetchParams,
            ) -> Result<FetchResult<User>, B::Error> {
                let $backend = &self.backend;
                Ok(FetchResult::new($fetch))
            }

            fn select_current_user_ids_in_list(&self, store: &UserListStore) -> Vec<UserId> {
                store.user_ids_in_list(UserListKind::$name)
            }

            fn select_current_user_id(&self, store: &UserListStore) -> Option<UserId> {
                store.current_user_id()
            }

            fn can_fetch_more_users(&self, $pop_entity: &$entity, combined_user_ids: &[UserId]) -> bool {
                combined_user_ids.len() < $population
            }

            fn include_current_user(&self, $inc_entity: &$entity) -> bool {
                $include
            }
        }

        impl<B: UserListBackend> StoredUserList for $name<B> {
            const KIND: UserListKind = UserListKind::$name;
        }
    };
}

define! {
    /// Users following a profile, bounded by the profile's `follower_count`.
    Followers,
    entity: User,
    lookup: |store, id| store.user(id.as_user_id()),
    population: |user| user.follower_count,
    include_current_user: |_user| false,
    subset: |_user| vec![],
    fetch: |backend, params| backend
        .get_followers(params.limit, params.offset, params.entity_id.as_user_id())
        .await?,
}

define! {
    /// Users a profile follows, bounded by the profile's `followee_count`.
    Following,
    entity: User,
    lookup: |store, id| store.user(id.as_user_id()),
    population: |user| user.followee_count,
    include_current_user: |_user| false,
    subset: |_user| vec![],
    fetch: |backend, params| backend
        .get_followees(params.limit, params.offset, params.entity_id.as_user_id())
        .await?,
}

define! {
    /// Followers of a profile who the signed in user also follows,
    /// bounded by the profile's `current_user_followee_follow_count`.
    ///
    /// Signed out, there are no mutuals: the profile reads as having none, so the list is exhausted
    /// straight away and the backend isn't called.
    Mutuals,
    entity: User,
    lookup: |store, id| store.user(id.as_user_id()).map(|user| match store.current_user_id() {
        Some(_) => user,
        None => User {
            current_user_followee_follow_count: 0,
            ..user
        },
    }),
    population: |user| user.current_user_followee_follow_count,
    include_current_user: |_user| false,
    subset: |_user| vec![],
    fetch: |backend, params| match params.current_user_id {
        Some(current_user_id) => backend
            .get_mutual_followers(
                params.limit,
                params.offset,
                params.entity_id.as_user_id(),
                current_user_id,
            )
            .await?,
        None => vec![],
    },
}

define! {
    /// Users who reposted a track, bounded by the track's `repost_count`.
    ///
    /// The first page leads with the signed in user if they reposted it, then the followees the backend
    /// inlined in the track record.
    Reposts,
    entity: Track,
    lookup: |store, id| store.track(id),
    population: |track| track.repost_count,
    include_current_user: |track| track.has_current_user_reposted,
    subset: |track| track.followee_reposts.clone(),
    fetch: |backend, params| backend
        .get_track_reposters(params.limit, params.offset, params.entity_id)
        .await?,
}

define! {
    /// Users who favorited a track, bounded by the track's `save_count`.
    ///
    /// The first page leads with the signed in user if they favorited it, then the followees the backend
    /// inlined in the track record.
    Favorites,
    entity: Track,
    lookup: |store, id| store.track(id),
    population: |track| track.save_count,
    include_current_user: |track| track.has_current_user_saved,
    subset: |track| track.followee_saves.clone(),
    fetch: |backend, params| backend
        .get_track_favoriters(params.limit, params.offset, params.entity_id)
        .await?,
}

define! {
    /// Users who reposted a playlist or album, bounded by its `repost_count`.
    ///
    /// Leads like [`Reposts`] on the first page.
    PlaylistReposts,
    entity: Playlist,
    lookup: |store, id| store.playlist(id),
    population: |playlist| playlist.repost_count,
    include_current_user: |playlist| playlist.has_current_user_reposted,
    subset: |playlist| playlist.followee_reposts.clone(),
    fetch: |backend, params| backend
        .get_playlist_reposters(params.limit, params.offset, params.entity_id)
        .await?,
}

define! {
    /// Users who favorited a playlist or album, bounded by its `save_count`.
    ///
    /// Leads like [`Favorites`] on the first page.
    PlaylistFavorites,
    entity: Playlist,
    lookup: |store, id| store.playlist(id),
    population: |playlist| playlist.save_count,
    include_current_user: |playlist| playlist.has_current_user_saved,
    subset: |playlist| playlist.followee_saves.clone(),
    fetch: |backend, params| backend
        .get_playlist_favoriters(params.limit, params.offset, params.entity_id)
        .await?,
}
