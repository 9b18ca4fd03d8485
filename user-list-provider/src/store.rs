use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{EntityId, Playlist, Track, User, UserId, UserListKind, UserListPage};

/// The caller side state of one user list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListState {
    /// The entity the list belongs to, `None` until the list is opened.
    pub entity_id: Option<EntityId>,
    /// Every id gathered so far, in arrival order.
    pub user_ids: Vec<UserId>,
    /// The next page index to request.
    pub page: usize,
    /// Whether another page may hold more users.
    pub has_more: bool,
    /// Whether a page is currently being fetched.
    pub loading: bool,
    /// The message of the last failed fetch, cleared by the next successful one.
    pub error: Option<String>,
    /// Changes every time the list starts over, `0` until it is first opened.
    ///
    /// A page fetched under an older generation is never applied, even if the list
    /// has since come back to the same entity.
    pub generation: u64,
}

/// The outcome of trying to start loading the next page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListLoad {
    /// Marked as loading, fetch this page.
    Ready {
        entity_id: EntityId,
        generation: u64,
        page: usize,
    },
    /// The list has no entity.
    NoEntity,
    /// The list has nothing more to fetch.
    Exhausted,
    /// Another page is already being fetched.
    InFlight,
}

#[derive(Debug, Default)]
struct StoreInner {
    current_user_id: Option<UserId>,
    users: HashMap<UserId, User>,
    tracks: HashMap<EntityId, Track>,
    playlists: HashMap<EntityId, Playlist>,
    lists: HashMap<UserListKind, UserListState>,
    last_generation: u64,
}

/// In memory state backing the built-in list flavors: the user, track and playlist caches,
/// the signed in user, and the ids gathered by each list.
///
/// Every method takes the lock only for its own duration, so a store can be shared between tasks
/// and read from while a page is being fetched.
#[derive(Debug, Default)]
pub struct UserListStore {
    inner: RwLock<StoreInner>,
}

impl UserListStore {
    /// Create an empty store with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the signed in user.
    pub fn set_current_user_id(&self, current_user_id: Option<UserId>) {
        self.inner.write().current_user_id = current_user_id;
    }

    /// The signed in user, if any.
    pub fn current_user_id(&self) -> Option<UserId> {
        self.inner.read().current_user_id
    }

    /// Add or replace cached users.
    pub fn cache_users(&self, users: impl IntoIterator<Item = User>) {
        let mut inner = self.inner.write();
        for user in users {
            inner.users.insert(user.user_id, user);
        }
    }

    /// Add or replace cached tracks.
    pub fn cache_tracks(&self, tracks: impl IntoIterator<Item = Track>) {
        let mut inner = self.inner.write();
        for track in tracks {
            inner.tracks.insert(track.track_id, track);
        }
    }

    /// Add or replace cached playlists.
    pub fn cache_playlists(&self, playlists: impl IntoIterator<Item = Playlist>) {
        let mut inner = self.inner.write();
        for playlist in playlists {
            inner.playlists.insert(playlist.playlist_id, playlist);
        }
    }

    /// A cached user.
    pub fn user(&self, user_id: UserId) -> Option<User> {
        self.inner.read().users.get(&user_id).cloned()
    }

    /// A cached track.
    pub fn track(&self, track_id: EntityId) -> Option<Track> {
        self.inner.read().tracks.get(&track_id).cloned()
    }

    /// A cached playlist.
    pub fn playlist(&self, playlist_id: EntityId) -> Option<Playlist> {
        self.inner.read().playlists.get(&playlist_id).cloned()
    }

    /// Number of cached users.
    pub fn cached_user_count(&self) -> usize {
        self.inner.read().users.len()
    }

    /// A snapshot of a list's state.
    pub fn list(&self, kind: UserListKind) -> UserListState {
        self.inner
            .read()
            .lists
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    /// The ids gathered so far for a list.
    pub fn user_ids_in_list(&self, kind: UserListKind) -> Vec<UserId> {
        self.inner
            .read()
            .lists
            .get(&kind)
            .map(|list| list.user_ids.clone())
            .unwrap_or_default()
    }

    /// Point a list at an entity.
    ///
    /// Switching to a different entity, or to none, starts the list over.
    /// Reopening the current entity keeps what was gathered.
    pub fn set_list_entity(&self, kind: UserListKind, entity_id: Option<EntityId>) {
        let mut inner = self.inner.write();
        if inner.lists.get(&kind).is_some_and(|list| list.entity_id == entity_id) {
            return;
        }
        inner.last_generation += 1;
        let generation = inner.last_generation;
        inner.lists.insert(
            kind,
            UserListState {
                entity_id,
                has_more: entity_id.is_some(),
                generation,
                ..Default::default()
            },
        );
    }

    /// Forget everything gathered for a list, including its entity.
    ///
    /// Pages still in flight for the list are dropped when they resolve.
    pub fn reset_list(&self, kind: UserListKind) {
        self.inner.write().lists.remove(&kind);
    }

    pub(crate) fn start_loading(&self, kind: UserListKind) -> ListLoad {
        let mut inner = self.inner.write();
        let list = inner.lists.entry(kind).or_default();
        let Some(entity_id) = list.entity_id else {
            return ListLoad::NoEntity;
        };
        if list.loading {
            return ListLoad::InFlight;
        }
        if !list.has_more {
            return ListLoad::Exhausted;
        }
        list.loading = true;
        ListLoad::Ready {
            entity_id,
            generation: list.generation,
            page: list.page,
        }
    }

    /// Append a resolved page, returns false if the list started over meanwhile.
    pub(crate) fn apply_page(
        &self,
        kind: UserListKind,
        entity_id: EntityId,
        generation: u64,
        page: &UserListPage,
    ) -> bool {
        let mut inner = self.inner.write();
        let Some(list) = inner
            .lists
            .get_mut(&kind)
            .filter(|list| list.is_loading_for(entity_id, generation))
        else {
            return false;
        };
        list.user_ids.extend(page.user_ids.iter().copied());
        list.page = list.page.saturating_add(1);
        list.has_more = page.has_more;
        list.loading = false;
        list.error = None;
        true
    }

    pub(crate) fn set_list_error(
        &self,
        kind: UserListKind,
        entity_id: EntityId,
        generation: u64,
        message: String,
    ) {
        let mut inner = self.inner.write();
        if let Some(list) = inner.lists.get_mut(&kind)
            && list.is_loading_for(entity_id, generation)
        {
            list.loading = false;
            list.error = Some(message);
        }
    }

    pub(crate) fn cancel_loading(&self, kind: UserListKind, entity_id: EntityId, generation: u64) {
        let mut inner = self.inner.write();
        if let Some(list) = inner.lists.get_mut(&kind)
            && list.is_loading_for(entity_id, generation)
        {
            list.loading = false;
        }
    }
}

impl UserListState {
    fn is_loading_for(&self, entity_id: EntityId, generation: u64) -> bool {
        self.loading && self.generation == generation && self.entity_id == Some(entity_id)
    }
}

#[cfg(test)]
mod test {
    use rstest::*;

    use super::*;

    fn page(ids: &[u64], has_more: bool) -> UserListPage {
        UserListPage {
            user_ids: ids.iter().copied().map(UserId).collect(),
            has_more,
        }
    }

    #[test]
    fn test_caches() {
        let store = UserListStore::new();
        assert_eq!(store.user(UserId(1)), None);
        store.cache_users([User::new(1, "one"), User::new(2, "two")]);
        store.cache_users([User::new(1, "uno")]);
        assert_eq!(store.cached_user_count(), 2);
        assert_eq!(store.user(UserId(1)).map(|user| user.handle), Some("uno".to_string()));

        store.cache_tracks([Track::new(10, 1)]);
        assert_eq!(store.track(EntityId(10)).map(|track| track.owner_id), Some(UserId(1)));

        store.cache_playlists([Playlist::new(10, 2)]);
        assert_eq!(store.playlist(EntityId(10)).map(|playlist| playlist.owner_id), Some(UserId(2)));
        assert_eq!(store.track(EntityId(10)).map(|track| track.owner_id), Some(UserId(1)));
    }

    #[test]
    fn test_list_lifecycle() {
        let store = UserListStore::new();
        let kind = UserListKind::Followers;
        assert_eq!(store.start_loading(kind), ListLoad::NoEntity);

        store.set_list_entity(kind, Some(EntityId(42)));
        let generation = store.list(kind).generation;
        assert_eq!(
            store.start_loading(kind),
            ListLoad::Ready {
                entity_id: EntityId(42),
                generation,
                page: 0
            }
        );
        assert_eq!(store.start_loading(kind), ListLoad::InFlight);
        assert!(store.apply_page(kind, EntityId(42), generation, &page(&[7, 8], true)));
        assert_eq!(store.user_ids_in_list(kind), vec![UserId(7), UserId(8)]);

        assert_eq!(
            store.start_loading(kind),
            ListLoad::Ready {
                entity_id: EntityId(42),
                generation,
                page: 1
            }
        );
        store.set_list_error(kind, EntityId(42), generation, "boom".to_string());
        let list = store.list(kind);
        assert!(!list.loading);
        assert_eq!(list.error.as_deref(), Some("boom"));

        assert!(matches!(store.start_loading(kind), ListLoad::Ready { page: 1, .. }));
        assert!(store.apply_page(kind, EntityId(42), generation, &page(&[9], false)));
        assert_eq!(store.list(kind).error, None);
        assert_eq!(store.start_loading(kind), ListLoad::Exhausted);
    }

    #[test]
    fn test_reopening_same_entity_keeps_ids() {
        let store = UserListStore::new();
        let kind = UserListKind::Following;
        store.set_list_entity(kind, Some(EntityId(1)));
        let generation = store.list(kind).generation;
        store.start_loading(kind);
        store.apply_page(kind, EntityId(1), generation, &page(&[3], true));

        store.set_list_entity(kind, Some(EntityId(1)));
        assert_eq!(store.user_ids_in_list(kind), vec![UserId(3)]);
        assert_eq!(store.list(kind).generation, generation);

        store.set_list_entity(kind, Some(EntityId(2)));
        let list = store.list(kind);
        assert!(list.user_ids.is_empty());
        assert_eq!(list.page, 0);
        assert!(list.has_more);
        assert!(list.generation > generation);
    }

    #[test]
    fn test_stale_page_discarded() {
        let store = UserListStore::new();
        let kind = UserListKind::Mutuals;
        store.set_list_entity(kind, Some(EntityId(1)));
        let generation = store.list(kind).generation;
        store.start_loading(kind);
        store.set_list_entity(kind, Some(EntityId(2)));

        assert!(!store.apply_page(kind, EntityId(1), generation, &page(&[5], false)));
        assert!(store.user_ids_in_list(kind).is_empty());
        store.set_list_error(kind, EntityId(1), generation, "late".to_string());
        assert_eq!(store.list(kind).error, None);
    }

    #[rstest]
    #[case::reopened(false)]
    #[case::reset(true)]
    fn test_stale_page_discarded_after_returning_to_entity(#[case] reset: bool) {
        let store = UserListStore::new();
        let kind = UserListKind::Followers;
        store.set_list_entity(kind, Some(EntityId(1)));
        let ListLoad::Ready { generation: stale, .. } = store.start_loading(kind) else {
            panic!("list should be ready");
        };

        if reset {
            store.reset_list(kind);
        } else {
            store.set_list_entity(kind, Some(EntityId(2)));
        }
        store.set_list_entity(kind, Some(EntityId(1)));
        let ListLoad::Ready { generation: fresh, page: 0, .. } = store.start_loading(kind) else {
            panic!("list should be ready at page 0");
        };
        assert_ne!(stale, fresh);

        assert!(!store.apply_page(kind, EntityId(1), stale, &page(&[5, 6], true)));
        store.cancel_loading(kind, EntityId(1), stale);
        assert!(store.list(kind).loading);
        assert!(store.apply_page(kind, EntityId(1), fresh, &page(&[5, 6], true)));

        let list = store.list(kind);
        assert_eq!(list.user_ids, vec![UserId(5), UserId(6)]);
        assert_eq!(list.page, 1);
    }

    #[test]
    fn test_page_counter_saturates() {
        let store = UserListStore::new();
        let kind = UserListKind::Following;
        store.set_list_entity(kind, Some(EntityId(1)));
        let generation = store.list(kind).generation;
        store.inner.write().lists.get_mut(&kind).unwrap().page = usize::MAX;

        assert!(matches!(store.start_loading(kind), ListLoad::Ready { page: usize::MAX, .. }));
        assert!(store.apply_page(kind, EntityId(1), generation, &page(&[3], true)));
        assert_eq!(store.list(kind).page, usize::MAX);
    }

    #[test]
    fn test_lists_are_independent() {
        let store = UserListStore::new();
        store.set_list_entity(UserListKind::Reposts, Some(EntityId(1)));
        let generation = store.list(UserListKind::Reposts).generation;
        store.start_loading(UserListKind::Reposts);
        store.apply_page(UserListKind::Reposts, EntityId(1), generation, &page(&[1], true));
        assert!(store.user_ids_in_list(UserListKind::Favorites).is_empty());

        store.reset_list(UserListKind::Reposts);
        assert_eq!(store.list(UserListKind::Reposts), UserListState::default());
    }
}
