use std::{future::Future, sync::Arc};

use futures::TryFutureExt;

use crate::{EntityId, User, UserId, UserListStore};

/// The remote calls behind the built-in list flavors.
///
/// Every call returns one `(limit, offset)` window in backend order. Transport, retries and backoff
/// are the implementor's concern.
pub trait UserListBackend {
    /// The transport error.
    type Error;

    /// Users following `user_id`.
    fn get_followers(
        &self,
        limit: usize,
        offset: usize,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>>;

    /// Users followed by `user_id`.
    fn get_followees(
        &self,
        limit: usize,
        offset: usize,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>>;

    /// Users following `followee_id` who are also followed by `current_user_id`.
    fn get_mutual_followers(
        &self,
        limit: usize,
        offset: usize,
        followee_id: UserId,
        current_user_id: UserId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>>;

    /// Users who reposted a track.
    fn get_track_reposters(
        &self,
        limit: usize,
        offset: usize,
        track_id: EntityId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>>;

    /// Users who favorited a track.
    fn get_track_favoriters(
        &self,
        limit: usize,
        offset: usize,
        track_id: EntityId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>>;

    /// Users who reposted a playlist or album.
    fn get_playlist_reposters(
        &self,
        limit: usize,
        offset: usize,
        playlist_id: EntityId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>>;

    /// Users who favorited a playlist or album.
    fn get_playlist_favoriters(
        &self,
        limit: usize,
        offset: usize,
        playlist_id: EntityId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>>;
}

impl<B: UserListBackend> UserListBackend for Arc<B> {
    type Error = B::Error;

    fn get_followers(
        &self,
        limit: usize,
        offset: usize,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>> {
        (**self).get_followers(limit, offset, user_id)
    }

    fn get_followees(
        &self,
        limit: usize,
        offset: usize,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>> {
        (**self).get_followees(limit, offset, user_id)
    }

    fn get_mutual_followers(
        &self,
        limit: usize,
        offset: usize,
        followee_id: UserId,
        current_user_id: UserId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>> {
        (**self).get_mutual_followers(limit, offset, followee_id, current_user_id)
    }

    fn get_track_reposters(
        &self,
        limit: usize,
        offset: usize,
        track_id: EntityId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>> {
        (**self).get_track_reposters(limit, offset, track_id)
    }

    fn get_track_favoriters(
        &self,
        limit: usize,
        offset: usize,
        track_id: EntityId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>> {
        (**self).get_track_favoriters(limit, offset, track_id)
    }

    fn get_playlist_reposters(
        &self,
        limit: usize,
        offset: usize,
        playlist_id: EntityId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>> {
        (**self).get_playlist_reposters(limit, offset, playlist_id)
    }

    fn get_playlist_favoriters(
        &self,
        limit: usize,
        offset: usize,
        playlist_id: EntityId,
    ) -> impl Future<Output = Result<Vec<User>, Self::Error>> {
        (**self).get_playlist_favoriters(limit, offset, playlist_id)
    }
}

/// Wraps a [`UserListBackend`], adding every fetched user to a [`UserListStore`]'s user cache.
#[derive(Debug, Clone)]
pub struct CachingBackend<B> {
    inner: B,
    store: Arc<UserListStore>,
}

impl<B> CachingBackend<B> {
    /// Cache the results of `inner` into `store`.
    pub fn new(inner: B, store: Arc<UserListStore>) -> Self {
        Self { inner, store }
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    fn cache(&self, users: &[User]) {
        tracing::debug!(count = users.len(), "caching fetched users");
        self.store.cache_users(users.iter().cloned());
    }
}

impl<B: UserListBackend> UserListBackend for CachingBackend<B> {
    type Error = B::Error;

    async fn get_followers(
        &self,
        limit: usize,
        offset: usize,
        user_id: UserId,
    ) -> Result<Vec<User>, Self::Error> {
        self.inner
            .get_followers(limit, offset, user_id)
            .inspect_ok(|users| self.cache(users))
            .await
    }

    async fn get_followees(
        &self,
        limit: usize,
        offset: usize,
        user_id: UserId,
    ) -> Result<Vec<User>, Self::Error> {
        self.inner
            .get_followees(limit, offset, user_id)
            .inspect_ok(|users| self.cache(users))
            .await
    }

    async fn get_mutual_followers(
        &self,
        limit: usize,
        offset: usize,
        followee_id: UserId,
        current_user_id: UserId,
    ) -> Result<Vec<User>, Self::Error> {
        self.inner
            .get_mutual_followers(limit, offset, followee_id, current_user_id)
            .inspect_ok(|users| self.cache(users))
            .await
    }

    async fn get_track_reposters(
        &self,
        limit: usize,
        offset: usize,
        track_id: EntityId,
    ) -> Result<Vec<User>, Self::Error> {
        self.inner
            .get_track_reposters(limit, offset, track_id)
            .inspect_ok(|users| self.cache(users))
            .await
    }

    async fn get_track_favoriters(
        &self,
        limit: usize,
        offset: usize,
        track_id: EntityId,
    ) -> Result<Vec<User>, Self::Error> {
        self.inner
            .get_track_favoriters(limit, offset, track_id)
            .inspect_ok(|users| self.cache(users))
            .await
    }

    async fn get_playlist_reposters(
        &self,
        limit: usize,
        offset: usize,
        playlist_id: EntityId,
    ) -> Result<Vec<User>, Self::Error> {
        self.inner
            .get_playlist_reposters(limit, offset, playlist_id)
            .inspect_ok(|users| self.cache(users))
            .await
    }

    async fn get_playlist_favoriters(
        &self,
        limit: usize,
        offset: usize,
        playlist_id: EntityId,
    ) -> Result<Vec<User>, Self::Error> {
        self.inner
            .get_playlist_favoriters(limit, offset, playlist_id)
            .inspect_ok(|users| self.cache(users))
            .await
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use parking_lot::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MockBackendError(pub String);

    impl std::fmt::Display for MockBackendError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl std::error::Error for MockBackendError {}

    /// The relationship a mocked window is served for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Relation {
        Followers(UserId),
        Followees(UserId),
        Mutuals(UserId, UserId),
        Reposters(EntityId),
        Favoriters(EntityId),
        PlaylistReposters(EntityId),
        PlaylistFavoriters(EntityId),
    }

    /// Serves offset windows over fixed lists, recording every call.
    #[derive(Debug, Default)]
    pub struct MockBackend {
        lists: Mutex<HashMap<Relation, Vec<User>>>,
        calls: Mutex<Vec<(Relation, usize, usize)>>,
        call_count: AtomicUsize,
        fail_with: Mutex<Option<String>>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_list(self, relation: Relation, user_ids: impl IntoIterator<Item = u64>) -> Self {
            self.set_list(relation, user_ids);
            self
        }

        pub fn set_list(&self, relation: Relation, user_ids: impl IntoIterator<Item = u64>) {
            let users = user_ids
                .into_iter()
                .map(|user_id| User::new(user_id, format!("user{user_id}")))
                .collect();
            self.lists.lock().insert(relation, users);
        }

        pub fn fail_with(&self, message: Option<&str>) {
            *self.fail_with.lock() = message.map(str::to_string);
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::Relaxed)
        }

        pub fn calls(&self) -> Vec<(Relation, usize, usize)> {
            self.calls.lock().clone()
        }

        async fn window(
            &self,
            relation: Relation,
            limit: usize,
            offset: usize,
        ) -> Result<Vec<User>, MockBackendError> {
            self.call_count.fetch_add(1, Ordering::Relaxed);
            self.calls.lock().push((relation, limit, offset));
            tokio::task::yield_now().await;
            if let Some(message) = self.fail_with.lock().clone() {
                return Err(MockBackendError(message));
            }
            Ok(self
                .lists
                .lock()
                .get(&relation)
                .map(|users| users.iter().skip(offset).take(limit).cloned().collect())
                .unwrap_or_default())
        }
    }

    impl UserListBackend for MockBackend {
        type Error = MockBackendError;

        async fn get_followers(
            &self,
            limit: usize,
            offset: usize,
            user_id: UserId,
        ) -> Result<Vec<User>, Self::Error> {
            self.window(Relation::Followers(user_id), limit, offset).await
        }

        async fn get_followees(
            &self,
            limit: usize,
            offset: usize,
            user_id: UserId,
        ) -> Result<Vec<User>, Self::Error> {
            self.window(Relation::Followees(user_id), limit, offset).await
        }

        async fn get_mutual_followers(
            &self,
            limit: usize,
            offset: usize,
            followee_id: UserId,
            current_user_id: UserId,
        ) -> Result<Vec<User>, Self::Error> {
            self.window(Relation::Mutuals(followee_id, current_user_id), limit, offset)
                .await
        }

        async fn get_track_reposters(
            &self,
            limit: usize,
            offset: usize,
            track_id: EntityId,
        ) -> Result<Vec<User>, Self::Error> {
            self.window(Relation::Reposters(track_id), limit, offset).await
        }

        async fn get_track_favoriters(
            &self,
            limit: usize,
            offset: usize,
            track_id: EntityId,
        ) -> Result<Vec<User>, Self::Error> {
            self.window(Relation::Favoriters(track_id), limit, offset).await
        }

        async fn get_playlist_reposters(
            &self,
            limit: usize,
            offset: usize,
            playlist_id: EntityId,
        ) -> Result<Vec<User>, Self::Error> {
            self.window(Relation::PlaylistReposters(playlist_id), limit, offset)
                .await
        }

        async fn get_playlist_favoriters(
            &self,
            limit: usize,
            offset: usize,
            playlist_id: EntityId,
        ) -> Result<Vec<User>, Self::Error> {
            self.window(Relation::PlaylistFavoriters(playlist_id), limit, offset)
                .await
        }
    }

    #[tokio::test]
    async fn test_caching_backend_caches_on_success() {
        let store = Arc::new(UserListStore::new());
        let backend = CachingBackend::new(
            MockBackend::new().with_list(Relation::Followers(UserId(1)), [2, 3]),
            store.clone(),
        );

        let users = backend.get_followers(10, 0, UserId(1)).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(store.cached_user_count(), 2);
        assert_eq!(
            store.user(UserId(3)).map(|user| user.handle),
            Some("user3".to_string())
        );
    }

    #[tokio::test]
    async fn test_caching_backend_passes_errors_through() {
        let store = Arc::new(UserListStore::new());
        let inner = Arc::new(MockBackend::new().with_list(Relation::Reposters(EntityId(5)), [2]));
        inner.fail_with(Some("timeout"));
        let backend = CachingBackend::new(inner.clone(), store.clone());

        let result = backend.get_track_reposters(10, 0, EntityId(5)).await;
        assert_eq!(result, Err(MockBackendError("timeout".to_string())));
        assert_eq!(store.cached_user_count(), 0);
        assert_eq!(inner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_caching_backend_caches_playlist_engagement() {
        let store = Arc::new(UserListStore::new());
        let backend = CachingBackend::new(
            MockBackend::new()
                .with_list(Relation::PlaylistReposters(EntityId(5)), [2, 3])
                .with_list(Relation::PlaylistFavoriters(EntityId(5)), [3, 4]),
            store.clone(),
        );

        let reposters = backend.get_playlist_reposters(10, 0, EntityId(5)).await.unwrap();
        let favoriters = backend.get_playlist_favoriters(10, 1, EntityId(5)).await.unwrap();
        assert_eq!(reposters.len(), 2);
        assert_eq!(favoriters.len(), 1);
        assert_eq!(store.cached_user_count(), 3);
        assert_eq!(
            backend.inner().calls(),
            vec![
                (Relation::PlaylistReposters(EntityId(5)), 10, 0),
                (Relation::PlaylistFavoriters(EntityId(5)), 10, 1),
            ]
        );
    }
}
