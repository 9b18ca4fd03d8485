use std::fmt::{self, Debug, Display, Formatter};

use crate::{
    EntityId, PageRequest, StoredUserList, UserListKind, UserListOptions, UserListPage,
    UserListPageProvider, UserListState, UserListStore,
    options::options_combine,
    store::ListLoad,
    utils::OnDrop,
};

/// Why a [`UserListSession`] failed to load a page.
#[derive(Debug, thiserror::Error)]
pub enum UserListError<E> {
    /// The remote fetch failed. The message is also recorded on the list's [`UserListState::error`].
    #[error("failed to load {kind} of {entity_id}: {message}")]
    Fetch {
        /// The list that failed.
        kind: UserListKind,
        /// The entity the list belongs to.
        entity_id: EntityId,
        /// The rendered fetch error.
        message: String,
        /// The fetch error itself.
        #[source]
        source: E,
    },
    /// Another page of the same list is still being fetched.
    #[error("a page of {kind} is already loading")]
    InFlight {
        /// The busy list.
        kind: UserListKind,
    },
    /// The list started over while the page was being fetched, the page was dropped.
    #[error("{kind} moved on from {entity_id} while loading")]
    Superseded {
        /// The list that moved on.
        kind: UserListKind,
        /// The entity the dropped page belonged to.
        entity_id: EntityId,
    },
}

/// Drives a [`UserListPageProvider`] page by page, keeping the gathered ids in a [`UserListStore`].
///
/// Pages are always requested in order, one at a time per list.
pub struct UserListSession<F> {
    provider: UserListPageProvider<F>,
}

impl<F> Debug for UserListSession<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserListSession")
            .field("provider", &self.provider)
            .finish()
    }
}

impl<F> UserListSession<F>
where
    F: StoredUserList,
    F::Error: Display,
{
    /// Create a session for a list flavor with default [`UserListOptions`].
    pub fn new(flavor: F) -> Self {
        Self::from_provider(UserListPageProvider::new(flavor))
    }

    /// Create a session around an existing provider, keeping its options.
    pub fn from_provider(provider: UserListPageProvider<F>) -> Self {
        Self { provider }
    }

    /// Set specific [`UserListOptions`] for this session.
    ///
    /// These are combined with the provider's options, the session's taking precedence.
    pub fn set_options(mut self, options: UserListOptions) -> Self {
        let combined = options_combine(self.provider.options(), Some(options));
        self.provider = self.provider.set_options(combined);
        self
    }

    /// The options in effect for this session.
    pub fn options(&self) -> UserListOptions {
        self.provider.options()
    }

    /// The underlying provider.
    pub fn provider(&self) -> &UserListPageProvider<F> {
        &self.provider
    }

    /// The store list this session fills.
    pub fn kind(&self) -> UserListKind {
        F::KIND
    }

    /// A snapshot of the list's state.
    pub fn state(&self, store: &UserListStore) -> UserListState {
        store.list(F::KIND)
    }

    /// Point the list at an entity, or at none.
    ///
    /// Switching entity starts the list over, reopening the current one keeps what was gathered.
    pub fn open(&self, store: &UserListStore, entity_id: Option<EntityId>) {
        let kind = F::KIND;
        tracing::debug!(%kind, ?entity_id, "opening user list");
        store.set_list_entity(kind, entity_id);
    }

    /// Forget everything gathered for the list.
    pub fn reset(&self, store: &UserListStore) {
        let kind = F::KIND;
        tracing::debug!(%kind, "resetting user list");
        store.reset_list(kind);
    }

    /// Load the next page of the list and append it to the store.
    ///
    /// Without an entity, or once the list is exhausted, returns [`UserListPage::empty`] without fetching.
    ///
    /// If this future is dropped mid-fetch, the list is left ready to load the same page again.
    pub async fn load_more(
        &self,
        store: &UserListStore,
    ) -> Result<UserListPage, UserListError<F::Error>> {
        let kind = F::KIND;
        let (entity_id, generation, page_index) = match store.start_loading(kind) {
            ListLoad::Ready {
                entity_id,
                generation,
                page,
            } => (entity_id, generation, page),
            ListLoad::NoEntity | ListLoad::Exhausted => return Ok(UserListPage::empty()),
            ListLoad::InFlight => return Err(UserListError::InFlight { kind }),
        };

        let cancel_guard = OnDrop::new(|| store.cancel_loading(kind, entity_id, generation));
        let request = PageRequest::new(entity_id, page_index, self.provider.options().page_size());
        tracing::debug!(%kind, %entity_id, page_index, "loading user list page");
        let result = self.provider.provide(store, request).await;
        cancel_guard.disarm();

        match result {
            Ok(page) => {
                if !store.apply_page(kind, entity_id, generation, &page) {
                    tracing::debug!(%kind, %entity_id, generation, "dropping page for a list that started over");
                    return Err(UserListError::Superseded { kind, entity_id });
                }
                tracing::debug!(
                    %kind,
                    %entity_id,
                    page_index,
                    new_count = page.user_ids.len(),
                    has_more = page.has_more,
                    "loaded user list page"
                );
                Ok(page)
            }
            Err(source) => {
                let message = source.to_string();
                tracing::warn!(%kind, %entity_id, page_index, error = %message, "failed to load user list page");
                store.set_list_error(kind, entity_id, generation, message.clone());
                Err(UserListError::Fetch {
                    kind,
                    entity_id,
                    message,
                    source,
                })
            }
        }
    }
}
