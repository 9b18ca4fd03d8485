use crate::{EntityId, UserId};

/// A request for one page of a user list.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct PageRequest {
    /// The entity owning the list, this should be the same across all pages of a session.
    pub entity_id: EntityId,
    /// The requested page index, starting from 0.
    pub page_index: usize,
    /// The page size, also the limit sent with each fetch. Must be positive.
    pub page_size: usize,
}

impl PageRequest {
    /// Create a new [`PageRequest`].
    pub fn new(entity_id: EntityId, page_index: usize, page_size: usize) -> Self {
        Self {
            entity_id,
            page_index,
            page_size,
        }
    }

    /// The zero-based offset into the upstream list, saturating at `usize::MAX`.
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }

    /// Whether this is the first page of a session.
    pub fn is_first_page(&self) -> bool {
        self.page_index == 0
    }
}

/// The window passed to [`crate::UserListFlavor::fetch_all_users_for_entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchParams {
    /// Maximum number of records to return.
    pub limit: usize,
    /// Number of records to skip.
    pub offset: usize,
    /// The entity whose users are being listed.
    pub entity_id: EntityId,
    /// The signed in user, if any.
    pub current_user_id: Option<UserId>,
}

/// The raw output of one remote fetch, in backend order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult<U> {
    /// The fetched user records.
    pub users: Vec<U>,
}

impl<U> FetchResult<U> {
    /// Wrap fetched records.
    pub fn new(users: Vec<U>) -> Self {
        Self { users }
    }
}

impl<U> From<Vec<U>> for FetchResult<U> {
    fn from(users: Vec<U>) -> Self {
        Self { users }
    }
}

/// One page of user ids, as returned by [`crate::UserListPageProvider::provide`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListPage {
    /// Newly gathered ids, deduplicated against everything the caller already holds.
    pub user_ids: Vec<UserId>,
    /// Whether a further page may hold more users.
    pub has_more: bool,
}

impl UserListPage {
    /// The terminal page: no ids and nothing more to fetch.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A record carrying a [`UserId`].
pub trait UserRecord {
    /// The id of the user this record describes.
    fn user_id(&self) -> UserId;
}

impl UserRecord for UserId {
    fn user_id(&self) -> UserId {
        *self
    }
}
