use std::future::Future;

use crate::{EntityId, FetchParams, FetchResult, UserId, UserRecord};

/// Everything a [`crate::UserListPageProvider`] needs to know about one kind of user list.
///
/// Implement once per list flavor (followers, following, mutuals...).
/// State is always passed in explicitly as a snapshot, implementations should not reach for globals.
pub trait UserListFlavor {
    /// The externally owned state snapshot read by the selectors.
    type State: ?Sized;
    /// The entity owning the list.
    type Entity;
    /// The record type returned by the remote fetch.
    type User: UserRecord;
    /// The remote fetch error, propagated to the caller untouched.
    type Error;

    /// Synchronous cache lookup of the owning entity.
    fn get_existing_entity(&self, state: &Self::State, id: EntityId) -> Option<Self::Entity>;

    /// Ids inlined in the entity record itself, e.g. the followees who reposted a track.
    fn extract_user_id_subset_from_entity(&self, _entity: &Self::Entity) -> Vec<UserId> {
        Vec::new()
    }

    /// Fetch one window of users for the entity.
    ///
    /// Should be idempotent for a given `(entity_id, limit, offset)`.
    /// Retry policy, if any, belongs here.
    fn fetch_all_users_for_entity(
        &self,
        params: FetchParams,
    ) -> impl Future<Output = Result<FetchResult<Self::User>, Self::Error>>;

    /// The ids the caller has already gathered for this list.
    fn select_current_user_ids_in_list(&self, state: &Self::State) -> Vec<UserId>;

    /// The signed in user, if any.
    fn select_current_user_id(&self, state: &Self::State) -> Option<UserId>;

    /// Whether the population reported by the entity is larger than the ids gathered so far.
    fn can_fetch_more_users(&self, entity: &Self::Entity, combined_user_ids: &[UserId]) -> bool;

    /// Whether the signed in user should lead the first page.
    fn include_current_user(&self, _entity: &Self::Entity) -> bool {
        false
    }
}
