use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};

use crate::{
    FetchParams, FetchResult, PageRequest, UserListFlavor, UserListOptions, UserListPage,
    UserRecord,
};

/// Turns page requests into deduplicated, order preserving pages of user ids for one list flavor.
///
/// The provider is stateless between calls: the caller owns the ids gathered so far and exposes them
/// through [`UserListFlavor::select_current_user_ids_in_list`].
#[derive(Clone)]
pub struct UserListPageProvider<F> {
    flavor: F,
    options: UserListOptions,
}

impl<F> Debug for UserListPageProvider<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserListPageProvider")
            .field("flavor", &std::any::type_name::<F>())
            .field("options", &self.options)
            .finish()
    }
}

impl<F: UserListFlavor> UserListPageProvider<F> {
    /// Create a new [`UserListPageProvider`] for a list flavor.
    pub fn new(flavor: F) -> Self {
        Self {
            flavor,
            options: UserListOptions::default(),
        }
    }

    /// Set the [`UserListOptions`] used by this provider.
    pub fn set_options(mut self, options: UserListOptions) -> Self {
        self.options = options;
        self
    }

    /// The [`UserListOptions`] used by this provider.
    pub fn options(&self) -> UserListOptions {
        self.options
    }

    /// The list flavor backing this provider.
    pub fn flavor(&self) -> &F {
        &self.flavor
    }

    /// Resolve one page of user ids.
    ///
    /// Fetches a single window of `page_size` users at `page_index * page_size`, drops anything the caller
    /// already holds, and works out whether a further page may exist.
    ///
    /// When the owning entity is cached its reported population decides `has_more`, even if the last batch
    /// came back short. When it isn't cached, a full batch is taken as a sign more may exist.
    ///
    /// Fetch errors are returned as is, without retrying.
    pub async fn provide(
        &self,
        state: &F::State,
        request: PageRequest,
    ) -> Result<UserListPage, F::Error> {
        let PageRequest {
            entity_id,
            page_size,
            ..
        } = request;
        let offset = request.offset();

        let entity = self.flavor.get_existing_entity(state, entity_id);
        let existing_user_ids = self.flavor.select_current_user_ids_in_list(state);
        let current_user_id = self.flavor.select_current_user_id(state);

        if let Some(entity) = &entity
            && !self.flavor.can_fetch_more_users(entity, &[])
        {
            tracing::trace!(%entity_id, "entity has no users to list");
            return Ok(UserListPage::empty());
        }

        let mut seen = existing_user_ids.iter().copied().collect::<HashSet<_>>();
        let mut user_ids = vec![];

        // Seeds only ever lead the first page, later pages would duplicate them:
        if request.is_first_page()
            && let Some(entity) = &entity
        {
            if self.options.include_current_user()
                && self.flavor.include_current_user(entity)
                && let Some(current_user_id) = current_user_id
                && seen.insert(current_user_id)
            {
                user_ids.push(current_user_id);
            }
            for user_id in self.flavor.extract_user_id_subset_from_entity(entity) {
                if seen.insert(user_id) {
                    user_ids.push(user_id);
                }
            }
        }

        let FetchResult { users } = self
            .flavor
            .fetch_all_users_for_entity(FetchParams {
                limit: page_size,
                offset,
                entity_id,
                current_user_id,
            })
            .await?;
        let fetched_count = users.len();

        user_ids.extend(
            users
                .iter()
                .map(UserRecord::user_id)
                .filter(|user_id| seen.insert(*user_id)),
        );

        let has_more = match &entity {
            Some(entity) => {
                let combined_user_ids = existing_user_ids
                    .into_iter()
                    .chain(user_ids.iter().copied())
                    .collect::<Vec<_>>();
                self.flavor.can_fetch_more_users(entity, &combined_user_ids)
            }
            // Cold cache, fall back to batch fullness:
            None => fetched_count == page_size,
        };

        tracing::trace!(
            %entity_id,
            offset,
            page_size,
            fetched_count,
            new_count = user_ids.len(),
            has_more,
            "resolved user list page"
        );

        Ok(UserListPage { user_ids, has_more })
    }
}
