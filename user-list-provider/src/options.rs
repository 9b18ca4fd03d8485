pub(crate) const DEFAULT_PAGE_SIZE: usize = 15;

/// Configuration to be used with [`crate::UserListPageProvider`] and [`crate::UserListSession`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UserListOptions {
    page_size: Option<usize>,
    include_current_user: Option<bool>,
}

impl UserListOptions {
    /// Create new [`UserListOptions`] with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of users requested per page, also the limit sent with each fetch.
    ///
    /// A page size of 0 is raised to 1.
    ///
    /// Default: `15`
    #[track_caller]
    pub fn set_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    /// Allow or suppress leading the first page with the signed in user.
    ///
    /// Only has an effect for list flavors that want the signed in user included,
    /// e.g. the reposters of a track the signed in user reposted.
    ///
    /// Default: `true`
    #[track_caller]
    pub fn set_include_current_user(mut self, include_current_user: bool) -> Self {
        self.include_current_user = Some(include_current_user);
        self
    }

    /// The number of users requested per page.
    ///
    /// Default: `15`
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Whether the signed in user may lead the first page.
    ///
    /// Default: `true`
    pub fn include_current_user(&self) -> bool {
        self.include_current_user.unwrap_or(true)
    }
}

pub(crate) fn options_combine(
    base: UserListOptions,
    scope: Option<UserListOptions>,
) -> UserListOptions {
    if let Some(scope) = scope {
        UserListOptions {
            page_size: scope.page_size.or(base.page_size),
            include_current_user: scope.include_current_user.or(base.include_current_user),
        }
    } else {
        base
    }
}
