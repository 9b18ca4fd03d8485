use std::fmt::{self, Display, Formatter};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// The raw numeric id.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id! {
    /// Identifies the entity that owns a user list, e.g. the profile whose followers are listed,
    /// or the track whose reposters are listed.
    EntityId
}

define_id! {
    /// Identifies a user appearing in a user list.
    UserId
}

impl EntityId {
    /// Read the entity as a user, for lists owned by a profile.
    pub fn as_user_id(self) -> UserId {
        UserId(self.0)
    }
}

impl From<UserId> for EntityId {
    fn from(value: UserId) -> Self {
        Self(value.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_user_entity_conversion() {
        let user = UserId(42);
        let entity = EntityId::from(user);
        assert_eq!(entity.get(), 42);
        assert_eq!(entity.as_user_id(), user);
        assert_eq!(entity.to_string(), "42");
    }
}
