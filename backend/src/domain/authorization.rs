//! Role-based authorization policy.
//!
//! Every mutating catalogue operation asks [`authorize`] before touching
//! storage. The principal is always passed in explicitly; nothing here reads
//! ambient request state. [`Role`] and [`Action`] are closed enums, so every
//! pair is matched exhaustively and anything not granted is denied.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Error, UserId};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Curates categories and recipes.
    Admin,
    /// Keeps a personal list of favorites.
    User,
}

impl Role {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    id: UserId,
    role: Role,
}

impl Principal {
    /// Describe an authenticated caller.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// The caller's account id.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// The caller's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// Operations gated by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a category.
    CreateCategory,
    /// Rename a category.
    UpdateCategory,
    /// Remove a category.
    DeleteCategory,
    /// Create a recipe.
    CreateRecipe,
    /// Edit a recipe.
    UpdateRecipe,
    /// Remove a recipe.
    DeleteRecipe,
    /// Favorite a recipe.
    CreateFavorite,
    /// Remove a favorite owned by `owner`.
    DeleteFavorite {
        /// Account that owns the favorite.
        owner: UserId,
    },
    /// Inspect another account's favorites.
    ViewUserFavorites,
}

impl Action {
    fn denial_message(self, denial: Denial) -> &'static str {
        match (self, denial) {
            (Self::CreateCategory, _) => "Only admins can create categories",
            (Self::UpdateCategory, _) => "Only admins can update categories",
            (Self::DeleteCategory, _) => "Only admins can delete categories",
            (Self::CreateRecipe, _) => "Only admins can create recipes",
            (Self::UpdateRecipe, _) => "Only admins can update recipes",
            (Self::DeleteRecipe, _) => "Only admins can delete recipes",
            (Self::CreateFavorite, _) => "Only users can create favorites",
            (Self::DeleteFavorite { .. }, Denial::NotOwner) => {
                "You can only delete your own favorites"
            }
            (Self::DeleteFavorite { .. }, _) => "Only users can delete favorites",
            (Self::ViewUserFavorites, _) => "Only admins can view user favorites",
        }
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The action is reserved for admins.
    AdminRequired,
    /// The action is reserved for regular users.
    UserRequired,
    /// The caller does not own the resource.
    NotOwner,
}

impl Denial {
    /// Machine-readable reason code.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::AdminRequired => "admin_required",
            Self::UserRequired => "user_required",
            Self::NotOwner => "not_owner",
        }
    }
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The action may proceed.
    Allow,
    /// The action is refused.
    Deny(Denial),
}

/// Decide whether `principal` may perform `action`.
///
/// # Examples
/// ```
/// use recipe_catalogue::domain::{authorize, Action, Decision, Denial, Principal, Role, UserId};
///
/// let user = Principal::new(UserId::new(7), Role::User);
/// assert_eq!(
///     authorize(&user, Action::CreateCategory),
///     Decision::Deny(Denial::AdminRequired)
/// );
/// assert_eq!(authorize(&user, Action::CreateFavorite), Decision::Allow);
/// ```
#[must_use]
pub fn authorize(principal: &Principal, action: Action) -> Decision {
    match (principal.role, action) {
        (
            Role::Admin,
            Action::CreateCategory
            | Action::UpdateCategory
            | Action::DeleteCategory
            | Action::CreateRecipe
            | Action::UpdateRecipe
            | Action::DeleteRecipe
            | Action::ViewUserFavorites,
        ) => Decision::Allow,
        (
            Role::User,
            Action::CreateCategory
            | Action::UpdateCategory
            | Action::DeleteCategory
            | Action::CreateRecipe
            | Action::UpdateRecipe
            | Action::DeleteRecipe
            | Action::ViewUserFavorites,
        ) => Decision::Deny(Denial::AdminRequired),
        (Role::User, Action::CreateFavorite) => Decision::Allow,
        (Role::User, Action::DeleteFavorite { owner }) if owner == principal.id => Decision::Allow,
        (Role::User, Action::DeleteFavorite { .. }) => Decision::Deny(Denial::NotOwner),
        (Role::Admin, Action::CreateFavorite | Action::DeleteFavorite { .. }) => {
            Decision::Deny(Denial::UserRequired)
        }
    }
}

/// Run the policy and turn a denial into a `Forbidden` error.
///
/// # Errors
/// Returns [`Error`] with code `forbidden` and `details.reason` set to the
/// denial reason when the policy refuses the action.
pub fn ensure_allowed(principal: &Principal, action: Action) -> Result<(), Error> {
    match authorize(principal, action) {
        Decision::Allow => Ok(()),
        Decision::Deny(denial) => Err(Error::forbidden(action.denial_message(denial))
            .with_details(json!({ "reason": denial.reason() }))),
    }
}

/// Which favorites a principal may see when listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteScope {
    /// Every favorite in the catalogue.
    All,
    /// Only favorites owned by the given account.
    OwnedBy(UserId),
}

impl FavoriteScope {
    /// Narrow the listing for `principal`; admins see everything.
    #[must_use]
    pub const fn for_principal(principal: &Principal) -> Self {
        match principal.role {
            Role::Admin => Self::All,
            Role::User => Self::OwnedBy(principal.id),
        }
    }

    /// Whether a favorite owned by `owner` falls inside this scope.
    #[must_use]
    pub fn includes(self, owner: UserId) -> bool {
        match self {
            Self::All => true,
            Self::OwnedBy(id) => id == owner,
        }
    }
}
