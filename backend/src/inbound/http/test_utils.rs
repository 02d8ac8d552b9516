//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::web;

use crate::domain::ports::{
    AccessTokenRepository, CategoryRepository, MockKetoRecipeSource, RecipeRepository,
    UserRepository,
};
use crate::domain::{
    Category, CategoryName, EmailAddress, IssuedToken, NewAccount, RecipeDraft, RecipeId, Role,
    User, UserName,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryCatalogue;
use crate::outbound::security::Argon2PasswordHasher;

/// `Authorization` header carrying `token`.
pub fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// HTTP state over a fresh in-memory store.
///
/// The keto source is a mock with no expectations unless one is supplied,
/// so a test that reaches it by accident fails loudly.
pub struct TestCatalogue {
    pub store: Arc<InMemoryCatalogue>,
    state: HttpState,
}

impl TestCatalogue {
    pub fn new() -> Self {
        Self::with_keto(MockKetoRecipeSource::new())
    }

    pub fn with_keto(keto: MockKetoRecipeSource) -> Self {
        let store = Arc::new(InMemoryCatalogue::new());
        let state = HttpState::new(HttpStatePorts {
            users: store.clone(),
            tokens: store.clone(),
            hasher: Arc::new(Argon2PasswordHasher::new()),
            categories: store.clone(),
            recipes: store.clone(),
            favorites: store.clone(),
            keto: Arc::new(keto),
        });
        Self { store, state }
    }

    pub fn data(&self) -> web::Data<HttpState> {
        web::Data::new(self.state.clone())
    }

    /// Insert an account and issue a token for it, skipping password hashing.
    pub async fn sign_in(&self, role: Role, email: &str) -> (User, String) {
        let local = email.split('@').next().unwrap_or(email);
        let account = NewAccount {
            name: UserName::new(local).expect("fixture name"),
            email: EmailAddress::new(email).expect("fixture email"),
            role,
            password_hash: "unused".to_owned(),
        };
        let user = UserRepository::create(&*self.store, &account)
            .await
            .expect("account stored");
        let token = IssuedToken::generate();
        AccessTokenRepository::store(&*self.store, user.id, token.digest())
            .await
            .expect("token stored");
        (user, token.plaintext().to_owned())
    }

    pub async fn category(&self, name: &str) -> Category {
        let name = CategoryName::new(name).expect("fixture category");
        CategoryRepository::create(&*self.store, &name)
            .await
            .expect("category stored")
    }

    pub async fn recipe(&self, title: &str, category: Option<&Category>, author: &User) -> RecipeId {
        let draft = RecipeDraft::try_from_parts(
            title,
            Some(&format!("About {title}")),
            "Flour, Eggs",
            "Mix and cook.",
            category.map(|category| category.id),
        )
        .expect("fixture recipe");
        RecipeRepository::create(&*self.store, &draft, author.id)
            .await
            .expect("recipe stored")
    }
}
