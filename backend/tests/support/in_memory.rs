//! In-memory doubles for every driven port.
//!
//! One [`InMemoryStore`] plays all repositories so the real domain services
//! can be wired exactly as the server wires them, minus PostgreSQL.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use foodgram::domain::ports::{
    AccountsCommand, CatalogueQuery, CatalogueRepository, CatalogueRepositoryError, ImageStore,
    ImageStoreError, Listing, MembershipCommand, MembershipRepository,
    MembershipRepositoryError, PasswordHasher, PasswordHasherError, RecipeRepository,
    RecipeRepositoryError, RecipesCommand, RecipesQuery, ShoppingListQuery, ShortHashGenerator,
    ShortLinkCommand, ShortLinkRepository, ShortLinkRepositoryError, SubscriptionRepository,
    SubscriptionRepositoryError, SubscriptionsCommand, UserPersistenceError, UserRepository,
    UsersQuery,
};
use foodgram::domain::{
    AccountsService, AuthorCard, CartPortion, CatalogueService, Email, ImageFolder, ImagePath,
    Ingredient, IngredientId, InlineImage, MembershipKind, MembershipService, OriginalUrl,
    PasswordHash, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeIngredientView,
    RecipeLimits, RecipeService, RecipeSummary, RecipeView, Registration, ShoppingListService,
    ShortHash, ShortLink, ShortLinkService, Subscription, SubscriptionService, Tag, TagId,
    TagSlug, User, UserCard, UserId, DEFAULT_SHORT_LINK_ATTEMPTS,
};
use foodgram::inbound::http::state::{HttpState, HttpStatePorts, Presentation};

#[derive(Default)]
struct Tables {
    users: Vec<(User, PasswordHash)>,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    memberships: Vec<(MembershipKind, UserId, RecipeId)>,
    subscriptions: Vec<Subscription>,
    links: Vec<ShortLink>,
    images: Vec<ImagePath>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|(user, _)| user)
            .find(|user| user.id == id)
    }

    fn card(&self, viewer: Option<UserId>, user: &User) -> UserCard {
        UserCard {
            user: user.clone(),
            is_subscribed: viewer.is_some_and(|viewer| {
                self.subscriptions
                    .iter()
                    .any(|edge| edge.user == viewer && edge.author == user.id)
            }),
        }
    }

    fn has(&self, kind: MembershipKind, user: Option<UserId>, recipe: RecipeId) -> bool {
        user.is_some_and(|user| self.memberships.contains(&(kind, user, recipe)))
    }

    fn view(&self, recipe: &Recipe, viewer: Option<UserId>) -> Option<RecipeView> {
        let author = self.user(recipe.author_id)?;
        let tags = recipe
            .tags
            .iter()
            .filter_map(|id| self.tags.iter().find(|tag| tag.id == *id).cloned())
            .collect();
        let ingredients = recipe
            .ingredients
            .iter()
            .filter_map(|portion| {
                self.ingredients
                    .iter()
                    .find(|ingredient| ingredient.id == portion.ingredient_id)
                    .map(|ingredient| RecipeIngredientView {
                        ingredient: ingredient.clone(),
                        amount: portion.amount,
                    })
            })
            .collect();
        Some(RecipeView {
            id: recipe.id,
            author: self.card(viewer, author),
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
            tags,
            ingredients,
            is_favorited: self.has(MembershipKind::Favorite, viewer, recipe.id),
            is_in_shopping_cart: self.has(MembershipKind::ShoppingCart, viewer, recipe.id),
        })
    }

    fn matches(&self, recipe: &Recipe, filter: &RecipeFilter, viewer: Option<UserId>) -> bool {
        let tagged = filter.tags.is_empty()
            || recipe.tags.iter().any(|id| {
                self.tags
                    .iter()
                    .any(|tag| tag.id == *id && filter.tags.contains(&tag.slug))
            });
        let flag = |wanted: Option<bool>, kind| match (wanted, viewer) {
            (Some(wanted), Some(_)) => self.has(kind, viewer, recipe.id) == wanted,
            _ => true,
        };
        tagged
            && filter.author.is_none_or(|author| recipe.author_id == author)
            && flag(filter.is_favorited, MembershipKind::Favorite)
            && flag(filter.is_in_shopping_cart, MembershipKind::ShoppingCart)
    }
}

fn page<T>(items: Vec<T>, offset: u64, limit: u32) -> Listing<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(limit as usize)
        .collect();
    Listing::new(total, items)
}

fn draft_recipe(id: RecipeId, author: UserId, draft: &RecipeDraft) -> Recipe {
    Recipe {
        id,
        author_id: author,
        name: draft.name().to_owned(),
        image: draft.image().cloned(),
        text: draft.text().to_owned(),
        cooking_time: draft.cooking_time(),
        tags: draft.tags().to_vec(),
        ingredients: draft.ingredients().to_vec(),
    }
}

/// Shared in-memory tables implementing every repository port.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Seed the admin-managed catalogue.
    pub fn with_catalogue(tags: Vec<Tag>, ingredients: Vec<Ingredient>) -> Self {
        let store = Self::default();
        {
            let mut tables = store.lock();
            tables.tags = tags;
            tables.ingredients = ingredients;
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("in-memory tables lock")
    }

    /// Paths currently held by the image store.
    pub fn stored_images(&self) -> Vec<ImagePath> {
        self.lock().images.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(
        &self,
        registration: &Registration,
        password_hash: &PasswordHash,
    ) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock();
        if tables.users.iter().any(|(user, _)| {
            user.email == registration.email || user.username == registration.username
        }) {
            return Err(UserPersistenceError::duplicate("email or username taken"));
        }
        let user = User {
            id: UserId::new(tables.next_id()),
            email: registration.email.clone(),
            username: registration.username.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            avatar: None,
            is_admin: false,
        };
        tables.users.push((user.clone(), password_hash.clone()));
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().user(id).cloned())
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, PasswordHash)>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| user.email == *email)
            .cloned())
    }

    async fn password_hash(
        &self,
        id: UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(_, hash)| hash.clone()))
    }

    async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock();
        if let Some((_, hash)) = tables.users.iter_mut().find(|(user, _)| user.id == id) {
            *hash = password_hash.clone();
        }
        Ok(())
    }

    async fn replace_avatar(
        &self,
        id: UserId,
        avatar: Option<ImagePath>,
    ) -> Result<Option<ImagePath>, UserPersistenceError> {
        let mut tables = self.lock();
        Ok(tables
            .users
            .iter_mut()
            .find(|(user, _)| user.id == id)
            .and_then(|(user, _)| std::mem::replace(&mut user.avatar, avatar)))
    }

    async fn find_card(
        &self,
        viewer: Option<UserId>,
        id: UserId,
    ) -> Result<Option<UserCard>, UserPersistenceError> {
        let tables = self.lock();
        Ok(tables.user(id).map(|user| tables.card(viewer, user)))
    }

    async fn list_cards(
        &self,
        viewer: Option<UserId>,
        offset: u64,
        limit: u32,
    ) -> Result<Listing<UserCard>, UserPersistenceError> {
        let tables = self.lock();
        let cards = tables
            .users
            .iter()
            .map(|(user, _)| tables.card(viewer, user))
            .collect();
        Ok(page(cards, offset, limit))
    }
}

#[async_trait]
impl CatalogueRepository for InMemoryStore {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut tags = self.lock().tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        Ok(self.lock().tags.iter().find(|tag| tag.id == id).cloned())
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let mut ingredients: Vec<Ingredient> = self
            .lock()
            .ingredients
            .iter()
            .filter(|ingredient| {
                name_prefix
                    .as_deref()
                    .is_none_or(|prefix| ingredient.name.starts_with(prefix))
            })
            .cloned()
            .collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ingredients)
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        Ok(self
            .lock()
            .ingredients
            .iter()
            .find(|ingredient| ingredient.id == id)
            .cloned())
    }

    async fn missing_tag_ids(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError> {
        let tables = self.lock();
        let mut missing: Vec<TagId> = ids
            .iter()
            .copied()
            .filter(|id| !tables.tags.iter().any(|tag| tag.id == *id))
            .collect();
        missing.sort_by_key(|id| id.get());
        Ok(missing)
    }

    async fn missing_ingredient_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError> {
        let tables = self.lock();
        let mut missing: Vec<IngredientId> = ids
            .iter()
            .copied()
            .filter(|id| !tables.ingredients.iter().any(|ingredient| ingredient.id == *id))
            .collect();
        missing.sort_by_key(|id| id.get());
        Ok(missing)
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(
        &self,
        author: UserId,
        draft: &RecipeDraft,
    ) -> Result<RecipeId, RecipeRepositoryError> {
        let mut tables = self.lock();
        let id = RecipeId::new(tables.next_id());
        tables.recipes.push(draft_recipe(id, author, draft));
        Ok(id)
    }

    async fn update(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<bool, RecipeRepositoryError> {
        let mut tables = self.lock();
        let Some(recipe) = tables.recipes.iter_mut().find(|recipe| recipe.id == id) else {
            return Ok(false);
        };
        *recipe = draft_recipe(id, recipe.author_id, draft);
        Ok(true)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut tables = self.lock();
        let before = tables.recipes.len();
        tables.recipes.retain(|recipe| recipe.id != id);
        tables.memberships.retain(|(_, _, recipe)| *recipe != id);
        Ok(tables.recipes.len() < before)
    }

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        Ok(self
            .lock()
            .recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .cloned())
    }

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipeRepositoryError> {
        Ok(self
            .lock()
            .recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .map(|recipe| RecipeSummary {
                id: recipe.id,
                name: recipe.name.clone(),
                image: recipe.image.clone(),
                cooking_time: recipe.cooking_time,
            }))
    }

    async fn find_view(
        &self,
        id: RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<RecipeView>, RecipeRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .and_then(|recipe| tables.view(recipe, viewer)))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<UserId>,
        offset: u64,
        limit: u32,
    ) -> Result<Listing<RecipeView>, RecipeRepositoryError> {
        let tables = self.lock();
        let views = tables
            .recipes
            .iter()
            .rev()
            .filter(|recipe| tables.matches(recipe, filter, viewer))
            .filter_map(|recipe| tables.view(recipe, viewer))
            .collect();
        Ok(page(views, offset, limit))
    }
}

#[async_trait]
impl MembershipRepository for InMemoryStore {
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), MembershipRepositoryError> {
        let mut tables = self.lock();
        if tables.memberships.contains(&(kind, user, recipe)) {
            return Err(MembershipRepositoryError::duplicate(format!(
                "{user}/{recipe}"
            )));
        }
        tables.memberships.push((kind, user, recipe));
        Ok(())
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut tables = self.lock();
        let before = tables.memberships.len();
        tables.memberships.retain(|entry| *entry != (kind, user, recipe));
        Ok(tables.memberships.len() < before)
    }

    async fn contains(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        Ok(self.lock().memberships.contains(&(kind, user, recipe)))
    }

    async fn cart_portions(
        &self,
        user: UserId,
    ) -> Result<Vec<CartPortion>, MembershipRepositoryError> {
        let tables = self.lock();
        let portions = tables
            .memberships
            .iter()
            .filter(|(kind, owner, _)| *kind == MembershipKind::ShoppingCart && *owner == user)
            .filter_map(|(_, _, id)| tables.recipes.iter().find(|recipe| recipe.id == *id))
            .flat_map(|recipe| recipe.ingredients.iter())
            .filter_map(|portion| {
                tables
                    .ingredients
                    .iter()
                    .find(|ingredient| ingredient.id == portion.ingredient_id)
                    .map(|ingredient| CartPortion {
                        name: ingredient.name.clone(),
                        measurement_unit: ingredient.measurement_unit.clone(),
                        amount: portion.amount,
                    })
            })
            .collect();
        Ok(portions)
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn add(&self, edge: Subscription) -> Result<(), SubscriptionRepositoryError> {
        let mut tables = self.lock();
        if tables.subscriptions.contains(&edge) {
            return Err(SubscriptionRepositoryError::duplicate(format!(
                "{} -> {}",
                edge.user, edge.author
            )));
        }
        tables.subscriptions.push(edge);
        Ok(())
    }

    async fn remove(&self, edge: Subscription) -> Result<bool, SubscriptionRepositoryError> {
        let mut tables = self.lock();
        let before = tables.subscriptions.len();
        tables.subscriptions.retain(|existing| *existing != edge);
        Ok(tables.subscriptions.len() < before)
    }

    async fn author_card(
        &self,
        viewer: UserId,
        author: UserId,
        recipes_limit: u32,
    ) -> Result<Option<AuthorCard>, SubscriptionRepositoryError> {
        let tables = self.lock();
        let Some(user) = tables.user(author) else {
            return Ok(None);
        };
        let authored: Vec<&Recipe> = tables
            .recipes
            .iter()
            .rev()
            .filter(|recipe| recipe.author_id == author)
            .collect();
        Ok(Some(AuthorCard {
            card: tables.card(Some(viewer), user),
            recipes_count: authored.len() as u64,
            recipes: authored
                .into_iter()
                .take(recipes_limit as usize)
                .map(|recipe| RecipeSummary {
                    id: recipe.id,
                    name: recipe.name.clone(),
                    image: recipe.image.clone(),
                    cooking_time: recipe.cooking_time,
                })
                .collect(),
        }))
    }

    async fn list(
        &self,
        user: UserId,
        offset: u64,
        limit: u32,
        recipes_limit: u32,
    ) -> Result<Listing<AuthorCard>, SubscriptionRepositoryError> {
        let mut authors: Vec<UserId> = self
            .lock()
            .subscriptions
            .iter()
            .filter(|edge| edge.user == user)
            .map(|edge| edge.author)
            .collect();
        authors.sort_by_key(|id| id.get());
        let mut cards = Vec::with_capacity(authors.len());
        for author in authors {
            if let Some(card) = self.author_card(user, author, recipes_limit).await? {
                cards.push(card);
            }
        }
        Ok(page(cards, offset, limit))
    }
}

#[async_trait]
impl ShortLinkRepository for InMemoryStore {
    async fn find_by_url(
        &self,
        url: &OriginalUrl,
    ) -> Result<Option<ShortLink>, ShortLinkRepositoryError> {
        Ok(self
            .lock()
            .links
            .iter()
            .find(|link| link.original_url == *url)
            .cloned())
    }

    async fn find_by_hash(
        &self,
        hash: &ShortHash,
    ) -> Result<Option<ShortLink>, ShortLinkRepositoryError> {
        Ok(self
            .lock()
            .links
            .iter()
            .find(|link| link.url_hash == *hash)
            .cloned())
    }

    async fn insert_if_absent(&self, link: &ShortLink) -> Result<bool, ShortLinkRepositoryError> {
        let mut tables = self.lock();
        if tables
            .links
            .iter()
            .any(|existing| {
                existing.original_url == link.original_url || existing.url_hash == link.url_hash
            })
        {
            return Ok(false);
        }
        tables.links.push(link.clone());
        Ok(true)
    }
}

#[async_trait]
impl ImageStore for InMemoryStore {
    async fn store(
        &self,
        folder: ImageFolder,
        image: &InlineImage,
    ) -> Result<ImagePath, ImageStoreError> {
        let mut tables = self.lock();
        let name = format!("{}/{}.{}", folder.as_str(), tables.next_id(), image.extension());
        let path = ImagePath::new(name).map_err(|err| ImageStoreError::io(err.to_string()))?;
        tables.images.push(path.clone());
        Ok(path)
    }

    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError> {
        self.lock().images.retain(|existing| existing != path);
        Ok(())
    }
}

/// Reversible "hash" keeping login tests fast.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("plain${password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        Ok(hash.as_str() == format!("plain${password}"))
    }
}

/// Hands out `h0`, `h1`, ... so tests can predict short links.
#[derive(Default)]
pub struct SequentialHashes {
    next: Mutex<u32>,
}

impl ShortHashGenerator for SequentialHashes {
    fn generate(&self) -> ShortHash {
        let mut next = self.next.lock().expect("hash counter lock");
        let hash = format!("h{next}");
        *next += 1;
        ShortHash::new(hash).expect("valid hash")
    }
}

pub fn tag(id: i64, name: &str) -> Tag {
    Tag {
        id: TagId::new(id),
        name: name.to_owned(),
        slug: TagSlug::new(name.to_lowercase()).expect("valid slug"),
    }
}

pub fn ingredient(id: i64, name: &str, unit: &str) -> Ingredient {
    Ingredient {
        id: IngredientId::new(id),
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    }
}

/// Wire the production services over `store`.
pub fn http_state(store: &InMemoryStore) -> HttpState {
    let store = Arc::new(store.clone());
    let accounts = Arc::new(AccountsService::new(
        store.clone(),
        Arc::new(PlainHasher),
        store.clone(),
    ));
    let recipes = Arc::new(RecipeService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        RecipeLimits::default(),
    ));
    let ports = HttpStatePorts {
        accounts: accounts.clone() as Arc<dyn AccountsCommand>,
        users: accounts as Arc<dyn UsersQuery>,
        catalogue: Arc::new(CatalogueService::new(store.clone())) as Arc<dyn CatalogueQuery>,
        recipes: recipes.clone() as Arc<dyn RecipesCommand>,
        recipes_query: recipes as Arc<dyn RecipesQuery>,
        memberships: Arc::new(MembershipService::new(store.clone(), store.clone()))
            as Arc<dyn MembershipCommand>,
        shopping_list: Arc::new(ShoppingListService::new(store.clone()))
            as Arc<dyn ShoppingListQuery>,
        short_links: Arc::new(ShortLinkService::new(
            store.clone(),
            Arc::new(SequentialHashes::default()),
            DEFAULT_SHORT_LINK_ATTEMPTS,
        )) as Arc<dyn ShortLinkCommand>,
        subscriptions: Arc::new(SubscriptionService::new(store.clone(), store))
            as Arc<dyn SubscriptionsCommand>,
    };
    HttpState::new(ports, Presentation::default())
}
