use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with hooks, params, patches and actions)
// =============================================================================

/// Trait that any marketplace resource must implement to be owned by a [`ResourceActor`].
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the generated id and the creation params.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a domain-specific action.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;

    /// Natural key that must be unique across the store, if any.
    ///
    /// A create whose entity reports a key already held by another entity is
    /// rejected with [`FrameworkError::Duplicate`] carrying the existing id.
    /// Updates and actions that move the key are held to the same rule.
    fn unique_key(&self) -> Option<String> {
        None
    }
}

/// Errors produced by the actor plumbing, wrapping the entity's own error type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError<E> {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped the response")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Duplicate of existing item: {0}")]
    Duplicate(String),
    #[error("{0}")]
    Entity(E),
}

pub type FrameworkResult<T, E> = Result<T, FrameworkError<E>>;

/// Domain error enums that plumbing failures can be folded into.
pub trait DomainError: std::error::Error + Sized {
    fn not_found(id: String) -> Self;
    fn already_exists(id: String) -> Self;
    fn communication(reason: String) -> Self;
}

impl<E: DomainError> FrameworkError<E> {
    pub fn into_domain(self) -> E {
        match self {
            FrameworkError::Entity(e) => e,
            FrameworkError::NotFound(id) => E::not_found(id),
            FrameworkError::Duplicate(id) => E::already_exists(id),
            other => E::communication(other.to_string()),
        }
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<FrameworkResult<T, E>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    name: &'static str,
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    insertion_order: Vec<T::Id>,
    unique_keys: HashMap<String, T::Id>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        name: &'static str,
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            name,
            receiver,
            store: HashMap::new(),
            insertion_order: Vec::new(),
            unique_keys: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Main loop. Stops once every client has been dropped.
    pub async fn run(mut self) {
        info!(resource = self.name, "Actor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { respond_to } => {
                    let items = self
                        .insertion_order
                        .iter()
                        .filter_map(|id| self.store.get(id).cloned())
                        .collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
            }
        }

        info!(resource = self.name, "Actor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> FrameworkResult<T::Id, T::Error> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Entity)?;
        item.on_create().map_err(FrameworkError::Entity)?;

        if let Some(key) = item.unique_key() {
            if let Some(existing) = self.unique_keys.get(&key) {
                debug!(resource = self.name, %existing, "Rejected duplicate create");
                return Err(FrameworkError::Duplicate(existing.to_string()));
            }
            self.unique_keys.insert(key, id.clone());
        }

        debug!(resource = self.name, %id, "Created");
        self.store.insert(id.clone(), item);
        self.insertion_order.push(id.clone());
        Ok(id)
    }

    // Updates and actions run against a copy; the stored entity only changes on success.
    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> FrameworkResult<T, T::Error> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let mut draft = item.clone();
        draft.on_update(patch).map_err(FrameworkError::Entity)?;
        self.commit(id, draft)
    }

    /// Stores a successful draft, moving its unique key if the change touched it.
    fn commit(&mut self, id: T::Id, draft: T) -> FrameworkResult<T, T::Error> {
        let previous = self.store.get(&id).and_then(|item| item.unique_key());
        let next = draft.unique_key();
        if previous != next {
            if let Some(key) = &next {
                if let Some(existing) = self.unique_keys.get(key).filter(|owner| **owner != id) {
                    debug!(resource = self.name, %existing, "Rejected duplicate key on change");
                    return Err(FrameworkError::Duplicate(existing.to_string()));
                }
            }
            if let Some(key) = previous {
                self.unique_keys.remove(&key);
            }
            if let Some(key) = next {
                self.unique_keys.insert(key, id.clone());
            }
        }
        self.store.insert(id, draft.clone());
        Ok(draft)
    }

    fn handle_delete(&mut self, id: T::Id) -> FrameworkResult<(), T::Error> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete().map_err(FrameworkError::Entity)?;
        if let Some(key) = item.unique_key() {
            self.unique_keys.remove(&key);
        }
        self.store.remove(&id);
        self.insertion_order.retain(|existing| existing != &id);
        Ok(())
    }

    fn handle_action(
        &mut self,
        id: T::Id,
        action: T::Action,
    ) -> FrameworkResult<T::ActionResult, T::Error> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let mut draft = item.clone();
        let result = draft.handle_action(action).map_err(FrameworkError::Entity)?;
        self.commit(id, draft)?;
        Ok(result)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Debug)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: a derive would demand `T: Clone` on the sender's payload.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> FrameworkResult<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> FrameworkResult<T::Id, T::Error> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> FrameworkResult<Option<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Like [`get`](Self::get) but a missing entity is an error.
    pub async fn fetch(&self, id: T::Id) -> FrameworkResult<T, T::Error> {
        let missing = id.to_string();
        self.get(id)
            .await?
            .ok_or(FrameworkError::NotFound(missing))
    }

    /// All entities in insertion order.
    pub async fn list(&self) -> FrameworkResult<Vec<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> FrameworkResult<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to })
            .await
    }

    pub async fn delete(&self, id: T::Id) -> FrameworkResult<(), T::Error> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> FrameworkResult<T::ActionResult, T::Error> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }
}

/// Sequential id generator producing `prefix_1`, `prefix_2`, ...
pub fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = std::sync::atomic::AtomicU64::new(1);
    move || {
        let id = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("{prefix}_{id}")
    }
}

// =============================================================================
// 5. TESTS
// =============================================================================
