//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then the
//! `expect_*` helpers to take the next request off the channel and answer it.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkResult, ResourceClient, ResourceRequest};

pub type Responder<R, T> = oneshot::Sender<FrameworkResult<R, <T as Entity>::Error>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client behaves exactly like one talking to a `ResourceActor`, but the
/// test plays the actor: it inspects each request and decides the answer
/// (success, failure, duplicate), so orchestration code can be driven
/// step by step.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Responder<T::Id, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<Option<T>, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<Responder<Vec<T>, T>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Patch, Responder<T, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Responder<T::ActionResult, T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::clients::UserClient;
    use crate::domain::{Role, User, UserCreate, UserPatch};
    use crate::user_actor::UserError;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let create_task = tokio::spawn(async move { client.create(UserCreate::customer("Test", "test@example.com")).await });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Test");
        assert_eq!(payload.role, Role::Customer);
        responder.send(Ok("user_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("user_1".to_string()));
    }

    #[tokio::test]
    async fn plumbing_errors_become_domain_errors() {
        let (inner, mut receiver) = create_mock_client::<User>(10);
        let users = UserClient::new(inner);

        let task = tokio::spawn(async move {
            users
                .update_user(
                    "user_7".into(),
                    UserPatch {
                        name: Some("Bo".into()),
                        ..UserPatch::default()
                    },
                )
                .await
        });

        let (id, patch, responder) = expect_update(&mut receiver).await.expect("Expected Update request");
        assert_eq!(id, "user_7");
        assert_eq!(patch.name.as_deref(), Some("Bo"));
        responder.send(Err(FrameworkError::NotFound(id))).unwrap();

        assert_eq!(task.await.unwrap(), Err(UserError::NotFound("user_7".into())));
    }
}
