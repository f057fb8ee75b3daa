//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! [`create_mock_client`] hands back a client together with the receiving end
//! of its channel. The `expect_*` helpers pull the next request off that
//! channel so a test can inspect it and answer in place of the actor.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};

type Reply<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Creates a mock client and a receiver for asserting requests.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message must be a Create request.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, Reply<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Next message must be a Get request.
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Reply<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be a Find request.
pub async fn expect_find<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Query, Reply<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Find { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Next message must be a Delete request.
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Reply<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::IdentityClient;
    use crate::domain::{Actor, Role, User, UserCreate};
    use crate::user_actor::{UserError, UserQuery};

    fn stored_user(id: &str, payload: UserCreate) -> User {
        User::from_create(id.to_string(), payload).unwrap()
    }

    #[tokio::test]
    async fn test_register_forwards_payload() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let identity = IdentityClient::new(client);

        let task = tokio::spawn(async move {
            identity
                .register(UserCreate::new("Budi Wisatawan", "budi@gmail.com", "123", Role::Buyer))
                .await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.email, "budi@gmail.com");
        responder.send(Ok("user_4".to_string())).unwrap();

        assert_eq!(task.await.unwrap(), Ok("user_4".to_string()));
    }

    #[tokio::test]
    async fn test_login_maps_match_to_actor() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let identity = IdentityClient::new(client);

        let task = tokio::spawn(async move { identity.login("vendor@bali.id", "123").await });

        let (query, responder) = expect_find(&mut receiver).await.expect("Expected Find request");
        match query {
            UserQuery::Credentials { email, password } => {
                assert_eq!(email, "vendor@bali.id");
                assert_eq!(password, "123");
            }
            other => panic!("unexpected query {other:?}"),
        }
        let vendor = stored_user(
            "user_2",
            UserCreate::new("Bali Tour Travel", "vendor@bali.id", "123", Role::Vendor),
        );
        responder.send(Ok(vec![vendor])).unwrap();

        assert_eq!(
            task.await.unwrap(),
            Ok(Actor::new("user_2", "Bali Tour Travel", Role::Vendor))
        );
    }

    #[tokio::test]
    async fn test_login_without_match_is_invalid_credentials() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let identity = IdentityClient::new(client);

        let task = tokio::spawn(async move { identity.login("budi@gmail.com", "salah").await });

        let (_, responder) = expect_find(&mut receiver).await.expect("Expected Find request");
        responder.send(Ok(Vec::new())).unwrap();

        assert_eq!(task.await.unwrap(), Err(UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_get_user_and_dropped_actor() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let identity = IdentityClient::new(client);

        let lookup = identity.clone();
        let task = tokio::spawn(async move { lookup.get_user("user_9".to_string()).await });
        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, "user_9");
        drop(responder);

        assert!(matches!(
            task.await.unwrap(),
            Err(UserError::ActorCommunicationError(_))
        ));
    }

    #[tokio::test]
    async fn test_admin_delete_reaches_directory_only_when_allowed() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let identity = IdentityClient::new(client);
        let admin = Actor::new("user_1", "Admin Koperasi", Role::Admin);
        let buyer = Actor::new("user_4", "Budi Wisatawan", Role::Buyer);

        assert!(matches!(
            identity.delete_user(&buyer, "user_3".into()).await,
            Err(UserError::Forbidden(_))
        ));
        assert!(matches!(
            identity.delete_user(&admin, "user_1".into()).await,
            Err(UserError::Forbidden(_))
        ));
        assert!(receiver.try_recv().is_err());

        let task = tokio::spawn(async move { identity.delete_user(&admin, "user_3".into()).await });
        let (id, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        assert_eq!(id, "user_3");
        responder.send(Ok(())).unwrap();
        assert_eq!(task.await.unwrap(), Ok(()));
    }
}
