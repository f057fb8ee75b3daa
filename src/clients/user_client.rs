use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Actor, User, UserCreate};
use crate::engine::Permission;
use crate::user_actor::{UserError, UserQuery};

/// Client for the user directory, which acts as the identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(IdentityClient, User, UserError, user);

impl IdentityClient {
    #[instrument(skip(self, payload), fields(email = %payload.email, role = %payload.role))]
    pub async fn register(&self, payload: UserCreate) -> Result<String, UserError> {
        debug!("Sending request");
        let id = self.inner.create(payload).await?;
        info!(user_id = %id, "User registered");
        Ok(id)
    }

    /// Looks up a member by email and password and hands back their identity.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Actor, UserError> {
        debug!("Sending request");
        let query = UserQuery::Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.inner.find(query).await?.first() {
            Some(user) => {
                info!(user_id = %user.id, role = %user.role, "Login successful");
                Ok(Actor::from(user))
            }
            None => {
                warn!("Login failed");
                Err(UserError::InvalidCredentials)
            }
        }
    }

    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, UserError> {
        require_admin(actor)?;
        debug!("Sending request");
        Ok(self.inner.find(UserQuery::All).await?)
    }

    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn delete_user(&self, actor: &Actor, id: String) -> Result<(), UserError> {
        require_admin(actor)?;
        if actor.id == id {
            return Err(UserError::Forbidden("admins cannot delete their own account".into()));
        }
        debug!("Sending request");
        self.inner.delete(id.clone()).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), UserError> {
        debug!("Sending shutdown");
        Ok(self.inner.shutdown().await?)
    }
}

fn require_admin(actor: &Actor) -> Result<(), UserError> {
    if actor.role.can(Permission::ManageUsers) {
        Ok(())
    } else {
        Err(UserError::Forbidden(format!(
            "role {} may not {}",
            actor.role,
            Permission::ManageUsers.describe()
        )))
    }
}
