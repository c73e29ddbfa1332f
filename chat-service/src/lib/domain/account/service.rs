use std::sync::Arc;

use async_trait::async_trait;
use auth::Argon2PasswordHasher;
use auth::Identity;
use auth::SessionManager;
use auth::TokenPair;
use chrono::Utc;

use super::errors::AccountError;
use super::models::LoginCommand;
use super::models::RegisterCommand;
use super::ports::AccountServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;

/// Concrete implementation of AccountServicePort.
///
/// Resolves credentials against the user repository and delegates every
/// session decision to the session manager.
pub struct AccountService<UR>
where
    UR: UserRepository,
{
    user_repository: Arc<UR>,
    sessions: Arc<SessionManager>,
    password_hasher: Argon2PasswordHasher,
}

impl<UR> AccountService<UR>
where
    UR: UserRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_repository` - User persistence implementation
    /// * `sessions` - Session manager shared with the access guard
    ///
    /// # Returns
    /// Configured account service instance
    pub fn new(user_repository: Arc<UR>, sessions: Arc<SessionManager>) -> Self {
        Self {
            user_repository,
            sessions,
            password_hasher: Argon2PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UR> AccountServicePort for AccountService<UR>
where
    UR: UserRepository + 'static,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AccountError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = self
            .user_repository
            .create(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AccountError> {
        let Ok(email) = EmailAddress::new(command.email) else {
            return Err(self.sessions.reject_unknown(&command.password).into());
        };

        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            return Err(self.sessions.reject_unknown(&command.password).into());
        };

        let pair = self
            .sessions
            .authenticate(
                &command.password,
                &user.password_hash,
                &Identity::from(user.id),
            )
            .await?;

        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AccountError> {
        Ok(self.sessions.refresh(refresh_token).await?)
    }

    async fn logout(&self, token: &str) -> Result<(), AccountError> {
        Ok(self.sessions.logout(token).await?)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth::AuthError;
    use auth::InMemorySessionStore;
    use auth::ManualClock;
    use auth::TokenCodec;
    use mockall::mock;

    use super::*;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::UserName;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
        }
    }

    const SECRET: &[u8] = b"account_service_test_secret_32_bytes";

    fn sessions() -> Arc<SessionManager> {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = Arc::new(TokenCodec::new(SECRET, clock.clone()).unwrap());
        let store = Arc::new(InMemorySessionStore::new(clock));
        Arc::new(SessionManager::new(
            store,
            codec,
            Arc::new(Argon2PasswordHasher::new()),
        ))
    }

    fn stored_user(password: &str) -> User {
        User {
            id: UserId(42),
            name: UserName::new("Ada".to_string()).unwrap(),
            email: EmailAddress::new("ada@example.com".to_string()).unwrap(),
            password_hash: Argon2PasswordHasher::new().hash(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut user_repository = MockTestUserRepository::new();
        user_repository
            .expect_create()
            .withf(|user| {
                user.password_hash.starts_with("$argon2id$")
                    && !user.password_hash.contains("pass_word!")
                    && user.email.as_str() == "ada@example.com"
            })
            .times(1)
            .returning(|user| {
                Ok(User {
                    id: UserId(1),
                    name: user.name,
                    email: user.email,
                    password_hash: user.password_hash,
                    created_at: user.created_at,
                })
            });

        let service = AccountService::new(Arc::new(user_repository), sessions());

        let command = RegisterCommand::new(
            UserName::new("Ada".to_string()).unwrap(),
            EmailAddress::new("ada@example.com".to_string()).unwrap(),
            "pass_word!".to_string(),
        );

        let user = service.register(command).await.unwrap();
        assert_eq!(user.id, UserId(1));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut user_repository = MockTestUserRepository::new();
        user_repository
            .expect_create()
            .times(1)
            .returning(|user| Err(UserError::EmailAlreadyExists(user.email.to_string())));

        let service = AccountService::new(Arc::new(user_repository), sessions());

        let command = RegisterCommand::new(
            UserName::new("Ada".to_string()).unwrap(),
            EmailAddress::new("ada@example.com".to_string()).unwrap(),
            "pass_word!".to_string(),
        );

        let result = service.register(command).await;
        assert!(matches!(
            result,
            Err(AccountError::User(UserError::EmailAlreadyExists(_)))
        ));
    }

    #[tokio::test]
    async fn test_login_success_binds_user_identity() {
        let mut user_repository = MockTestUserRepository::new();
        let user = stored_user("pass_word!");
        user_repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "ada@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let sessions = sessions();
        let service = AccountService::new(Arc::new(user_repository), sessions.clone());

        let pair = service
            .login(LoginCommand {
                email: "ada@example.com".to_string(),
                password: "pass_word!".to_string(),
            })
            .await
            .unwrap();

        let principal = sessions
            .guard()
            .check_token(&pair.access_token)
            .await
            .unwrap();
        assert_eq!(principal.identity, Identity::from(42_i64));
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_look_alike() {
        let mut user_repository = MockTestUserRepository::new();
        let user = stored_user("pass_word!");
        user_repository
            .expect_find_by_email()
            .returning(move |email| {
                Ok((email.as_str() == "ada@example.com").then(|| user.clone()))
            });

        let service = AccountService::new(Arc::new(user_repository), sessions());

        for (email, password) in [
            ("nobody@example.com", "pass_word!"),
            ("ada@example.com", "wrong"),
            ("not-an-email", "pass_word!"),
        ] {
            let result = service
                .login(LoginCommand {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await;

            assert!(
                matches!(result, Err(AccountError::Auth(AuthError::InvalidCredentials))),
                "{email} should be rejected as invalid credentials"
            );
        }
    }

    #[tokio::test]
    async fn test_login_database_failure_propagates() {
        let mut user_repository = MockTestUserRepository::new();
        user_repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let service = AccountService::new(Arc::new(user_repository), sessions());

        let result = service
            .login(LoginCommand {
                email: "ada@example.com".to_string(),
                password: "pass_word!".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(AccountError::User(UserError::DatabaseError(_)))
        ));
    }
}
