//! Seed the first super user.

use std::sync::Arc;

use clap::Args;

use userbase_auth::{AuthKeys, AuthSessionManager};
use userbase_cache::CacheManager;
use userbase_core::config::AppConfig;
use userbase_core::error::AppError;
use userbase_core::traits::EmailDispatcher;
use userbase_database::repositories::{JobRepository, UserRepository};
use userbase_service::UserService;
use userbase_worker::{EmailDistributor, JobQueue};

use crate::output;

/// Arguments for the initdata command
#[derive(Debug, Args)]
pub struct InitdataArgs {
    /// Prompt for the password instead of using `first_super_user.password`
    #[arg(long)]
    pub prompt_password: bool,
}

/// Create the configured super user if that email is not registered yet.
pub async fn execute(args: &InitdataArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    let mut first_super_user = config.first_super_user.clone();
    if args.prompt_password {
        first_super_user.password = dialoguer::Password::new()
            .with_prompt(format!("Password for {}", first_super_user.email))
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
    }

    let users = Arc::new(UserRepository::new(pool.clone()));
    let cache = CacheManager::new(&config.cache).await?;
    let keys = Arc::new(AuthKeys::from_config(&config.auth)?);
    let dispatcher: Arc<dyn EmailDispatcher> = Arc::new(EmailDistributor::new(JobQueue::new(
        JobRepository::new(pool),
        "initdata",
    )));

    let sessions = AuthSessionManager::new(
        users.clone(),
        cache,
        keys,
        Arc::clone(&dispatcher),
        config.auth.clone(),
        config.email.clone(),
    );
    let service = UserService::new(
        users,
        sessions,
        dispatcher,
        config.email.clone(),
        first_super_user.clone(),
    );

    if service.create_super_user_if_not_exist().await? {
        output::print_success(&format!("Super user {} created.", first_super_user.email));
    } else {
        output::print_warning(&format!(
            "Super user {} already exists.",
            first_super_user.email
        ));
    }

    Ok(())
}
