use std::path::Path;

use crate::auth::users::register_user;
use crate::cli::commands::{UserAddArgs, UserCommand, UserListArgs};
use crate::config::load_config;
use crate::db::{users, Database};
use crate::errors::PortalError;
use crate::models::Role;

pub async fn handle_user(command: UserCommand) -> Result<(), PortalError> {
    match command {
        UserCommand::Add(args) => add_user(args).await,
        UserCommand::List(args) => list_users(args).await,
    }
}

async fn open_db(config: Option<&str>, db: Option<&str>) -> Result<Database, PortalError> {
    let config = load_config(config.map(Path::new)).await?;
    Database::new(db.unwrap_or(config.db_path()))
}

async fn add_user(args: UserAddArgs) -> Result<(), PortalError> {
    let role: Role = args.role.parse()?;
    let db = open_db(args.config.as_deref(), args.db.as_deref()).await?;
    let (user, token) = register_user(&db, &args.email, role)?;

    println!("Created {} user {} (id {})", user.role, user.email, user.id);
    println!("API token: {token}");
    println!("Store it now; it cannot be shown again.");
    Ok(())
}

async fn list_users(args: UserListArgs) -> Result<(), PortalError> {
    let db = open_db(args.config.as_deref(), args.db.as_deref()).await?;
    let users = db.read(users::list_users)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }
    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }
    for user in users {
        println!("{:>4}  {:<7} {}  ({})", user.id, user.role.as_str(), user.email, user.created_at.to_rfc3339());
    }
    Ok(())
}
