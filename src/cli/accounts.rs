// Account management CLI commands
// Operate on the same stores as the HTTP surface, under a trusted CLI context

use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::{AdminCoordinator, UserCoordinator};
use crate::providers::AppliedPassword;
use crate::types::internal::auth::UserProjection;
use crate::types::internal::context::RequestContext;

/// Create or promote a super-admin account
///
/// A generated password is printed exactly once.
pub async fn create_superuser(
    app_data: Arc<AppData>,
    email: &str,
    password: Option<String>,
    username: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("create-superuser");
    let coordinator = UserCoordinator::new(app_data);

    let (user, applied) = coordinator.create_superuser(&ctx, email, password, username).await?;

    println!("✓ Superuser ready: {} ({})", user.email, user.id);
    print_generated_password(&applied);

    Ok(())
}

/// Set a new password for an account and revoke its token
pub async fn reset_password(
    app_data: Arc<AppData>,
    email: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("reset-password");
    let coordinator = UserCoordinator::new(app_data);

    let (user, applied) = coordinator.reset_password(&ctx, email, password).await?;

    println!("✓ Password reset for {}; existing token revoked", user.email);
    print_generated_password(&applied);

    Ok(())
}

pub async fn approve_user(app_data: Arc<AppData>, email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("approve-user");
    let coordinator = UserCoordinator::new(app_data);

    let user = coordinator.approve_by_email(&ctx, email).await?;

    println!("✓ Approved {}", user.email);
    if !user.is_active {
        println!("  Note: the account is deactivated and still cannot log in");
    }

    Ok(())
}

pub async fn list_users(app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("list-users");
    let coordinator = AdminCoordinator::new(app_data);

    let users = coordinator.list_users(&ctx, None).await?;

    if users.is_empty() {
        println!("No users found");
        return Ok(());
    }

    for user in &users {
        println!("{}", format_user_line(user));
    }
    println!("{} user(s)", users.len());

    Ok(())
}

fn print_generated_password(applied: &AppliedPassword) {
    if let Some(password) = &applied.generated {
        println!();
        println!("  Generated password: {}", password);
        println!("  This password will not be shown again.");
    }
}

fn format_user_line(user: &UserProjection) -> String {
    let mut flags = Vec::new();
    flags.push(if user.is_active { "active" } else { "inactive" });
    flags.push(if user.is_approved { "approved" } else { "pending" });
    if user.is_staff {
        flags.push("staff");
    }
    if user.is_superuser {
        flags.push("superuser");
    }

    let roles = if user.roles.is_empty() {
        "-".to_string()
    } else {
        user.roles.join(",")
    };

    format!("{}  {}  [{}]  roles: {}", user.id, user.email, flags.join(" "), roles)
}
