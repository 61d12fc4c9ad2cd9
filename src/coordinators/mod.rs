// Coordinators layer - Workflow orchestration
//
// Coordinators handle pure workflow orchestration by composing provider operations
// for specific API endpoints and CLI commands. They determine the sequence of
// operations and enforce authorization without containing business logic themselves.

pub mod admin_coordinator;
pub mod login_coordinator;
pub mod user_coordinator;

pub use admin_coordinator::AdminCoordinator;
pub use login_coordinator::{LoginCoordinator, LoginOutcome};
pub use user_coordinator::UserCoordinator;
