pub mod configure_action;
pub mod configure_policy;
pub mod configure_relayer;
pub mod execute_action;
pub mod initialize_action;
pub mod manage_permissions;

pub use configure_action::*;
pub use configure_policy::*;
pub use configure_relayer::*;
pub use execute_action::*;
pub use initialize_action::*;
pub use manage_permissions::*;
