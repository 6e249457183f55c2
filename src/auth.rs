//! Account credentials, region identifiers, session tokens, and the renewing token manager.

pub mod credentials;
pub mod manager;
pub mod region;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use manager::*;
pub use region::*;
pub use secret::*;
pub use token::*;
