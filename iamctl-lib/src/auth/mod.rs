//! Authentication

pub(crate) mod common;
mod options;
mod password;
mod token;

pub use common::SCOPE;
pub use common::TOKEN_PATH;
pub use options::DEFAULT_TIMEOUT;
pub use options::FlowOptions;
pub use password::PasswordFlow;
pub use token::AccessToken;
