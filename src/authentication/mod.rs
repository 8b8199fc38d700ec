pub mod extract;
pub mod password;
pub mod token;

pub use extract::{bearer_token, AuthenticatedUser, AuthenticationError};
pub use password::{change_password, hash_password, validate_credentials, AuthError, Credentials};
pub use token::{Claims, TokenError, TokenIssuer, TokenPair, TokenType};
