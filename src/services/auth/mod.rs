pub mod access_jwt;
pub mod context;
pub mod factory;
pub mod jwt;
pub mod token_service;
pub mod user_lookup;

pub use access_jwt::AccessTokenVerifier;
pub use context::{AuthContext, AuthContextBuilder};
pub use token_service::TokenService;
pub use user_lookup::UserLookup;
