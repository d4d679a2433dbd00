// Authentication module
// Password-based login, signed access/refresh tokens, identity resolution
// and ownership-scoped authorization

pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod ownership;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use identity::IdentityResolver;
pub use middleware::AuthenticatedUser;
pub use models::{
    AccessTokenResponse, LoginRequest, RefreshRequest, RegisterRequest, TokenPairResponse, User,
    UserResponse,
};
pub use ownership::{NotOwned, OwnedResource, OwnershipGuard};
pub use password::PasswordHasher;
pub use repository::{PgUserRepository, UserStore};
pub use service::AuthService;
pub use token::{Claims, TokenError, TokenService, TokenType};
