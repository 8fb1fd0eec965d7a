pub mod claims;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod utils;

pub use claims::Claims;
pub use identity::Identity;
pub use jwt::JwtService;
pub use middleware::{AdminUser, AuthMiddleware, AuthenticatedUser};
pub use utils::require_admin;
