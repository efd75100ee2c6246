//! Route paths.

pub const GET_ROOT: &str = "/";
pub const POST_AUTH_REGISTER: &str = "/api/auth/register";
pub const POST_AUTH_LOGIN: &str = "/api/auth/login";
pub const GET_AUTH_ME: &str = "/api/auth/me";
pub const USERS: &str = "/api/users";
pub const USERS_ID: &str = "/api/users/{id}";
