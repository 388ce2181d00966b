pub mod session;

// Re-export handler functions for use in routing
pub use self::session::check_auth as session_check;
pub use self::session::login as session_login;
pub use self::session::logout as session_logout;
