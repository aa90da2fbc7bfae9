//! Command handlers.

pub mod auth;

pub use auth::{
    AuthenticateCommand, AuthenticateHandler, ChangePasswordCommand, ChangePasswordHandler,
    ChangePasswordResult, LoginCommand, LoginHandler, LoginResult, LogoutCommand, LogoutHandler,
    LogoutResult, RegisterCommand, RegisterHandler, RegisterResult,
};
