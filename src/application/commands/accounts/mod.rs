mod delete;
mod login;
mod password;
mod register;
mod service;
mod update;

pub use login::LoginCommand;
pub use password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
pub use register::RegisterAccountCommand;
pub use service::AccountCommandService;
pub use update::UpdateAccountCommand;
