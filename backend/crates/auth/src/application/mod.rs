pub mod config;
pub mod identify;
pub mod issue;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;

pub use identify::{IdentifyUseCase, IdentityOutput};
pub use issue::IssuedSession;
pub use login::{LoginInput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use refresh::RefreshUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
