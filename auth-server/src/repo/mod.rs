pub mod otp_codes;
pub mod refresh_tokens;
pub mod token_permissions;
pub mod users;

pub use otp_codes::OtpCodesRepo;
pub use refresh_tokens::RefreshTokensRepo;
pub use token_permissions::TokenPermissionsRepo;
pub use users::UsersRepo;
