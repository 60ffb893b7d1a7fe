/// Email of the account that logged in on this session.
pub const USER_EMAIL: &str = "user_email";
