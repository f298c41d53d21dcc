use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        email(message = "Email must be valid"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: String,
}
