pub use users::{CreateUserDto, CreateUserResponseDto, GetUserByIdDto, GetUserByPrincipalNameDto, GetUserResponseDto};

mod users;
