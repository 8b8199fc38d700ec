use super::{NewPassword, UserEmail, Username};

#[derive(Debug)]
pub struct NewUser {
    pub username: Username,
    pub email: UserEmail,
    pub password: NewPassword,
}
