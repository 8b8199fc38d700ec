use secrecy::{ExposeSecret, Secret};

const MIN_LENGTH: usize = 12;
const MAX_LENGTH: usize = 128;

/// A password that satisfies the length policy, ready to be hashed.
#[derive(Debug)]
pub struct NewPassword(Secret<String>);

impl NewPassword {
    pub fn parse(password: Secret<String>) -> Result<NewPassword, String> {
        let length = password.expose_secret().chars().count();

        if length < MIN_LENGTH {
            return Err(format!(
                "Password must be at least {MIN_LENGTH} characters long."
            ));
        }

        if length > MAX_LENGTH {
            return Err(format!(
                "Passwords must be at most {MAX_LENGTH} characters long."
            ));
        }

        Ok(Self(password))
    }

    pub fn into_secret(self) -> Secret<String> {
        self.0
    }
}
