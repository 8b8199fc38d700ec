use unicode_segmentation::UnicodeSegmentation;

static FORBIDDEN_CHARS: [char; 10] = ['<', '>', '\'', '"', '\\', '(', ')', '{', '}', '/'];

const MAX_GRAPHEMES: usize = 64;

#[derive(Clone, Debug)]
pub struct Username(String);

impl Username {
    pub fn parse(s: String) -> Result<Username, String> {
        match s {
            _ if s.trim().is_empty() => {
                Err(format!("Username is empty or contains whitespace only: `{s}`"))
            }
            _ if s.chars().any(char::is_whitespace) => {
                Err(format!("Username must not contain whitespace: `{s}`"))
            }
            _ if s.graphemes(true).count() > MAX_GRAPHEMES => Err(format!(
                "`{s}` is longer than {MAX_GRAPHEMES} graphemes"
            )),
            _ if s.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) => Err(format!(
                "`{s}` contains at least one of forbidden characters: {}",
                String::from_iter(FORBIDDEN_CHARS)
            )),
            _ => Ok(Self(s)),
        }
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
