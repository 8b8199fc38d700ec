use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 256;

/// Display name of a catalog entry: a magazine name or a plan title.
#[derive(Clone, Debug)]
pub struct CatalogName(String);

impl CatalogName {
    pub fn parse(s: String) -> Result<CatalogName, String> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(format!("Name is empty or contains whitespace only: `{s}`"));
        }

        if trimmed.graphemes(true).count() > MAX_GRAPHEMES {
            return Err(format!("`{s}` is longer than {MAX_GRAPHEMES} graphemes"));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for CatalogName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
