/// Identifier of an upstream resource (match, person, team) taken from the URL path.
#[derive(Debug, Clone)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn parse(s: String) -> Result<ResourceId, String> {
        let s = s.trim().to_string();

        if s.is_empty() {
            Err(String::from("An identifier is required."))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
