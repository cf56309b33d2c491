use super::errors::DomainError;

/// Verified caller identity attached by the gateway.
///
/// The only way to obtain one is [`CallerIdentity::from_trusted`], which is
/// fed exclusively by the request extractor reading the gateway header. An
/// absent or blank value is an authentication failure, never an anonymous
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    pub fn from_trusted(value: Option<&str>) -> Result<Self, DomainError> {
        match value.map(str::trim) {
            Some(user) if !user.is_empty() => Ok(Self(user.to_string())),
            _ => Err(DomainError::AuthenticationRequired),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
