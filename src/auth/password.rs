use crate::auth::AuthError;

/// bcrypt hashing with a configurable work factor.
///
/// Digests are self-contained (`$2b$<cost>$<salt><hash>`), so verification
/// needs nothing but the digest itself.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AuthError::Hash(format!("Failed to hash password: {}", e)))
    }

    /// Returns `false` for a wrong password and for a digest bcrypt cannot parse.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        match bcrypt::verify(password, digest) {
            Ok(matches) => matches,
            Err(e) => {
                log::debug!("rejecting unparsable password digest: {}", e);
                false
            }
        }
    }
}
