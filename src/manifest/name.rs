//! Environment name validation.

use crate::error::{Result, SetupError};

/// Name used when neither the command line, the project config, nor the
/// manifest provides one.
pub const DEFAULT_ENV_NAME: &str = "PDFTranslator";

/// Names the package manager reserves for its own root environment.
const RESERVED_NAMES: &[&str] = &["base", "root"];

/// Check that `name` can be created and removed as a named environment.
pub fn validate_env_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| SetupError::InvalidEnvironmentName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid("name contains whitespace"));
    }
    if name.contains(['/', '\\', ':', '#']) {
        return Err(invalid("name contains a path separator or reserved character"));
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(invalid("reserved for the package manager's root environment"));
    }
    Ok(())
}
