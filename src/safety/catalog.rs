//! Dev-catalog enforcement for CREATE statements.
//!
//! Objects may only be created in catalogs whose name ends in `_dev`.
//! The target is the first `catalog.schema.object`-shaped token in the
//! statement; a CREATE with no such token is rejected outright.

use regex::Regex;

use crate::error::{Result, RunnerError};

/// Pattern for a fully qualified three-part object name.
const QUALIFIED_NAME_PATTERN: &str = r"\b\w+\.\w+\.\w+\b";

/// Required suffix for catalogs that accept CREATE statements.
const DEV_CATALOG_SUFFIX: &str = "_dev";

/// Checks CREATE statements against the dev-catalog rule.
#[derive(Debug)]
pub struct CatalogPolicy {
    qualified_name: Regex,
}

impl CatalogPolicy {
    /// Creates a new policy with its compiled object-name matcher.
    pub fn new() -> Result<Self> {
        let qualified_name = Regex::new(QUALIFIED_NAME_PATTERN)
            .map_err(|e| RunnerError::config(format!("invalid object-name pattern: {e}")))?;
        Ok(Self { qualified_name })
    }

    /// Validates the catalog targeted by a CREATE statement.
    ///
    /// Fails closed: a statement with no `catalog.schema.object` token is a
    /// violation, as is a catalog segment not ending in `_dev`
    /// (case-insensitive).
    pub fn check_create(&self, statement: &str) -> Result<()> {
        let Some(found) = self.qualified_name.find(statement) else {
            return Err(RunnerError::catalog_policy(
                "no fully qualified catalog.schema.object name found; \
                 CREATE statements must target a catalog ending in '_dev'",
            ));
        };

        let object = found.as_str();
        let catalog = object.split('.').next().unwrap_or(object);

        if catalog.to_lowercase().ends_with(DEV_CATALOG_SUFFIX) {
            Ok(())
        } else {
            Err(RunnerError::catalog_policy(format!(
                "cannot create object '{object}': catalog '{catalog}' does not end in '_dev'"
            )))
        }
    }
}
