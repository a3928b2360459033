//! Selection of the dataset under evaluation.

use crate::core::Dependencies;
use crate::prelude::*;
use datafusion::prelude::DataFrame;

/// Picks the dataset a derivation evaluates.
///
/// With a single dependency that dependency is the target and any configured
/// name is ignored. With several, `configured` must name one of them.
pub fn resolve_target<'a>(
    dependencies: &'a Dependencies,
    configured: Option<&str>,
) -> Result<(&'a str, &'a DataFrame)> {
    if dependencies.len() == 1 {
        if let Some((name, dataset)) = dependencies.iter().next() {
            return Ok((name.as_str(), dataset));
        }
    }
    if dependencies.is_empty() {
        return Err(TermError::NoDependencies);
    }

    let name = configured.ok_or(TermError::AmbiguousTarget {
        count: dependencies.len(),
    })?;
    dependencies
        .get_key_value(name)
        .map(|(name, dataset)| (name.as_str(), dataset))
        .ok_or_else(|| {
            let mut available: Vec<_> = dependencies.keys().map(String::as_str).collect();
            available.sort_unstable();
            TermError::UnknownDataset {
                name: name.to_string(),
                available: available.join(", "),
            }
        })
}
