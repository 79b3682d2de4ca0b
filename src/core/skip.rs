//! Previously-failed build detection
//!
//! A build extracts sources into `<recipe>/src` and removes it on success.
//! A staging directory newer than the `APKBUILD` therefore means the last
//! attempt died and nobody has touched the recipe since.

use crate::core::recipe::Recipe;
use crate::infra::filesystem::modified_time;

/// Whether `recipe` should be skipped because its last build failed
///
/// Returns `false` when either the staging directory or the recipe file is
/// missing. Returns `true` only if the staging directory is strictly newer.
pub fn should_skip(recipe: &Recipe) -> bool {
    let Some(staged) = modified_time(&recipe.staging_dir()) else {
        return false;
    };
    let Some(defined) = modified_time(&recipe.recipe_file()) else {
        return false;
    };

    if staged > defined {
        tracing::warn!(
            "{}: skipped due to previous build failure",
            recipe.name
        );
        true
    } else {
        false
    }
}
