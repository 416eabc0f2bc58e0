//! Convenience helpers shared across command handlers.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use dobble::Game;

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }
    }
    Ok(())
}

/// Source directory and output path, given either explicitly or via a game record.
pub struct ResolvedPaths {
    pub images: PathBuf,
    pub output: PathBuf,
    pub title: String,
}

pub fn resolve_paths(
    images: Option<PathBuf>,
    output: Option<PathBuf>,
    game: Option<Game>,
    root: &Path,
) -> Result<ResolvedPaths> {
    match (images, game) {
        (Some(images), _) => {
            let title = images
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "cards".to_string());
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{title}.pdf")));
            Ok(ResolvedPaths {
                images,
                output,
                title,
            })
        }
        (None, Some(game)) => Ok(ResolvedPaths {
            images: game.images_dir(root),
            output: output.unwrap_or_else(|| game.pdf_file(root)),
            title: game.name.clone(),
        }),
        (None, None) => Err(anyhow!("either --images or --game-id is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_paths_come_from_the_store_layout() {
        let game = Game::new(4, "Zoo Animals", "easy");
        let resolved = resolve_paths(None, None, Some(game), Path::new("lib")).unwrap();
        assert_eq!(resolved.images, Path::new("lib/images/4"));
        assert_eq!(resolved.output, Path::new("lib/documents/zoo-animals.pdf"));
        assert_eq!(resolved.title, "Zoo Animals");
    }

    #[test]
    fn explicit_images_default_output_to_dir_name() {
        let resolved =
            resolve_paths(Some(PathBuf::from("pics/fruit")), None, None, Path::new(".")).unwrap();
        assert_eq!(resolved.output, Path::new("fruit.pdf"));
    }

    #[test]
    fn some_source_is_required() {
        assert!(resolve_paths(None, None, None, Path::new(".")).is_err());
    }
}
