//! Naming convention shared with the game record store.
//!
//! The store hands out numeric ids and names; symbols live under
//! `images/{id}` and the rendered deck under `documents/{slug}.pdf`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const IMAGES_DIR: &str = "images";
pub const DOCUMENTS_DIR: &str = "documents";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub difficulty: String,
}

impl Game {
    pub fn new<S: Into<String>>(id: i64, name: S, difficulty: S) -> Self {
        Self {
            id,
            name: name.into(),
            difficulty: difficulty.into(),
        }
    }

    /// Lowercase name with every run of other characters collapsed to `-`.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        let mut pending_dash = false;
        for ch in self.name.chars() {
            if ch.is_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.extend(ch.to_lowercase());
            } else {
                pending_dash = true;
            }
        }
        if slug.is_empty() {
            format!("game-{}", self.id)
        } else {
            slug
        }
    }

    pub fn images_dir(&self, root: &Path) -> PathBuf {
        root.join(IMAGES_DIR).join(self.id.to_string())
    }

    pub fn pdf_file(&self, root: &Path) -> PathBuf {
        root.join(DOCUMENTS_DIR).join(format!("{}.pdf", self.slug()))
    }

    pub fn pdf_file_exists(&self, root: &Path) -> bool {
        self.pdf_file(root).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn slug_is_lowercase_and_dashed() {
        assert_eq!(Game::new(1, "Test Game", "Easy").slug(), "test-game");
        assert_eq!(Game::new(1, "  Animals & Fruit!! ", "Hard").slug(), "animals-fruit");
        assert_eq!(Game::new(7, "???", "Easy").slug(), "game-7");
    }

    #[test]
    fn paths_follow_store_layout() {
        let game = Game::new(3, "Test Game", "Easy");
        let root = Path::new("/data");
        assert_eq!(game.images_dir(root), Path::new("/data/images/3"));
        assert_eq!(game.pdf_file(root), Path::new("/data/documents/test-game.pdf"));
    }

    #[test]
    fn pdf_file_exists_checks_disk() {
        let root = tempfile::tempdir().unwrap();
        let game = Game::new(1, "Test Game", "Easy");
        assert!(!game.pdf_file_exists(root.path()));

        fs::create_dir_all(root.path().join(DOCUMENTS_DIR)).unwrap();
        fs::write(game.pdf_file(root.path()), b"fake pdf content").unwrap();
        assert!(game.pdf_file_exists(root.path()));
    }
}
