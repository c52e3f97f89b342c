use std::path::{Path, PathBuf};

pub const TEXTURE_DIR: &str = "assets/textures";

/// Every texture the game draws. Scenery, zombies and bullets are billboards;
/// the gun pair is the full-screen foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteClass {
    House1,
    House2,
    Tree,
    Zombie,
    Bullet,
    Gun,
    GunFire,
}

impl SpriteClass {
    pub const ALL: [SpriteClass; 7] = [
        SpriteClass::House1,
        SpriteClass::House2,
        SpriteClass::Tree,
        SpriteClass::Zombie,
        SpriteClass::Bullet,
        SpriteClass::Gun,
        SpriteClass::GunFire,
    ];

    pub fn asset_name(self) -> &'static str {
        match self {
            SpriteClass::House1 => "house_1",
            SpriteClass::House2 => "house_2",
            SpriteClass::Tree => "tree",
            SpriteClass::Zombie => "zombie",
            SpriteClass::Bullet => "bullet",
            SpriteClass::Gun => "gun",
            SpriteClass::GunFire => "gun_fire",
        }
    }

    pub fn texture_path(self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.png", self.asset_name()))
    }

    /// Position in `ALL`, usable as a dense table index.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Encoded image bytes for one sprite, read from disk but not yet decoded.
pub struct SpriteSource {
    pub class: SpriteClass,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Read every sprite file under `dir`, in `SpriteClass::ALL` order.
/// Fails on the first missing or empty file.
pub fn read_sprite_sources(dir: &Path) -> Result<Vec<SpriteSource>, String> {
    SpriteClass::ALL
        .into_iter()
        .map(|class| {
            let path = class.texture_path(dir);
            let bytes = std::fs::read(&path)
                .map_err(|e| format!("Failed to read texture '{}': {e}", path.display()))?;
            if bytes.is_empty() {
                return Err(format!("Texture '{}' is empty", path.display()));
            }
            log::debug!("Read sprite '{}' ({} bytes)", class.asset_name(), bytes.len());
            Ok(SpriteSource { class, path, bytes })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "zr_sprites_{}_{}_{}",
            name,
            std::process::id(),
            nanos
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn asset_names_are_unique() {
        let mut names: Vec<&str> = SpriteClass::ALL.iter().map(|c| c.asset_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SpriteClass::ALL.len());
    }

    #[test]
    fn index_matches_position_in_all() {
        for (i, class) in SpriteClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
    }

    #[test]
    fn texture_path_uses_asset_name() {
        let path = SpriteClass::GunFire.texture_path(Path::new(TEXTURE_DIR));
        assert_eq!(path, Path::new("assets/textures/gun_fire.png"));
    }

    #[test]
    fn reads_all_sprites_in_order() {
        let dir = temp_dir("ok");
        for class in SpriteClass::ALL {
            std::fs::write(class.texture_path(&dir), [class.index() as u8 + 1]).unwrap();
        }
        let sources = read_sprite_sources(&dir).expect("all sprites present");
        assert_eq!(sources.len(), 7);
        assert_eq!(sources[0].class, SpriteClass::House1);
        assert_eq!(sources[6].bytes, vec![7]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_sprite_error_names_the_file() {
        let dir = temp_dir("missing");
        for class in SpriteClass::ALL {
            if class != SpriteClass::Zombie {
                std::fs::write(class.texture_path(&dir), [1u8]).unwrap();
            }
        }
        let err = read_sprite_sources(&dir).err().expect("zombie.png is missing");
        assert!(err.contains("zombie.png"), "unexpected error: {err}");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
