use crate::core::constants::SAVE_VERSION_MAGIC;
use crate::core::game_state::PlayerState;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("could not encode save: {0}")]
    Encode(#[from] bincode::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("invalid save version: expected 0x{expected:016X}, got 0x{found:016X}")]
    Version { expected: u64, found: u64 },
    #[error("checksum verification failed")]
    Checksum,
    #[error("save declares {declared} body bytes but only {available} are present")]
    Length { declared: u64, available: u64 },
}

/// Manages saving and loading the player with a checksummed binary format
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Creates a SaveManager in the platform config directory.
    pub fn new() -> Result<Self, SaveError> {
        let project_dirs =
            ProjectDirs::from("", "", "wasteland-survivor").ok_or(SaveError::NoConfigDir)?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        Ok(Self {
            save_path: config_dir.join("save.dat"),
        })
    }

    /// Creates a SaveManager writing to an explicit file.
    pub fn with_path(save_path: impl Into<PathBuf>) -> Result<Self, SaveError> {
        let save_path = save_path.into();
        if let Some(parent) = save_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { save_path })
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Saves the player to disk with checksum verification
    ///
    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - Serialized player (variable length)
    /// - SHA256 checksum (32 bytes)
    pub fn save(&self, player: &PlayerState) -> Result<(), SaveError> {
        let data = bincode::serialize(player)?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        // Write beside the real file, then swap it in
        let tmp_path = self.save_path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
            file.write_all(&data_len.to_le_bytes())?;
            file.write_all(&data)?;
            file.write_all(&checksum)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.save_path)?;

        log::debug!("saved {} to {}", player.character_name, self.save_path.display());
        Ok(())
    }

    /// Loads the player from disk with checksum verification
    ///
    /// Returns an error if:
    /// - The file doesn't exist
    /// - The version magic is incorrect
    /// - The checksum verification fails
    /// - The data cannot be deserialized
    pub fn load(&self) -> Result<PlayerState, SaveError> {
        let mut file = fs::File::open(&self.save_path)?;

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);

        if version != SAVE_VERSION_MAGIC {
            return Err(SaveError::Version {
                expected: SAVE_VERSION_MAGIC,
                found: version,
            });
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        // Header is magic + length, trailer is the SHA-256
        let available = file.metadata()?.len().saturating_sub(8 + 4 + 32);
        if u64::from(data_len) > available {
            return Err(SaveError::Length {
                declared: u64::from(data_len),
                available,
            });
        }

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        let computed_checksum = hasher.finalize();

        if stored_checksum != computed_checksum.as_slice() {
            return Err(SaveError::Checksum);
        }

        Ok(bincode::deserialize::<PlayerState>(&data)?)
    }

    /// Checks if a save file exists
    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    pub fn delete(&self) -> Result<(), SaveError> {
        if self.save_exists() {
            fs::remove_file(&self.save_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_save_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("wasteland-test-{}", uuid::Uuid::new_v4()))
        .join("save.dat")
}
