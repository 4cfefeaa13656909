/*!
 * Tests for file utilities
 */

use anyhow::Result;
use slidesmith::file_utils::FileManager;

use crate::common;

#[test]
fn test_generate_output_path_withTopic_shouldUseSlug() {
    let path = FileManager::generate_output_path("/tmp/decks", "Ocean Currents & Climate", ".json");
    assert_eq!(path, std::path::PathBuf::from("/tmp/decks/ocean-currents-climate.json"));
}

#[test]
fn test_write_and_read_file_shouldRoundTripContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out/slides.md");

    FileManager::write_to_file(&path, "# Title\n")?;

    assert!(FileManager::file_exists(&path));
    assert!(FileManager::dir_exists(temp_dir.path().join("out")));
    assert_eq!(FileManager::read_to_string(&path)?, "# Title\n");
    Ok(())
}

#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("/nonexistent/presentation.json").is_err());
}
