use crate::{editing::Screenplay, models::DocumentSettings};
use std::fs;
use std::path::{Path, PathBuf};

/// Opens the settings block appended to the end of a document.
pub const SETTINGS_OPEN: &str = "/* If you're seeing this, you can remove the following stuff - BEAT:";
/// Closes the settings block.
pub const SETTINGS_CLOSE: &str = "END_BEAT */";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings block: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

/// Splits a file into screenplay text and the settings stored after it.
///
/// Files without a settings block get default settings and keep every byte.
pub fn split_settings_block(content: &str) -> Result<(&str, DocumentSettings), IoError> {
    let Some(start) = content.rfind(SETTINGS_OPEN) else {
        return Ok((content, DocumentSettings::default()));
    };
    let body = &content[start + SETTINGS_OPEN.len()..];
    let json = match body.find(SETTINGS_CLOSE) {
        Some(end) => &body[..end],
        None => body,
    };
    let settings = serde_json::from_str(json.trim())?;
    let text = &content[..start];
    let text = text.strip_suffix("\n\n").unwrap_or(text);
    Ok((text, settings))
}

/// Appends `settings` to `text` as a settings block, unless they are all
/// defaults.
pub fn append_settings_block(text: &str, settings: &DocumentSettings) -> Result<String, IoError> {
    if *settings == DocumentSettings::default() {
        return Ok(text.to_string());
    }
    let json = serde_json::to_string(settings)?;
    Ok(format!("{text}\n\n{SETTINGS_OPEN}\n{json}\n{SETTINGS_CLOSE}\n"))
}

/// Read a screenplay file with its settings block
pub fn read_document(path: &Path) -> Result<Screenplay, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let (text, settings) = split_settings_block(&content)?;
    Ok(Screenplay::with_settings(text, settings))
}

/// Write a screenplay file, settings block included
pub fn write_document(path: &Path, doc: &Screenplay) -> Result<(), IoError> {
    let content = append_settings_block(&doc.text(), &doc.document_settings())?;

    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RevisionRange;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SCRIPT: &str = "INT. HOUSE - DAY\n\nA clock ticks.\n";

    #[test]
    fn test_plain_file_has_default_settings() {
        let (text, settings) = split_settings_block(SCRIPT).unwrap();
        assert_eq!(text, SCRIPT);
        assert_eq!(settings, DocumentSettings::default());
    }

    #[test]
    fn test_settings_block_round_trip() {
        // Given settings that differ from the defaults
        let settings = DocumentSettings {
            scene_number_start: 5,
            revisions: vec![RevisionRange {
                generation: 1,
                range: 2..6,
            }],
            ..Default::default()
        };

        // When appending and splitting again
        let content = append_settings_block(SCRIPT, &settings).unwrap();
        let (text, parsed) = split_settings_block(&content).unwrap();

        // Then both halves come back unchanged
        assert!(content.contains(SETTINGS_OPEN));
        assert_eq!(text, SCRIPT);
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_default_settings_are_not_written() {
        let content = append_settings_block(SCRIPT, &DocumentSettings::default()).unwrap();
        assert_eq!(content, SCRIPT);
    }

    #[test]
    fn test_invalid_settings_block() {
        let content = format!("{SCRIPT}\n\n{SETTINGS_OPEN}\n{{not json\n{SETTINGS_CLOSE}\n");
        let result = split_settings_block(&content);
        assert!(matches!(result, Err(IoError::InvalidSettings(_))));
    }

    #[test]
    fn test_read_document_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_document(&dir.path().join("missing.fountain"));
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_write_then_read_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drafts").join("pilot.fountain");
        let mut doc = Screenplay::with_settings(
            SCRIPT,
            DocumentSettings {
                scene_number_start: 3,
                ..Default::default()
            },
        );
        doc.set_revision_generation(Some(2));
        doc.apply(crate::editing::Cmd::InsertText {
            at: 18,
            text: "Tock. ".into(),
        });

        // Writing creates parent directories
        write_document(&path, &doc).unwrap();
        let read = read_document(&path).unwrap();

        assert_eq!(read.text(), doc.text());
        assert_eq!(read.lines()[0].scene_number.as_deref(), Some("3"));
        assert_eq!(read.lines()[2].revisions[&2].as_slice(), &[0..6]);
        assert_eq!(read.settings().revision_generation, Some(2));
    }
}
