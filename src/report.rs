use std::io::Write;

use anyhow::Result;

use crate::model::game::{GameRecord, OsTag};

/// Host boundary for scan results.
///
/// The launcher side owns the actual listing call; anything that can take
/// a batch of records (a plugin bridge, stdout, a test buffer) implements
/// this.
pub trait Reporter {
    fn report(&mut self, games: &[GameRecord]) -> Result<()>;
}

/// Machine-readable reporting: one pretty-printed JSON array.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, games: &[GameRecord]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, games)?;
        writeln!(self.out)?;
        Ok(())
    }
}

/// Human-readable reporting: one line per game.
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, games: &[GameRecord]) -> Result<()> {
        for game in games {
            let os_tags: Vec<&str> = game.compatible_os.iter().map(OsTag::label).collect();

            let installer = game.installer_file.as_deref().unwrap_or("-");

            writeln!(
                self.out,
                "{:<28} {:<36} {:<24} [{}]",
                game.id,
                game.title,
                installer,
                os_tags.join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn sample() -> Vec<GameRecord> {
        vec![GameRecord {
            id: "cave-story".to_string(),
            title: "Cave Story".to_string(),
            location: PathBuf::from("/depot/Cave Story"),
            installer_file: Some("setup.exe".to_string()),
            image_files: vec![],
            compatible_os: BTreeSet::from([OsTag::Windows, OsTag::Linux]),
        }]
    }

    #[test]
    fn json_report_round_trips() {
        let mut out = Vec::new();
        JsonReporter::new(&mut out).report(&sample()).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["id"], "cave-story");
        assert_eq!(parsed[0]["compatible_os"][0], "windows");
    }

    #[test]
    fn text_report_lists_each_game() {
        let mut out = Vec::new();
        TextReporter::new(&mut out).report(&sample()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Cave Story"));
        assert!(text.contains("setup.exe"));
        assert!(text.contains("windows, linux"));
    }
}
