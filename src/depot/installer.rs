use std::process::Command;

use anyhow::{Context, Result};

use crate::model::snapshot::SnapshotEntry;

#[derive(Debug)]
pub enum InstallOutcome {
    /// The descriptor names no installer; nothing to do.
    NoInstaller,
    /// Installer ran and exited zero.
    Completed,
    /// Installer ran and exited non-zero.
    Failed(std::process::ExitStatus),
}

/// Run a game's installer to completion, capturing its output.
///
/// Snapshot state is the caller's to update. Installers run with the game
/// folder as working directory so relative unpack paths land next to the
/// installer.
pub fn run_installer(entry: &SnapshotEntry) -> Result<InstallOutcome> {
    let Some(installer) = entry.installer_path() else {
        return Ok(InstallOutcome::NoInstaller);
    };

    tracing::info!("running installer {}", installer.display());

    let output = Command::new(&installer)
        .current_dir(&entry.location)
        .output()
        .with_context(|| format!("launching installer {}", installer.display()))?;

    if !output.stdout.is_empty() {
        tracing::debug!("installer stdout: {}", String::from_utf8_lossy(&output.stdout));
    }
    if !output.stderr.is_empty() {
        tracing::debug!("installer stderr: {}", String::from_utf8_lossy(&output.stderr));
    }

    tracing::debug!("installer exited with {}", output.status);

    if output.status.success() {
        Ok(InstallOutcome::Completed)
    } else {
        Ok(InstallOutcome::Failed(output.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn entry(location: PathBuf, installer_file: Option<&str>) -> SnapshotEntry {
        SnapshotEntry {
            title: "Test Game".to_string(),
            location,
            installer_file: installer_file.map(str::to_string),
            image_files: vec![],
            compatible_os: BTreeSet::new(),
            installed: false,
            running: false,
        }
    }

    #[test]
    fn entry_without_installer_is_a_noop() {
        let outcome = run_installer(&entry(PathBuf::from("/nowhere"), None)).unwrap();
        assert!(matches!(outcome, InstallOutcome::NoInstaller));
    }

    #[test]
    fn missing_installer_binary_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = run_installer(&entry(dir.path().to_path_buf(), Some("setup.exe")));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn exit_codes_map_to_outcomes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        for (script, body) in [("ok.sh", "#!/bin/sh\nexit 0\n"), ("bad.sh", "#!/bin/sh\nexit 3\n")]
        {
            let path = dir.path().join(script);
            std::fs::write(&path, body).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let ok = run_installer(&entry(dir.path().to_path_buf(), Some("ok.sh"))).unwrap();
        assert!(matches!(ok, InstallOutcome::Completed));

        let bad = run_installer(&entry(dir.path().to_path_buf(), Some("bad.sh"))).unwrap();
        assert!(matches!(bad, InstallOutcome::Failed(_)));
    }
}
