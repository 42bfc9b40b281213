use std::path::PathBuf;

pub fn data_dir() -> PathBuf {
    // ~/.local/share/dlqueue on every unix, including macOS
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("dlqueue")
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dlqueue")
    }
}

pub fn config_dir() -> PathBuf {
    // Portable install: config.toml beside the executable wins.
    #[cfg(windows)]
    {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                if exe_dir.join("config.toml").exists() {
                    return exe_dir.to_path_buf();
                }
            }
        }
    }

    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("dlqueue")
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dlqueue")
    }
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

#[cfg(unix)]
pub fn player_binary_name() -> &'static str {
    "mpv"
}

#[cfg(windows)]
pub fn player_binary_name() -> &'static str {
    "mpv.exe"
}

/// Resolve a player command to a binary path.
///
/// Paths containing a separator are taken as-is when they exist. Bare names
/// are looked up beside the current executable, then on `PATH`.
pub fn find_binary(command: &str) -> Option<PathBuf> {
    let direct = PathBuf::from(command);
    if direct.components().count() > 1 {
        return direct.exists().then_some(direct);
    }

    if let Ok(current_exe) = std::env::current_exe() {
        if let Some(dir) = current_exe.parent() {
            let local = dir.join(command);
            if local.exists() {
                return Some(local);
            }
        }
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(command))
        .find(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirs_are_namespaced() {
        assert!(data_dir().ends_with("dlqueue"));
        assert!(config_dir().ends_with("dlqueue"));
    }

    #[test]
    fn find_binary_rejects_missing_explicit_path() {
        let missing = temp_dir().join("dlqueue-definitely-missing").join("player");
        assert_eq!(find_binary(missing.to_str().unwrap()), None);
    }
}
