//! Log file location for a character.

use std::path::{Path, PathBuf};

/// `<base>/Logs/eqlog_<Player>_<server>.txt`
///
/// The client writes character names with a leading capital and server
/// names in lower case.
pub fn log_path(player: &str, server: &str, base_path: &Path) -> PathBuf {
    let file_name = format!(
        "eqlog_{}_{}.txt",
        capitalize(player.trim()),
        server.trim().to_lowercase()
    );
    base_path.join("Logs").join(file_name)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path() {
        let path = log_path("patchouli", "Firiona", Path::new("/games/eq"));
        assert_eq!(
            path,
            PathBuf::from("/games/eq/Logs/eqlog_Patchouli_firiona.txt")
        );
    }

    #[test]
    fn test_only_first_letter_changes() {
        let path = log_path("vonParses", "TEST", Path::new("eq"));
        assert!(path.ends_with("eqlog_VonParses_test.txt"));
    }

    #[test]
    fn test_capitalize_empty() {
        assert_eq!(capitalize(""), "");
    }
}
