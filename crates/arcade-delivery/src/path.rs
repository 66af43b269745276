//! Inbound path validation.

use arcade_common::error::{DeliveryError, DeliveryResult};

/// Validate the project identifier segment (slug or id).
pub fn identifier(raw: &str) -> DeliveryResult<&str> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(DeliveryError::bad_request("Missing project identifier"));
    }
    if id.contains(['/', '\\', '\0']) || id == "." || id == ".." {
        return Err(DeliveryError::bad_request("Invalid project identifier"));
    }
    Ok(id)
}

/// Validate and normalize a requested file path.
///
/// Leading and trailing slashes are dropped; `None` means "serve the entrypoint".
pub fn file_path(raw: Option<&str>) -> DeliveryResult<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.contains(['\\', '\0']) {
        return Err(DeliveryError::bad_request("Invalid file path"));
    }

    for segment in trimmed.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(DeliveryError::bad_request("Invalid file path"));
        }
    }

    Ok(Some(trimmed.to_string()))
}

/// Split a validated request path into `(identifier, file)` under `mount`.
///
/// `None` when the path is not under the mount prefix. An identifier may come
/// back empty (`/play`, `/play/`); [`identifier`] rejects that.
pub fn mounted<'p>(mount: &str, path: &'p str) -> Option<(&'p str, Option<&'p str>)> {
    let rest = if mount.is_empty() {
        path
    } else {
        let rest = path.strip_prefix(mount)?;
        if rest.is_empty() {
            rest
        } else {
            rest.strip_prefix('/')?
        }
    };

    Some(match rest.split_once('/') {
        Some((id, file)) => (id, Some(file)),
        None => (rest, None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert_eq!(identifier("space-shooter").unwrap(), "space-shooter");
        assert!(identifier("").is_err());
        assert!(identifier("  ").is_err());
        assert!(identifier("..").is_err());
        assert!(identifier("a\\b").is_err());
    }

    #[test]
    fn test_file_path_defaults_to_entrypoint() {
        assert_eq!(file_path(None).unwrap(), None);
        assert_eq!(file_path(Some("")).unwrap(), None);
        assert_eq!(file_path(Some("/")).unwrap(), None);
    }

    #[test]
    fn test_file_path_normalization() {
        assert_eq!(
            file_path(Some("/assets/app.js")).unwrap().as_deref(),
            Some("assets/app.js")
        );
        assert_eq!(file_path(Some("levels/")).unwrap().as_deref(), Some("levels"));
    }

    #[test]
    fn test_file_path_rejects_traversal() {
        for bad in ["../secret", "a/../../b", "a//b", "./x", "a\\b", "a\0b"] {
            let err = file_path(Some(bad)).unwrap_err();
            assert_eq!(err.error_code(), "BAD_REQUEST", "{bad}");
        }
    }

    #[test]
    fn test_mounted_split() {
        assert_eq!(mounted("play", "play/snake"), Some(("snake", None)));
        assert_eq!(
            mounted("play", "play/snake/assets/a.png"),
            Some(("snake", Some("assets/a.png")))
        );
        assert_eq!(mounted("play", "play"), Some(("", None)));
        assert_eq!(mounted("games/play", "games/play/snake"), Some(("snake", None)));
    }

    #[test]
    fn test_paths_outside_mount_are_not_split() {
        assert_eq!(mounted("play", "player/snake"), None);
        assert_eq!(mounted("play", "assets/game.js"), None);
    }
}
