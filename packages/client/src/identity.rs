//! Durable client identity.
//!
//! The client identity is a token that survives reconnects and restarts,
//! unlike the per-connection handle the server mints on every WebSocket
//! upgrade. The server uses it to recognize which participants a client
//! owns, so losing it would orphan our participant entry on reconnect.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use uuid::Uuid;

use crate::error::ClientError;

/// Load the client identity from `path`, generating and persisting a new
/// one on first use.
pub fn load_or_create_identity(path: &Path) -> Result<String, ClientError> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim().to_string();
            if !token.is_empty() {
                tracing::debug!("Loaded client identity from {}", path.display());
                return Ok(token);
            }
            // An empty identity file is treated as absent
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ClientError::Identity(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )));
        }
    }

    let token = format!("client-{}", Uuid::new_v4());
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            ClientError::Identity(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }
    fs::write(path, &token).map_err(|e| {
        ClientError::Identity(format!("failed to write {}: {}", path.display(), e))
    })?;
    tracing::info!("Generated new client identity at {}", path.display());

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_identity_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("mitsumori-test-{}-{}", name, Uuid::new_v4()));
        path
    }

    #[test]
    fn test_first_use_generates_and_persists_identity() {
        // テスト項目: 初回はトークンが生成されてファイルに保存される
        // given (前提条件):
        let path = temp_identity_path("generate");

        // when (操作):
        let token = load_or_create_identity(&path).unwrap();

        // then (期待する結果):
        assert!(token.starts_with("client-"));
        assert_eq!(fs::read_to_string(&path).unwrap(), token);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_identity_is_stable_across_loads() {
        // テスト項目: 2 回目以降の読み込みで同じトークンが返される
        //             （再接続・再起動をまたいで安定）
        // given (前提条件):
        let path = temp_identity_path("stable");
        let first = load_or_create_identity(&path).unwrap();

        // when (操作):
        let second = load_or_create_identity(&path).unwrap();

        // then (期待する結果):
        assert_eq!(first, second);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_identity_file_with_trailing_newline_is_trimmed() {
        // テスト項目: 末尾に改行のある既存ファイルからトークンが
        //             トリムされて読み込まれる
        // given (前提条件):
        let path = temp_identity_path("trim");
        fs::write(&path, "client-abc123\n").unwrap();

        // when (操作):
        let token = load_or_create_identity(&path).unwrap();

        // then (期待する結果):
        assert_eq!(token, "client-abc123");

        fs::remove_file(&path).ok();
    }
}
