use crate::config::GitHubConfig;
use crate::error::{PrviewError, Result};

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

/// Stored token path: ~/.config/prview/token
fn token_path() -> Option<std::path::PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("prview").join("token"))
}

fn load_stored_token() -> Option<String> {
    let path = token_path()?;
    let token = std::fs::read_to_string(path).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

fn save_token(token: &str) -> std::io::Result<()> {
    if let Some(path) = token_path() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, token)?;
    }
    Ok(())
}

/// Resolve a GitHub token, trying in order:
/// 1. The configured env var
/// 2. The stored token from ~/.config/prview/token
/// 3. The configured CLI command (result is stored for next time)
pub fn load_token(config: &GitHubConfig) -> Result<String> {
    if let Some(env_var) = &config.token_env {
        if let Ok(token) = std::env::var(env_var) {
            if !token.is_empty() {
                return Ok(token);
            }
        }
    }

    if let Some(token) = load_stored_token() {
        return Ok(token);
    }

    if let Some(cmd) = &config.token_command {
        if let Some(token) = try_cli_token(cmd) {
            if let Err(e) = save_token(&token) {
                tracing::warn!(error = %e, "could not store token");
            }
            return Ok(token);
        }
    }

    Err(PrviewError::Auth(format!(
        "No GitHub token found. Set {} or configure a token_command.",
        config.token_env.as_deref().unwrap_or("a token env var")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_token_is_trimmed() {
        assert_eq!(try_cli_token("echo '  abc123  '"), Some("abc123".to_string()));
    }

    #[test]
    fn cli_token_empty_output_is_none() {
        assert_eq!(try_cli_token("true"), None);
    }

    #[test]
    fn cli_token_failing_command_is_none() {
        assert_eq!(try_cli_token("echo token && exit 3"), None);
    }

    #[test]
    fn env_var_wins() {
        let var = "PRVIEW_TEST_TOKEN_ENV_WINS";
        std::env::set_var(var, "from-env");
        let config = GitHubConfig {
            token_env: Some(var.to_string()),
            token_command: None,
            ..GitHubConfig::default()
        };
        assert_eq!(load_token(&config).unwrap(), "from-env");
        std::env::remove_var(var);
    }
}
