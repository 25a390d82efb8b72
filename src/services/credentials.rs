//! Cached sudo password used for the privileged disk commands
//!
//! The password is read from an owner-only file or prompted for, verified with
//! `sudo -v`, and handed to `sudo -S` on stdin for each privileged command.

use async_trait::async_trait;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::errors::{FlashError, Result};
use crate::ui::Prompter;
use crate::utils::{CommandOutput, run_command};

/// Mechanism that turns a secret into elevated privileges
#[async_trait]
pub trait PrivilegeEscalator: Send + Sync {
    /// Whether `secret` grants privileges (no-op probe)
    async fn verify(&self, secret: &str) -> bool;

    /// Run `program args...` with elevated privileges
    async fn run(&self, secret: &str, program: &str, args: &[&str]) -> CommandOutput;
}

/// `sudo -S` with the password on stdin and an empty prompt
#[derive(Debug, Default, Clone, Copy)]
pub struct SudoEscalator;

#[async_trait]
impl PrivilegeEscalator for SudoEscalator {
    async fn verify(&self, secret: &str) -> bool {
        let input = format!("{}\n", secret);
        run_command("sudo", &["-S", "-p", "", "-v"], Some(&input))
            .await
            .success
    }

    async fn run(&self, secret: &str, program: &str, args: &[&str]) -> CommandOutput {
        let mut sudo_args = vec!["-S", "-p", "", program];
        sudo_args.extend_from_slice(args);
        let input = format!("{}\n", secret);
        run_command("sudo", &sudo_args, Some(&input)).await
    }
}

/// Verified secret plus the escalator it unlocks
pub struct CredentialCache {
    secret: String,
    escalator: Arc<dyn PrivilegeEscalator>,
}

impl fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCache")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl CredentialCache {
    /// Load a verified secret from `path`, prompting when the file is missing
    /// or holds a rejected password. A rejected prompt answer is fatal.
    pub async fn load(
        path: &Path,
        escalator: Arc<dyn PrivilegeEscalator>,
        prompter: &dyn Prompter,
    ) -> Result<Self> {
        if path.exists() {
            let stored = fs::read_to_string(path)?.trim().to_string();
            if escalator.verify(&stored).await {
                log::info!("✅ sudo password verified ({})", path.display());
                return Ok(Self {
                    secret: stored,
                    escalator,
                });
            }

            log::warn!("❌ Wrong sudo password in file: {}", path.display());
            let secret = Self::prompt_verified(&*escalator, prompter, true).await?;
            persist_secret(path, &secret)?;
            log::info!("✅ Password updated in {}", path.display());
            return Ok(Self { secret, escalator });
        }

        log::warn!("⚠️  Password file not found: {}", path.display());
        let secret = Self::prompt_verified(&*escalator, prompter, false).await?;

        if prompter.confirm(&format!("💾 Save password to {}?", path.display()))? {
            persist_secret(path, &secret)?;
            log::info!("✅ Password saved to {}", path.display());
        } else {
            log::info!("ℹ️  Password not saved (you will be asked again next run)");
        }

        Ok(Self { secret, escalator })
    }

    async fn prompt_verified(
        escalator: &dyn PrivilegeEscalator,
        prompter: &dyn Prompter,
        replacing: bool,
    ) -> Result<String> {
        let prompt = if replacing {
            "🔐 Enter new sudo password: "
        } else {
            "🔐 Enter sudo password: "
        };
        let secret = prompter.read_secret(prompt)?;

        if !escalator.verify(&secret).await {
            return Err(FlashError::Credential(
                "sudo rejected the password".to_string(),
            ));
        }
        log::info!("✅ Password accepted");
        Ok(secret)
    }

    /// Run a command with elevated privileges. Failure is reported in the
    /// returned output, never as an error.
    pub async fn run_privileged(&self, program: &str, args: &[&str]) -> CommandOutput {
        self.escalator.run(&self.secret, program, args).await
    }

    /// Extend the privilege timestamp before a burst of privileged commands
    pub async fn refresh(&self) -> bool {
        self.escalator.verify(&self.secret).await
    }
}

/// Write the secret so only the owner can read or write it
fn persist_secret(path: &Path, secret: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        options.mode(0o600);
        let mut file = options.open(path)?;
        // An existing file keeps its old mode on open
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        file.write_all(secret.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        let mut file = options.open(path)?;
        file.write_all(secret.as_bytes())?;
    }

    Ok(())
}
