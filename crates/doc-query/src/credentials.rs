//! Provider credentials bootstrap
//!
//! Keys come from the process environment, optionally seeded from a `.env`
//! file. Missing keys either abort startup or, in interactive mode, are read
//! from the terminal with masked input.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable holding the Groq key used for answer generation
pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
/// Environment variable holding the OpenAI key used for embeddings
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// How to handle a missing key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    /// Fail with a configuration error (service deployments)
    #[default]
    FailFast,
    /// Block on a masked terminal prompt until a value is entered
    Interactive,
}

/// Source of secrets typed by an operator
pub trait SecretPrompt {
    /// Show `label` and read one line without echoing it
    fn read_secret(&mut self, label: &str) -> std::io::Result<String>;
}

/// Masked prompt on the controlling terminal
pub struct TerminalPrompt {
    term: console::Term,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            term: console::Term::stderr(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretPrompt for TerminalPrompt {
    fn read_secret(&mut self, label: &str) -> std::io::Result<String> {
        self.term.write_str(label)?;
        self.term.read_secure_line()
    }
}

/// Load key/value pairs from an env file without overriding variables that
/// are already set. Returns whether a file was found.
pub fn load_env_file(path: &Path) -> Result<bool> {
    if !path.exists() {
        tracing::info!(
            "No {} file found; API keys are taken from the environment",
            path.display()
        );
        return Ok(false);
    }

    dotenvy::from_path(path)
        .map_err(|e| Error::Config(format!("Failed to load {}: {}", path.display(), e)))?;
    tracing::info!("Loaded environment from {}", path.display());
    Ok(true)
}

/// The two provider secrets required before serving
#[derive(Clone)]
pub struct Credentials {
    pub groq_api_key: String,
    pub openai_api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("groq_api_key", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolve both keys from the process environment, prompting if allowed.
    /// Prompted values are exported so the rest of the process sees them.
    pub fn resolve(mode: PromptMode, prompt: &mut dyn SecretPrompt) -> Result<Self> {
        let credentials = Self::resolve_from(|name| std::env::var(name).ok(), mode, prompt)?;

        std::env::set_var(GROQ_API_KEY, &credentials.groq_api_key);
        std::env::set_var(OPENAI_API_KEY, &credentials.openai_api_key);

        Ok(credentials)
    }

    /// Resolve both keys through `lookup`
    pub fn resolve_from<F>(
        lookup: F,
        mode: PromptMode,
        prompt: &mut dyn SecretPrompt,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let groq_api_key = require(
            &lookup,
            GROQ_API_KEY,
            "Enter your Groq API key: ",
            mode,
            prompt,
        )?;
        let openai_api_key = require(
            &lookup,
            OPENAI_API_KEY,
            "Enter your OpenAI API key: ",
            mode,
            prompt,
        )?;

        Ok(Self {
            groq_api_key,
            openai_api_key,
        })
    }
}

fn require<F>(
    lookup: &F,
    name: &str,
    label: &str,
    mode: PromptMode,
    prompt: &mut dyn SecretPrompt,
) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
        return Ok(value);
    }

    match mode {
        PromptMode::FailFast => Err(Error::Config(format!(
            "{} is not set; export it, add it to .env, or start with --interactive",
            name
        ))),
        PromptMode::Interactive => loop {
            let value = prompt.read_secret(label)?;
            let value = value.trim();
            if !value.is_empty() {
                tracing::debug!("{} supplied interactively", name);
                return Ok(value.to_string());
            }
        },
    }
}
