//! Configuration management for the Codiny server.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Command-line arguments for the Codiny server.
#[derive(Parser, Debug, Clone)]
#[command(name = "codiny-server")]
#[command(author = "Codiny Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI code review, refactoring and team invitations for the Codiny dashboard")]
pub struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0", env = "CODINY_HOST")]
    pub host: String,

    /// HTTP port
    #[arg(short, long, default_value = "3000", env = "CODINY_PORT")]
    pub port: u16,

    /// Enable debug logging
    #[arg(short, long, env = "CODINY_DEBUG")]
    pub debug: bool,

    /// Log output format
    #[arg(long, default_value = "text", env = "CODINY_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Completion API base URL
    #[arg(long, default_value = "https://api.openai.com/v1", env = "COMPLETION_API_URL")]
    pub completion_url: String,

    /// Completion API key
    #[arg(long, env = "COMPLETION_API_KEY")]
    pub completion_key: Option<String>,

    /// Completion model name
    #[arg(long, default_value = "gpt-4o-mini", env = "COMPLETION_MODEL")]
    pub completion_model: String,

    /// Completion request timeout (seconds)
    #[arg(long, default_value = "300", env = "COMPLETION_TIMEOUT_SECS")]
    pub request_timeout: u64,

    /// SMTP relay host
    #[arg(long, default_value = "smtp.gmail.com", env = "SMTP_HOST")]
    pub smtp_host: String,

    /// SMTP username (also the sender address)
    #[arg(long, env = "EMAIL_USER")]
    pub email_user: Option<String>,

    /// SMTP password
    #[arg(long, env = "EMAIL_PASSWORD")]
    pub email_password: Option<String>,

    /// Public dashboard URL used to build links in e-mails
    #[arg(long, default_value = "http://localhost:3000", env = "APP_URL")]
    pub app_url: String,

    /// Directory for saved analysis results
    #[arg(long, default_value = ".codiny", env = "CODINY_DATA_DIR")]
    pub data_dir: PathBuf,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Debug mode
    pub debug: bool,
    /// Log format
    pub log_format: LogFormat,
    /// Completion API URL
    pub completion_url: String,
    /// Completion API key
    #[serde(skip_serializing)]
    pub completion_key: Option<String>,
    /// Completion model
    pub completion_model: String,
    /// Completion timeout in seconds
    pub request_timeout: u64,
    /// SMTP relay host
    pub smtp_host: String,
    /// SMTP username
    pub email_user: Option<String>,
    /// SMTP password
    #[serde(skip_serializing)]
    pub email_password: Option<String>,
    /// Dashboard URL
    pub app_url: String,
    /// Data directory
    pub data_dir: PathBuf,
}

/// Settings for the chat-completion client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// Settings for the invitation mailer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailConfig {
    pub smtp_host: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub app_url: String,
}

impl MailConfig {
    /// Username and password, if both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

impl Config {
    /// Completion client settings. Fails when no API key was supplied.
    pub fn completion(&self) -> Result<CompletionConfig> {
        let api_key = self
            .completion_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "Completion API key is required. Provide it via:\n\
                     1. --completion-key\n\
                     2. COMPLETION_API_KEY environment variable"
                        .to_string(),
                )
            })?;

        Ok(CompletionConfig {
            base_url: self.completion_url.clone(),
            api_key,
            model: self.completion_model.clone(),
            timeout_secs: self.request_timeout,
        })
    }

    /// Mailer settings.
    pub fn mail(&self) -> MailConfig {
        MailConfig {
            smtp_host: self.smtp_host.clone(),
            username: self.email_user.clone(),
            password: self.email_password.clone(),
            app_url: self.app_url.clone(),
        }
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            debug: args.debug,
            log_format: args.log_format,
            completion_url: args.completion_url,
            completion_key: args.completion_key,
            completion_model: args.completion_model,
            request_timeout: args.request_timeout,
            smtp_host: args.smtp_host,
            email_user: args.email_user,
            email_password: args.email_password,
            app_url: args.app_url,
            data_dir: args.data_dir,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            debug: false,
            log_format: LogFormat::Text,
            completion_url: "https://api.openai.com/v1".to_string(),
            completion_key: None,
            completion_model: "gpt-4o-mini".to_string(),
            request_timeout: 300,
            smtp_host: "smtp.gmail.com".to_string(),
            email_user: None,
            email_password: None,
            app_url: "http://localhost:3000".to_string(),
            data_dir: PathBuf::from(".codiny"),
        }
    }
}
