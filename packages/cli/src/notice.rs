// ABOUTME: Turns failures into messages a person can act on
// ABOUTME: Field errors are listed; transport internals never reach the terminal

use colored::Colorize;
use std::fmt;
use storyloom_client::ClientError;
use storyloom_query::QueryError;
use storyloom_services::ServiceError;

const GENERIC_TITLE: &str = "Something went wrong.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the user after a command fails or is interrupted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub lines: Vec<String>,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn from_service_error(err: &ServiceError) -> Self {
        match err {
            ServiceError::Validation {
                context,
                message,
                details,
            } => {
                let notice = Notice::new(NoticeLevel::Error, *context);
                if details.is_empty() {
                    notice.with_line(message.clone())
                } else {
                    details
                        .iter()
                        .fold(notice, |notice, detail| notice.with_line(detail.to_string()))
                }
            }
            ServiceError::Authentication { context, message } => {
                Notice::new(NoticeLevel::Error, *context)
                    .with_line(message.clone())
                    .with_line("Sign in again with `storyloom login`.")
            }
            ServiceError::NotFound { context, .. } => {
                Notice::new(NoticeLevel::Warning, *context)
                    .with_line("The requested item does not exist or was deleted.")
            }
            ServiceError::Transport { context, source } => {
                let notice = Notice::new(NoticeLevel::Error, GENERIC_TITLE).with_line(*context);
                if source.is_network_error() {
                    notice.with_line("Check your connection and try again.")
                } else {
                    notice
                }
            }
        }
    }

    pub fn from_query_error(err: &QueryError) -> Self {
        match err {
            QueryError::Failed(service) => Self::from_service_error(service),
            QueryError::Cancelled => Notice::new(NoticeLevel::Info, "Cancelled."),
            QueryError::TypeMismatch(_) => Notice::new(NoticeLevel::Error, GENERIC_TITLE),
        }
    }

    /// Best notice for an error bubbled up to the command loop
    pub fn from_error(err: &anyhow::Error) -> Self {
        if let Some(query) = err.downcast_ref::<QueryError>() {
            return Self::from_query_error(query);
        }
        if let Some(service) = err.downcast_ref::<ServiceError>() {
            return Self::from_service_error(service);
        }
        if let Some(client) = err.downcast_ref::<ClientError>() {
            return match client {
                ClientError::Configuration(message) => {
                    Notice::new(NoticeLevel::Error, "Invalid configuration")
                        .with_line(message.clone())
                }
                ClientError::Io(_) => Notice::new(NoticeLevel::Error, GENERIC_TITLE)
                    .with_line("Could not access the local token file."),
                _ => Notice::new(NoticeLevel::Error, GENERIC_TITLE),
            };
        }
        // Local failures (prompts, file reads) carry no remote detail
        Notice::new(NoticeLevel::Error, GENERIC_TITLE).with_line(err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self.level {
            NoticeLevel::Info => self.title.cyan(),
            NoticeLevel::Warning => self.title.yellow().bold(),
            NoticeLevel::Error => self.title.red().bold(),
        };
        write!(f, "{}", title)?;
        for line in &self.lines {
            write!(f, "\n  {}", line)?;
        }
        Ok(())
    }
}
