//! `[user@]host:path` parsing for remote endpoints.

use std::fmt;

use super::Unavailable;

/// A parsed remote location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    pub user: Option<String>,
    pub host: String,
    pub path: String,
}

impl RemoteSpec {
    /// Parse a remote location.
    ///
    /// The user is everything before the first `@`, the host runs up to the
    /// first `:`, and the path is the remainder. An empty path (`host:`)
    /// addresses the remote root.
    pub fn parse(spec: &str) -> Result<Self, Unavailable> {
        let Some((authority, path)) = spec.split_once(':') else {
            return Err(Unavailable::RemoteHost {
                spec: spec.to_string(),
            });
        };

        let (user, host) = match authority.split_once('@') {
            Some((user, host)) => (Some(user), host),
            None => (None, authority),
        };

        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(Unavailable::RemoteHost {
                spec: spec.to_string(),
            });
        }

        let path = if path.is_empty() { "/" } else { path };
        if !is_valid_remote_path(path) {
            return Err(Unavailable::RemotePath {
                spec: spec.to_string(),
            });
        }

        Ok(Self {
            user: user.filter(|u| !u.is_empty()).map(str::to_string),
            host: host.to_string(),
            path: path.to_string(),
        })
    }

    /// `user@host` or `host`, as passed to ssh.
    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.host),
            None => self.host.clone(),
        }
    }

    /// Remote shell test for directory existence.
    ///
    /// `~` and `~/` prefixes are left unquoted so the remote shell expands
    /// them.
    pub fn dir_test_command(&self) -> String {
        let quoted = if self.path == "~" {
            "~".to_string()
        } else if let Some(rest) = self.path.strip_prefix("~/") {
            if rest.is_empty() {
                "~/".to_string()
            } else {
                format!("~/{}", shell_quote(rest))
            }
        } else {
            shell_quote(&self.path)
        };
        format!("[ -d {} ]", quoted)
    }
}

impl fmt::Display for RemoteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.destination(), self.path)
    }
}

fn is_valid_remote_path(path: &str) -> bool {
    !path.trim().is_empty() && !path.chars().any(|c| c == '\0' || c == '\n' || c == '\r')
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
