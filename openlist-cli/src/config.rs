use std::{fmt::Debug, str::FromStr, time::Duration};

use openlist::{client::DEFAULT_TIMEOUT, OpenList};
use tracing::debug;

#[derive(Debug, Clone)]
pub enum Auth {
    Anonymous,
    Token(String),
    Password { username: String, password: String },
}

impl Auth {
    /// Attach a token to `openlist`, logging in first if needed.
    pub async fn apply(&self, openlist: &OpenList) -> Result<(), openlist::Error> {
        match self {
            Auth::Anonymous => {}
            Auth::Token(token) => openlist.set_token(token),
            Auth::Password { username, password } => {
                let login = openlist.auth().login_hash(username, password, None).await?;
                debug!("logged in as {username}");
                openlist.set_token(login.data.token);
            }
        }

        Ok(())
    }
}

impl Default for Auth {
    fn default() -> Self {
        if let Some(token) = env_opt("OPENLIST_TOKEN") {
            return Auth::Token(token);
        }

        match env_opt("OPENLIST_USERNAME") {
            Some(username) => Auth::Password {
                username,
                password: env("OPENLIST_PASSWORD"),
            },
            None => Auth::Anonymous,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub url: String,
    pub timeout: Duration,
    pub auth: Auth,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: env("OPENLIST_URL"),
            timeout: env_opt("OPENLIST_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            auth: Auth::default(),
        }
    }
}

impl AppConfig {
    /// Connect, without touching the network unless a login is needed.
    pub async fn connect(&self) -> Result<OpenList, openlist::Error> {
        let openlist = OpenList::with_timeout(&self.url, self.timeout)?;
        self.auth.apply(&openlist).await?;
        Ok(openlist)
    }
}

/// Get an environment variable.
///
/// # Panics
///
/// If the environment variable isn't set or cannot be properly
/// parsed, this function panics.
#[track_caller]
pub fn env<T>(key: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: Debug,
{
    env_opt(key).unwrap_or_else(|| panic!("`{key}` was not set"))
}

/// Get an environment variable, or return `None` if it isn't set.
///
/// # Panics
///
/// If the environment variable exists but cannot be parsed, this
/// function panics.
#[track_caller]
pub fn env_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
    <T as FromStr>::Err: Debug,
{
    dotenv::var(key).ok().map(|s| {
        s.parse()
            .unwrap_or_else(|e| panic!("`{key}` was defined but could not be parsed: {e:?}"))
    })
}
