//! Client configuration
//!
//! Every backend coordinate can be overridden from the environment:
//!
//! | Variable               | Default                              |
//! |------------------------|--------------------------------------|
//! | `APPWRITE_ENDPOINT`    | `https://nyc.cloud.appwrite.io/v1`   |
//! | `APPWRITE_PROJECT_ID`  | `68f8eca00020d0b00702`               |
//! | `APPWRITE_PLATFORM`    | `edu.fhu.fhu-social-club`            |
//! | `APPWRITE_DATABASE_ID` | `6908d1cd0021a16d1690`               |
//! | `MEMBERS_TABLE_ID`     | `members`                            |
//! | `EVENTS_TABLE_ID`      | `events`                             |
//! | `REQUEST_TIMEOUT_SECS` | `30`                                 |
//! | `SESSION_FILE`         | unset (session kept in memory only)  |

use std::path::PathBuf;

pub const DEFAULT_ENDPOINT: &str = "https://nyc.cloud.appwrite.io/v1";
pub const DEFAULT_PROJECT_ID: &str = "68f8eca00020d0b00702";
pub const DEFAULT_PLATFORM: &str = "edu.fhu.fhu-social-club";
pub const DEFAULT_DATABASE_ID: &str = "6908d1cd0021a16d1690";
pub const DEFAULT_MEMBERS_TABLE: &str = "members";
pub const DEFAULT_EVENTS_TABLE: &str = "events";

/// Backend coordinates and transport settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API endpoint including the version prefix
    pub endpoint: String,

    /// Project the account and tables belong to
    pub project_id: String,

    /// Registered platform identifier (bundle id) sent as the request origin
    pub platform: String,

    /// Database holding the tables
    pub database_id: String,

    pub members_table_id: String,

    pub events_table_id: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// File the session cookie is persisted to between runs
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a configuration for the given endpoint with default ids
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            project_id: DEFAULT_PROJECT_ID.into(),
            platform: DEFAULT_PLATFORM.into(),
            database_id: DEFAULT_DATABASE_ID.into(),
            members_table_id: DEFAULT_MEMBERS_TABLE.into(),
            events_table_id: DEFAULT_EVENTS_TABLE.into(),
            timeout: 30,
            session_file: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to the defaults above.
    pub fn from_env() -> Self {
        let env_or =
            |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());

        Self {
            endpoint: env_or("APPWRITE_ENDPOINT", DEFAULT_ENDPOINT),
            project_id: env_or("APPWRITE_PROJECT_ID", DEFAULT_PROJECT_ID),
            platform: env_or("APPWRITE_PLATFORM", DEFAULT_PLATFORM),
            database_id: env_or("APPWRITE_DATABASE_ID", DEFAULT_DATABASE_ID),
            members_table_id: env_or("MEMBERS_TABLE_ID", DEFAULT_MEMBERS_TABLE),
            events_table_id: env_or("EVENTS_TABLE_ID", DEFAULT_EVENTS_TABLE),
            timeout: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),
            session_file: std::env::var("SESSION_FILE").ok().map(PathBuf::from),
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_database(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Set the member and event table ids
    pub fn with_tables(mut self, members: impl Into<String>, events: impl Into<String>) -> Self {
        self.members_table_id = members.into();
        self.events_table_id = events.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Persist the session cookie to this file
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Endpoint without a trailing slash
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}
