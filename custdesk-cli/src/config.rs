//! Database connection configuration
//!
//! Resolved in order: command-line flags, environment variables, `.env`
//! (loaded at startup, never overriding the real environment), defaults.

use std::fmt;
use std::path::PathBuf;

use clap::Args;
use sqlx::mysql::{MySqlConnectOptions, MySqlSslMode};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_DATABASE: &str = "customers";
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// Connection flags shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// MySQL host
    #[arg(long = "db-host", env = "MYSQL_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// MySQL port
    #[arg(long = "db-port", env = "MYSQL_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// MySQL user
    #[arg(long = "db-user", env = "MYSQL_USER", default_value = DEFAULT_USER)]
    pub user: String,

    /// MySQL password
    #[arg(long = "db-password", env = "MYSQL_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Database name
    #[arg(long = "db-name", env = "MYSQL_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// CA certificate used to verify the server (enables TLS)
    #[arg(long = "ssl-ca", env = "SSL_CA")]
    pub ssl_ca: Option<PathBuf>,

    /// Maximum pooled connections
    #[arg(long = "pool-size", env = "MYSQL_POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: u32,
}

/// Resolved connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_ca: Option<PathBuf>,
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            ssl_ca: None,
            max_connections: DEFAULT_POOL_SIZE,
        }
    }
}

impl From<DbArgs> for DbConfig {
    fn from(args: DbArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            user: args.user,
            password: args.password,
            database: args.database,
            ssl_ca: args.ssl_ca,
            max_connections: args.pool_size,
        }
    }
}

impl DbConfig {
    /// Driver options; a CA path switches TLS to `VerifyCa`.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database);

        match &self.ssl_ca {
            Some(ca) => options.ssl_mode(MySqlSslMode::VerifyCa).ssl_ca(ca),
            None => options,
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("ssl_ca", &self.ssl_ca)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}
