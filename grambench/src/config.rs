//! Backend connection settings.

use std::fmt;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_MYGRAMDB_PORT: u16 = 11016;
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_MYSQL_USER: &str = "root";
pub const DEFAULT_MYSQL_DATABASE: &str = "test";

/// Where to reach the MygramDB text-search server.
#[derive(Debug, Clone)]
pub struct MygramConfig {
    pub host: String,
    pub port: u16,
}

impl Default for MygramConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_MYGRAMDB_PORT,
        }
    }
}

impl fmt::Display for MygramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Where and how to reach the MySQL server.
#[derive(Debug, Clone)]
pub struct MySqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_MYSQL_PORT,
            user: DEFAULT_MYSQL_USER.to_string(),
            password: String::new(),
            database: DEFAULT_MYSQL_DATABASE.to_string(),
        }
    }
}

impl fmt::Display for MySqlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
