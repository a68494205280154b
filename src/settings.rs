// SPDX-License-Identifier: MIT OR Apache-2.0

//! The migration tool's configuration and its option table.
//!
//! [`register_options`] binds every field of a [`Configuration`] to a named
//! option, so the resolver can fill the struct from the command line, the
//! environment and the properties document.

use crate::domain::kv::{parse_kv, parse_string_slice};
use crate::domain::{Kv, OptionRegistry};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Default PostgreSQL port.
pub const DEFAULT_POSTGRES_PORT: u16 = 25060;

/// Default ClickHouse native protocol port.
pub const DEFAULT_CLICKHOUSE_PORT: u16 = 9000;

/// Default size of the idle and open connection pools.
pub const DEFAULT_POOL_SIZE: u32 = 32;

/// Default connection lifetime, in seconds.
pub const DEFAULT_CONN_MAX_LIFETIME: u64 = 30;

/// Default number of rows copied per batch.
pub const DEFAULT_BATCH_SIZE: u64 = 1_000_000;

const DEFAULT_POSTGRES_PARAMS: &str = "sslmode=require";
const DEFAULT_CLICKHOUSE_PARAMS: &str = "dial_timeout=10s;read_timeout=20s";
const DEFAULT_TABLES: &str = "jobs,audits";

/// Everything but RFC 3986 unreserved characters is escaped in URL userinfo.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const REDACTED: &str = "[redacted]";

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        REDACTED
    }
}

/// Source database connection settings.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PostgresSettings {
    /// Driver name
    pub driver: String,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Login user
    pub user: String,
    /// Login password
    #[serde(skip_serializing)]
    pub password: String,
    /// Database name
    pub db: String,
    /// Verbose SQL tracing
    pub debug: bool,
    /// Maximum idle connections in the pool
    pub conn_max_idle: u32,
    /// Maximum open connections
    pub conn_max_open: u32,
    /// Maximum connection reuse time, in seconds
    pub conn_max_lifetime: u64,
    /// Extra connection parameters
    pub params: Kv,
}

impl PostgresSettings {
    /// Keyword/value connection string, extra parameters last.
    ///
    /// ```
    /// use flagcfg::settings::PostgresSettings;
    ///
    /// let mut settings = PostgresSettings::default();
    /// settings.host = "db1".to_string();
    /// settings.user = "app".to_string();
    /// settings.db = "workspace".to_string();
    /// assert_eq!(
    ///     settings.dsn(),
    ///     "host=db1 port=25060 user=app password= dbname=workspace sslmode=require"
    /// );
    /// ```
    pub fn dsn(&self) -> String {
        let mut dsn = format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.db
        );
        for (key, value) in &self.params {
            dsn.push_str(&format!(" {}={}", key, value));
        }
        dsn
    }

    /// Maximum connection reuse time.
    pub fn conn_max_lifetime(&self) -> Duration {
        Duration::from_secs(self.conn_max_lifetime)
    }
}

impl fmt::Debug for PostgresSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSettings")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &redact(&self.password))
            .field("db", &self.db)
            .field("debug", &self.debug)
            .field("conn_max_idle", &self.conn_max_idle)
            .field("conn_max_open", &self.conn_max_open)
            .field("conn_max_lifetime", &self.conn_max_lifetime)
            .field("params", &self.params)
            .finish()
    }
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            driver: "postgres".to_string(),
            host: String::new(),
            port: DEFAULT_POSTGRES_PORT,
            user: String::new(),
            password: String::new(),
            db: String::new(),
            debug: false,
            conn_max_idle: DEFAULT_POOL_SIZE,
            conn_max_open: DEFAULT_POOL_SIZE,
            conn_max_lifetime: DEFAULT_CONN_MAX_LIFETIME,
            params: parse_kv(DEFAULT_POSTGRES_PARAMS),
        }
    }
}

/// Target ClickHouse connection settings.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ClickHouseSettings {
    /// Server address
    pub ip: String,
    /// Server port
    pub port: u16,
    /// Login user
    pub username: String,
    /// Login password
    #[serde(skip_serializing)]
    pub password: String,
    /// Database name
    pub name: String,
    /// Query parameters appended to the DSN
    pub params: Kv,
}

impl ClickHouseSettings {
    /// `clickhouse://` URL with the extra parameters as the query string.
    ///
    /// The user name and password are percent-encoded.
    pub fn dsn(&self) -> String {
        let mut dsn = format!(
            "clickhouse://{}:{}@{}:{}/{}",
            utf8_percent_encode(&self.username, USERINFO),
            utf8_percent_encode(&self.password, USERINFO),
            self.ip,
            self.port,
            self.name
        );
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        if !query.is_empty() {
            dsn.push('?');
            dsn.push_str(&query.join("&"));
        }
        dsn
    }
}

impl fmt::Debug for ClickHouseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickHouseSettings")
            .field("ip", &self.ip)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

impl Default for ClickHouseSettings {
    fn default() -> Self {
        Self {
            ip: String::new(),
            port: DEFAULT_CLICKHOUSE_PORT,
            username: String::new(),
            password: String::new(),
            name: String::new(),
            params: parse_kv(DEFAULT_CLICKHOUSE_PARAMS),
        }
    }
}

/// What to migrate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MigrateSettings {
    /// Tables to copy, in order
    pub tables: Vec<String>,
    /// Rows per batch
    pub batch_size: u64,
}

impl Default for MigrateSettings {
    fn default() -> Self {
        Self {
            tables: parse_string_slice(DEFAULT_TABLES),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// The fully resolved configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Configuration {
    /// Source database
    pub postgres: PostgresSettings,
    /// Target database
    pub clickhouse: ClickHouseSettings,
    /// Migration job
    pub migrate: MigrateSettings,
}

/// Registers every option of `cfg` with `registry`, writing the defaults
/// into the struct.
pub fn register_options<'a>(cfg: &'a mut Configuration, registry: &mut OptionRegistry<'a>) {
    let defaults = Configuration::default();
    let Configuration {
        postgres,
        clickhouse,
        migrate,
    } = cfg;

    registry
        .string_var(
            &mut postgres.driver,
            "postgres.driver",
            defaults.postgres.driver,
            "Database driver to be used",
        )
        .string_var(&mut postgres.host, "postgres.host", "", "Database host")
        .scalar_var(
            &mut postgres.port,
            "postgres.port",
            defaults.postgres.port,
            "Database port",
        )
        .string_var(&mut postgres.user, "postgres.user", "", "Database username")
        .string_var(
            &mut postgres.password,
            "postgres.password",
            "",
            "Database password",
        )
        .string_var(&mut postgres.db, "postgres.db", "", "Database name")
        .bool_var(
            &mut postgres.debug,
            "postgres.debug",
            defaults.postgres.debug,
            "Database debug verbose mode",
        )
        .scalar_var(
            &mut postgres.conn_max_idle,
            "postgres.connmaxidle",
            defaults.postgres.conn_max_idle,
            "Maximum number of connections in the idle connection pool",
        )
        .scalar_var(
            &mut postgres.conn_max_open,
            "postgres.connmaxopen",
            defaults.postgres.conn_max_open,
            "Maximum number of open connections to the database",
        )
        .scalar_var(
            &mut postgres.conn_max_lifetime,
            "postgres.connmaxlifetime",
            defaults.postgres.conn_max_lifetime,
            "Maximum amount of time in seconds a connection may be reused",
        )
        .kv_var(
            &mut postgres.params,
            "postgres.params",
            defaults.postgres.params,
            "Extra connection parameters (k1=v1;k2=v2)",
        )
        .string_var(&mut clickhouse.ip, "clickhouse.ip", "", "ClickHouse server ip addr")
        .scalar_var(
            &mut clickhouse.port,
            "clickhouse.port",
            defaults.clickhouse.port,
            "ClickHouse server port",
        )
        .string_var(
            &mut clickhouse.username,
            "clickhouse.username",
            "",
            "ClickHouse username",
        )
        .string_var(
            &mut clickhouse.password,
            "clickhouse.password",
            "",
            "ClickHouse password",
        )
        .string_var(&mut clickhouse.name, "clickhouse.name", "", "ClickHouse database name")
        .kv_var(
            &mut clickhouse.params,
            "clickhouse.params",
            defaults.clickhouse.params,
            "ClickHouse DSN query parameters (k1=v1;k2=v2)",
        )
        .string_slice_var(
            &mut migrate.tables,
            "migrate.tables",
            defaults.migrate.tables,
            "Tables to migrate, comma separated",
        )
        .scalar_var(
            &mut migrate.batch_size,
            "migrate.batchsize",
            defaults.migrate.batch_size,
            "Rows copied per batch",
        );
}
