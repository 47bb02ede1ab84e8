//! Recognized keys of the `basic` section.

pub const HOST: &str = "host";
pub const GRPC_PORT: &str = "grpc_port";
pub const HTTP_PORT: &str = "http_port";
pub const HTTP_READ_TIMEOUT: &str = "http_read_timeout";
pub const HTTP_WRITE_TIMEOUT: &str = "http_write_timeout";
pub const HTTP_ADMIN_PORT: &str = "http_admin_port";
pub const HTTP_ADMIN_READ_TIMEOUT: &str = "http_admin_read_timeout";
pub const HTTP_ADMIN_WRITE_TIMEOUT: &str = "http_admin_write_timeout";
pub const LOG_LEVEL: &str = "log_level";
pub const IS_LOCAL_ENVIRONMENT: &str = "is_local_environment";

/// Advanced key holding the bearer token for the admin listener.
pub const ADMIN_API_KEY: &str = "admin_api_key";
