use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production. `DATABASE_URL` is read directly
/// in `main` and has no default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Directory uploaded job files are staged in (default: `./uploads`).
    pub upload_dir: PathBuf,
    /// Redis URL for the progress cache (default: `redis://127.0.0.1:6379`).
    pub redis_url: String,
    /// Number of line-processing workers (default: `4`).
    pub workers: usize,
    /// Capacity of the bounded task queue (default: `256`). A full queue
    /// backpressures the dispatcher rather than dropping units.
    pub queue_depth: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var       | Default                   |
    /// |---------------|---------------------------|
    /// | `HOST`        | `0.0.0.0`                 |
    /// | `PORT`        | `3000`                    |
    /// | `UPLOAD_DIR`  | `./uploads`               |
    /// | `REDIS_URL`   | `redis://127.0.0.1:6379`  |
    /// | `WORKERS`     | `4`                       |
    /// | `QUEUE_DEPTH` | `256`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let upload_dir = PathBuf::from(
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into()),
        );

        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());

        let workers: usize = std::env::var("WORKERS")
            .unwrap_or_else(|_| "4".into())
            .parse()
            .expect("WORKERS must be a valid usize");

        let queue_depth: usize = std::env::var("QUEUE_DEPTH")
            .unwrap_or_else(|_| "256".into())
            .parse()
            .expect("QUEUE_DEPTH must be a valid usize");

        Self {
            host,
            port,
            upload_dir,
            redis_url,
            workers,
            queue_depth,
        }
    }
}
