// src/config.rs

//! Startup configuration. There is no config file and no environment-variable
//! layer: everything is scanned by hand out of `std::env::args()`, mirroring
//! a minimal no-`clap` CLI surface.

/// Where this instance fits into replication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicaOf {
    /// Standalone primary; no upstream to sync from.
    None,
    /// Replicate from the given primary host/port.
    Primary { host: String, port: u16 },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub replicaof: ReplicaOf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            replicaof: ReplicaOf::None,
        }
    }
}

fn default_port() -> u16 {
    6379
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parses `--port <u16>` and `--replicaof "<host> <port>"` out of the
    /// given argument list (expected to already exclude `argv[0]`).
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--port" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| ConfigError("--port requires a value".to_string()))?;
                    config.port = value
                        .parse()
                        .map_err(|_| ConfigError(format!("invalid --port value '{value}'")))?;
                }
                "--replicaof" => {
                    let value = iter.next().ok_or_else(|| {
                        ConfigError("--replicaof requires a value".to_string())
                    })?;
                    config.replicaof = parse_replicaof(&value)?;
                }
                other => {
                    return Err(ConfigError(format!("unrecognized argument '{other}'")));
                }
            }
        }

        Ok(config)
    }
}

fn parse_replicaof(value: &str) -> Result<ReplicaOf, ConfigError> {
    let mut parts = value.split(' ');
    let host = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError(format!("malformed --replicaof value '{value}'")))?;
    let port_str = parts
        .next()
        .ok_or_else(|| ConfigError(format!("malformed --replicaof value '{value}'")))?;
    if parts.next().is_some() {
        return Err(ConfigError(format!("malformed --replicaof value '{value}'")));
    }
    let port: u16 = port_str
        .parse()
        .map_err(|_| ConfigError(format!("malformed --replicaof value '{value}'")))?;
    Ok(ReplicaOf::Primary {
        host: host.to_string(),
        port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_primary_on_default_port() {
        let config = Config::from_args(Vec::<String>::new()).unwrap();
        assert_eq!(config.port, 6379);
        assert_eq!(config.replicaof, ReplicaOf::None);
    }

    #[test]
    fn parses_port_and_replicaof() {
        let args = vec![
            "--port".to_string(),
            "7000".to_string(),
            "--replicaof".to_string(),
            "127.0.0.1 6379".to_string(),
        ];
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(
            config.replicaof,
            ReplicaOf::Primary {
                host: "127.0.0.1".to_string(),
                port: 6379,
            }
        );
    }

    #[test]
    fn rejects_malformed_replicaof() {
        assert!(Config::from_args(vec![
            "--replicaof".to_string(),
            "127.0.0.1:6379".to_string(),
        ])
        .is_err());
        assert!(Config::from_args(vec![
            "--replicaof".to_string(),
            "127.0.0.1 notaport".to_string(),
        ])
        .is_err());
    }
}
