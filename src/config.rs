//! Command-line configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::error::{TelemetryError, TelemetryResult};
use crate::producer::DEFAULT_TICK_INTERVAL;

/// Port used when none is given on the command line
pub const DEFAULT_PORT: u16 = 9007;

/// Per-connection outbound queue depth when none is configured
pub const DEFAULT_OUTBOUND_BUFFER: usize = 16;

/// Upper bound on simulated users; ids must fit the snapshot's `u32`
pub const MAX_SIMULATED_USERS: usize = 64;

/// Real-time telemetry fan-out server
#[derive(Parser, Clone, Debug)]
#[command(name = "telemetry-server", version, about = "Broadcast tracker telemetry over WebSocket")]
pub struct Cli {
    /// Port to listen on
    #[arg(value_parser = parse_port, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Milliseconds between snapshots
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL.as_millis() as u64)]
    pub tick_interval_ms: u64,

    /// Number of simulated tracked users (at most 64)
    #[arg(long, default_value_t = 2)]
    pub max_users: usize,

    /// Snapshots queued per subscriber before later ones are dropped
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_BUFFER)]
    pub outbound_buffer: usize,

    /// Emit structured JSON logs
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Validate the parsed arguments
    pub fn into_config(self) -> TelemetryResult<ServerConfig> {
        if self.tick_interval_ms == 0 {
            return Err(TelemetryError::Config(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        if self.max_users > MAX_SIMULATED_USERS {
            return Err(TelemetryError::Config(format!(
                "max users must be at most {}, got {}",
                MAX_SIMULATED_USERS, self.max_users
            )));
        }
        if self.outbound_buffer == 0 {
            return Err(TelemetryError::Config(
                "outbound buffer must hold at least one snapshot".to_string(),
            ));
        }

        Ok(ServerConfig {
            host: self.host,
            port: self.port,
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            max_users: self.max_users,
            outbound_buffer: self.outbound_buffer,
        })
    }
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub tick_interval: Duration,
    pub max_users: usize,
    pub outbound_buffer: usize,
}

impl ServerConfig {
    /// Address the listener binds to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            tick_interval: DEFAULT_TICK_INTERVAL,
            max_users: 2,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

/// Parse a listening port; zero and non-numeric input are rejected
pub fn parse_port(input: &str) -> Result<u16, TelemetryError> {
    match input.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(TelemetryError::Config(format!(
            "Unable to parse port input {}",
            input
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_accepts_valid() {
        assert_eq!(parse_port("9007").unwrap(), 9007);
        assert_eq!(parse_port("65535").unwrap(), 65535);
    }

    #[test]
    fn test_parse_port_rejects_zero_and_garbage() {
        for input in ["0", "abc", "", "70000", "-1"] {
            let err = parse_port(input).unwrap_err();
            assert!(err.to_string().contains("Unable to parse port input"));
        }
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["telemetry-server"]).unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().port(), 9007);
    }

    #[test]
    fn test_cli_positional_port() {
        let cli = Cli::try_parse_from(["telemetry-server", "8080", "--tick-interval-ms", "20"])
            .unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.tick_interval, Duration::from_millis(20));
    }

    #[test]
    fn test_cli_rejects_zero_port() {
        assert!(Cli::try_parse_from(["telemetry-server", "0"]).is_err());
        assert!(Cli::try_parse_from(["telemetry-server", "port"]).is_err());
    }

    #[test]
    fn test_zero_interval_is_config_error() {
        let cli = Cli::try_parse_from(["telemetry-server", "--tick-interval-ms", "0"]).unwrap();
        assert!(matches!(cli.into_config(), Err(TelemetryError::Config(_))));
    }

    #[test]
    fn test_max_users_is_bounded() {
        let cli = Cli::try_parse_from(["telemetry-server", "--max-users", "64"]).unwrap();
        assert_eq!(cli.into_config().unwrap().max_users, MAX_SIMULATED_USERS);

        let huge = usize::MAX.to_string();
        for input in ["65", huge.as_str()] {
            let cli = Cli::try_parse_from(["telemetry-server", "--max-users", input]).unwrap();
            let err = cli.into_config().unwrap_err();
            assert!(matches!(err, TelemetryError::Config(ref msg) if msg.contains("max users")));
        }
    }
}
