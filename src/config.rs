/*
 * This file is a part of respd
 *
 * respd is a free and open-source RESP-compatible in-memory key-value
 * server.
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! Configuration is layered, highest priority first: CLI flag, environment
//! variable, an optional YAML file, then the compiled default. Each layer is
//! optional; the first one present for a given field wins.

use crate::error::{RespdError, RespdResult};
use clap::Parser;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
const DEFAULT_PORT: u16 = 6000;
const DEFAULT_SEGMENTS: u16 = 16;
const DEFAULT_MAX_CONNECTIONS: usize = 50_000;

#[derive(Parser, Debug, Default)]
#[command(name = "respd", about = "A minimal RESP-speaking in-memory key-value server")]
struct Cli {
    #[arg(long)]
    host: Option<IpAddr>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    segments: Option<u16>,
    #[arg(long)]
    max_connections: Option<usize>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    host: Option<IpAddr>,
    port: Option<u16>,
    segments: Option<u16>,
    max_connections: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Number of independently-locked store segments; must be a power of two
    pub segments: u16,
    pub max_connections: usize,
}

impl Config {
    pub fn load() -> RespdResult<Self> {
        let cli = Cli::parse();
        Self::from_cli(cli)
    }

    fn from_cli(cli: Cli) -> RespdResult<Self> {
        let file = match &cli.config {
            Some(path) => Some(Self::read_file(path)?),
            None => None,
        };

        let host = cli
            .host
            .or_else(|| env_parsed("RESPD_HOST"))
            .or_else(|| file.as_ref().and_then(|f| f.host))
            .unwrap_or(DEFAULT_HOST);
        let port = cli
            .port
            .or_else(|| env_parsed("RESPD_PORT"))
            .or_else(|| file.as_ref().and_then(|f| f.port))
            .unwrap_or(DEFAULT_PORT);
        let segments = cli
            .segments
            .or_else(|| env_parsed("RESPD_SEGMENTS"))
            .or_else(|| file.as_ref().and_then(|f| f.segments))
            .unwrap_or(DEFAULT_SEGMENTS);
        let max_connections = cli
            .max_connections
            .or_else(|| env_parsed("RESPD_MAX_CONNECTIONS"))
            .or_else(|| file.as_ref().and_then(|f| f.max_connections))
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let config = Self { host, port, segments, max_connections };
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &PathBuf) -> RespdResult<FileConfig> {
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents)
            .map_err(|e| RespdError::invalid_params(format!("invalid config file: {e}")))
    }

    fn validate(&self) -> RespdResult<()> {
        if !self.segments.is_power_of_two() {
            return Err(RespdError::invalid_params(format!(
                "segments must be a power of two, got {}",
                self.segments
            )));
        }
        Ok(())
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
