//! Command line argument parsing

use crate::core::resolver::ResolverOptions;
use crate::platform::client::DEFAULT_USER_AGENT;
use crate::platform::cobalt::DEFAULT_MIRRORS;
use crate::platform::tikwm::TIKWM_ENDPOINT;
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// quickdl - resolve social-media links and stream them as downloads
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to listen on
    #[arg(long, value_name = "ADDR", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Timeout for each provider lookup (e.g., 15s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "15s")]
    pub lookup_timeout: humantime::Duration,

    /// Timeout for the media host to answer a stream request
    #[arg(long, value_name = "DURATION", default_value = "30s")]
    pub stream_timeout: humantime::Duration,

    /// Cobalt mirror base URL, tried in the given order (repeatable)
    #[arg(long = "mirror", value_name = "URL")]
    pub mirrors: Vec<String>,

    /// TikWM lookup endpoint
    #[arg(long, value_name = "URL", default_value = TIKWM_ENDPOINT)]
    pub tiktok_endpoint: String,

    /// Override User-Agent header for upstream requests
    #[arg(long, value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Prefix for generated download filenames
    #[arg(long, value_name = "PREFIX", default_value = "quickdl")]
    pub filename_prefix: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Socket address the server binds to
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Get lookup timeout as Duration
    pub fn lookup_timeout_duration(&self) -> Duration {
        self.lookup_timeout.into()
    }

    /// Get stream timeout as Duration
    pub fn stream_timeout_duration(&self) -> Duration {
        self.stream_timeout.into()
    }

    /// Mirrors to use, falling back to the built-in list
    pub fn mirror_list(&self) -> Vec<String> {
        if self.mirrors.is_empty() {
            DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect()
        } else {
            self.mirrors.clone()
        }
    }

    /// Build the immutable service configuration
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions::default()
            .with_tiktok_endpoint(self.tiktok_endpoint.clone())
            .with_mirrors(self.mirror_list())
            .with_lookup_timeout(self.lookup_timeout_duration())
            .with_stream_timeout(self.stream_timeout_duration())
            .with_user_agent(
                self.user_agent
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            )
            .with_filename_prefix(self.filename_prefix.clone())
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

impl VerbosityLevel {
    /// Default tracing filter when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "warn",
            VerbosityLevel::Normal => "info",
            VerbosityLevel::Verbose => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("quickdl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_args_defaults() {
        let args = parse(&[]);

        assert_eq!(args.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(args.lookup_timeout_duration(), Duration::from_secs(15));
        assert_eq!(args.stream_timeout_duration(), Duration::from_secs(30));
        assert!(args.mirrors.is_empty());
        assert_eq!(args.tiktok_endpoint, TIKWM_ENDPOINT);
        assert_eq!(args.user_agent, None);
        assert_eq!(args.filename_prefix, "quickdl");
        assert_eq!(args.verbosity_level(), VerbosityLevel::Normal);
    }

    #[test]
    fn test_args_custom_values() {
        let args = parse(&[
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--lookup-timeout",
            "5s",
            "--stream-timeout",
            "1m",
            "--mirror",
            "https://one.example",
            "--mirror",
            "https://two.example",
            "--tiktok-endpoint",
            "http://localhost:9000/api/",
            "--user-agent",
            "Custom Agent",
            "--filename-prefix",
            "clip",
            "--verbose",
        ]);

        assert_eq!(args.listen_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(args.verbosity_level(), VerbosityLevel::Verbose);

        let options = args.resolver_options();
        assert_eq!(options.lookup_timeout, Duration::from_secs(5));
        assert_eq!(options.stream_timeout, Duration::from_secs(60));
        assert_eq!(
            options.mirrors,
            vec!["https://one.example".to_string(), "https://two.example".to_string()]
        );
        assert_eq!(options.tiktok_endpoint, "http://localhost:9000/api/");
        assert_eq!(options.user_agent, "Custom Agent");
        assert_eq!(options.filename_prefix, "clip");
    }

    #[test]
    fn test_resolver_options_default_mirrors() {
        let options = parse(&[]).resolver_options();

        assert_eq!(options.mirrors.len(), DEFAULT_MIRRORS.len());
        assert_eq!(options.mirrors[0], DEFAULT_MIRRORS[0]);
        assert_eq!(options.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["-q"]).verbosity_level(), VerbosityLevel::Quiet);
        assert_eq!(VerbosityLevel::Quiet.log_filter(), "warn");
        assert_eq!(VerbosityLevel::Normal.log_filter(), "info");
        assert_eq!(VerbosityLevel::Verbose.log_filter(), "debug");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["quickdl", "--quiet", "--verbose"]).is_err());
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        assert!(Args::try_parse_from(["quickdl", "--lookup-timeout", "soon"]).is_err());
    }
}
