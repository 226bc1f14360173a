//! Console output for the server binary

use crate::cli::args::VerbosityLevel;
use crate::core::resolver::ResolverOptions;
use crate::server::{RESOLVE_ROUTES, STREAM_ROUTES};
use std::net::SocketAddr;
use std::time::Duration;

/// Output formatter for quickdl
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self { verbosity }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("✅ {}", message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    /// Print the startup banner
    pub fn print_server_start(&self, addr: SocketAddr, options: &ResolverOptions) {
        let lines = banner_lines(addr, options, self.verbosity);
        if lines.is_empty() {
            return;
        }

        for line in lines {
            println!("{}", line);
        }
        println!();
    }

    /// Print the shutdown summary
    pub fn print_server_stop(&self, uptime: Duration) {
        self.success(&format!("Server stopped after {}", format_duration(uptime)));
    }
}

/// Banner text: nothing when quiet, upstreams listed when verbose
fn banner_lines(
    addr: SocketAddr,
    options: &ResolverOptions,
    verbosity: VerbosityLevel,
) -> Vec<String> {
    if verbosity == VerbosityLevel::Quiet {
        return Vec::new();
    }

    let mut lines = vec![
        format!("🚀 quickdl {} listening on http://{}", env!("CARGO_PKG_VERSION"), addr),
        format!("🔎 Resolve: {}?url=<link>", RESOLVE_ROUTES.join(", ")),
        format!(
            "📥 Stream:  {}?url=<media>&type=<mp3|mp4>&filename=<name>",
            STREAM_ROUTES.join(", ")
        ),
    ];

    if verbosity == VerbosityLevel::Verbose {
        lines.push(format!("🎵 TikTok endpoint: {}", options.tiktok_endpoint));
        for (index, mirror) in options.mirrors.iter().enumerate() {
            lines.push(format!("🪞 Mirror {}: {}", index + 1, mirror));
        }
        lines.push(format!(
            "⏱️  Timeouts: lookup {}, stream {}",
            format_duration(options.lookup_timeout),
            format_duration(options.stream_timeout)
        ));
    }

    lines
}

/// Format duration as human-readable string
fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    if total_seconds < 60 {
        format!("{}s", total_seconds)
    } else if total_seconds < 3600 {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        if seconds == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m {}s", minutes, seconds)
        }
    } else {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        if minutes == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "0.0.0.0:5000".parse().unwrap()
    }

    #[test]
    fn test_output_formatter_creation() {
        let formatter = OutputFormatter::new(VerbosityLevel::Normal);
        assert_eq!(formatter.verbosity, VerbosityLevel::Normal);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(format_duration(Duration::from_secs(3660)), "1h 1m");
    }

    #[test]
    fn test_banner_lists_routes() {
        let lines = banner_lines(addr(), &ResolverOptions::default(), VerbosityLevel::Normal);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("http://0.0.0.0:5000"));
        assert!(lines[1].contains("/resolve, /api/tiktok"));
        assert!(lines[2].contains("/stream, /api/force-download"));
    }

    #[test]
    fn test_verbose_banner_lists_upstreams() {
        let options = ResolverOptions::default();
        let lines = banner_lines(addr(), &options, VerbosityLevel::Verbose);

        assert_eq!(lines.len(), 3 + 1 + options.mirrors.len() + 1);
        assert!(lines.iter().any(|l| l.contains(&options.tiktok_endpoint)));
        assert!(lines.last().unwrap().contains("lookup 15s, stream 30s"));
    }

    #[test]
    fn test_quiet_banner_is_empty() {
        let lines = banner_lines(addr(), &ResolverOptions::default(), VerbosityLevel::Quiet);
        assert!(lines.is_empty());
    }
}
