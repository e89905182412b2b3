//! Build identification banner printed once before a run.

use std::io::Write;

use serde::Serialize;
use tracing::warn;

/// Rendered in place of a missing metadata field.
pub const PLACEHOLDER: &str = "<unknown>";

const SEPARATOR: &str = "----";

/// Static description of the build under test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildMetadata {
    /// Algorithm name, e.g. `HQC-128`.
    pub name: Option<String>,
    /// Problem-size parameter (`N`).
    pub size_parameter: Option<u64>,
    pub security_bits: Option<u32>,
}

/// Render the banner: separator, name, size parameter, security level,
/// separator, blank line.
#[must_use]
pub fn render_banner(metadata: &BuildMetadata) -> String {
    let name = metadata
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(PLACEHOLDER);
    let size = metadata
        .size_parameter
        .map_or_else(|| PLACEHOLDER.to_string(), |n| n.to_string());
    let security = metadata
        .security_bits
        .map_or_else(|| PLACEHOLDER.to_string(), |bits| bits.to_string());

    format!("{SEPARATOR}\n  {name}\n  N: {size}\n  Sec: {security} bits\n{SEPARATOR}\n\n")
}

/// Writes the banner to a stream. Write errors are logged, never returned.
pub struct DiagnosticsReporter<W: Write> {
    out: W,
}

impl DiagnosticsReporter<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl DiagnosticsReporter<std::io::Stderr> {
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> DiagnosticsReporter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn report(&mut self, metadata: &BuildMetadata) {
        let banner = render_banner(metadata);
        if let Err(err) = self
            .out
            .write_all(banner.as_bytes())
            .and_then(|()| self.out.flush())
        {
            warn!(error = %err, "failed to write diagnostics banner");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_layout() {
        let metadata = BuildMetadata {
            name: Some("HQC-128".into()),
            size_parameter: Some(17_669),
            security_bits: Some(128),
        };
        assert_eq!(
            render_banner(&metadata),
            "----\n  HQC-128\n  N: 17669\n  Sec: 128 bits\n----\n\n"
        );
    }

    #[test]
    fn test_missing_fields_render_placeholder() {
        let banner = render_banner(&BuildMetadata::default());
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines[0], "----");
        assert_eq!(lines[1], "  <unknown>");
        assert_eq!(lines[2], "  N: <unknown>");
        assert_eq!(lines[3], "  Sec: <unknown> bits");
        assert_eq!(lines[4], "----");
    }

    #[test]
    fn test_blank_name_renders_placeholder() {
        let metadata = BuildMetadata {
            name: Some("   ".into()),
            ..BuildMetadata::default()
        };
        assert!(render_banner(&metadata).contains("  <unknown>\n"));
    }

    #[test]
    fn test_reporter_writes_to_stream() {
        let mut reporter = DiagnosticsReporter::new(Vec::new());
        reporter.report(&BuildMetadata {
            name: Some("HQC-256".into()),
            size_parameter: Some(57_637),
            security_bits: Some(256),
        });
        let written = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(written.starts_with("----\n  HQC-256\n"));
        assert!(written.contains("Sec: 256 bits"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_does_not_propagate() {
        let mut reporter = DiagnosticsReporter::new(BrokenPipe);
        reporter.report(&BuildMetadata::default());
    }
}
