//! Graphviz `dot` invocation
//!
//! Pipes DOT text into the layout tool and collects the image (and
//! optionally the client-side image map) it writes next to each other.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use apiviz::DiagramError;

/// Environment variable overriding the `dot` binary
pub const DOT_ENV: &str = "APIVIZ_DOT";
const DEFAULT_DOT: &str = "dot";

/// Files produced for one diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFiles {
    pub png: PathBuf,
    pub map: Option<PathBuf>,
}

/// Runs the external layout tool
#[derive(Debug, Clone)]
pub struct DotRunner {
    binary: PathBuf,
    write_map: bool,
}

impl DotRunner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            write_map: true,
        }
    }

    /// `$APIVIZ_DOT` if set, plain `dot` from `PATH` otherwise
    pub fn from_env() -> Self {
        let binary = std::env::var_os(DOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOT));
        Self::new(binary)
    }

    /// Also emit a `cmapx` image map beside the PNG
    pub fn with_map(mut self, enabled: bool) -> Self {
        self.write_map = enabled;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Output files of diagram `name` under `output_dir`
    pub fn outputs(&self, output_dir: &Path, name: &str) -> RenderedFiles {
        let stem = output_dir.join(name);
        RenderedFiles {
            png: stem.with_extension("png"),
            map: self.write_map.then(|| stem.with_extension("map")),
        }
    }

    /// Lay out `dot` text as diagram `name` under `output_dir`
    ///
    /// Stale outputs are removed first so a failed run never leaves an old
    /// image behind. Everything the tool prints on stderr is forwarded as a
    /// warning.
    pub fn render(&self, dot: &str, output_dir: &Path, name: &str) -> Result<RenderedFiles> {
        let files = self.outputs(output_dir, name);
        if let Some(parent) = files.png.parent() {
            fs::create_dir_all(parent)?;
        }
        remove_stale(&files.png)?;
        if let Some(map) = &files.map {
            remove_stale(map)?;
        }

        let mut command = Command::new(&self.binary);
        if let Some(map) = &files.map {
            command.arg("-Tcmapx").arg("-o").arg(map);
        }
        command.arg("-Tpng").arg("-o").arg(&files.png);
        debug!(command = ?command, "Running layout tool");

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DiagramError::renderer_error(format!(
                    "failed to start {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        // Input is fed from its own thread while stderr is drained here, so a
        // chatty tool cannot stall on a full pipe.
        let stdin = child.stdin.take();
        let output = thread::scope(|scope| {
            if let Some(mut stdin) = stdin {
                scope.spawn(move || {
                    // The tool may exit early on bad input; its exit status says why.
                    if let Err(e) = stdin.write_all(dot.as_bytes()) {
                        warn!(diagram = name, error = %e, "Layout tool closed its input early");
                    }
                });
            }
            child.wait_with_output()
        })?;
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            if !line.trim().is_empty() {
                warn!(diagram = name, "{}", line);
            }
        }

        if !output.status.success() {
            let status = output.status.code().unwrap_or(-1);
            error!(diagram = name, status, "Layout tool exited with a non-zero status");
            return Err(DiagramError::RendererExit { status }.into());
        }

        info!(diagram = name, png = %files.png.display(), "Rendered diagram");
        Ok(files)
    }
}

impl Default for DotRunner {
    fn default() -> Self {
        Self::new(DEFAULT_DOT)
    }
}

fn remove_stale(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_paths() {
        let runner = DotRunner::default();
        let files = runner.outputs(Path::new("out"), "org/demo/package-summary");
        assert_eq!(files.png, Path::new("out/org/demo/package-summary.png"));
        assert_eq!(files.map, Some(PathBuf::from("out/org/demo/package-summary.map")));

        let files = runner.with_map(false).outputs(Path::new("out"), "overview-summary");
        assert!(files.map.is_none());
    }

    #[test]
    fn test_missing_binary_is_renderer_error() {
        let dir = tempdir().unwrap();
        let runner = DotRunner::new(dir.path().join("no-such-dot"));
        let err = runner.render("digraph {}", dir.path(), "x").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::RendererError { .. })
        ));
    }

    #[test]
    fn test_stale_outputs_removed() {
        let dir = tempdir().unwrap();
        let runner = DotRunner::new(dir.path().join("no-such-dot"));
        let files = runner.outputs(dir.path(), "a/B");
        fs::create_dir_all(files.png.parent().unwrap()).unwrap();
        fs::write(&files.png, b"old").unwrap();

        assert!(runner.render("digraph {}", dir.path(), "a/B").is_err());
        assert!(!files.png.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit() {
        let dir = tempdir().unwrap();
        let err = DotRunner::new("false")
            .render("digraph {}", dir.path(), "x")
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::RendererExit { status: 1 })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_large_input_with_noisy_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        // Fills stderr well past the pipe buffer before reading any input
        let script = dir.path().join("noisy-dot.sh");
        fs::write(
            &script,
            "#!/bin/sh\nyes 'Warning: node overlap' | head -n 20000 >&2\ncat > /dev/null\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let mut dot = String::from("digraph __G__ {\n");
        for i in 0..10_000 {
            dot.push_str(&format!("\"n{}\" [label=\"Node {}\"];\n", i, i));
        }
        dot.push_str("}\n");
        assert!(dot.len() > 128 * 1024);

        let files = DotRunner::new(script.clone())
            .render(&dot, dir.path(), "big")
            .unwrap();
        assert_eq!(files.png, dir.path().join("big.png"));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_exit() {
        let dir = tempdir().unwrap();
        let files = DotRunner::new("true")
            .render("digraph {}", dir.path(), "x")
            .unwrap();
        assert_eq!(files.png, dir.path().join("x.png"));
    }
}
