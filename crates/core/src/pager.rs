//! Showing help through a pager.

use std::io::Write;
use std::process::{Child, Command, Stdio};

use log::{info, warn};

use crate::config;
use crate::error::{Error, RenderResult};
use crate::probe::EnvironmentProbe;

/// How a help page in `pager` format gets shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerPlan {
    /// Plain text written straight to the output stream.
    Direct,
    /// Plain text piped into a pager.
    Plain { pager: Vec<String> },
    /// Roff source piped through a formatter, then into a pager.
    Groff {
        formatter: Vec<String>,
        pager: Vec<String>,
    },
}

/// Decides how to page help in the given environment.
///
/// Paging requires a terminal on standard output that is not `TERM=dumb`,
/// and a pager; the formatted manual page further requires a roff
/// formatter.
pub fn plan(probe: &dyn EnvironmentProbe) -> PagerPlan {
    if !probe.stdout_is_terminal() || probe.var("TERM").as_deref() == Some("dumb") {
        return PagerPlan::Direct;
    }

    match (
        config::get_pager_command(probe),
        config::get_formatter_command(probe),
    ) {
        (None, _) => PagerPlan::Direct,
        (Some(pager), None) => PagerPlan::Plain { pager },
        (Some(pager), Some(formatter)) => PagerPlan::Groff { formatter, pager },
    }
}

fn spawn(stage: &[String], stdin: Stdio, stdout: Stdio) -> RenderResult<Child> {
    let Some((program, args)) = stage.split_first() else {
        return Err(Error::spawn_error(
            String::new(),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        ));
    };

    Command::new(program)
        .args(args)
        .stdin(stdin)
        .stdout(stdout)
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| Error::spawn_error(program.clone(), e))
}

/// Stops and waits on stages already started when the pipeline is abandoned.
fn reap(children: &mut [Child]) {
    for child in children {
        // Fails only when the stage has already exited.
        let _ = child.kill();
        if let Err(e) = child.wait() {
            warn!("Could not wait on pager stage {}: {e}", child.id());
        }
    }
}

/// Pipes `input` through `stages`, the last one writing to the terminal.
///
/// # Errors
///
/// Returns an error if a stage cannot be spawned or the last stage exits
/// with a non-success code.
pub fn pipe_through(stages: &[&[String]], input: &str) -> RenderResult<()> {
    let mut children: Vec<Child> = Vec::new();

    for (index, stage) in stages.iter().enumerate() {
        let stdin = match children.last_mut().and_then(|child| child.stdout.take()) {
            Some(previous) => Stdio::from(previous),
            None => Stdio::piped(),
        };
        let stdout = if index + 1 == stages.len() {
            Stdio::inherit()
        } else {
            Stdio::piped()
        };
        match spawn(stage, stdin, stdout) {
            Ok(child) => children.push(child),
            Err(e) => {
                reap(&mut children);
                return Err(e);
            }
        }
    }

    if let Some(mut writer) = children.first_mut().and_then(|child| child.stdin.take()) {
        info!("Writing {} bytes of help through {} stage(s)", input.len(), stages.len());
        // A pager quit early closes the pipe; that is not an error.
        if let Err(e) = writer.write_all(input.as_bytes()) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                reap(&mut children);
                return Err(e.into());
            }
        }
    }

    let mut last_success = true;
    for child in &mut children {
        last_success = child.wait()?.success();
    }

    if last_success {
        Ok(())
    } else {
        let program = stages.last().and_then(|stage| stage.first()).cloned().unwrap_or_default();
        Err(Error::PagerExit(program))
    }
}

/// Pages `input`, writing `fallback` to `out` if the pager cannot run.
///
/// # Errors
///
/// Returns an error only when writing the fallback fails.
pub fn page_or_write(
    stages: &[&[String]],
    input: &str,
    fallback: &str,
    out: &mut dyn Write,
) -> RenderResult<()> {
    match pipe_through(stages, input) {
        Ok(()) => Ok(()),
        Err(Error::PagerExit(program)) => {
            warn!("Pager `{program}` exited with a non-success code");
            Ok(())
        }
        Err(e) => {
            warn!("Could not page help, writing it directly: {e}");
            out.write_all(fallback.as_bytes())?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::StaticProbe;

    fn installed() -> StaticProbe {
        StaticProbe::default()
            .terminal(true)
            .executable("less", "/usr/bin/less")
            .executable("groff", "/usr/bin/groff")
    }

    #[test]
    fn test_no_terminal_means_direct() {
        assert_eq!(plan(&installed().terminal(false)), PagerPlan::Direct);
    }

    #[test]
    fn test_dumb_terminal_means_direct() {
        assert_eq!(plan(&installed().var("TERM", "dumb")), PagerPlan::Direct);
    }

    #[test]
    fn test_no_pager_means_direct() {
        let probe = StaticProbe::default()
            .terminal(true)
            .executable("groff", "/usr/bin/groff");
        assert_eq!(plan(&probe), PagerPlan::Direct);
    }

    #[test]
    fn test_pager_without_formatter_pages_plain_text() {
        let probe = StaticProbe::default()
            .terminal(true)
            .executable("less", "/usr/bin/less");
        assert_eq!(
            plan(&probe),
            PagerPlan::Plain {
                pager: vec!["/usr/bin/less".to_string()]
            }
        );
    }

    #[test]
    fn test_pager_and_formatter_page_groff() {
        match plan(&installed()) {
            PagerPlan::Groff { formatter, pager } => {
                assert_eq!(formatter[0], "/usr/bin/groff");
                assert_eq!(pager, vec!["/usr/bin/less".to_string()]);
            }
            other => panic!("Expected a groff plan, got {other:?}"),
        }
    }

    #[test]
    fn test_unspawnable_pager_falls_back_to_output() {
        let pager = vec!["/nonexistent/cmdterm-pager".to_string()];
        let mut out = Vec::new();
        page_or_write(&[pager.as_slice()], "groff", "plain text", &mut out).unwrap();
        assert_eq!(out, b"plain text");
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_stage_stops_earlier_stages() {
        let sleeper = vec!["sleep".to_string(), "30".to_string()];
        let missing = vec!["/nonexistent/cmdterm-pager".to_string()];
        let result = pipe_through(&[sleeper.as_slice(), missing.as_slice()], "text");
        assert!(matches!(result, Err(Error::Spawn { .. })));

        let mut children = vec![spawn(&sleeper, Stdio::null(), Stdio::null()).unwrap()];
        reap(&mut children);
        assert!(children[0].try_wait().unwrap().is_some());
    }
}
