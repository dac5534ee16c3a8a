//! Runtime adapter backed by the podman/docker command line.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use tracing::{debug, info, warn};

use super::{ContainerRuntime, ContainerStatus, RuntimeKind, StartRequest};
use crate::error::{Error, Result};
use crate::source;

/// Drives a container runtime by spawning its binary.
#[derive(Debug, Clone)]
pub struct CliRuntime {
    kind: RuntimeKind,
    program: PathBuf,
}

impl CliRuntime {
    /// Resolve the runtime's binary through `PATH`.
    pub fn new(kind: RuntimeKind) -> Self {
        Self::with_program(kind, kind.binary())
    }

    /// Speak `kind`'s command line through the executable at `program`.
    pub fn with_program(kind: RuntimeKind, program: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            program: program.into(),
        }
    }

    fn command(&self) -> Command {
        Command::new(&self.program)
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        Error::Spawn {
            program: self.kind.binary().to_string(),
            source,
        }
    }

    fn run_status(&self, cmd: &mut Command) -> Result<ExitStatus> {
        debug!("Running {:?}", cmd);
        cmd.status().map_err(|e| self.spawn_error(e))
    }

    fn run_output(&self, cmd: &mut Command) -> Result<Output> {
        debug!("Running {:?}", cmd);
        cmd.output().map_err(|e| self.spawn_error(e))
    }

    fn failed(&self, action: &str, status: ExitStatus) -> Error {
        Error::CommandFailed {
            program: self.kind.binary().to_string(),
            action: action.to_string(),
            code: status.code(),
        }
    }
}

impl ContainerRuntime for CliRuntime {
    fn kind(&self) -> RuntimeKind {
        self.kind
    }

    fn status(&self, repository: &str) -> Result<ContainerStatus> {
        let container_name = source::container_name(repository);
        let output = self.run_output(self.command().args([
            "ps",
            "-a",
            "--filter",
            &format!("name={}", container_name),
            "--format",
            "{{.ID}} {{.State}} {{.Names}}",
        ]))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("{} ps failed: {}", self.kind, stderr.trim());
            return Ok(ContainerStatus::absent(container_name));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_ps_output(&stdout, &container_name))
    }

    fn start(&self, request: &StartRequest<'_>) -> Result<()> {
        let container_name = source::container_name(request.repository);
        let image_ref = source::image_reference(request.image_name, request.image_tag);

        if self.status(request.repository)?.exists() {
            debug!("Replacing existing container {}", container_name);
            self.remove(request.repository)?;
        }

        let mut cmd = self.command();
        cmd.args(run_args(&container_name, &image_ref, request));

        info!("Starting container {} from {}", container_name, image_ref);
        if request.detach {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            let status = self.run_status(&mut cmd)?;
            if !status.success() {
                return Err(self.failed("run", status));
            }
        } else {
            let status = self.run_status(&mut cmd)?;
            debug!("Foreground container exited with {}", status);
        }
        Ok(())
    }

    fn stop(&self, repository: &str) -> Result<()> {
        let container_name = source::container_name(repository);
        info!("Stopping container {}", container_name);
        let status = self.run_status(self.command().args(["stop", &container_name]))?;
        if !status.success() {
            return Err(self.failed("stop", status));
        }
        Ok(())
    }

    fn remove(&self, repository: &str) -> Result<()> {
        let container_name = source::container_name(repository);
        let status = self.run_status(
            self.command()
                .args(["rm", "-f", &container_name])
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null()),
        )?;
        if !status.success() {
            debug!("{} rm returned {} (container may not exist)", self.kind, status);
        }
        Ok(())
    }

    fn build_image(&self, context: &Path, image_ref: &str) -> Result<()> {
        info!("Building image {} from {}", image_ref, context.display());
        let status = self.run_status(
            self.command()
                .args(["build", "-t", image_ref])
                .arg(context),
        )?;
        if !status.success() {
            return Err(Error::BuildFailed(status.code()));
        }
        Ok(())
    }

    fn remove_image(&self, image_ref: &str) -> Result<()> {
        let status = self.run_status(self.command().args(["rmi", "-f", image_ref]))?;
        if !status.success() {
            return Err(Error::ImageRemovalFailed(status.code()));
        }
        Ok(())
    }

    fn image_exists(&self, image_ref: &str) -> bool {
        let result = self.run_status(
            self.command()
                .args(["image", "inspect", image_ref])
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null()),
        );
        match result {
            Ok(status) => status.success(),
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }
}

/// Arguments for `run`: name, one `-e` per variable, mode flag, image.
fn run_args(container_name: &str, image_ref: &str, request: &StartRequest<'_>) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "--name".to_string(),
        container_name.to_string(),
    ];
    for (key, value) in request.env {
        args.push("-e".to_string());
        args.push(format!("{}={}", key, value));
    }
    args.push(if request.detach { "-d" } else { "-i" }.to_string());
    args.push(image_ref.to_string());
    args
}

/// Parse `ps --format "{{.ID}} {{.State}} {{.Names}}"` output.
///
/// The name filter is a substring match, so only a line whose name equals
/// `container_name` counts.
fn parse_ps_output(stdout: &str, container_name: &str) -> ContainerStatus {
    for line in stdout.lines() {
        let mut fields = line.split_whitespace();
        let (Some(id), Some(state)) = (fields.next(), fields.next()) else {
            continue;
        };
        let names = fields.next().unwrap_or(container_name);
        if names.split(',').any(|n| n == container_name) {
            return ContainerStatus {
                running: state.eq_ignore_ascii_case("running"),
                container_id: Some(id.to_string()),
                container_name: container_name.to_string(),
            };
        }
    }
    ContainerStatus::absent(container_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EnvironmentVariables;

    #[test]
    fn parse_running_container() {
        let status = parse_ps_output("abc123 running mocopro-weather\n", "mocopro-weather");
        assert!(status.running);
        assert_eq!(status.container_id.as_deref(), Some("abc123"));
        assert_eq!(status.container_name, "mocopro-weather");
    }

    #[test]
    fn parse_exited_container() {
        let status = parse_ps_output("abc123 exited mocopro-weather", "mocopro-weather");
        assert!(!status.running);
        assert!(status.exists());
    }

    #[test]
    fn parse_ignores_prefix_matches() {
        let output = "def456 running mocopro-weather-v2\nabc123 exited mocopro-weather\n";
        let status = parse_ps_output(output, "mocopro-weather");
        assert_eq!(status.container_id.as_deref(), Some("abc123"));
        assert!(!status.running);
    }

    #[test]
    fn parse_empty_output() {
        let status = parse_ps_output("", "mocopro-weather");
        assert!(!status.exists());
        assert!(!status.running);
    }

    #[test]
    fn run_args_include_env_and_mode() {
        let mut env = EnvironmentVariables::new();
        env.insert("API_KEY".to_string(), "secret".to_string());
        env.insert("DEBUG".to_string(), "true".to_string());
        let request = StartRequest {
            image_name: "mocopro/acme-weather",
            image_tag: "main",
            repository: "weather",
            detach: true,
            env: &env,
        };

        let args = run_args("mocopro-weather", "mocopro/acme-weather:main", &request);
        assert_eq!(
            args,
            vec![
                "run",
                "--name",
                "mocopro-weather",
                "-e",
                "API_KEY=secret",
                "-e",
                "DEBUG=true",
                "-d",
                "mocopro/acme-weather:main",
            ]
        );
    }

    #[test]
    fn run_args_foreground_is_interactive() {
        let env = EnvironmentVariables::new();
        let request = StartRequest {
            image_name: "img",
            image_tag: "v1",
            repository: "repo",
            detach: false,
            env: &env,
        };
        let args = run_args("mocopro-repo", "img:v1", &request);
        assert_eq!(args, vec!["run", "--name", "mocopro-repo", "-i", "img:v1"]);
    }
}
