use anyhow::{Context, Result, bail};
use std::{
	ffi::{OsStr, OsString},
	path::{Path, PathBuf},
	process::Stdio,
	time::Duration,
};
use tokio::process::Command;

/// Captured output of a finished tool.
#[derive(Clone, Debug, Default)]
pub struct ToolOutput {
	pub stdout: String,
	pub stderr: String,
}

/// One invocation of an external program.
///
/// The child is killed when the run is dropped or exceeds its timeout.
#[derive(Clone, Debug)]
pub struct ToolCommand {
	program: String,
	args: Vec<OsString>,
	current_dir: Option<PathBuf>,
	timeout: Option<Duration>,
}

impl ToolCommand {
	pub fn new(program: &str) -> Self {
		Self {
			program: program.to_string(),
			args: Vec::new(),
			current_dir: None,
			timeout: None,
		}
	}

	#[must_use]
	pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
		self.args.push(arg.as_ref().to_os_string());
		self
	}

	#[must_use]
	pub fn args<I, S>(mut self, args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<OsStr>,
	{
		self.args.extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
		self
	}

	#[must_use]
	pub fn current_dir(mut self, dir: &Path) -> Self {
		self.current_dir = Some(dir.to_path_buf());
		self
	}

	#[must_use]
	pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn program(&self) -> &str {
		&self.program
	}

	/// The command line, for log messages.
	pub fn describe(&self) -> String {
		let mut line = self.program.clone();
		for arg in &self.args {
			line.push(' ');
			line.push_str(&arg.to_string_lossy());
		}
		line
	}

	/// Runs the program to completion.
	///
	/// Fails when it cannot be started, runs into the timeout or exits unsuccessfully; the error
	/// then carries everything the program wrote.
	pub async fn run(&self) -> Result<ToolOutput> {
		log::debug!("running {}", self.describe());

		let mut command = Command::new(&self.program);
		command
			.args(&self.args)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.kill_on_drop(true);
		if let Some(dir) = &self.current_dir {
			command.current_dir(dir);
		}

		let child = command
			.spawn()
			.with_context(|| format!("starting '{}', is it installed and on the PATH?", self.program))?;

		let output = match self.timeout {
			Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
				Ok(output) => output,
				Err(_) => bail!("'{}' did not finish within {limit:?} and was killed", self.program),
			},
			None => child.wait_with_output().await,
		}
		.with_context(|| format!("waiting for '{}'", self.program))?;

		let captured = ToolOutput {
			stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
			stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
		};
		if !output.status.success() {
			bail!(
				"'{}' failed ({})\nstdout:\n{}\nstderr:\n{}",
				self.describe(),
				output.status,
				captured.stdout.trim_end(),
				captured.stderr.trim_end()
			);
		}
		Ok(captured)
	}
}
