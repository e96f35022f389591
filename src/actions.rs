//! GitHub Actions workflow commands for publishing the issued token.
//!
//! The token is masked first so the runner redacts it from every later log line, then exposed
//! as a step output: appended to the `GITHUB_OUTPUT` file when the runner provides one, or
//! through the legacy `::set-output` command otherwise.

// std
use std::{
	fs::OpenOptions,
	io::{self, Write},
	path::PathBuf,
};
// self
use crate::auth::TokenSecret;

/// Output name under which the token is published.
pub const OUTPUT_NAME: &str = "app_token";
/// Environment variable naming the runner's output file.
pub const ENV_GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Where step outputs are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionsOutput {
	/// Runner output file, if any.
	pub output_file: Option<PathBuf>,
}
impl ActionsOutput {
	/// Reads `GITHUB_OUTPUT` from the process environment.
	pub fn from_env() -> Self {
		Self {
			output_file: std::env::var_os(ENV_GITHUB_OUTPUT)
				.filter(|value| !value.is_empty())
				.map(PathBuf::from),
		}
	}

	/// Masks `secret` on `stdout`, then publishes it as output `name`.
	pub fn publish_secret(
		&self,
		name: &str,
		secret: &TokenSecret,
		stdout: &mut impl Write,
	) -> io::Result<()> {
		let value = secret.expose();

		if value.contains(['\r', '\n']) {
			return Err(io::Error::new(
				io::ErrorKind::InvalidInput,
				"secret spans multiple lines and cannot be masked",
			));
		}

		writeln!(stdout, "::add-mask::{value}")?;

		match &self.output_file {
			Some(path) => {
				let mut file = OpenOptions::new().create(true).append(true).open(path)?;

				writeln!(file, "{name}={value}")
			},
			None => writeln!(stdout, "::set-output name={name}::{value}"),
		}?;

		stdout.flush()
	}
}
