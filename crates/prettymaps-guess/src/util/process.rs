use crate::prelude::*;
use crate::{fatal, Result};
use std::ffi::OsStr;
use std::process::Stdio;

/// Runs the program to completion and returns its stdout. A non-zero exit
/// status is reported as an error that includes the program's stderr.
pub(crate) async fn run(program: &str, args: &[&str]) -> Result<Vec<u8>> {
    let display_cmd = display_cmd(program, args)?;

    debug!(cmd = %display_cmd, "Running program");

    let output = tokio::process::Command::new(program)
        .args(args.iter().map(OsStr::new))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .fatal_ctx(|| format!("Invocation failed. Command:\n`{display_cmd}`"))?;

    let status = output.status;

    if !status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(fatal!(
            "{program} invocation failed with status {status}. Command:\n\
            {display_cmd}\n\
            Stderr:\n{stderr}"
        ));
    }

    Ok(output.stdout)
}

pub(crate) async fn run_json<T: serde::de::DeserializeOwned>(
    program: &str,
    args: &[&str],
) -> Result<T> {
    let output = run(program, args).await?;
    serde_json::from_slice(&output).fatal_ctx(|| {
        format!(
            "Bad output (invalid JSON).\n\
            Program: {program}.\n\
            Output: {}.\n",
            String::from_utf8_lossy(&output)
        )
    })
}

fn display_cmd(program: &str, args: &[&str]) -> Result<String> {
    let display_args = shlex::try_join(args.iter().copied()).fatal_ctx(|| {
        format!("Couldn't run program that contains a nul byte: {program:?} {args:?}")
    })?;

    Ok(format!("{program} {display_args}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test(tokio::test)]
    #[cfg(unix)]
    async fn captures_stdout() {
        let output = run("echo", &["hello", "world"]).await.unwrap();
        assert_eq!(output, b"hello world\n");
    }

    #[test_log::test(tokio::test)]
    #[cfg(unix)]
    async fn fails_on_non_zero_status() {
        let err = run("sh", &["-c", "echo oops >&2; exit 3"]).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("oops"), "{message}");
    }
}
