use anyhow::Context;
use std::process::ExitStatus;

/// Append `extra` to `content`, shell-quoting each argument.
pub fn compose(content: &str, extra: &[String]) -> anyhow::Result<String> {
    if extra.is_empty() {
        return Ok(content.to_string());
    }
    let quoted = shlex::try_join(extra.iter().map(String::as_str))
        .context("argument cannot be passed to the shell")?;
    Ok(format!("{content} {quoted}"))
}

/// The user's shell, set up to run `line` with inherited stdio.
pub fn shell_command(line: &str) -> std::process::Command {
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        // cmd.exe does its own parsing; backslash-escaped quotes would break it
        let mut cmd = std::process::Command::new("cmd.exe");
        cmd.arg("/C").raw_arg(line);
        cmd
    }
    #[cfg(not(windows))]
    {
        let shell = std::env::var_os("SHELL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "/bin/sh".into());
        let mut cmd = std::process::Command::new(shell);
        cmd.arg("-c").arg(line);
        cmd
    }
}

/// Run `line` and return the exit code to propagate.
pub fn execute(line: &str) -> anyhow::Result<u8> {
    tracing::debug!("executing: {line}");
    let status = shell_command(line)
        .status()
        .with_context(|| format!("failed to start shell for `{line}`"))?;
    Ok(status_code(status))
}

/// Killed-by-signal and out-of-range codes map to 1.
fn status_code(status: ExitStatus) -> u8 {
    match status.code() {
        Some(code) => u8::try_from(code).unwrap_or(1),
        None => 1,
    }
}
