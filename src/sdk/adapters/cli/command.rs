//! Command-line construction for the coding-agent CLI.

use crate::sdk::domain::SdkOptions;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Flags shared by one-shot and session launches.
const STREAM_FLAGS: [&str; 3] = ["--output-format", "stream-json", "--verbose"];

/// Renders `options` as CLI flags. Unset options produce no flags.
pub fn option_args(options: &SdkOptions) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(prompt) = &options.system_prompt {
        args.extend(["--system-prompt".to_owned(), prompt.clone()]);
    }
    if let Some(model) = &options.model {
        args.extend(["--model".to_owned(), model.clone()]);
    }
    if let Some(tools) = &options.allowed_tools {
        args.extend(["--allowedTools".to_owned(), tools.join(",")]);
    }
    if let Some(sources) = &options.setting_sources {
        args.extend(["--setting-sources".to_owned(), sources.join(",")]);
    }
    args.extend(["--permission-mode".to_owned(), options.permission_mode.clone()]);
    args
}

fn base_command(cli_path: &Path, options: &SdkOptions) -> Command {
    let mut command = Command::new(cli_path);
    command
        .args(STREAM_FLAGS)
        .args(option_args(options))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(cwd) = &options.cwd {
        command.current_dir(cwd);
    }
    command
}

/// Builds a one-shot launch with `prompt` as the final argument.
pub fn one_shot(cli_path: &Path, options: &SdkOptions, prompt: &str) -> Command {
    let mut command = base_command(cli_path, options);
    command
        .arg("--print")
        .arg("--")
        .arg(prompt)
        .stdin(Stdio::null());
    command
}

/// Builds a session launch reading prompts from stdin.
pub fn session(cli_path: &Path, options: &SdkOptions) -> Command {
    let mut command = base_command(cli_path, options);
    command
        .args(["--input-format", "stream-json"])
        .stdin(Stdio::piped());
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_only_set_permission_mode() {
        assert_eq!(
            option_args(&SdkOptions::default()),
            ["--permission-mode", "acceptEdits"]
        );
    }

    #[test]
    fn lists_are_comma_joined() {
        let options = SdkOptions {
            model: Some("opus".to_owned()),
            allowed_tools: Some(vec!["Read".to_owned(), "Grep".to_owned()]),
            ..SdkOptions::default()
        };

        assert_eq!(
            option_args(&options),
            [
                "--model",
                "opus",
                "--allowedTools",
                "Read,Grep",
                "--permission-mode",
                "acceptEdits"
            ]
        );
    }
}
