use clap::{Parser, ValueEnum};
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    nodesync completions bash > ~/.bash_completion.d/nodesync\n\n\
                  Generate zsh completions:\n    nodesync completions zsh > ~/.zfunc/_nodesync\n\n\
                  Generate fish completions:\n    nodesync completions fish > ~/.config/fish/completions/nodesync.fish\n\n\
                  Generate PowerShell completions:\n    nodesync completions pwsh")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(value_parser = parse_shell)]
    pub shell: Shell,
}

/// Case-insensitive shell name, with `pwsh` for PowerShell
fn parse_shell(name: &str) -> Result<Shell, String> {
    if name.eq_ignore_ascii_case("pwsh") {
        return Ok(Shell::PowerShell);
    }
    Shell::from_str(name, true).map_err(|_| {
        format!("unsupported shell '{name}' (supported: bash, elvish, fish, powershell, pwsh, zsh)")
    })
}
