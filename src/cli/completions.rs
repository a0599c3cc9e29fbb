use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    stowage completions bash > ~/.bash_completion.d/stowage\n\n\
                  Generate zsh completions:\n    stowage completions zsh > ~/.zfunc/_stowage\n\n\
                  Generate fish completions:\n    stowage completions fish > ~/.config/fish/completions/stowage.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
