use clap::Parser;

/// Arguments shared by the synchronization commands
#[derive(Parser, Debug, Clone, Default)]
pub struct SyncArgs {
    /// Ignore legacy HTML imports instead of translating them to npm packages and JS modules
    #[arg(long)]
    pub no_convert_html: bool,
}

/// Arguments for frontend command
#[derive(Parser, Debug, Clone, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  Synchronize everything and build the bundle:\n    nodesync frontend\n\n\
                  Synchronize files only, e.g. while webpack-dev-server is running:\n    nodesync frontend --no-bundle")]
pub struct FrontendArgs {
    #[command(flatten)]
    pub sync: SyncArgs,

    /// Skip running webpack after synchronizing
    #[arg(long)]
    pub no_bundle: bool,
}
