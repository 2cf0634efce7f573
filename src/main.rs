//! kbm CLI application entry point
//!
//! Catalogs the files of a repository and lets you tag and find them.
//!
//! # Usage
//!
//! ```bash
//! # Open the interactive menu (default command)
//! kbm
//!
//! # Create the catalog and add every file in the repository
//! kbm --repo ~/notes scan
//!
//! # Tag a file and find it again
//! kbm tag docs/plan.md draft review
//! kbm search draft
//!
//! # Remove catalogued files that were deleted from disk
//! kbm cleanup --dry-run
//!
//! # Quiet mode (only output results)
//! kbm -q list
//! ```
//!
//! # Configuration
//!
//! Settings live in the user's config directory
//! (`~/.config/kbmanager/config.json` on Linux). `KBM_*` environment
//! variables override them. Logging follows `RUST_LOG`, or `-v` / `-vv`.

use kbmanager::{
    KbError,
    cli::{Cli, Commands},
    commands,
    config::{self, ConfigProvider, JsonConfigStore},
    logging, menu,
    vcs::Libgit2Vcs,
};

type Result<T> = std::result::Result<T, KbError>;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    let store = JsonConfigStore::user()?;
    let command = cli.get_command();
    let repo_flag = cli.repo.as_deref();

    match &command {
        Commands::Menu => {
            let config = menu::ensure_configured(&store, repo_flag)?;
            return menu::run(&store, repo_flag, cli.quiet || config.quiet);
        }
        Commands::Setup => {
            let current = store.read_config()?;
            config::first_time_setup(&store, current)?;
            return Ok(());
        }
        Commands::Config { command } => {
            let quiet = cli.quiet || store.read_config()?.quiet;
            return commands::config(&store, command, quiet);
        }
        _ => {}
    }

    let config = store.read_config()?;
    let quiet = cli.quiet || config.quiet;
    let repo = commands::resolve_repository(repo_flag, &config)?;
    let catalog = commands::open_catalog(&repo, &config);

    match command {
        Commands::Init => commands::init(&catalog, quiet).map(drop),
        Commands::Scan => commands::scan(&catalog, quiet).map(drop),
        Commands::Add { file } => commands::add(&catalog, &file, quiet).map(drop),
        Commands::List => commands::list(&catalog, quiet).map(drop),
        Commands::Tag { file, tags } => commands::tag(&catalog, &file, &tags, quiet).map(drop),
        Commands::Untag { file, tags } => commands::untag(&catalog, &file, &tags, quiet).map(drop),
        Commands::Search { tag } => commands::search(&catalog, &tag, quiet).map(drop),
        Commands::Rm { file } => commands::rm(&catalog, &file, quiet).map(drop),
        Commands::Tags { counts } => commands::tags(&catalog, counts, quiet).map(drop),
        Commands::Cleanup { dry_run, yes } => {
            commands::cleanup(&catalog, dry_run, yes, quiet).map(drop)
        }
        Commands::Git { command } => commands::git(&Libgit2Vcs::new(), &config, &repo, &command, quiet),
        Commands::Menu | Commands::Setup | Commands::Config { .. } => Ok(()),
    }
}
