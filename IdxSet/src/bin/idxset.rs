//! IdxSet command-line entry point

fn main() -> anyhow::Result<()> {
    idxset::cli::run_cli()
}
