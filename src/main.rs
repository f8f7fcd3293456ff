use anyhow::Result;

use woodpusher::cli::GameShell;

fn main() -> Result<()> {
    GameShell::new().run()
}
