use super::load_fixtures;
use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::fixtures::FixtureSet;
use clap::Args;

/// Validate and list the fixture set
#[derive(Args)]
pub struct FixturesCommand {
    /// Glob of fixture JSON files (default: built-in mainnet fixtures)
    #[arg(long)]
    pub fixtures: Option<String>,

    /// Print the validated fixtures as JSON
    #[arg(long)]
    pub json: bool,
}

impl FixturesCommand {
    pub fn run(&self, config: AppConfig) -> AppResult<()> {
        let fixtures = load_fixtures(self.fixtures.as_deref(), &config)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(fixtures.fixtures())?);
        } else {
            print!("{}", render_listing(&fixtures));
        }
        Ok(())
    }
}

fn render_listing(fixtures: &FixtureSet) -> String {
    let mut out = String::new();
    for (number, fixture) in fixtures.numbered() {
        out.push_str(&format!(
            "Test {}: {} (block {}, {} inputs, {} outputs)\n",
            number,
            fixture.txid,
            fixture.block_height,
            fixture.inputs.len(),
            fixture.outputs.len()
        ));
    }
    out.push_str(&format!("{} fixtures OK\n", fixtures.len()));
    out
}
