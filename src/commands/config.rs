//! Config subcommands handler

use anyhow::Result;

use replaykit::Config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config: &Config) -> Result<()> {
    let toml_str = config.to_toml()?;
    print!("{}", toml_str);
    Ok(())
}
