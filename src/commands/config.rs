use anyhow::Result;
use gymdesk_core::GymdeskConfig;
use owo_colors::OwoColorize;

pub fn init(force: bool) -> Result<()> {
    let path = GymdeskConfig::config_path()?;

    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}\nUse --force to overwrite it",
            path.display()
        );
    }

    GymdeskConfig::create_default_config(&path)?;
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}

pub fn show(config: &GymdeskConfig) -> Result<()> {
    let config_path = GymdeskConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:   {}", config_path.display());
    println!("  Session:  {}", config.session_path()?.display());
    println!();
    println!("{}", "Settings".bold());
    println!("  api_url:      {}", config.api_url);
    println!("  timeout_secs: {}", config.timeout_secs);
    println!("  auth_scheme:  {:?}", config.auth_scheme);

    Ok(())
}
