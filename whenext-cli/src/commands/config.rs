use anyhow::Result;
use owo_colors::OwoColorize;
use whenext_core::config::WhenextConfig;
use whenext_core::dataset::DatasetLoader;
use whenext_core::logging::LOG_ENV;

pub fn run(config: &WhenextConfig, loader: &DatasetLoader) -> Result<()> {
    let config_path = WhenextConfig::config_path()?;

    if !config_path.exists() {
        WhenextConfig::create_default_config(&config_path)?;
        println!(
            "{} {}\n",
            "Created".green(),
            config_path.display().to_string().bold()
        );
    }

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    for (i, source) in loader.sources().iter().enumerate() {
        let label = if i == 0 { "Dataset:" } else { "" };
        println!("  {:<11} {}", label, source);
    }

    println!();
    println!("{}", "Settings".bold());
    println!("  Site:       {}", config.site_url);
    println!("  Server:     http://{}", config.bind_address());
    println!("  Timezone:   {}", config.default_timezone);
    println!("  Feed:       {:?}", config.feed_variant());
    println!("  Cache:      {}s", config.cache_max_age);
    println!("  Log filter: ${}", LOG_ENV);

    Ok(())
}
