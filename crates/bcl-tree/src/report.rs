use ariadne::Config;

/// Get ariadne config, respecting the NO_COLOR env var.
pub fn ariadne_config() -> Config {
    let no_color = std::env::var("NO_COLOR").is_ok();
    if no_color {
        Config::default().with_color(false)
    } else {
        Config::default()
    }
}
