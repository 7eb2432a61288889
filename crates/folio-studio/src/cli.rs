use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "folio-studio")]
#[command(about = "Portfolio page with animated wireframe backdrops", long_about = None)]
pub struct Cli {
    /// Section to start scrolled to (hero, about, projects, skills, contact)
    #[arg(long, default_value = "hero")]
    pub section: String,

    /// Log filter in env_logger syntax, e.g. "folio_backdrop=debug"
    #[arg(long)]
    pub log: Option<String>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720.0)]
    pub height: f64,
}
