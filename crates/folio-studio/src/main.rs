mod app;
mod cli;
mod page;

use anyhow::{Result, anyhow};
use clap::Parser;
use winit::dpi::LogicalSize;

use folio_engine::device::GpuInit;
use folio_engine::logging::{LoggingConfig, init_logging};
use folio_engine::window::{Runtime, RuntimeConfig};

use crate::app::Studio;
use crate::cli::Cli;
use crate::page::Page;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig { env_filter: cli.log.clone(), ..Default::default() });

    let mut page = Page::portfolio();
    let start = page
        .index_of(&cli.section)
        .ok_or_else(|| anyhow!("unknown section `{}`", cli.section))?;
    page.scroll_to(start);
    log::info!("starting at section `{}`", page.blocks()[start].name());

    let config = RuntimeConfig {
        title: "folio".to_string(),
        initial_size: LogicalSize::new(cli.width, cli.height),
    };

    Runtime::run(config, GpuInit::default(), Studio::new(page))
}
