use anyhow::Result;
use console::{Term, style};
use frame_sampler::component::JobOrchestrator;
use frame_sampler::config::Config;
use frame_sampler::init;
use frame_sampler::menu::show_main_menu;
use log::{info, warn};

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();

    let mut config = Config::new()?;
    rust_i18n::set_locale(config.language.as_str());

    let orchestrator = JobOrchestrator::with_ffmpeg(config.clone());

    loop {
        match show_main_menu(&term, &orchestrator, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {}", style("Error:").red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}
