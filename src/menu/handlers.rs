use crate::component::JobOrchestrator;
use crate::component::job_orchestrator::{JobRequest, StartOutcome};
use crate::config::Config;
use crate::menu::ExtractionView;
use crate::pause;
use crate::tools::{MediaToolkit, check_tools_available, suggest_output_directory};
use anyhow::Result;
use console::{Term, style};
use dialoguer::Input;
use log::warn;
use rust_i18n::t;
use std::path::PathBuf;

pub fn run_frame_extraction<T: MediaToolkit + 'static>(
    term: &Term,
    orchestrator: &JobOrchestrator<T>,
    config: &Config,
) -> Result<()> {
    println!("{}", style(t!("extract.title")).cyan().bold());

    if let Err(e) = check_tools_available(&config.settings) {
        warn!("FFmpeg 無法使用: {e:#}");
        eprintln!(
            "{} {}",
            style(t!("common.error_prefix")).red().bold(),
            t!("extract.tools_missing", error = format!("{e:#}"))
        );
        pause(term)?;
        return Ok(());
    }

    let request = prompt_request(config)?;

    match orchestrator.start(request) {
        Ok(StartOutcome::Started(handle)) => {
            let view = ExtractionView::new(config.settings.max_depth)?;
            view.render(&handle);
            handle.join()?;
        }
        Ok(StartOutcome::AlreadyRunning) => {
            println!("{}", style(t!("extract.busy")).yellow());
        }
        Err(e) => {
            eprintln!("{} {}", style(t!("common.error_prefix")).red().bold(), e);
        }
    }

    pause(term)?;
    Ok(())
}

fn prompt_request(config: &Config) -> Result<JobRequest> {
    let input: String = Input::new()
        .with_prompt(t!("extract.input_prompt"))
        .interact_text()?;
    let input_dir = PathBuf::from(input.trim());

    let output: String = Input::new()
        .with_prompt(t!("extract.output_prompt"))
        .default(suggest_output_directory(&input_dir).display().to_string())
        .interact_text()?;

    let max = config.settings.max_frame_count;
    let frame_count: usize = Input::new()
        .with_prompt(t!("extract.count_prompt"))
        .default(config.settings.default_frame_count)
        .validate_with(|value: &usize| -> Result<(), String> {
            if (1..=max).contains(value) {
                Ok(())
            } else {
                Err(t!("extract.count_range", max = max).to_string())
            }
        })
        .interact_text()?;

    Ok(JobRequest {
        input_dir,
        output_dir: PathBuf::from(output.trim()),
        frame_count,
    })
}

pub fn show_usage_notes(term: &Term) -> Result<()> {
    term.clear_screen()?;
    println!("{}", style(t!("help.title")).cyan().bold());
    println!("{}", t!("help.body"));
    pause(term)
}
