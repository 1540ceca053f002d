use crate::component::JobOrchestrator;
use crate::config::{Config, Language};
use crate::menu::handlers::{run_frame_extraction, show_usage_notes};
use crate::tools::MediaToolkit;
use anyhow::Result;
use console::{Term, style};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use rust_i18n::t;

/// 回傳 `false` 代表使用者選擇離開
pub fn show_main_menu<T: MediaToolkit + 'static>(
    term: &Term,
    orchestrator: &JobOrchestrator<T>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_extract"),
        t!("main_menu.opt_help"),
        t!("main_menu.opt_language"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_frame_extraction(term, orchestrator, config)?;
            Ok(true)
        }
        Some(1) => {
            show_usage_notes(term)?;
            Ok(true)
        }
        Some(2) => {
            show_language_menu(term, config)?;
            Ok(true)
        }
        Some(3) | None => {
            term.clear_screen()?;
            println!("\n{}", style(t!("main_menu.goodbye")).green().bold());
            Ok(false)
        }
        _ => unreachable!(),
    }
}

/// 語言只在本次執行中生效，不寫入設定檔
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhCn];
    let items: Vec<String> = languages.iter().map(ToString::to_string).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    config.language = languages[selection];
    rust_i18n::set_locale(config.language.as_str());
    Ok(())
}
