use seek_filter::{get_settings, setup_logger, Application};

fn main() -> anyhow::Result<()> {
    let settings = get_settings()?;
    setup_logger(settings.level.clone(), vec![])?;
    let application = Application::build(settings)?;

    application.run(&mut std::io::stdout().lock())?;
    Ok(())
}
