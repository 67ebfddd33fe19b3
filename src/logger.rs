use log::LevelFilter;
use log4rs::Handle;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<Handle> = OnceCell::new();

/// Initializes the logging system.
///
/// Installs a console appender at debug level. Safe to call more than once;
/// only the first call installs the logger.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    HANDLE.get_or_try_init(|| -> Result<Handle, Box<dyn std::error::Error>> {
        let stdout = ConsoleAppender::builder().build();
        let config = Config::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(Root::builder().appender("stdout").build(LevelFilter::Debug))?;
        Ok(log4rs::init_config(config)?)
    })?;
    Ok(())
}
