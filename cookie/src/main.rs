use backend::bootstrap::{diagnostic_lines, Bootstrap};
use backend::config::CookieConfig;
use backend::loader::GlLoader;
use backend::logging::{init_logging, LoggingConfig};
use backend::system::System;

fn main() {
    init_logging(LoggingConfig::default());

    let mut bootstrap = Bootstrap::new(System::new(), GlLoader::new(), CookieConfig::default());
    let outcome = bootstrap.initialize();
    for line in diagnostic_lines(&outcome) {
        println!("{line}");
    }
    if let Err(e) = outcome {
        std::process::exit(e.exit_code());
    }

    if let Err(e) = bootstrap.run() {
        log::error!("{e}");
        println!("{e}");
        std::process::exit(e.exit_code());
    }
}
