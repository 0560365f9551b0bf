use std::process;

use clap::Parser;

use octo_vip::config::Config;

fn main() {
    env_logger::init();

    let config = Config::parse();
    if let Err(e) = octo_vip::run(&config) {
        eprintln!("Application error: {e}");
        process::exit(1);
    }
}
