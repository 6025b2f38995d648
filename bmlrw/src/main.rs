//! Rewrite program terms with BML rules.

use bml::Registry;
use bmlrw::process::{self, Catalog};
use bmlrw::{Error, Opt};
use clap::Parser;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn run(opt: &Opt) -> Result<(), Error> {
    let reg = Registry::builtin();
    if opt.list {
        print!("{}", Catalog(&reg));
        return Ok(());
    }

    // if a precise number of parallel jobs has been given
    if let Some(Some(jobs)) = opt.jobs {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs);
        if let Err(e) = pool.build_global() {
            log::warn!("Could not set number of jobs: {}", e)
        }
    }

    let rules = process::rules(opt, &reg)?;
    process::run(opt, &rules)
}

fn main() {
    env_logger::Builder::from_env("LOG").init();

    let opt = Opt::parse();
    if let Err(e) = run(&opt) {
        eprintln!("error: {}", e);
        std::process::exit(1)
    }
}
