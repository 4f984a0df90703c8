use std::{
    process::ExitCode,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

use log::{info, warn};

use tsp_bb_core::{Result, SolverOptions, Termination, logging, run, write_output};

fn main() -> ExitCode {
    let options = match SolverOptions::from_args() {
        Ok(Some(options)) => options,
        Ok(None) => {
            print!("{}", SolverOptions::usage());
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    match solve(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn solve(options: &SolverOptions) -> Result<()> {
    let now = Instant::now();
    logging::init_logger(options)?;
    info!("options: {options}");

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    if let Err(err) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        warn!("ctrl-c handler not installed: {err}");
    }

    let report = run(options, cancel)?;
    if report.termination == Termination::Cancelled {
        warn!("search interrupted; the printed circle may not be optimal");
    }

    write_output(options.output_path(), &report.render())?;

    info!(
        "done: locations={} search={:.2}s total={:.2}s",
        report.locations,
        report.elapsed.as_secs_f32(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
