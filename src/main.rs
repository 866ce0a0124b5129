use std::env;
use std::fs;
use std::io;
use std::path;
use std::process::ExitCode;

use log::{error, info};

use pcq_xgmml::ExportJob;

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let Some(job_path) = args.get(1).map(path::Path::new) else {
        let program = args.first().map(String::as_str).unwrap_or("pcq-xgmml");
        eprintln!("Usage: {program} <job.json>");
        return ExitCode::from(2);
    };

    let job = match fs::File::open(job_path)
        .map(io::BufReader::new)
        .map_err(|e| e.to_string())
        .and_then(|reader| ExportJob::from_reader(reader).map_err(|e| e.to_string()))
    {
        Ok(job) => job,
        Err(e) => {
            error!("Failed to read {}: {e}", job_path.display());
            return ExitCode::FAILURE;
        }
    };

    match job.run() {
        Ok(summary) => {
            for (stage, path) in summary.written.iter() {
                info!("Wrote {stage} to {}", path.display());
            }
            if summary.is_complete() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("Export aborted: {e}");
            ExitCode::FAILURE
        }
    }
}
