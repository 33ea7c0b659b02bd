use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use ptolemy::command_line_options::Command;
use ptolemy::command_line_options::CommandLineOptions;
use ptolemy::decomposition::decomposition_input;
use ptolemy::decomposition::input_file_name;
use ptolemy::decomposition::parse_output;
use ptolemy::decomposition::ExternalDecomposer;
use ptolemy::emit_build_information::emit_build_information;
use ptolemy::error::PtolemyError;
use ptolemy::error::Result;
use ptolemy::parameters::Parameters;
use ptolemy::pipeline::decompose_and_evaluate;
use ptolemy::pipeline::evaluate_decomposition;
use ptolemy::pipeline::solve_variety;
use ptolemy::pipeline::Report;
use ptolemy::ptolemy::ptolemy_varieties;
use ptolemy::ptolemy::PtolemyVariety;
use ptolemy::triangulation::Triangulation;
use simplelog::ColorChoice;
use simplelog::ConfigBuilder;
use simplelog::TermLogger;
use simplelog::TerminalMode;

fn log_level(verbosity: usize) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}_{}.trig", stem, suffix))
}

fn order(path: &Path) -> Result<()> {
    let triangulation = Triangulation::from_file(path)?;
    match triangulation.order() {
        Ok(ordered) => {
            let target = sibling_path(path, "ordered");
            info!("Writing ordered triangulation to {:?}", target);
            ordered.write_to_file(&target)
        }
        Err(PtolemyError::Exhaustion(message)) => {
            let target = sibling_path(path, "unorderable");
            warn!("{}, writing {:?}", message, target);
            triangulation.write_to_file(&target)
        }
        Err(e) => Err(e),
    }
}

fn varieties(path: &Path, parameters: &Parameters) -> Result<Vec<PtolemyVariety>> {
    let triangulation = Triangulation::from_file(path)?.order()?;
    Ok(ptolemy_varieties(&triangulation, parameters.run.n)?
        .into_iter()
        .filter(|variety| parameters.run.includes_class(variety.class_index()))
        .collect())
}

fn write_inputs(path: &Path, parameters: &Parameters) -> Result<()> {
    let directory = match &parameters.decomposition.output_directory {
        Some(directory) => directory.clone(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    for variety in varieties(path, parameters)? {
        let target = directory.join(input_file_name(
            &variety.triangulation.name,
            variety.n,
            variety.class_index(),
        ));
        info!("Writing {:?}", target);
        fs::write(&target, decomposition_input(&variety)).map_err(|e| PtolemyError::io(&target, e))?;
    }
    Ok(())
}

fn print_reports(reports: &[Report]) -> Result<()> {
    let text = serde_yaml::to_string(reports)
        .map_err(|e| PtolemyError::Parameters(format!("failed to serialize report: {}", e)))?;
    print!("{}", text);
    Ok(())
}

fn run(opts: CommandLineOptions) -> Result<()> {
    let (parameters, contents) = Parameters::read(opts.parameter_file.as_deref(), opts.overrides)?;
    info!("Parameters:\n{}", contents.contents()?);
    let precision = parameters.precision.precision()?;
    match opts.command {
        Command::Order { triangulation } => order(&triangulation),
        Command::Variety { triangulation } => write_inputs(&triangulation, &parameters),
        Command::Evaluate { outputs } => {
            let mut reports = vec![];
            for path in outputs.iter() {
                let text = fs::read_to_string(path).map_err(|e| PtolemyError::io(path, e))?;
                reports.push(evaluate_decomposition(
                    &parse_output(&text)?,
                    &precision,
                    &parameters.solver,
                )?);
            }
            print_reports(&reports)
        }
        Command::Solve { triangulation } => {
            let reports = varieties(&triangulation, &parameters)?
                .iter()
                .map(|variety| solve_variety(variety, &precision, &parameters.solver))
                .collect::<Result<Vec<_>>>()?;
            print_reports(&reports)
        }
        Command::Decompose { triangulation } => {
            let decomposer = ExternalDecomposer::new(
                parameters.decomposition.command.clone(),
                parameters.decomposition.arguments.clone(),
                parameters.decomposition.timeout(),
            );
            let reports = varieties(&triangulation, &parameters)?
                .iter()
                .map(|variety| {
                    decompose_and_evaluate(variety, &decomposer, &precision, &parameters.solver)
                })
                .collect::<Result<Vec<_>>>()?;
            print_reports(&reports)
        }
    }
}

fn main() -> ExitCode {
    let opts = CommandLineOptions::parse();
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if let Err(e) = TermLogger::init(
        log_level(opts.verbosity),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    emit_build_information();
    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
