use std::f64::consts::PI;
use std::fmt;

use log::info;
use log::warn;
use num::rational::Ratio;
use num::Complex;
use num::Zero;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::algebra::bigfloat::BigComplex;
use crate::algebra::dilog::Dilogarithm;
use crate::algebra::integer_relation::find_integer_relation;
use crate::algebra::number::Real;
use crate::algebra::Precision;
use crate::algebra::Scalar;
use crate::bloch::complex_volume;
use crate::decomposition::decomposition_input;
use crate::decomposition::parse_output;
use crate::decomposition::DecompositionOutput;
use crate::decomposition::ExternalDecomposer;
use crate::decomposition::PrimeIdeal;
use crate::decomposition::ProcessFailure;
use crate::error::PtolemyError;
use crate::error::Result;
use crate::parameters::SolverParameters;
use crate::ptolemy::variety::obstruction_classes_for;
use crate::ptolemy::Equation;
use crate::ptolemy::PtolemySolution;
use crate::ptolemy::PtolemyVariety;
use crate::ptolemy::Variable;
use crate::solver::to_numeric;
use crate::solver::Assignment;
use crate::solver::Solver;

/// Why a variety, component or solution has no (complete) result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Warning {
    #[serde(rename = "Numerical Error")]
    NumericalError,
    #[serde(rename = "Empty Ideal")]
    EmptyIdeal,
    #[serde(rename = "Crashed/Aborted")]
    CrashedAborted,
    #[serde(rename = "Out Of Memory")]
    OutOfMemory,
    #[serde(rename = "Timeout")]
    Timeout,
    #[serde(rename = "Positive Dimensional Component")]
    PositiveDimensionalComponent,
    #[serde(rename = "Solution Count Mismatch")]
    SolutionCountMismatch,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Warning::NumericalError => "Numerical Error",
            Warning::EmptyIdeal => "Empty Ideal",
            Warning::CrashedAborted => "Crashed/Aborted",
            Warning::OutOfMemory => "Out Of Memory",
            Warning::Timeout => "Timeout",
            Warning::PositiveDimensionalComponent => "Positive Dimensional Component",
            Warning::SolutionCountMismatch => "Solution Count Mismatch",
        };
        write!(f, "{}", text)
    }
}

impl From<ProcessFailure> for Warning {
    fn from(failure: ProcessFailure) -> Self {
        match failure {
            ProcessFailure::Crashed => Warning::CrashedAborted,
            ProcessFailure::OutOfMemory => Warning::OutOfMemory,
        }
    }
}

/// The invariants of one solution, or why they could not be computed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SolutionReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chern_simons: Option<f64>,
    /// The Chern-Simons invariant divided by pi^2, if it is recognized
    /// as a rational number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chern_simons_over_pi_squared: Option<String>,
    /// All digits of the working precision, when it exceeds double
    /// precision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_digits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chern_simons_digits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<Warning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolutionReport {
    fn failed(index: usize, error: &PtolemyError) -> Self {
        Self {
            index,
            warning: Some(Warning::NumericalError),
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ComponentReport {
    pub index: usize,
    pub dimension: usize,
    pub number_of_points: Option<usize>,
    pub warning: Option<Warning>,
    pub solutions: Vec<SolutionReport>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub name: String,
    pub n: usize,
    pub obstruction_class: usize,
    pub tetrahedra: usize,
    pub cusps: usize,
    pub ordered: bool,
    pub cputime: Option<f64>,
    pub warning: Option<Warning>,
    pub components: Vec<ComponentReport>,
}

impl Report {
    fn new(variety: &PtolemyVariety, cputime: Option<f64>) -> Self {
        let triangulation = &variety.triangulation;
        Self {
            name: triangulation.name.clone(),
            n: variety.n,
            obstruction_class: variety.class_index(),
            tetrahedra: triangulation.num_tetrahedra(),
            cusps: triangulation.num_cusps(),
            ordered: triangulation.is_ordered(),
            cputime,
            warning: None,
            components: vec![],
        }
    }

    fn with_warning(variety: &PtolemyVariety, warning: Warning) -> Self {
        Self {
            warning: Some(warning),
            ..Self::new(variety, None)
        }
    }

    pub fn solutions(&self) -> impl Iterator<Item = &SolutionReport> {
        self.components.iter().flat_map(|c| c.solutions.iter())
    }
}

/// Volume and complex volume of the representation given by a
/// solution of the variety.
pub fn evaluate_solution<S: Scalar>(
    variety: &PtolemyVariety,
    assignment: &Assignment<Variable, S>,
    dilog: &Dilogarithm<S>,
    precision: &Precision,
    paranoid: bool,
) -> Result<(S::Real, S)> {
    let solution = PtolemySolution::from_assignment(variety, assignment, true, precision)?;
    if paranoid {
        solution.check_identification(variety, precision)?;
    }
    solution.check_relations(variety, precision)?;
    let cochains = solution.cochains(variety)?;
    complex_volume(&cochains, dilog, precision)
}

/// The Chern-Simons invariant as a reduced fraction times pi^2. The
/// search runs in double precision, so the tolerance is never finer
/// than the default one.
pub fn recognize_chern_simons(
    chern_simons: f64,
    precision: &Precision,
    max_coefficient: i64,
) -> Option<Ratio<i64>> {
    let tolerance = precision.epsilon.max(Precision::default().epsilon);
    let relation = find_integer_relation(&[chern_simons, PI * PI], tolerance, max_coefficient)?;
    match relation[..] {
        [a, b] if a != 0 => Some(Ratio::new(-b, a)),
        _ => None,
    }
}

fn solution_report<S: Scalar>(
    index: usize,
    volume: S::Real,
    complex_volume: &S,
    precision: &Precision,
    parameters: &SolverParameters,
) -> SolutionReport {
    let volume = if precision.is_small(&volume) {
        S::Real::zero()
    } else {
        volume
    };
    let chern_simons = complex_volume.im();
    let all_digits = !precision.fits_double();
    SolutionReport {
        index,
        volume: Some(volume.to_f64()),
        chern_simons: Some(chern_simons.to_f64()),
        chern_simons_over_pi_squared: recognize_chern_simons(
            chern_simons.to_f64(),
            precision,
            parameters.max_relation_coefficient,
        )
        .map(|r| r.to_string()),
        volume_digits: all_digits.then(|| volume.to_string()),
        chern_simons_digits: all_digits.then(|| chern_simons.to_string()),
        warning: None,
        error: None,
    }
}

/// Converts a non-fatal error into a warning.
fn demote(error: PtolemyError, warning: Warning) -> Result<Warning> {
    if error.is_fatal() {
        return Err(error);
    }
    warn!("{}: {}", warning, error);
    Ok(warning)
}

/// Solves the equations, checks the number of solutions if it is known
/// and evaluates every solution. Results are sorted by volume and
/// Chern-Simons invariant and followed by the solutions that failed.
/// The returned warning applies to the whole set of equations.
fn evaluate_equations(
    variety: &PtolemyVariety,
    equations: &[Equation],
    free_dimension: usize,
    expected_solutions: Option<usize>,
    precision: &Precision,
    parameters: &SolverParameters,
) -> Result<(Vec<SolutionReport>, Option<Warning>)> {
    if precision.fits_double() {
        evaluate_numerically::<Complex<f64>>(
            variety,
            equations,
            free_dimension,
            expected_solutions,
            precision,
            parameters,
        )
    } else {
        evaluate_numerically::<BigComplex>(
            variety,
            equations,
            free_dimension,
            expected_solutions,
            precision,
            parameters,
        )
    }
}

fn evaluate_numerically<S: Scalar>(
    variety: &PtolemyVariety,
    equations: &[Equation],
    free_dimension: usize,
    expected_solutions: Option<usize>,
    precision: &Precision,
    parameters: &SolverParameters,
) -> Result<(Vec<SolutionReport>, Option<Warning>)> {
    let mut solver = Solver::new(precision, free_dimension, parameters.seed);
    let solutions = match solver.solve_partially(&to_numeric::<_, S>(equations, precision)) {
        Ok(solutions) => solutions,
        Err(e) => return Ok((vec![], Some(demote(e, Warning::NumericalError)?))),
    };
    let mut warning = None;
    if let Some(expected) = expected_solutions {
        let found = solutions.assignments.len() + solutions.failures.len();
        if expected != found {
            warn!("Expected {} solutions, found {}", expected, found);
            warning = Some(Warning::SolutionCountMismatch);
        }
    }
    let dilog = Dilogarithm::new(precision);
    let mut failures = solutions.failures;
    let mut values = vec![];
    for assignment in solutions.assignments.iter() {
        match evaluate_solution(variety, assignment, &dilog, precision, parameters.paranoid) {
            Ok(value) => values.push(value),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => failures.push(e),
        }
    }
    for failure in failures.iter() {
        warn!("{}: {}", Warning::NumericalError, failure);
    }
    if !failures.is_empty() && warning.is_none() {
        warning = Some(Warning::NumericalError);
    }
    values.sort_by_key(|(volume, complex_volume)| {
        (
            OrderedFloat(volume.to_f64()),
            OrderedFloat(complex_volume.im().to_f64()),
        )
    });
    let mut reports: Vec<SolutionReport> = values
        .into_iter()
        .enumerate()
        .map(|(index, (volume, complex_volume))| {
            solution_report(index, volume, &complex_volume, precision, parameters)
        })
        .collect();
    let evaluated = reports.len();
    reports.extend(
        failures
            .iter()
            .enumerate()
            .map(|(index, error)| SolutionReport::failed(evaluated + index, error)),
    );
    Ok((reports, warning))
}

pub fn evaluate_component(
    variety: &PtolemyVariety,
    index: usize,
    component: &PrimeIdeal,
    precision: &Precision,
    parameters: &SolverParameters,
) -> Result<ComponentReport> {
    let mut report = ComponentReport {
        index,
        dimension: component.dimension,
        number_of_points: component.number_of_points,
        warning: None,
        solutions: vec![],
    };
    if component.dimension > 0 {
        report.warning = Some(Warning::PositiveDimensionalComponent);
        if !parameters.solve_positive_dimensional {
            return Ok(report);
        }
    }
    let expected_solutions = if component.dimension == 0 {
        component.number_of_points
    } else {
        None
    };
    let (solutions, warning) = evaluate_equations(
        variety,
        &component.generators,
        component.free_variables(),
        expected_solutions,
        precision,
        parameters,
    )?;
    report.solutions = solutions;
    if warning.is_some() {
        report.warning = warning;
    }
    Ok(report)
}

/// The variety the decomposition was computed for.
pub fn variety_of_output(output: &DecompositionOutput) -> Result<PtolemyVariety> {
    let header = &output.header;
    let class = obstruction_classes_for(&output.triangulation, header.n)?
        .into_iter()
        .nth(header.class_index)
        .ok_or_else(|| {
            PtolemyError::structural(format!(
                "{} has no obstruction class {}",
                header.name, header.class_index
            ))
        })?;
    let variety = PtolemyVariety::new(&output.triangulation, header.n, class)?;
    if variety.variables() != header.term_order {
        return Err(PtolemyError::structural(format!(
            "variables of the decomposition of {} do not match its Ptolemy variety",
            header.name
        )));
    }
    Ok(variety)
}

pub fn evaluate_decomposition(
    output: &DecompositionOutput,
    precision: &Precision,
    parameters: &SolverParameters,
) -> Result<Report> {
    let variety = variety_of_output(output)?;
    let mut report = Report::new(&variety, output.header.cputime);
    report.warning = match output.failure {
        Some(failure) => Some(failure.into()),
        None if output.components.is_empty() => Some(Warning::EmptyIdeal),
        None => None,
    };
    for (index, component) in output.components.iter().enumerate() {
        report.components.push(evaluate_component(
            &variety, index, component, precision, parameters,
        )?);
    }
    info!(
        "{} (N = {}, obstruction class {}): {} components, {} solutions",
        report.name,
        report.n,
        report.obstruction_class,
        report.components.len(),
        report.solutions().count()
    );
    Ok(report)
}

/// Runs the external decomposition on the variety and evaluates the
/// result.
pub fn decompose_and_evaluate(
    variety: &PtolemyVariety,
    decomposer: &ExternalDecomposer,
    precision: &Precision,
    parameters: &SolverParameters,
) -> Result<Report> {
    let output = match decomposer.run(&decomposition_input(variety)) {
        Ok(output) => output,
        Err(PtolemyError::Timeout(duration)) => {
            warn!("Decomposition of {} timed out after {:?}", variety.triangulation.name, duration);
            return Ok(Report::with_warning(variety, Warning::Timeout));
        }
        Err(e) => {
            let warning = demote(e, Warning::CrashedAborted)?;
            return Ok(Report::with_warning(variety, warning));
        }
    };
    let output = parse_output(&output)?;
    evaluate_decomposition(&output, precision, parameters)
}

/// Solves the variety numerically without decomposing it first. Only
/// feasible for small varieties whose equations can be eliminated
/// one variable at a time.
pub fn solve_variety(
    variety: &PtolemyVariety,
    precision: &Precision,
    parameters: &SolverParameters,
) -> Result<Report> {
    let mut report = Report::new(variety, None);
    let mut component = ComponentReport {
        index: 0,
        dimension: parameters.free_dimension,
        number_of_points: None,
        warning: None,
        solutions: vec![],
    };
    let (solutions, warning) = evaluate_equations(
        variety,
        &variety.equations,
        parameters.free_dimension,
        None,
        precision,
        parameters,
    )?;
    if solutions.is_empty() && warning.is_none() {
        report.warning = Some(Warning::EmptyIdeal);
    } else {
        component.number_of_points = Some(solutions.len());
        component.solutions = solutions;
        component.warning = warning;
    }
    report.components.push(component);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use std::fs;
    use std::time::Duration;

    use num::rational::Ratio;

    use super::evaluate_decomposition;
    use super::evaluate_component;
    use super::decompose_and_evaluate;
    use super::recognize_chern_simons;
    use super::solve_variety;
    use super::Warning;
    use crate::algebra::parse::parse_polynomial_list;
    use crate::algebra::BigFloat;
    use crate::algebra::Precision;
    use crate::decomposition::parse_output;
    use crate::decomposition::ExternalDecomposer;
    use crate::decomposition::PrimeIdeal;
    use crate::decomposition::DecompositionOutput;
    use crate::parameters::SolverParameters;
    use crate::ptolemy::ptolemy_varieties;
    use crate::test_utils::assert_float_is_close_high_error;
    use crate::test_utils::tests_path;
    use crate::triangulation::tests::figure_eight;

    const FIGURE_EIGHT_VOLUME: f64 = 2.029883212819307;

    fn read_output(name: &str) -> DecompositionOutput {
        let path = tests_path().join("decompositions").join(name);
        parse_output(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn check_figure_eight_solutions(report: &super::Report) {
        let solutions: Vec<_> = report.solutions().collect();
        assert_eq!(solutions.len(), 2);
        assert_float_is_close_high_error(solutions[0].volume.unwrap(), -FIGURE_EIGHT_VOLUME);
        assert_float_is_close_high_error(solutions[1].volume.unwrap(), FIGURE_EIGHT_VOLUME);
        for solution in solutions {
            assert!(solution.is_valid());
            assert_eq!(solution.volume_digits, None);
            assert_float_is_close_high_error(solution.chern_simons.unwrap().abs(), PI * PI / 3.0);
            let ratio = solution.chern_simons_over_pi_squared.as_deref();
            assert!(ratio == Some("1/3") || ratio == Some("-1/3"));
        }
    }

    #[test]
    fn figure_eight_from_decomposition() {
        let precision = Precision::default();
        for paranoid in [false, true] {
            let parameters = SolverParameters {
                paranoid,
                ..Default::default()
            };
            let output = read_output("m004_sl2_c1.magma_out");
            let report = evaluate_decomposition(&output, &precision, &parameters).unwrap();
            assert_eq!(report.name, "m004");
            assert_eq!(report.obstruction_class, 1);
            assert_eq!(report.tetrahedra, 2);
            assert_eq!(report.cusps, 1);
            assert_eq!(report.warning, None);
            assert_eq!(report.components[0].warning, None);
            check_figure_eight_solutions(&report);
        }
    }

    #[test]
    fn figure_eight_solved_directly() {
        let precision = Precision::default();
        let parameters = SolverParameters::default();
        let varieties = ptolemy_varieties(&figure_eight(), 2).unwrap();
        let trivial = solve_variety(&varieties[0], &precision, &parameters).unwrap();
        assert_eq!(trivial.warning, Some(Warning::EmptyIdeal));
        let report = solve_variety(&varieties[1], &precision, &parameters).unwrap();
        check_figure_eight_solutions(&report);
        let yaml = serde_yaml::to_string(&report).unwrap();
        assert!(yaml.contains("chern_simons_over_pi_squared"));
    }

    #[test]
    fn warnings() {
        let precision = Precision::default();
        let parameters = SolverParameters::default();
        let output = read_output("m004_sl2_c0.magma_out");
        let report = evaluate_decomposition(&output, &precision, &parameters).unwrap();
        assert_eq!(report.warning, Some(Warning::EmptyIdeal));
        let output = read_output("m004_sl2_c1.magma_out");
        let variety = super::variety_of_output(&output).unwrap();
        let mut component = output.components[0].clone();
        component.number_of_points = Some(3);
        let report = evaluate_component(&variety, 0, &component, &precision, &parameters).unwrap();
        assert_eq!(report.warning, Some(Warning::SolutionCountMismatch));
        assert_eq!(report.solutions.len(), 2);
        assert!(report.solutions.iter().all(|s| s.is_valid()));
        let positive_dimensional = PrimeIdeal {
            generators: parse_polynomial_list("c_0011_0 - 1, t*c_0101_1 - 1").unwrap(),
            dimension: 1,
            number_of_points: None,
        };
        let report =
            evaluate_component(&variety, 1, &positive_dimensional, &precision, &parameters).unwrap();
        assert_eq!(report.warning, Some(Warning::PositiveDimensionalComponent));
        assert!(report.solutions.is_empty());
        let parameters = SolverParameters {
            solve_positive_dimensional: true,
            ..Default::default()
        };
        let report =
            evaluate_component(&variety, 1, &positive_dimensional, &precision, &parameters).unwrap();
        assert_eq!(report.warning, Some(Warning::NumericalError));
    }

    #[test]
    fn external_failures_become_warnings() {
        let precision = Precision::default();
        let parameters = SolverParameters::default();
        let varieties = ptolemy_varieties(&figure_eight(), 2).unwrap();
        let slow = ExternalDecomposer::new(
            "sh",
            vec!["-c".into(), "exec sleep 10".into()],
            Duration::from_millis(200),
        );
        let report = decompose_and_evaluate(&varieties[1], &slow, &precision, &parameters).unwrap();
        assert_eq!(report.warning, Some(Warning::Timeout));
        let missing = ExternalDecomposer::new("/nonexistent/decomposition-program", vec![], Duration::from_secs(1));
        let report = decompose_and_evaluate(&varieties[1], &missing, &precision, &parameters).unwrap();
        assert_eq!(report.warning, Some(Warning::CrashedAborted));
        let fixture = tests_path().join("decompositions").join("m004_sl2_c1.magma_out");
        let replay = ExternalDecomposer::new(
            "sh",
            vec!["-c".into(), format!("cat > /dev/null; cat {}", fixture.display())],
            Duration::from_secs(10),
        );
        let report = decompose_and_evaluate(&varieties[1], &replay, &precision, &parameters).unwrap();
        check_figure_eight_solutions(&report);
    }

    #[test]
    fn failed_solution_keeps_its_siblings() {
        // (b - 1)^3 = 1 has the two figure eight solutions and b = 2,
        // which violates the Ptolemy relation.
        let precision = Precision::default();
        let parameters = SolverParameters::default();
        let output = read_output("m004_sl2_c1.magma_out");
        let variety = super::variety_of_output(&output).unwrap();
        let component = PrimeIdeal {
            generators: parse_polynomial_list(
                "c_0011_0 - 1, c_0101_1^3 - 3*c_0101_1^2 + 3*c_0101_1 - 2",
            )
            .unwrap(),
            dimension: 0,
            number_of_points: Some(3),
        };
        let report = evaluate_component(&variety, 0, &component, &precision, &parameters).unwrap();
        assert_eq!(report.warning, Some(Warning::NumericalError));
        assert_eq!(report.solutions.len(), 3);
        assert_float_is_close_high_error(report.solutions[0].volume.unwrap(), -FIGURE_EIGHT_VOLUME);
        assert_float_is_close_high_error(report.solutions[1].volume.unwrap(), FIGURE_EIGHT_VOLUME);
        let failed = &report.solutions[2];
        assert_eq!(failed.index, 2);
        assert!(!failed.is_valid());
        assert_eq!(failed.warning, Some(Warning::NumericalError));
        assert_eq!(failed.volume, None);
        assert!(failed.error.as_deref().unwrap().contains("Ptolemy relation"));
        let yaml = serde_yaml::to_string(&report).unwrap();
        assert!(yaml.contains("Ptolemy relation"));
    }

    #[test]
    fn figure_eight_in_sl3() {
        let precision = Precision::default();
        let parameters = SolverParameters::default();
        let output = read_output("m004_sl3_c0.magma_out");
        let report = evaluate_decomposition(&output, &precision, &parameters).unwrap();
        assert_eq!(report.n, 3);
        assert_eq!(report.warning, None);
        assert_eq!(report.components.len(), 3);
        for component in report.components.iter() {
            assert_eq!(component.solutions.len(), 2);
        }
        let geometric = &report.components[1];
        assert_eq!(geometric.warning, None);
        let volumes: Vec<f64> = geometric.solutions.iter().map(|s| s.volume.unwrap()).collect();
        assert_float_is_close_high_error(volumes[0], -4.0 * FIGURE_EIGHT_VOLUME);
        assert_float_is_close_high_error(volumes[1], 4.0 * FIGURE_EIGHT_VOLUME);
        for solution in geometric.solutions.iter() {
            let ratio = solution.chern_simons_over_pi_squared.as_deref();
            assert!(ratio == Some("1/3") || ratio == Some("-1/3"), "{:?}", ratio);
        }
    }

    #[test]
    fn figure_eight_to_forty_digits() {
        let precision = Precision::new(40, None).unwrap();
        let parameters = SolverParameters::default();
        let varieties = ptolemy_varieties(&figure_eight(), 2).unwrap();
        let report = solve_variety(&varieties[1], &precision, &parameters).unwrap();
        let solutions: Vec<_> = report.solutions().collect();
        assert_eq!(solutions.len(), 2);
        let digits = solutions[1].volume_digits.as_deref().unwrap();
        assert!(digits.starts_with("2.02988321281930725004240510854"), "{}", digits);
        assert_float_is_close_high_error(solutions[1].volume.unwrap(), FIGURE_EIGHT_VOLUME);
        let bits = precision.bits();
        let pi = BigFloat::pi(bits);
        let expected = pi.clone() * pi / BigFloat::from(3);
        for solution in solutions {
            let digits = solution.chern_simons_digits.as_deref().unwrap();
            let chern_simons = BigFloat::parse_with_bits(digits, bits).unwrap();
            assert!((chern_simons.abs() - expected.clone()).abs().to_f64() < 1e-30, "{}", digits);
        }
    }

    #[test]
    fn chern_simons_recognition() {
        let precision = Precision::default();
        assert_eq!(
            recognize_chern_simons(PI * PI / 3.0, &precision, 1000),
            Some(Ratio::new(1, 3))
        );
        assert_eq!(
            recognize_chern_simons(-PI * PI / 6.0, &precision, 1000),
            Some(Ratio::new(-1, 6))
        );
        assert_eq!(recognize_chern_simons(0.0, &precision, 1000), Some(Ratio::new(0, 1)));
        assert_eq!(recognize_chern_simons(1.0, &precision, 1000), None);
    }
}
