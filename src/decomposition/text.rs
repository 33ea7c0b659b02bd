use std::fmt;

use log::debug;
use regex::Regex;

use super::PrimeIdeal;
use super::ProcessFailure;
use crate::algebra::parse::parse_polynomial;
use crate::error::PtolemyError;
use crate::error::Result;
use crate::ptolemy::PtolemyVariety;
use crate::ptolemy::Variable;
use crate::triangulation::Triangulation;

/// Printed in two pieces so that the input itself does not contain it.
const OUTPUT_MARKER: (&str, &str) = ("PTOLEMY=DECOMPOSITION", "=OUTPUT");
const INPUT_MARKER: &str = "PTOLEMY=DECOMPOSITION=INPUT";
const DECOMPOSITION_BEGINS: &str = "PRIMARY=DECOMPOSITION=BEGINS=HERE";
const DECOMPOSITION_ENDS: &str = "PRIMARY=DECOMPOSITION=ENDS=HERE";
const TRIANGULATION_BEGINS: &str = "==TRIANGULATION=BEGINS==";
const TRIANGULATION_ENDS: &str = "==TRIANGULATION=ENDS==";
const OUT_OF_MEMORY: &str = "All virtual memory has been exhausted";
const DECORATION_METHOD: &str = "AUTOMATIC_FIX_DECORATION";
const QUOTED_LINE_LENGTH: usize = 60;

const CLASS_LABEL: &str = "IND OF COH CLASS";
const NAME_LABEL: &str = "NAME";
const N_LABEL: &str = "N";
const DECORATIONS_LABEL: &str = "DECORATIONS";
const TERM_ORDER_LABEL: &str = "TERM ORDER";
const CPUTIME_LABEL: &str = "CPUTIME";

const COMPONENT_PATTERN: &str = r"(?s)Ideal of Polynomial ring.*?Dimension (\d+).*?(?:Size of variety over algebraically closed field: (\d+).*?)?Groebner basis:\s*\[([^\]]*)\]";

pub fn input_file_name(base: &str, n: usize, class_index: usize) -> String {
    format!("{}_sl{}_c{}.magma", base, n, class_index)
}

/// The program computing the primary decomposition of the variety,
/// preceded by a human readable description and print statements
/// that let the output be interpreted on its own.
pub struct DecompositionInput<'a>(pub &'a PtolemyVariety);

impl fmt::Display for DecompositionInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_comment(self.0, f)?;
        write_header(self.0, f)?;
        write_ideal(self.0, f)
    }
}

pub fn decomposition_input(variety: &PtolemyVariety) -> String {
    DecompositionInput(variety).to_string()
}

fn write_comment(variety: &PtolemyVariety, out: &mut fmt::Formatter<'_>) -> fmt::Result {
    let triangulation = &variety.triangulation;
    writeln!(out, "/*")?;
    writeln!(
        out,
        "Ptolemy variety for PSL({}, C) representations of {}",
        variety.n, triangulation.name
    )?;
    writeln!(out)?;
    if !triangulation.is_ordered() {
        writeln!(out, "The triangulation is not ordered.")?;
    }
    for tet in triangulation.tetrahedra() {
        let orientation = if tet.positive_orientation {
            "positively"
        } else {
            "negatively"
        };
        writeln!(out, "Tetrahedron {} is oriented {}.", tet.index, orientation)?;
    }
    writeln!(out)?;
    match &variety.obstruction_class {
        Some(class) => writeln!(
            out,
            "Obstruction class {} in H^2(M, boundary M; Z/2), values on face classes: {:?}",
            class.index, class.face_values
        )?,
        None => writeln!(out, "No obstruction class.")?,
    }
    writeln!(out)?;
    writeln!(out, "Identified Ptolemy coordinates:")?;
    for (c, (sign, representative)) in variety
        .identification
        .iter()
        .filter(|(c, (_, representative))| *c != representative)
    {
        let sign = if *sign < 0 { "-" } else { " " };
        writeln!(out, "    {} : {}{}", c, sign, representative)?;
    }
    writeln!(out)?;
    writeln!(out, "Equations:")?;
    for equation in variety.unidentified_equations.iter() {
        writeln!(out, "    {}", equation)?;
    }
    writeln!(out, "*/")?;
    writeln!(out)
}

fn print_field(out: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(out, "print \"{:<17}: {}\";", label, value)
}

fn write_header(variety: &PtolemyVariety, out: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(out, "print \"{}\" cat \"{}\";", OUTPUT_MARKER.0, OUTPUT_MARKER.1)?;
    writeln!(out, "/* {} */", INPUT_MARKER)?;
    print_field(out, CLASS_LABEL, variety.class_index())?;
    print_field(out, NAME_LABEL, &variety.triangulation.name)?;
    print_field(out, N_LABEL, variety.n)?;
    print_field(out, DECORATIONS_LABEL, DECORATION_METHOD)?;
    print_field(out, TERM_ORDER_LABEL, format!("[{}]", variable_names(variety).join(", ")))?;
    writeln!(out, "print \"{}\";", TRIANGULATION_BEGINS)?;
    writeln!(out, "print \"{}\";", quote(&variety.triangulation.to_snappea()))?;
    writeln!(out, "print \"{}\";", TRIANGULATION_ENDS)?;
    writeln!(out)
}

fn write_ideal(variety: &PtolemyVariety, out: &mut fmt::Formatter<'_>) -> fmt::Result {
    let names = variable_names(variety);
    writeln!(
        out,
        "P<{}> := PolynomialRing(RationalField(), {});",
        names.join(", "),
        names.len()
    )?;
    writeln!(out, "I := ideal<P |")?;
    let equations: Vec<String> = variety
        .equations
        .iter()
        .map(|e| format!("    {}", e))
        .collect();
    writeln!(out, "{}>;", equations.join(",\n"))?;
    writeln!(out)?;
    writeln!(out, "cputime := Cputime();")?;
    writeln!(out, "print \"{}\";", DECOMPOSITION_BEGINS)?;
    writeln!(out, "PrimaryDecomposition(I);")?;
    writeln!(out, "print \"{}\";", DECOMPOSITION_ENDS)?;
    writeln!(out, "print \"{:<17}:\", Cputime(cputime);", CPUTIME_LABEL)
}

fn variable_names(variety: &PtolemyVariety) -> Vec<String> {
    variety.variables().iter().map(|v| v.to_string()).collect()
}

/// Turns text into the body of a string literal. Long lines are broken
/// with a backslash continuation.
fn quote(text: &str) -> String {
    text.lines()
        .map(|line| {
            let chars: Vec<char> = line.chars().collect();
            chars
                .chunks(QUOTED_LINE_LENGTH)
                .map(|chunk| {
                    chunk
                        .iter()
                        .collect::<String>()
                        .replace('\\', "\\\\")
                        .replace('"', "\\\"")
                })
                .collect::<Vec<_>>()
                .join("\\\n")
        })
        .collect::<Vec<_>>()
        .join("\\n")
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecompositionHeader {
    pub name: String,
    pub n: usize,
    pub class_index: usize,
    pub term_order: Vec<Variable>,
    pub cputime: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct DecompositionOutput {
    pub header: DecompositionHeader,
    pub triangulation: Triangulation,
    pub components: Vec<PrimeIdeal>,
    pub failure: Option<ProcessFailure>,
}

/// Long output lines are broken with a trailing backslash.
fn join_continued_lines(text: &str) -> String {
    let mut joined = String::new();
    let mut continued = false;
    for line in text.lines() {
        let line = if continued { line.trim_start() } else { line };
        match line.trim_end().strip_suffix('\\') {
            Some(start) => {
                joined.push_str(start.trim_end());
                continued = true;
            }
            None => {
                joined.push_str(line);
                joined.push('\n');
                continued = false;
            }
        }
    }
    joined
}

fn between<'a>(text: &'a str, begin: &str, end: &str) -> Option<&'a str> {
    let start = text.find(begin)? + begin.len();
    let length = text[start..].find(end)?;
    Some(&text[start..start + length])
}

fn header_field<'a>(output: &'a str, label: &str) -> Result<&'a str> {
    output
        .lines()
        .find_map(|line| {
            line.strip_prefix(label)?
                .trim_start()
                .strip_prefix(':')
                .map(str::trim)
        })
        .ok_or_else(|| PtolemyError::parse(format!("missing {} in decomposition output", label)))
}

fn parse_number<T: std::str::FromStr>(value: &str, label: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| PtolemyError::parse(format!("invalid {}: {}", label, value)))
}

fn parse_header(output: &str) -> Result<DecompositionHeader> {
    let term_order = header_field(output, TERM_ORDER_LABEL)?;
    let term_order = term_order
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| PtolemyError::parse(format!("invalid term order: {}", term_order)))?
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.parse())
        .collect::<Result<_>>()?;
    let cputime = match header_field(output, CPUTIME_LABEL) {
        Ok(value) => Some(parse_number(value, CPUTIME_LABEL)?),
        Err(_) => None,
    };
    Ok(DecompositionHeader {
        name: header_field(output, NAME_LABEL)?.to_owned(),
        n: parse_number(header_field(output, N_LABEL)?, N_LABEL)?,
        class_index: parse_number(header_field(output, CLASS_LABEL)?, CLASS_LABEL)?,
        term_order,
        cputime,
    })
}

/// The contents of the last list at bracket depth zero.
fn last_top_level_list(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start = 0;
    let mut last = None;
    for (i, c) in text.char_indices() {
        match c {
            '[' => {
                if depth == 0 {
                    start = i + 1;
                }
                depth += 1;
            }
            ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    last = Some(&text[start..i]);
                }
            }
            _ => {}
        }
    }
    last
}

/// The decomposition prints the primary components followed by the
/// associated prime ideals. Only the latter are used.
fn parse_components(decomposition: &str) -> Result<Vec<PrimeIdeal>> {
    let primes = last_top_level_list(decomposition)
        .ok_or_else(|| PtolemyError::parse("no list of prime ideals in decomposition output"))?;
    let pattern = Regex::new(COMPONENT_PATTERN)
        .map_err(|e| PtolemyError::parse(format!("invalid component pattern: {}", e)))?;
    pattern
        .captures_iter(primes)
        .map(|captures| {
            let dimension = parse_number(&captures[1], "dimension")?;
            let number_of_points = captures
                .get(2)
                .map(|m| parse_number(m.as_str(), "number of points"))
                .transpose()?;
            let generators = captures[3]
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(parse_polynomial)
                .collect::<Result<_>>()?;
            Ok(PrimeIdeal {
                generators,
                dimension,
                number_of_points,
            })
        })
        .collect()
}

pub fn parse_output(output: &str) -> Result<DecompositionOutput> {
    let output = join_continued_lines(output);
    if !output.contains(&format!("{}{}", OUTPUT_MARKER.0, OUTPUT_MARKER.1)) {
        return Err(PtolemyError::parse("not the output of a decomposition run"));
    }
    let header = parse_header(&output)?;
    let triangulation = between(&output, TRIANGULATION_BEGINS, TRIANGULATION_ENDS)
        .ok_or_else(|| PtolemyError::parse("no triangulation in decomposition output"))?;
    let triangulation = Triangulation::from_snappea(triangulation.trim())?;
    let failure = if output.contains(OUT_OF_MEMORY) {
        Some(ProcessFailure::OutOfMemory)
    } else if !output.contains(DECOMPOSITION_ENDS) {
        Some(ProcessFailure::Crashed)
    } else {
        None
    };
    let components = match failure {
        Some(_) => vec![],
        None => {
            let decomposition = between(&output, DECOMPOSITION_BEGINS, DECOMPOSITION_ENDS)
                .ok_or_else(|| PtolemyError::parse("no primary decomposition in output"))?;
            parse_components(decomposition)?
        }
    };
    debug!(
        "Decomposition of {} (N = {}, class {}) has {} components",
        header.name,
        header.n,
        header.class_index,
        components.len()
    );
    Ok(DecompositionOutput {
        header,
        triangulation,
        components,
        failure,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::decomposition_input;
    use super::input_file_name;
    use super::DecompositionInput;
    use super::join_continued_lines;
    use super::last_top_level_list;
    use super::parse_output;
    use super::quote;
    use super::DECOMPOSITION_ENDS;
    use crate::algebra::parse::parse_polynomial;
    use crate::decomposition::ProcessFailure;
    use crate::ptolemy::ptolemy_varieties;
    use crate::ptolemy::Variable;
    use crate::test_utils::tests_path;
    use crate::triangulation::tests::figure_eight;

    fn read_output(name: &str) -> String {
        fs::read_to_string(tests_path().join("decompositions").join(name)).unwrap()
    }

    #[test]
    fn input_for_figure_eight() {
        let varieties = ptolemy_varieties(&figure_eight(), 2).unwrap();
        let input = decomposition_input(&varieties[1]);
        assert!(input.contains("P<t, c_0011_0, c_0101_1> := PolynomialRing(RationalField(), 3);"));
        assert!(input.contains("print \"IND OF COH CLASS : 1\";"));
        assert!(input.contains("print \"N                : 2\";"));
        assert!(input.contains("print \"TERM ORDER       : [t, c_0011_0, c_0101_1]\";"));
        assert!(input.contains("PrimaryDecomposition(I);"));
        assert!(input.contains("    c_1010_0 :  c_0101_1\n"));
        assert!(input.contains("    c_1100_1 : -c_0101_1\n"));
        assert!(!input.contains("PTOLEMY=DECOMPOSITION=OUTPUT"));
        assert_eq!(input_file_name("data/m004", 2, 1), "data/m004_sl2_c1.magma");
        assert_eq!(
            format!("{}", DecompositionInput(&varieties[1])),
            input
        );
    }

    #[test]
    fn quoted_text_can_be_recovered() {
        let text = format!("short line\n{}\nwith \"quotes\"", "x".repeat(130));
        let quoted = quote(&text);
        assert_eq!(quoted.lines().count(), 3);
        let recovered = quoted
            .replace("\\\n", "")
            .replace("\\n", "\n")
            .replace("\\\"", "\"");
        assert_eq!(recovered, text);
    }

    #[test]
    fn continued_lines_are_joined() {
        assert_eq!(
            join_continued_lines("c_0011_0 + c_01\\\n   01_1\nnext\n"),
            "c_0011_0 + c_0101_1\nnext\n"
        );
    }

    #[test]
    fn last_list() {
        assert_eq!(last_top_level_list("[ a [b] ] [ c [d] ]"), Some(" c [d] "));
        assert_eq!(last_top_level_list("[]\n[]"), Some(""));
        assert_eq!(last_top_level_list("nothing"), None);
        assert_eq!(last_top_level_list("]["), None);
    }

    #[test]
    fn parse_figure_eight_output() {
        let output = parse_output(&read_output("m004_sl2_c1.magma_out")).unwrap();
        assert_eq!(output.header.name, "m004");
        assert_eq!(output.header.n, 2);
        assert_eq!(output.header.class_index, 1);
        assert_eq!(output.header.cputime, Some(0.03));
        let names: Vec<String> = output.header.term_order.iter().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["t", "c_0011_0", "c_0101_1"]);
        assert_eq!(output.header.term_order[0], Variable::NonZero);
        assert_eq!(output.triangulation.num_tetrahedra(), 2);
        assert_eq!(output.failure, None);
        assert_eq!(output.components.len(), 1);
        let component = &output.components[0];
        assert_eq!(component.dimension, 0);
        assert_eq!(component.number_of_points, Some(2));
        assert_eq!(component.free_variables(), 0);
        assert_eq!(
            component.generators,
            vec![
                parse_polynomial::<Variable>("t + c_0101_1 - 1").unwrap(),
                parse_polynomial::<Variable>("c_0011_0 - 1").unwrap(),
                parse_polynomial::<Variable>("c_0101_1^2 - c_0101_1 + 1").unwrap(),
            ]
        );
    }

    #[test]
    fn parse_empty_decomposition() {
        let output = parse_output(&read_output("m004_sl2_c0.magma_out")).unwrap();
        assert_eq!(output.header.class_index, 0);
        assert_eq!(output.failure, None);
        assert!(output.components.is_empty());
    }

    #[test]
    fn failures_are_detected() {
        let complete = read_output("m004_sl2_c1.magma_out");
        let crashed = &complete[..complete.find(DECOMPOSITION_ENDS).unwrap()];
        let output = parse_output(crashed).unwrap();
        assert_eq!(output.failure, Some(ProcessFailure::Crashed));
        assert!(output.components.is_empty());
        assert_eq!(output.header.cputime, None);
        let out_of_memory = format!("{}\nAll virtual memory has been exhausted\n", crashed);
        let output = parse_output(&out_of_memory).unwrap();
        assert_eq!(output.failure, Some(ProcessFailure::OutOfMemory));
        assert!(parse_output("some unrelated text").is_err());
    }
}
