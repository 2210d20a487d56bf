// Script runner: discovers every .sx file under tests/scripts/, runs it and
// compares the printed lines with the sibling .expected file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use walkdir::WalkDir;

use sexpr::cli::output::OutputBuffer;
use sexpr::runtime::eval::{evaluate_program, EvalOptions};
use sexpr::runtime::registry::build_default_runtime;
use sexpr::runtime::source::SourceContext;
use sexpr::syntax::parse;
use sexpr::SexprError;

fn find_test_scripts(dir: &str) -> Vec<(PathBuf, PathBuf)> {
    let mut tests = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "sx") {
            let expected = path.with_extension("expected");
            if expected.exists() {
                tests.push((path.to_path_buf(), expected));
            }
        }
    }
    tests
}

fn read_file_trimmed(path: &Path) -> io::Result<String> {
    Ok(fs::read_to_string(path)?
        .replace("\r\n", "\n")
        .trim()
        .to_string())
}

fn run_script(path: &Path, text: &str) -> Result<OutputBuffer, SexprError> {
    let source = SourceContext::from_file(path.display().to_string(), text);
    let program = parse(text, &source)?;
    let mut runtime = build_default_runtime();
    let mut output = OutputBuffer::new();
    evaluate_program(&program, &mut runtime, &mut output, &source, EvalOptions::default())?;
    Ok(output)
}

#[test]
fn integration_scripts() {
    let scripts = find_test_scripts("tests/scripts");
    assert!(!scripts.is_empty(), "No .sx test scripts found in tests/scripts/");

    let mut failed = Vec::new();
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    for (script, expected) in scripts {
        let name = script.display().to_string();
        let text = fs::read_to_string(&script).expect("Failed to read script");
        let expected_output = read_file_trimmed(&expected).expect("Failed to read expected output");

        let (passed, detail) = match run_script(&script, &text) {
            Ok(output) => {
                let actual = output.contents().trim().to_string();
                if actual == expected_output {
                    (true, String::new())
                } else {
                    (
                        false,
                        format!("--- expected\n{expected_output}\n--- actual\n{actual}"),
                    )
                }
            }
            Err(e) => (false, format!("script failed: {e}")),
        };

        let (color, label) = if passed {
            (Color::Green, "PASS")
        } else {
            (Color::Red, "FAIL")
        };
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(stdout, "{label}");
        let _ = stdout.reset();
        let _ = writeln!(stdout, " {name}");
        if !passed {
            let _ = writeln!(stdout, "{detail}");
            failed.push(name);
        }
    }

    assert!(failed.is_empty(), "failing scripts: {failed:?}");
}
