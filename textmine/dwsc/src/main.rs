//! dws CLI
//!
//! Pairwise corpus intersection with a streamed JSON report.

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use dws_intersect::Algorithm;
use dwsc::{run_intersection, ExecConfig, ProgressTick, RunError, RunOptions};

fn main() {
    dwsc::tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "run" => run_command(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-v" => {
            println!("dws {}", env!("CARGO_PKG_VERSION"));
        }
        unknown => {
            eprintln!("Unknown command: {unknown}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    println!("dws - dominating word sets");
    println!();
    println!("Usage: dws run -i <first file> -j <second file> -o <result file> [options]");
    println!();
    println!("Commands:");
    println!("  run                 Compute all pairwise intersections and write the report");
    println!("  help                Show this help message");
    println!("  version             Show version information");
    println!();
    println!("Run options:");
    println!("  -i <file>           First input corpus (the reference side of every pair)");
    println!("  -j <file>           Second input corpus (keys the outer report objects)");
    println!("  -o <file>           Result JSON file");
    println!("  --algorithm=<name>  Intersection algorithm: nested-loops (default),");
    println!("                      quicksort, heapsort");
    println!("  --abort-at=<pct>    Debug: stop after this progress percentage");
    println!();
    println!("Switches (defaults: partial + full matches, stop-word filter, char");
    println!("offsets, case-sensitive):");
    println!("  --no-part-match             Leave partial matches out of the report");
    println!("  --no-full-match             Leave full matches out of the report");
    println!("  --no-stop-word-list         Keep stop words in the results");
    println!("  --sentence-offset           Add sentence offsets to inner objects");
    println!("  --word-offset               Add word offsets to inner objects");
    println!("  --case-insensitive          Lowercase all tokens at ingest");
    println!("  --shorten-output            Compact JSON instead of formatted");
    println!("  --no-filenames              Suppress file names in the header");
    println!("  --no-creation-time          Suppress the timestamp in the header");
    println!("  --no-program-version        Suppress the version in the header");
    println!("  --keep-single-token-results Report results with only one token");
    println!("  --show-too-long-tokens      Add the over-long-token block");
    println!();
    println!("Examples:");
    println!("  dws run -i synonyms.txt -j interventions.txt -o result.json");
    println!("  dws run -i a.txt -j b.txt -o out.json --algorithm=heapsort --word-offset");
}

struct RunArgs {
    first: PathBuf,
    second: PathBuf,
    output: PathBuf,
    options: RunOptions,
}

fn run_command(args: &[String]) {
    let run_args = match parse_run_args(args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{message}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    match execute(&run_args) {
        Ok(()) => {}
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(error.exit_code());
        }
    }
}

fn execute(run_args: &RunArgs) -> Result<(), RunError> {
    let case_sensitive = run_args.options.config.contains(ExecConfig::CASE_SENSITIVE);
    let first = dws_corpus::read_corpus(&run_args.first, case_sensitive)?;
    let second = dws_corpus::read_corpus(&run_args.second, case_sensitive)?;

    println!(
        "First corpus:  {} sequences, {} tokens",
        first.len(),
        first.total_tokens()
    );
    println!(
        "Second corpus: {} sequences, {} tokens",
        second.len(),
        second.total_tokens()
    );

    let file = std::fs::File::create(&run_args.output)?;
    let sink = BufWriter::new(file);

    let mut observer = |tick: &ProgressTick| {
        eprint!(
            "\r{:6.2} % | ~{:>4} s remaining | result file: {} bytes",
            tick.percent(),
            tick.estimated_remaining().as_secs(),
            tick.bytes_written
        );
        let _ = std::io::stderr().flush();
    };

    let summary = run_intersection(
        &first,
        &second,
        &run_args.options,
        sink,
        Some(&mut observer),
    )?;
    eprintln!();

    println!();
    println!(
        "Partial matching sets: {:>10} ({} tokens)",
        summary.partial_sets, summary.tokens_in_partial_sets
    );
    println!(
        "Full matching sets:    {:>10} ({} tokens)",
        summary.full_sets, summary.tokens_in_full_sets
    );
    println!(
        "Sum:                   {:>10} ({} tokens)",
        summary.total_sets(),
        summary.total_tokens()
    );
    println!();
    println!("Result written to '{}'", run_args.output.display());

    Ok(())
}

fn parse_run_args(args: &[String]) -> Result<RunArgs, String> {
    let mut options = RunOptions::default();
    let mut first: Option<PathBuf> = None;
    let mut second: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-i" => first = Some(next_value(&mut iter, "-i")?),
            "-j" => second = Some(next_value(&mut iter, "-j")?),
            "-o" => output = Some(next_value(&mut iter, "-o")?),
            "--no-part-match" => options.config -= ExecConfig::PART_MATCH,
            "--no-full-match" => options.config -= ExecConfig::FULL_MATCH,
            "--no-stop-word-list" => options.config -= ExecConfig::STOP_WORD_LIST,
            "--sentence-offset" => options.config |= ExecConfig::SENTENCE_OFFSET,
            "--word-offset" => options.config |= ExecConfig::WORD_OFFSET,
            "--case-insensitive" => options.config -= ExecConfig::CASE_SENSITIVE,
            "--shorten-output" => options.config |= ExecConfig::SHORTEN_OUTPUT,
            "--no-filenames" => options.config |= ExecConfig::NO_FILENAMES,
            "--no-creation-time" => options.config |= ExecConfig::NO_CREATION_TIME,
            "--no-program-version" => options.config |= ExecConfig::NO_PROGRAM_VERSION,
            "--keep-single-token-results" => {
                options.config |= ExecConfig::KEEP_SINGLE_TOKEN_RESULTS;
            }
            "--show-too-long-tokens" => options.config |= ExecConfig::SHOW_TOO_LONG_TOKENS,
            other => {
                if let Some(name) = other.strip_prefix("--algorithm=") {
                    options.algorithm = Algorithm::parse(name)
                        .ok_or_else(|| format!("Unknown algorithm: {name}"))?;
                } else if let Some(percent) = other.strip_prefix("--abort-at=") {
                    let percent: f32 = percent
                        .parse()
                        .map_err(|_| format!("Invalid abort percentage: {percent}"))?;
                    options.abort_after_percent = Some(percent);
                } else {
                    return Err(format!("Unknown option: {other}"));
                }
            }
        }
    }

    Ok(RunArgs {
        first: first.ok_or("Missing first input file (-i <file>)")?,
        second: second.ok_or("Missing second input file (-j <file>)")?,
        output: output.ok_or("Missing result file (-o <file>)")?,
        options,
    })
}

fn next_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<PathBuf, String> {
    iter.next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("The option {flag} needs a file argument"))
}
