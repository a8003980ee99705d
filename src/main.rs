//! classyfy CLI
//!
//! Entry point for the `classyfy` external node classifier.

use clap::Parser;
use classyfy::classifier::{DEFAULT_COMPONENTS_BASE, DEFAULT_NODES_FILE};
use classyfy::{logging, network, output};
use classyfy::{Classifier, ClassifierConfig, FailurePolicy};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "classyfy")]
#[command(about = "A Puppet external node classifier (ENC)", version)]
struct Cli {
    /// The base path for configuration components (`%s` is replaced by the environment)
    #[arg(short = 'c', long = "production-base", default_value = DEFAULT_COMPONENTS_BASE)]
    components_base: String,

    /// The path to the node specification file
    #[arg(short = 'N', long = "nodes-file", default_value = DEFAULT_NODES_FILE)]
    nodes_file: PathBuf,

    /// The hostname of the node to classify
    #[arg(short = 'n', long = "node")]
    node: String,

    /// Only output the data
    #[arg(short = 'd', long = "data")]
    data_only: bool,

    /// Fail on an inconsistent model
    #[arg(short = 's', long)]
    strict: bool,

    /// Prefix the document with comments describing the resolution
    #[arg(short = 'e', long)]
    explain: bool,

    /// Look up the node's network addresses and include them in --explain
    #[arg(short = 'a', long, requires = "explain")]
    addresses: bool,

    /// Log debug diagnostics to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    logging::init(cli.verbose);

    let classifier = Classifier::new(ClassifierConfig {
        nodes_file: cli.nodes_file,
        components_base: cli.components_base,
        policy: FailurePolicy::from_strict(cli.strict),
    });

    let (classification, mut explanation) = match classifier.explain(&cli.node) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Failed to classify the given node!");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let document = match output::render(&classification, cli.data_only) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    };

    if cli.explain {
        if cli.addresses {
            explanation.addresses = network::lookup_addresses(&cli.node);
        }
        match output::digest(&classification) {
            Ok(digest) => explanation.digest = Some(digest),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        print!("{}", explanation.to_comments());
    }

    print!("{}", document);
}
