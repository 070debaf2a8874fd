//! Markant CLI - reachability analysis for learned stochastic automata
//!
//! Usage:
//!   markant <file>                          # Analyze toward the completion states
//!   markant <file> -t s12,s30 -k 100        # Explicit targets and horizon
//!   markant <file> -o json                  # Output results as JSON
//!   markant <file> --export-matrix m.csv    # Persist derived artifacts

use clap::Parser;
use rustc_hash::FxHashMap;
use std::process;

use markant_core::{
    cumulative_series, load_model, rank_predecessors, step_series, storage, PredecessorMap,
    SeriesMap,
};
use markant_frontend::{completion_labels, filter_graph, NodeId, StateGraph};

#[derive(Parser)]
#[command(name = "markant")]
#[command(version)]
#[command(about = "Reachability analysis for learned stochastic automata")]
#[command(
    long_about = "Parses the learner's graph description, builds the transition \
matrix, and reports step-wise and cumulative probabilities of reaching the \
completion states, with ranked predecessor explanations"
)]
struct Cli {
    /// Input graph description file
    #[arg(value_name = "FILE")]
    file: String,

    /// Source state (defaults to the first state in the file)
    #[arg(short, long, value_name = "NODE")]
    source: Option<String>,

    /// Target states (defaults to the completion states)
    #[arg(short, long, value_name = "NODES", value_delimiter = ',')]
    targets: Vec<String>,

    /// Step bound for the probability series
    #[arg(short = 'k', long, default_value_t = 50, value_name = "STEPS")]
    steps: usize,

    /// Minimum transition probability shown in the predecessor report
    #[arg(long, default_value_t = 0.01, value_name = "PROB")]
    threshold: f64,

    /// Output format: summary, json, or debug
    #[arg(short, long, default_value = "summary", value_name = "FORMAT")]
    output: String,

    /// Write the transition matrix as delimited text
    #[arg(long, value_name = "PATH")]
    export_matrix: Option<String>,

    /// Write the completion-state label map
    #[arg(long, value_name = "PATH")]
    export_labels: Option<String>,

    /// Write the graph filtered to the targets' direct neighborhood
    #[arg(long, value_name = "PATH")]
    export_filtered: Option<String>,

    /// List the completion states and exit
    #[arg(short, long)]
    list_completions: bool,
}

fn main() {
    let cli = Cli::parse();

    let source_text = match std::fs::read_to_string(&cli.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.file, e);
            process::exit(1);
        }
    };

    let (graph, matrix) = match load_model(&source_text) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error loading model: {}", e);
            process::exit(1);
        }
    };
    if graph.node_count() == 0 {
        eprintln!("Error: '{}' declares no states", cli.file);
        process::exit(1);
    }

    let completions = completion_labels(&graph);

    if cli.list_completions {
        if completions.is_empty() {
            println!("No completion states found in '{}'", cli.file);
        } else {
            println!("Completion states in '{}':", cli.file);
            print!("{}", storage::label_lines(&graph, &completions));
        }
        return;
    }

    // Resolve the query: named states, or the labeler's completion set.
    let source = match &cli.source {
        Some(name) => resolve_or_exit(&graph, name),
        None => NodeId(0),
    };
    let target_ids: Vec<NodeId> = if cli.targets.is_empty() {
        let mut ids: Vec<NodeId> = completions.keys().copied().collect();
        ids.sort();
        ids
    } else {
        cli.targets
            .iter()
            .map(|name| resolve_or_exit(&graph, name))
            .collect()
    };
    if target_ids.is_empty() {
        eprintln!(
            "Error: no completion states found in '{}'; supply --targets",
            cli.file
        );
        process::exit(1);
    }
    let targets: Vec<usize> = target_ids.iter().map(|id| id.index()).collect();

    let step = run_or_exit(step_series(&matrix, source.index(), &targets, cli.steps));
    let cumulative = run_or_exit(cumulative_series(
        &matrix,
        source.index(),
        &targets,
        cli.steps,
    ));
    let predecessors = run_or_exit(rank_predecessors(&matrix, &targets, cli.threshold));

    write_exports(&cli, &graph, &matrix, &completions);

    match cli.output.as_str() {
        "json" => {
            let doc = format_json(&graph, &completions, source, &targets, &step, &cumulative, &predecessors);
            match serde_json::to_string_pretty(&doc) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing to JSON: {}", e);
                    process::exit(1);
                }
            }
        }
        "debug" => {
            println!("step-wise: {:#?}", step);
            println!("cumulative: {:#?}", cumulative);
            println!("predecessors: {:#?}", predecessors);
        }
        _ => print_summary(
            &cli,
            &graph,
            &completions,
            source,
            &targets,
            &step,
            &cumulative,
            &predecessors,
        ),
    }
}

fn resolve_or_exit(graph: &StateGraph, name: &str) -> NodeId {
    match graph.resolve(name) {
        Some(id) => id,
        None => {
            eprintln!("Error: state '{}' does not exist in the model", name);
            process::exit(1);
        }
    }
}

fn run_or_exit<T>(result: Result<T, markant_core::AnalysisError>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Analysis error: {}", e);
            process::exit(1);
        }
    }
}

fn write_exports(
    cli: &Cli,
    graph: &StateGraph,
    matrix: &markant_core::TransitionMatrix,
    completions: &FxHashMap<NodeId, String>,
) {
    if let Some(path) = &cli.export_matrix {
        write_or_exit(path, &storage::matrix_csv(matrix, graph));
        println!("Transition matrix saved to {}", path);
    }
    if let Some(path) = &cli.export_labels {
        write_or_exit(path, &storage::label_lines(graph, completions));
        println!("State labels saved to {}", path);
    }
    if let Some(path) = &cli.export_filtered {
        let names: Vec<&str> = cli.targets.iter().map(String::as_str).collect();
        let names = if names.is_empty() {
            let mut ids: Vec<NodeId> = completions.keys().copied().collect();
            ids.sort();
            ids.iter().map(|id| graph.node(*id).name.as_str()).collect()
        } else {
            names
        };
        match filter_graph(graph, &names) {
            Ok(filtered) => {
                write_or_exit(path, &filtered.to_dot());
                println!("Filtered graph saved to {}", path);
            }
            Err(e) => {
                eprintln!("Error filtering graph: {}", e);
                process::exit(1);
            }
        }
    }
}

fn write_or_exit(path: &str, content: &str) {
    if let Err(e) = std::fs::write(path, content) {
        eprintln!("Error writing '{}': {}", path, e);
        process::exit(1);
    }
}

/// Display name for a state: its completion summary when it has one,
/// otherwise "State <name>".
fn display_name(
    graph: &StateGraph,
    completions: &FxHashMap<NodeId, String>,
    index: usize,
) -> String {
    let id = NodeId(index as u32);
    match completions.get(&id) {
        Some(summary) => summary.clone(),
        None => format!("State {}", graph.node(id).name),
    }
}

#[allow(clippy::too_many_arguments)]
fn print_summary(
    cli: &Cli,
    graph: &StateGraph,
    completions: &FxHashMap<NodeId, String>,
    source: NodeId,
    targets: &[usize],
    step: &SeriesMap,
    cumulative: &SeriesMap,
    predecessors: &PredecessorMap,
) {
    println!(
        "Reachability from {} over {} steps ({} states, {} targets)\n",
        graph.node(source).name,
        cli.steps,
        graph.node_count(),
        targets.len()
    );

    println!("Predecessor Analysis for Target States:");
    println!("======================================");
    for &target in targets {
        let target_label = display_name(graph, completions, target);
        let heading = format!(
            "Target: {} ({})",
            target_label,
            graph.node(NodeId(target as u32)).name
        );
        println!("\n{}", heading);
        println!("{}", "-".repeat(heading.len()));

        let entries = &predecessors[&target];
        if entries.is_empty() {
            println!(
                "No direct predecessors found with probability >= {}",
                cli.threshold
            );
            continue;
        }

        println!(
            "Found {} predecessors with probability >= {}:",
            entries.len(),
            cli.threshold
        );
        for e in entries {
            println!(
                "  - {} -> {} with probability {:.4}",
                display_name(graph, completions, e.state),
                target_label,
                e.probability
            );
        }

        let total: f64 = entries.iter().map(|e| e.probability).sum();
        println!("\n  Total incoming probability: {:.4}", total);

        // Primary paths: predecessors carrying at least 20% of the
        // incoming probability.
        let primary: Vec<_> = entries
            .iter()
            .filter(|e| e.probability >= 0.2 * total)
            .collect();
        if !primary.is_empty() {
            println!("\n  Primary incoming paths:");
            for e in primary {
                println!(
                    "  - {} -> {}: {:.4} ({:.1}% of incoming)",
                    display_name(graph, completions, e.state),
                    target_label,
                    e.probability,
                    e.probability / total * 100.0
                );
            }
        }
    }

    println!("\nProbabilities after {} steps:", cli.steps);
    for &target in targets {
        println!(
            "  {}: step-wise {:.4}, cumulative {:.4}",
            display_name(graph, completions, target),
            step[&target][cli.steps],
            cumulative[&target][cli.steps]
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn format_json(
    graph: &StateGraph,
    completions: &FxHashMap<NodeId, String>,
    source: NodeId,
    targets: &[usize],
    step: &SeriesMap,
    cumulative: &SeriesMap,
    predecessors: &PredecessorMap,
) -> serde_json::Value {
    use serde_json::json;

    let per_target: Vec<serde_json::Value> = targets
        .iter()
        .map(|&t| {
            let id = NodeId(t as u32);
            json!({
                "state": graph.node(id).name,
                "label": completions.get(&id),
                "step_wise": step[&t],
                "cumulative": cumulative[&t],
                "predecessors": predecessors[&t]
                    .iter()
                    .map(|e| json!({
                        "state": graph.node(NodeId(e.state as u32)).name,
                        "probability": e.probability,
                    }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    json!({
        "source": graph.node(source).name,
        "states": graph.node_count(),
        "targets": per_target,
    })
}
