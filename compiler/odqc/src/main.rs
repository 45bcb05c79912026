//! odq query compiler CLI.

use odqc::{compile_source, init_tracing, list_functions, parse_compile_options, read_file};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "compile" => {
            let options = match parse_compile_options(&args[2..]) {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("error: {e}");
                    eprintln!(
                        "Usage: odqc compile --schema <file> --root <Entity> [--graph] \
                         [--style static|preferred] [--trace-tree] <ast.json>"
                    );
                    std::process::exit(1);
                }
            };
            init_tracing(options.trace_tree);
            read_file(&options.schema).and_then(|schema| {
                let ast = read_file(&options.ast)?;
                compile_source(&schema, &ast, &options)
            })
        }
        "functions" => {
            init_tracing(false);
            list_functions()
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("odq query compiler");
    println!();
    println!("Usage: odqc <command> [options]");
    println!();
    println!("Commands:");
    println!("  compile --schema <file> --root <Entity> [options] <ast.json>");
    println!("                       Compile a JSON query tree and print it back");
    println!("      --graph          Also print the expression graph");
    println!("      --style <style>  Call syntax for output: preferred (default) or static");
    println!("      --trace-tree     Show compiler decisions as an indented tree");
    println!("  functions            List the standard query functions");
    println!("  help                 Show this message");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=odq_compile=trace) for log output.");
}
