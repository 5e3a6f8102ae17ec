use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use ruletable_core::config::SpanCase;
use ruletable_core::processor::PipelineStages;
use ruletable_core::serialization::OUTPUT_FORMATS;
use ruletable_core::{ExtractionConfig, PlainTextSource, RuleProcessor, RuleTable, TextSource};

#[derive(Parser)]
#[command(name = "ruletable")]
#[command(about = "Turn regulatory and insurance prose into IF/THEN rule tables")]
struct Args {
    /// Path to the extracted document text (pages separated by form feed)
    #[arg(short, long)]
    input: String,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output format: records, table, or flat
    #[arg(short = 'f', long, default_value = "records")]
    output_format: String,

    /// Output file path (if not specified, auto-generated based on input)
    #[arg(short, long)]
    output: Option<String>,

    /// Override the State label from the config
    #[arg(long)]
    state: Option<String>,

    /// Override the Insurance Class label from the config
    #[arg(long)]
    insurance_class: Option<String>,

    /// Keep source casing in conditions and actions instead of capitalizing
    #[arg(long)]
    preserve_case: bool,

    /// Drop numbers already captured inside a money, percent or time token
    #[arg(long)]
    suppress_nested: bool,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,

    /// Dump page texts, sentences, logical forms and the final table to a directory
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    println!("📜 Ruletable Rule Extractor");

    if args.show_configs {
        show_help();
        return Ok(());
    }

    let input = Path::new(&args.input);
    if !input.exists() {
        eprintln!("❌ Input file not found at: {}", args.input);
        eprintln!("   Please check the file path.");
        std::process::exit(1);
    }

    let source = PlainTextSource::new();
    if !source.supports_file_type(input) {
        eprintln!(
            "❌ {} is not a text file. Extract the document text first \
             (e.g. `pdftotext {} out.txt`).",
            args.input, args.input
        );
        std::process::exit(1);
    }

    // Load config, then apply CLI overrides
    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e:#}");
            std::process::exit(1);
        }
    };
    apply_overrides(&mut config, &args);

    let processor = RuleProcessor::new(config)?;
    tracing::debug!("effective config: {:?}", processor.config());
    println!("📄 Processing: {}", args.input);

    if args.dump_stages {
        println!("\n🔬 Pipeline stage dump mode");
        let pages = source.read_file(input)?;
        let source_name = input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        let stages = processor.process_pages_capture_stages(&pages, source_name);
        save_stages(&stages, &args.stages_dir)?;
        println!("\n✅ All stages dumped to: {}", args.stages_dir);
        return Ok(());
    }

    match processor.process_source(&source, input) {
        Ok(table) => {
            println!("✅ Successfully processed document");
            println!("📊 Table metrics:");
            println!("   - Pages: {}", table.document_info.page_count);
            println!("   - Pages with rules: {}", table.document_info.pages_with_rules);
            println!("   - Rules: {}", table.records.len());

            let output_path = args.output.clone().unwrap_or_else(|| {
                let input_name = input
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("output");
                format!("{input_name}_rules.json")
            });

            save_table(&table, &output_path, &args.output_format)?;
        }
        Err(e) => {
            eprintln!("❌ Processing failed: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "ruletable_core=debug",
        _ => "ruletable_core=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Defaults only when no `--config` is given; a given path must load
fn load_config(path: Option<&str>) -> Result<ExtractionConfig> {
    match path {
        Some(config_path) => {
            let config = ExtractionConfig::load_from_file(config_path)
                .with_context(|| format!("failed to load config from {config_path}"))?;
            println!("📋 Loaded config from: {}", config_path);
            Ok(config)
        }
        None => {
            println!("📋 Using default config");
            Ok(ExtractionConfig::default())
        }
    }
}

fn apply_overrides(config: &mut ExtractionConfig, args: &Args) {
    if let Some(state) = &args.state {
        config.state = state.clone();
    }
    if let Some(insurance_class) = &args.insurance_class {
        config.insurance_class = insurance_class.clone();
    }
    if args.preserve_case {
        config.classifier.span_case = SpanCase::Preserve;
    }
    if args.suppress_nested {
        config.parameters.suppress_nested = true;
    }
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  --config <path>           Load custom config file (YAML)");
    println!("  --input <path>            Extracted text to process (form feed between pages)");
    println!("  --output <path>           Output file path (auto-generated if not specified)");
    println!("  --output-format <fmt>     Output format: {}", OUTPUT_FORMATS.join(", "));
    println!("  --state <label>           State column value (default: Oklahoma)");
    println!(
        "  --insurance-class <label> Insurance Class column value (default: General Insurance)"
    );
    println!("  --preserve-case           Keep source casing in IF/THEN spans");
    println!("  --suppress-nested         Skip bare numbers already inside another token");

    println!("\n📄 Output Formats:");
    println!("  records  - Rule table with document info, one object per rule (default)");
    println!("  table    - Column names plus rows, ready for a spreadsheet writer");
    println!("  flat     - Logical forms only");

    println!("\n📁 Config file example:");
    println!("  state: Oklahoma");
    println!("  insurance_class: General Insurance");
    println!("  rule_code: {{ prefix: R, width: 3 }}");
    println!("  classifier: {{ span_case: capitalize }}");
    println!("  parameters: {{ suppress_nested: false }}");

    println!("\n📝 Usage Examples:");
    println!("  cargo run -- -i rules.txt");
    println!("  cargo run -- -i rules.txt -o /path/to/output.json");
    println!("  cargo run -- -i rules.txt -c config.yaml -f table");
}

fn save_stages(stages: &PipelineStages, output_dir: &str) -> Result<()> {
    use std::fs;
    fs::create_dir_all(output_dir)?;

    // Stage 1: Page texts
    let pages_path = format!("{}/stage1_pages.json", output_dir);
    fs::write(&pages_path, serde_json::to_string_pretty(&stages.pages)?)?;
    println!("  💾 {} ({} pages)", pages_path, stages.pages.len());

    // Stage 2: Sentences per page
    let sentences_path = format!("{}/stage2_sentences.json", output_dir);
    fs::write(&sentences_path, serde_json::to_string_pretty(&stages.sentences)?)?;
    let sentence_count: usize = stages.sentences.iter().map(Vec::len).sum();
    println!("  💾 {} ({} sentences)", sentences_path, sentence_count);

    // Stage 3: Logical forms with their classifier tier
    let forms_path = format!("{}/stage3_forms.json", output_dir);
    fs::write(&forms_path, serde_json::to_string_pretty(&stages.forms)?)?;
    println!("  💾 {} ({} forms)", forms_path, stages.forms.len());

    // Stage 4: Final table
    let table_path = format!("{}/stage4_table.json", output_dir);
    stages.table.save_with_format(&table_path, "records")?;
    println!("  💾 {} ({} rules)", table_path, stages.table.records.len());

    Ok(())
}

fn save_table(table: &RuleTable, output_path: &str, format: &str) -> Result<()> {
    table.save_with_format(output_path, format)?;
    println!("💾 {} format results saved to: {}", format, output_path);
    Ok(())
}
