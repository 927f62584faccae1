// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, hands the work to Layer 2 and prints the result.
//
// Four commands are supported:
//   1. `fetch`    — print a product's card (or its record as JSON)
//   2. `ask`      — answer one question about a product
//   3. `chat`     — answer questions from stdin until EOF or "quit"
//   4. `download` — fill the model directory
//
// Answers and cards go to stdout; logs go to stderr.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};

use crate::application::ask_use_case::AskUseCase;
use crate::application::config::AppConfig;
use crate::application::product_use_case::ProductUseCase;
use crate::domain::product::ProductRecord;
use crate::domain::summary::ProductSummary;
use crate::infra::cache::ModelCache;
use crate::infra::model_store::ModelStore;
use commands::{AskArgs, ChatArgs, Commands, DownloadArgs, FetchArgs};

/// Words that end a chat session
const QUIT_WORDS: [&str; 2] = ["quit", "exit"];

#[derive(Parser, Debug)]
#[command(
    name = "product-qa",
    version,
    about = "Ask natural-language questions about a product page."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching handler. Routing only.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Fetch(args)    => run_fetch(args),
            Commands::Ask(args)      => run_ask(args),
            Commands::Chat(args)     => run_chat(args),
            Commands::Download(args) => run_download(args),
        }
    }
}

fn run_fetch(args: FetchArgs) -> Result<()> {
    let config = AppConfig::from(&args.common);
    let products = ProductUseCase::from_config(&config)?;
    let record = products.fetch(&args.url)?;

    if args.json {
        let json = serde_json::to_string_pretty(&record).context("Cannot serialise record")?;
        println!("{json}");
    } else {
        print!("{}", render_card(&record, &products.summary(&record)));
    }
    Ok(())
}

fn run_ask(args: AskArgs) -> Result<()> {
    let config = AppConfig::from(&args.common);
    let record = ProductUseCase::from_config(&config)?.fetch(&args.url)?;
    let asker = AskUseCase::from_config(&config)?;

    if args.explain {
        let report = asker.explain(&record.context1, &record.context2, &args.question)?;
        println!("Question:      {}", report.question);
        println!("From features: {}", report.first.text);
        println!("From specs:    {}", report.second.text);
        println!("\nAnswer: {}", report.answer);
    } else {
        println!("{}", asker.ask(&record, &args.question)?);
    }
    Ok(())
}

fn run_chat(args: ChatArgs) -> Result<()> {
    let config = AppConfig::from(&args.common);
    let record = ProductUseCase::from_config(&config)?.fetch(&args.url)?;
    let asker = AskUseCase::from_config(&config)?;

    let title = ProductSummary::from_record(&record).title;
    eprintln!("Ask about \"{title}\". Type 'quit' to leave.");

    let stdin = io::stdin();
    let stdout = io::stdout();
    chat_loop(&asker, &record, stdin.lock(), stdout.lock())
}

fn run_download(args: DownloadArgs) -> Result<()> {
    let store = ModelStore::new(&args.common.model_dir);
    store.download()?;

    let missing = store.missing_files();
    if !missing.is_empty() {
        anyhow::bail!("Still missing after download: {}", missing.join(", "));
    }

    if args.verify {
        ModelCache::new(store.clone()).warm_up()?;
        println!("Model loads correctly.");
    }
    println!("Model directory ready: {}", store.dir().display());
    Ok(())
}

/// Answer one question per input line until EOF or a quit word.
///
/// Blank lines are skipped. A failed answer is reported on the
/// output and the loop moves on to the next line.
pub fn chat_loop<R: BufRead, W: Write>(
    asker:  &AskUseCase,
    record: &ProductRecord,
    input:  R,
    mut output: W,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Cannot read question")?;
        let question = line.trim();

        if question.is_empty() {
            continue;
        }
        if QUIT_WORDS.contains(&question.to_lowercase().as_str()) {
            break;
        }

        match asker.ask(record, question) {
            Ok(answer) => writeln!(output, "{answer}")?,
            Err(e) => {
                tracing::warn!("Answering {:?} failed: {:#}", question, e);
                writeln!(output, "Error: {e:#}")?;
            }
        }
        output.flush()?;
    }
    Ok(())
}

/// Plain-text product card.
pub fn render_card(record: &ProductRecord, summary: &ProductSummary) -> String {
    let mut out = String::new();
    let mut line = |text: String| {
        out.push_str(&text);
        out.push('\n');
    };

    line(summary.title.clone());
    if let Some(subtitle) = &summary.subtitle {
        line(subtitle.clone());
    }

    if let Some(price) = &record.discount_price {
        line(format!("Price:    {price}"));
    }
    if let Some(price) = &record.actual_price {
        match summary.discount_percent {
            Some(pct) => line(format!("M.R.P.:   {price}  ({pct:.1}% off)")),
            None => line(format!("M.R.P.:   {price}")),
        }
    }

    if let (Some(stars), Some(rating)) = (summary.stars, record.rating) {
        let drawn = "★".repeat(stars as usize) + &"☆".repeat(5 - stars as usize);
        line(format!("Rating:   {drawn}  {rating:.1} out of 5"));
    }
    if let (Some(up), Some(down)) = (summary.positive_share, summary.negative_share) {
        line(format!("Reviews:  {up:.0}% positive, {down:.0}% negative"));
    }
    if let Some(image) = &summary.image {
        line(format!("Image:    {image}"));
    }

    let features: Vec<&String> = record.features.iter().filter(|f| !f.is_empty()).collect();
    if !features.is_empty() {
        line(String::new());
        line("Features:".to_string());
        for f in features {
            line(format!("  - {f}"));
        }
    }

    if record.spec_pairs().next().is_some() {
        line(String::new());
        line("Specifications:".to_string());
        for (name, value) in record.spec_pairs() {
            line(format!("  {name}: {value}"));
        }
    }
    out
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::speller::PassThrough;
    use crate::domain::answer::AnswerSpan;
    use crate::domain::product::ProductFields;
    use crate::domain::traits::QuestionAnswerer;
    use clap::CommandFactory;

    /// Echoes the first word of the context, fails on "boom ?".
    struct EchoAnswerer;

    impl QuestionAnswerer for EchoAnswerer {
        fn answer(&self, question: &str, context: &str) -> Result<AnswerSpan> {
            if question == "boom ?" {
                anyhow::bail!("model crashed");
            }
            let first = context.split_whitespace().next().unwrap_or_default();
            Ok(AnswerSpan::new(0, 0, first))
        }
    }

    fn record() -> ProductRecord {
        ProductRecord::new(
            "https://example.com/dp/1",
            ProductFields {
                name: Some("Kettle (Steel)".into()),
                discount_price: Some("₹999.00".into()),
                actual_price: Some("₹1,999.00".into()),
                rating: Some(3.6),
                histogram: vec![50.0, 20.0, 10.0, 5.0, 15.0],
                images: vec!["https://img.example.com/1.jpg".into()],
                features: vec!["About".into(), "Boils fast".into(), "Report".into()],
                specs: vec!["Capacity".into(), "1.5 L".into()],
                ..Default::default()
            },
        )
    }

    fn chat(input: &str) -> String {
        let asker = AskUseCase::new(Box::new(EchoAnswerer), Box::new(PassThrough));
        let mut out = Vec::new();
        chat_loop(&asker, &record(), input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_ask() {
        let cli = Cli::try_parse_from([
            "product-qa", "ask", "--url", "https://example.com/dp/1",
            "--question", "what colour?", "--no-spellcheck",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.question, "what colour?");
                let config = AppConfig::from(&args.common);
                assert!(!config.spellcheck);
                assert_eq!(config.model_dir, std::path::PathBuf::from("models"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_chat_answers_each_line() {
        // context1 starts "Product", context2 starts "Capacity"
        assert_eq!(chat("one\ntwo\n"), "Product , Capacity\nProduct , Capacity\n");
    }

    #[test]
    fn test_chat_skips_blank_lines_and_stops_on_quit() {
        assert_eq!(chat("\n   \none\nQUIT\ntwo\n"), "Product , Capacity\n");
    }

    #[test]
    fn test_chat_reports_errors_and_continues() {
        let out = chat("boom\nexit\n");
        assert!(out.starts_with("Error: model crashed"));

        let out = chat("boom\nagain\n");
        assert!(out.ends_with("Product , Capacity\n"));
    }

    #[test]
    fn test_card_lists_prices_rating_and_specs() {
        let record = record();
        let card = render_card(&record, &ProductSummary::from_record(&record));
        assert!(card.starts_with("Kettle\n(Steel)\n"));
        assert!(card.contains("M.R.P.:   ₹1,999.00  (50.0% off)"));
        assert!(card.contains("★★★★☆  3.6 out of 5"));
        assert!(card.contains("80% positive, 20% negative"));
        assert!(card.contains("  Capacity: 1.5 L"));
    }
}
