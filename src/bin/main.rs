use crossterm::{
    cursor::MoveTo,
    execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use std::io::{self, stdin, stdout, Write};
use tracing_subscriber::EnvFilter;
use uttale_core::catalog::Catalog;
use uttale_core::config::Config;
use uttale_core::core::synthesizer::SynthesizerSet;
use uttale_core::core::types::{ResolutionResult, Transcriptions, VariantTag, Word};
use uttale_core::ResolutionPipeline;

struct Console {
    pipeline: ResolutionPipeline,
    limit: usize,
    variant: VariantTag,
    prefix: String,
    status: Option<String>,
    last: Option<ResolutionResult>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = Config::load()?;
    let catalog = Catalog::load(&config)?;
    let mut console = Console {
        pipeline: ResolutionPipeline::new(catalog, SynthesizerSet::default()),
        limit: config.suggest_limit,
        variant: config.default_variant,
        prefix: String::new(),
        status: None,
        last: None,
    };

    loop {
        let suggestions = console.pipeline.suggest(&console.prefix, console.limit);
        print_ui(&console, &suggestions)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();
        console.status = None;

        match cmd {
            "exit" => break,
            "" => {
                // Enter - resolve the top suggestion, or the prefix itself
                let target = suggestions
                    .first()
                    .cloned()
                    .or_else(|| Word::parse(&console.prefix));
                if let Some(word) = target {
                    console.resolve(&word);
                }
            }
            s if s.starts_with(":v ") => match s[3..].trim().parse::<VariantTag>() {
                Ok(tag) => console.variant = tag,
                Err(e) => console.status = Some(e.to_string()),
            },
            s if s.starts_with(':') && s.len() > 1 => {
                // Select suggestion :1, :2 etc
                match s[1..].parse::<usize>() {
                    Ok(n) if n > 0 && n <= suggestions.len() => {
                        let chosen = suggestions[n - 1].clone();
                        console.resolve(&chosen);
                    }
                    _ => console.status = Some(format!("no suggestion {}", &s[1..])),
                }
            }
            s if s.starts_with('=') => match Word::parse(&s[1..]) {
                Some(word) => console.resolve(&word),
                None => console.status = Some("not a word".to_string()),
            },
            "-" => {
                console.prefix.pop();
            }
            s => {
                // Append to prefix
                console.prefix.push_str(s);
            }
        }
    }
    Ok(())
}

impl Console {
    fn resolve(&mut self, word: &Word) {
        match self.pipeline.resolve(word, Some(self.variant)) {
            Ok(result) => {
                self.last = Some(result);
                self.prefix.clear();
            }
            Err(e) => self.status = Some(format!("lookup failed: {e}")),
        }
    }
}

fn print_ui(console: &Console, suggestions: &[Word]) -> io::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", "Uttale pronunciation lookup".bold());
    println!("---------------------------------------------------------------");
    println!("Type to extend the prefix, [Enter] looks up the top suggestion.");
    println!("':1', ':2' pick a suggestion, '=word' looks up a word, '-' deletes,");
    println!("':v n_spoken' switches variant, 'exit' quits.\n");
    println!("Variant: {} ({})", console.variant, console.variant.label());

    if let Some(result) = &console.last {
        println!("\n{}", result.word.as_str().bold().green());
        match &result.transcriptions {
            Transcriptions::Exact(map) if map.is_empty() => println!("  (no transcriptions stored)"),
            Transcriptions::Exact(map) => {
                for (tag, ipa) in map {
                    println!("  {:<12} /{}/", tag.to_string(), ipa);
                }
            }
            Transcriptions::Synthesized { ipa } => {
                println!("  {:<12} /{}/", "synthesized".dark_yellow(), ipa)
            }
            Transcriptions::Error { reason } => {
                println!("  {} {:?}", "pronunciation unavailable:".red(), reason)
            }
        }
        for example in &result.examples {
            println!("  - {} {}", example.sentence, format!("[{}]", example.dialect).dark_grey());
        }
    }

    if let Some(status) = &console.status {
        println!("\n{}", status.as_str().red());
    }

    println!("\nPrefix: [{}]", console.prefix);
    if !suggestions.is_empty() {
        println!("Suggestions:");
        for (i, word) in suggestions.iter().enumerate() {
            println!("  :{}: {}", i + 1, word);
        }
    } else if !console.prefix.is_empty() {
        println!("No suggestions found.");
    }
    print!("\n> ");
    out.flush()
}
