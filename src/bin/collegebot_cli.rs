use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use collegebot::chatbot::DEFAULT_SESSION_ID;
use collegebot::{BotConfig, ContextTracker, KnowledgeBase};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const SMOKE_QUERIES: &[&str] = &[
    "facilities",
    "hostel",
    "sports facilities",
    "campus facilities",
    "what facilities are available",
];

const QUIT_WORDS: &[&str] = &["quit", "exit", "bye", "goodbye"];

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn").add_directive("collegebot=info".parse().unwrap()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = BotConfig::load(config_path.as_deref())?;
    let kb = Arc::new(KnowledgeBase::load_or_empty(&config.knowledge_base_path));
    let bot = ContextTracker::from_config(kb, &config);

    println!("\n{}", "=".repeat(50));
    println!("🎓 College Helpdesk Assistant");
    println!("Type 'quit' to exit");
    println!("{}", "=".repeat(50));

    println!("\n🧪 Facilities queries:");
    for query in SMOKE_QUERIES {
        println!("Q: {query}");
        println!("A: {}\n", bot.selector().respond(query));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\nYou: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!("\nCollege Bot: Session ended. Have a great day! 👋");
            break;
        };
        let input = line?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if QUIT_WORDS.contains(&input.to_lowercase().as_str()) {
            println!("College Bot: Goodbye! 👋");
            break;
        }

        println!("College Bot: {}", bot.respond(input, DEFAULT_SESSION_ID));
    }

    Ok(())
}
