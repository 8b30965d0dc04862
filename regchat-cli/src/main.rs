//! CLI entry point for regchat

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use regchat_client::HttpInference;
use regchat_core::config::{Config, ConfigLoader};
use regchat_core::lang::{format_session_date, Language};
use regchat_core::logging::init_logging;
use regchat_core::session::{ChatMessage, ChatStore, Role};
use regchat_core::storage::{FileKvStore, KvStore};

#[derive(Parser)]
#[command(name = "regchat")]
#[command(about = "Terminal chat client for university regulations Q&A")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat (default)
    Chat,
    /// List saved conversations
    History,
    /// Delete a saved conversation
    Delete {
        /// Session id, as shown by `history`
        id: String,
    },
    /// Set the interface language (ar or en)
    Lang { lang: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = match &cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    let _guard = init_logging(&config.logging);

    let storage = FileKvStore::new(config.data_dir());
    let mut store = ChatStore::new(storage)
        .with_language(config.chat.language)
        .with_error_cooldown(Duration::from_millis(config.chat.error_cooldown_ms));
    store.hydrate();
    info!("loaded {} saved conversation(s)", store.sessions().len());

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(&mut store, &config).await,
        Commands::History => {
            print_history(&store);
            Ok(())
        }
        Commands::Delete { id } => {
            store.delete_chat(&id);
            println!("{}", store.language().translation().delete_chat);
            Ok(())
        }
        Commands::Lang { lang } => {
            let lang = match lang.as_str() {
                "ar" => Language::Ar,
                "en" => Language::En,
                other => anyhow::bail!("unknown language '{}', expected 'ar' or 'en'", other),
            };
            store.set_language(lang);
            Ok(())
        }
    }
}

async fn run_chat<S: KvStore>(store: &mut ChatStore<S>, config: &Config) -> Result<()> {
    let backend = HttpInference::from_config(&config.api);
    print_welcome(store.language());

    loop {
        let t = store.language().translation();
        let input: String = match Input::<String>::new()
            .with_prompt("›")
            .allow_empty(true)
            .interact_text()
        {
            Ok(input) => input,
            Err(_) => break,
        };
        let line = input.trim().to_string();

        match line.as_str() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/new" => {
                store.create_new_chat();
                println!("{}", style(t.new_chat).green());
            }
            "/lang" => {
                store.toggle_language();
                print_welcome(store.language());
            }
            "/history" => print_history(store),
            _ => {
                if let Some(id) = line.strip_prefix("/open ") {
                    store.select_chat(id.trim());
                    print_transcript(store);
                    continue;
                }

                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::with_template("{spinner} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner.set_message(t.thinking.to_string());
                spinner.enable_steady_tick(Duration::from_millis(80));

                store.submit(&line, &backend).await;
                spinner.finish_and_clear();
                print_last_answer(store);
            }
        }
    }

    Ok(())
}

fn print_welcome(lang: Language) {
    let t = lang.translation();
    println!();
    println!("{}", style(t.title).cyan().bold());
    println!("{}", style(t.subtitle).dim());
    println!();
    println!("{} {}", style(t.welcome).bold(), t.welcome_desc);
    println!();
    println!("{}", t.examples_title);
    for example in &t.examples {
        println!("  • {}", example);
    }
    println!();
    println!(
        "{}",
        style("/new  /history  /open <id>  /lang  /quit").dim()
    );
    println!();
}

fn print_history<S: KvStore>(store: &ChatStore<S>) {
    let t = store.language().translation();
    if store.sessions().is_empty() {
        println!("{}", style(t.no_chats).dim());
        return;
    }

    println!("{}", style(t.chat_history).bold());
    for session in store.sessions() {
        println!(
            "  {}  {}  {}",
            style(&session.id).dim(),
            session.title,
            style(format_session_date(session.updated_at, store.language())).dim(),
        );
    }
}

fn print_transcript<S: KvStore>(store: &ChatStore<S>) {
    for message in store.messages() {
        match message.role {
            Role::User => println!("{} {}", style("›").bold(), style(&message.content).dim()),
            Role::Assistant => print_answer(store.language(), message),
        }
    }
}

fn print_last_answer<S: KvStore>(store: &ChatStore<S>) {
    if let Some(message) = store.messages().last() {
        if message.role == Role::Assistant {
            print_answer(store.language(), message);
        }
    }
}

fn print_answer(lang: Language, message: &ChatMessage) {
    let t = lang.translation();
    println!();
    println!("{}", message.content);

    if !message.sources.is_empty() {
        println!();
        println!("{} {}:", style("📚").bold(), style(t.sources).bold());
        for citation in &message.sources {
            if citation.page.is_empty() {
                println!("  • {}", citation.title);
            } else {
                println!("  • {} | {} {}", citation.title, t.page, citation.page);
            }
        }
    }
    println!();
}
