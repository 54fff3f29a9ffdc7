use clap::Parser;
use parley::core::config::{ParleyConfig, load_config, resolve};
use parley::core::graph::ChatGraph;
use parley::core::session::ChatSession;
use parley::core::state::App;
use parley::inference::select_reply_capability;
use parley::{repl, tui};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "parley", about = "Minimal terminal chat with a hosted model")]
struct Args {
    /// Model choice identifier (only "OpenAI ChatGPT" is registered)
    #[arg(short, long)]
    model_choice: Option<String>,

    /// Line-oriented stdin/stdout loop instead of the full-screen UI
    #[arg(long)]
    plain: bool,

    /// Don't draw the chatbot graph
    #[arg(long)]
    no_diagram: bool,

    /// Print the chatbot graph as mermaid source and exit
    #[arg(long)]
    print_graph: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    if args.print_graph {
        print!("{}", ChatGraph::chatbot().to_mermaid());
        return Ok(());
    }

    dotenv::dotenv().ok();

    // Initialize file logger - writes to parley.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("parley.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = load_config().unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {}", e);
        ParleyConfig::default()
    });
    let config = resolve(&file_config, args.model_choice.as_deref());
    let show_diagram = config.show_diagram && !args.no_diagram;

    log::info!(
        "parley starting up with model choice: {:?} (plain={}, diagram={})",
        config.model_choice,
        args.plain,
        show_diagram
    );

    let session = ChatSession::in_memory(&config.model_choice);
    let app = match select_reply_capability(session.model_choice(), &config) {
        Ok(capability) => App::new(session, capability),
        Err(e) => App::halted(session, e),
    };

    if args.plain {
        repl::run(app, show_diagram).await
    } else {
        tui::run(app, show_diagram)
    }
}
