use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use blackjack::{CardSource, RandomDeck};
use blackjack_table::msg::{ExecuteMsg, InstantiateMsg, TableResponse};
use blackjack_table::state::JsonFileStorage;
use blackjack_table::{instantiate, Session};
use clap::{Parser, Subcommand};

mod command;
mod render;

use command::{parse_line, ReplCommand, HELP};
use render::render_table;

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "blackjack-cli", about = "Single-table blackjack with a chip wallet")]
struct Cli {
    /// JSON file holding balance and debt between runs
    #[arg(long, env = "BLACKJACK_STORE", default_value = "blackjack.json")]
    store: PathBuf,

    /// Balance for a fresh store
    #[arg(long, env = "BLACKJACK_STARTING_BALANCE")]
    starting_balance: Option<u64>,

    /// Seed the deck for a reproducible session
    #[arg(long, env = "BLACKJACK_SEED")]
    seed: Option<u64>,

    /// Print snapshots as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play rounds interactively
    Play,

    /// Show balance, debt and the table
    Status,

    /// Take a loan; a 10% fee is added to the debt
    Borrow {
        #[arg(long)]
        amount: u64,
    },

    /// Pay debt back from the balance
    Repay {
        /// Defaults to as much as the balance covers
        #[arg(long)]
        amount: Option<u64>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), BoxErr> {
    let mut session = open_session(cli)?;

    match &cli.command {
        Command::Play => play(&mut session, cli.json),
        Command::Status => print_table(&session.table(), cli.json),
        Command::Borrow { amount } => one_shot(
            &mut session,
            ExecuteMsg::Borrow { amount: *amount },
            cli.json,
        ),
        Command::Repay { amount } => one_shot(
            &mut session,
            ExecuteMsg::Repay { amount: *amount },
            cli.json,
        ),
    }
}

fn open_session(cli: &Cli) -> Result<Session, BoxErr> {
    let store = JsonFileStorage::open(&cli.store)?;
    log::info!("Using store {}", store.path().display());

    let deck: Box<dyn CardSource> = match cli.seed {
        Some(seed) => {
            log::info!("Seeded deck: {seed}");
            Box::new(RandomDeck::seeded(seed))
        }
        None => Box::new(RandomDeck::from_entropy()),
    };

    let msg = InstantiateMsg {
        starting_balance: cli.starting_balance,
        rules: None,
    };
    Ok(instantiate(msg, Box::new(store), deck)?)
}

fn one_shot(session: &mut Session, msg: ExecuteMsg, json: bool) -> Result<(), BoxErr> {
    let ack = session.handle(msg);
    print_table(&ack.table, json)?;
    match ack.reason {
        Some(reason) => Err(reason.into()),
        None => Ok(()),
    }
}

fn play(session: &mut Session, json: bool) -> Result<(), BoxErr> {
    println!("{HELP}");
    print_table(&session.table(), json)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_line(&line) {
            Ok(ReplCommand::Execute(msg)) => {
                let ack = session.handle(msg);
                if let Some(reason) = &ack.reason {
                    println!("{reason}");
                }
                print_table(&ack.table, json)?;
            }
            Ok(ReplCommand::Status) => print_table(&session.table(), json)?,
            Ok(ReplCommand::Help) => println!("{HELP}"),
            Ok(ReplCommand::Quit) => break,
            Err(e) => println!("{e}"),
        }
    }

    let stats = session.stats();
    log::info!(
        "Session over after {} rounds: {} won, {} lost, {} tied",
        stats.rounds(),
        stats.player_wins,
        stats.dealer_wins,
        stats.ties
    );
    Ok(())
}

fn print_table(table: &TableResponse, json: bool) -> Result<(), BoxErr> {
    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
    } else {
        println!("{}", render_table(table));
    }
    Ok(())
}
