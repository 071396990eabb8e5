//! Rating command-line entrypoint.
//!
//! ```text
//! rating rate <rater> <rateable> <value> [scope]
//! rating rank <kind> [metric] [direction] [scope]
//! rating show <rateable> [scope]
//! ```
//!
//! References are written `kind:id`. Events persist to `RATING_STORE_PATH` (SQLite); without it
//! the store lives only for the duration of the command.

use anyhow::{Context, bail};
use mimalloc::MiMalloc;

use rating::{Config, EntityRef, MemoryRateStore, RateStore, RatingEngine, SqliteRateStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage:
  rating rate <rater> <rateable> <value> [scope]
  rating rank <kind> [metric] [direction] [scope]
  rating show <rateable> [scope]

references are written kind:id";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        prior_weight = %config.prior_weight,
        default_metric = %config.default_metric,
        default_direction = %config.default_direction,
        store_path = ?config.store_path,
        "Rating engine starting"
    );

    match &config.store_path {
        Some(path) => {
            let store = SqliteRateStore::open(path)
                .with_context(|| format!("opening rate store at {}", path.display()))?;
            run(RatingEngine::from_config(store, &config), &args)
        }
        None => {
            tracing::warn!("No RATING_STORE_PATH configured, events will not persist");
            run(RatingEngine::from_config(MemoryRateStore::new(), &config), &args)
        }
    }
}

fn run<S: RateStore>(engine: RatingEngine<S>, args: &[String]) -> anyhow::Result<()> {
    let (command, rest) = args.split_first().context(USAGE)?;

    match command.as_str() {
        "rate" => {
            let [rater, rateable, value, scope @ ..] = rest else {
                bail!("rate needs <rater> <rateable> <value>\n\n{USAGE}");
            };
            let rater: EntityRef = rater.parse().context("parsing rater")?;
            let rateable: EntityRef = rateable.parse().context("parsing rateable")?;
            let value: f64 = value
                .parse()
                .with_context(|| format!("parsing rating value '{value}'"))?;
            let scope = parse_scope(scope)?;

            let event = engine.record(rater, rateable, scope, value)?;
            println!("{}", serde_json::to_string(&event)?);
        }
        "rank" => {
            let [kind, options @ ..] = rest else {
                bail!("rank needs <kind>\n\n{USAGE}");
            };
            let mut query = engine.default_query();
            if let Some(metric) = options.first() {
                query = query.try_metric(metric)?;
            }
            if let Some(direction) = options.get(1) {
                query = query.try_direction(direction)?;
            }
            if let Some(scope) = parse_scope(options.get(2..).unwrap_or_default())? {
                query = query.scope(scope);
            }

            for score in engine.rank_scored(kind, &query)? {
                println!("{}", serde_json::to_string(&score)?);
            }
        }
        "show" => {
            let [rateable, scope @ ..] = rest else {
                bail!("show needs <rateable>\n\n{USAGE}");
            };
            let rateable: EntityRef = rateable.parse().context("parsing rateable")?;
            let scope = parse_scope(scope)?;

            match engine.aggregate(&rateable, scope.as_ref())? {
                Some(score) => println!("{}", serde_json::to_string(&score)?),
                None => println!("null"),
            }
        }
        other => bail!("unknown command '{other}'\n\n{USAGE}"),
    }

    Ok(())
}

fn parse_scope(args: &[String]) -> anyhow::Result<Option<EntityRef>> {
    match args {
        [] => Ok(None),
        [scope] => Ok(Some(scope.parse().context("parsing scope")?)),
        _ => bail!("unexpected arguments: {}\n\n{USAGE}", args.join(" ")),
    }
}
