use tracing::trace_span;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mybind::Result;

mod transport;
mod query;

fn main() -> Result<()> {
    tracing_subscriber::Registry::default()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let span = trace_span!("query").entered();
    query::main()?;
    drop(span);

    Ok(())
}
