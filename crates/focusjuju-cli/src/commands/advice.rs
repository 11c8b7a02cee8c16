use focusjuju_core::advice::fallback_advice;
use focusjuju_core::{AdviceContext, Config, Database};
use tracing::warn;

use super::{message_source, print_json, runtime, CliResult};

/// Sessions the advice looks back over.
const RECENT_SESSIONS: usize = 20;

pub fn run() -> CliResult {
    let config = Config::load()?;
    let db = Database::open()?;
    let latest = db.latest_mood()?;
    let sessions = db.session_summaries(Some(RECENT_SESSIONS))?;
    let context = AdviceContext::from_history(latest.as_ref(), &sessions);

    let source = message_source(&config);
    let advice = match runtime()?.block_on(source.advice(&context)) {
        Ok(advice) => advice,
        Err(e) => {
            warn!(error = %e, "advice unavailable, using default advice");
            fallback_advice()
        }
    };
    print_json(&advice)
}
