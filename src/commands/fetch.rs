//! Look a name up across every known listing and show what it resolves to

use console::style;

use crate::bundle::short_desc;
use crate::config::Config;
use crate::error::{PackwrightError, Result};

pub fn run(config: &Config, name: &str) -> Result<()> {
    let candidates = config.global_candidates(name);
    if candidates.is_empty() {
        return Err(PackwrightError::UnknownBundle {
            name: name.to_string(),
        });
    }

    for bundle in &candidates {
        let location = bundle.uri.as_deref().unwrap_or("(no uri)");
        println!(
            "{}  {}",
            short_desc(bundle),
            style(location).dim()
        );
    }
    Ok(())
}
