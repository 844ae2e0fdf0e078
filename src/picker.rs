//! Interactive bundle disambiguation
//!
//! Several bundle records may share a name (different versions or drive
//! kinds). The picker renders each candidate as a short descriptor and asks
//! the operator to choose exactly one. The console prompt sits behind the
//! `Chooser` trait so non-interactive callers and tests can substitute a
//! deterministic selection.

use inquire::Select;

use crate::bundle::{Bundle, parse_short_desc, short_desc};
use crate::error::{PackwrightError, Result};

/// Selection capability over rendered candidate descriptors
pub trait Chooser {
    /// Pick one of `items`, returning the chosen descriptor
    fn choose(&self, prompt: &str, items: Vec<String>) -> Result<String>;
}

/// Console prompt backed by `inquire`
pub struct InteractiveChooser;

impl Chooser for InteractiveChooser {
    fn choose(&self, prompt: &str, items: Vec<String>) -> Result<String> {
        Ok(Select::new(prompt, items).prompt()?)
    }
}

/// Render a bundle the way pickers over remote listings show it
pub fn render_bundle(bundle: &Bundle) -> String {
    short_desc(bundle)
}

/// Resolve a name to exactly one bundle among `candidates`.
///
/// A single candidate is returned without prompting. With more than one,
/// the chooser's selection is parsed back to its content identifier and
/// matched against the candidate set.
pub fn pick_bundle(
    prompt: &str,
    candidates: &[Bundle],
    render: impl Fn(&Bundle) -> String,
    chooser: &dyn Chooser,
) -> Result<Bundle> {
    match candidates {
        [] => Err(PackwrightError::EmptyCandidateSet),
        [only] => Ok(only.clone()),
        _ => {
            let items: Vec<String> = candidates.iter().map(&render).collect();
            let answer = chooser.choose(prompt, items)?;
            let (_, _, _, id) = parse_short_desc(&answer)?;
            candidates
                .iter()
                .find(|b| b.id == id)
                .cloned()
                .ok_or(PackwrightError::InvalidDescriptor { input: answer })
        }
    }
}
