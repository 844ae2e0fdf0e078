//! Version information

use crate::error::Result;

pub fn run() -> Result<()> {
    println!("packwright {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
