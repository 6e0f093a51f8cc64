//! `bitgrid list`: names the reference designs.

use bitgrid_designs::DESIGNS;

use crate::Session;

/// Prints one design per line.
pub fn run(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    if !session.quiet {
        render().iter().for_each(|line| println!("{line}"));
    }
    Ok(())
}

fn render() -> Vec<String> {
    let width = DESIGNS.iter().map(|d| d.name.len()).max().unwrap_or(0);
    DESIGNS
        .iter()
        .map(|d| format!("{:width$}  {}", d.name, d.description))
        .collect()
}
