//! `bitgrid show`: builds a design and prints its IR.

use bitgrid_common::Interner;
use bitgrid_config::{load_config, LoweringConfig};
use bitgrid_designs::{find, DESIGNS};

use crate::{ReportFormat, Session, ShowArgs};

/// Runs the `bitgrid show` command.
pub fn run(args: &ShowArgs, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let lowering = resolve_lowering(args, session)?;
    let text = render(&args.design, args.format, &lowering)?;
    if !session.quiet {
        println!("{text}");
    }
    Ok(())
}

fn resolve_lowering(
    args: &ShowArgs,
    session: &Session,
) -> Result<LoweringConfig, Box<dyn std::error::Error>> {
    let mut lowering = load_config(&session.project_dir)?.lowering;
    if args.no_wire {
        lowering.create_wire = false;
    }
    log::debug!("lowering settings: {lowering:?}");
    Ok(lowering)
}

fn render(
    name: &str,
    format: ReportFormat,
    lowering: &LoweringConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let Some(design) = find(name) else {
        let known: Vec<&str> = DESIGNS.iter().map(|d| d.name).collect();
        return Err(format!("unknown design '{name}' (known: {})", known.join(", ")).into());
    };
    let interner = Interner::new();
    let module = design.build(&interner, lowering)?;
    Ok(match format {
        ReportFormat::Text => module.display(&interner).to_string(),
        ReportFormat::Json => serde_json::to_string_pretty(&module)?,
    })
}
