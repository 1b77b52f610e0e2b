use anyhow::{bail, Context, Result};
use lbng_core::utils::{self, ui};
use lbng_core::{generate_services, Application, LbngConfig};
use std::path::Path;

use super::GenerateArgs;

pub fn run(args: &GenerateArgs) -> Result<()> {
    let config = LbngConfig::load_or_default(Path::new("."))?;
    let options = args.apply(config.generator);

    let app = Application::load(&args.input)?;
    let generated = generate_services(&app, options)?;

    let output = args.output.clone().or(config.output.path);
    match output {
        Some(path) if args.check => check(&path, &generated),
        Some(path) => write(&path, &generated),
        None if args.check => bail!("--check needs an output path (argument or [output] path in lbng.toml)"),
        None => {
            print!("{}", generated);
            Ok(())
        }
    }
}

fn write(path: &Path, generated: &str) -> Result<()> {
    let existed = path.exists();
    utils::write_generated(path, generated)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let display = path.display().to_string();
    if existed {
        ui::updated(&display);
    } else {
        ui::created(&display);
    }
    Ok(())
}

/// Compare what would be written against the file on disk.
pub fn check(path: &Path, generated: &str) -> Result<()> {
    let display = path.display().to_string();
    let current = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", display))?;
    let expected = utils::merge_custom_block(path, generated);

    if current == expected {
        ui::success(&format!("{} is up to date", display));
        return Ok(());
    }

    print!("{}", utils::unified_diff(&current, &expected, &display));
    bail!("{} is out of date, run `lbng generate` to refresh it", display);
}
