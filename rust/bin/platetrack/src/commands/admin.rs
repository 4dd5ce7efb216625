use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};

use plates::{DataSnapshot, PlateService};

/// Ask a yes/no question on stdin; anything but "y" means no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().eq_ignore_ascii_case("y"))
}

/// Use the password flag when given, otherwise prompt without echo.
pub fn admin_password(flag: Option<String>) -> anyhow::Result<String> {
    match flag {
        Some(p) => Ok(p),
        None => Ok(rpassword::prompt_password("Admin password: ")?),
    }
}

pub fn export(svc: &PlateService, file: Option<&Path>) -> anyhow::Result<()> {
    let json = svc.export().to_json()?;
    match file {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported {} plates to {}.", svc.plates().len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn import(svc: &mut PlateService, file: &Path, password: &str) -> anyhow::Result<()> {
    let data = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let snapshot = DataSnapshot::from_json(&data)?;
    svc.import(password, snapshot)?;
    println!("Imported {} plates and {} logs.", svc.plates().len(), svc.logs().len());
    println!("The previous data was saved as a restore point.");
    Ok(())
}

pub fn set_password(
    svc: &PlateService,
    new: Option<String>,
    current: Option<String>,
) -> anyhow::Result<()> {
    let current = match current {
        Some(c) => Some(c),
        None if svc.has_admin_password()? => {
            Some(rpassword::prompt_password("Current admin password: ")?)
        }
        None => None,
    };
    let (password, confirmation) = match new {
        Some(p) => (p.clone(), p),
        None => (
            rpassword::prompt_password("New admin password: ")?,
            rpassword::prompt_password("Confirm new password: ")?,
        ),
    };
    svc.set_admin_password(current.as_deref(), &password, &confirmation)?;
    println!("Admin password updated.");
    Ok(())
}

pub fn restore(svc: &mut PlateService, yes: bool) -> anyhow::Result<()> {
    let Some(ts) = svc.restore_point_timestamp()? else {
        bail!("no restore point saved");
    };
    if !yes && !confirm(&format!("Replace current plates and logs with the restore point from {}?", ts))? {
        println!("Cancelled.");
        return Ok(());
    }
    svc.restore_from_point()?;
    println!("Restored {} plates from {}.", svc.plates().len(), ts);
    Ok(())
}
