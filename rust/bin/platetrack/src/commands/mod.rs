pub mod admin;
pub mod movement;
pub mod report;

use serde::Serialize;

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Trim an RFC 3339 timestamp to its date part for table output.
pub fn short_date(ts: Option<&str>) -> &str {
    match ts {
        Some(t) => t.get(..10).unwrap_or(t),
        None => "-",
    }
}
