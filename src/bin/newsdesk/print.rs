use serde::Serialize;

use crate::client::CliError;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::failed(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}
