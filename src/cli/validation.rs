use crate::cli::args::CliArgs;

/// Checks that only make sense for raw CLI input. Values that may also come
/// from the config file are checked once, after merging, in `app`.
pub fn validate(args: &CliArgs) -> Result<(), String> {
    for raw in args.source.iter() {
        if raw.trim().is_empty() {
            return Err("invalid --source, value is empty".to_string());
        }
    }
    for raw in args.section.iter() {
        if raw.trim().is_empty() {
            return Err("invalid --section, value is empty".to_string());
        }
    }
    Ok(())
}
