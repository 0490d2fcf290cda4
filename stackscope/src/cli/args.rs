//! CLI argument definitions

use clap::Parser;

/// Deepest call chain the demo will build before capturing.
pub const MAX_DEPTH: u16 = 1024;

#[derive(Parser, Debug)]
#[command(
    name = "stackscope",
    about = "Capture this process's call stack and print the resolved frames",
    after_help = "\
EXAMPLES:
    stackscope                          Trace from 3 nested calls, most recent first
    stackscope --depth 10 --reversed    Deeper chain, least recent first
    stackscope --trim                   Only the frames below the common caller
    stackscope --json                   Machine-readable records

Set RUST_LOG=stackscope=debug for resolver diagnostics."
)]
pub struct Args {
    /// Number of nested calls between main and the capture
    #[arg(
        short,
        long,
        default_value = "3",
        value_parser = clap::value_parser!(u16).range(..=i64::from(MAX_DEPTH))
    )]
    pub depth: u16,

    /// Print least recent call first (traceback order)
    #[arg(short, long)]
    pub reversed: bool,

    /// Trim frames shared with a fresh capture taken from main
    #[arg(short, long)]
    pub trim: bool,

    /// Emit the records as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["stackscope"]).unwrap();
        assert_eq!(args.depth, 3);
        assert!(!args.reversed && !args.trim && !args.json && !args.quiet);
    }

    #[test]
    fn test_flags() {
        let args =
            Args::try_parse_from(["stackscope", "--depth", "7", "-r", "--trim", "--json"]).unwrap();
        assert_eq!(args.depth, 7);
        assert!(args.reversed && args.trim && args.json);
    }

    #[test]
    fn test_depth_is_bounded() {
        let max = MAX_DEPTH.to_string();
        assert_eq!(Args::try_parse_from(["stackscope", "--depth", &max]).unwrap().depth, MAX_DEPTH);

        let over = (u32::from(MAX_DEPTH) + 1).to_string();
        assert!(Args::try_parse_from(["stackscope", "--depth", &over]).is_err());
        assert!(Args::try_parse_from(["stackscope", "--depth", "10000000"]).is_err());
    }

    #[test]
    fn test_depth_must_be_a_number() {
        assert!(Args::try_parse_from(["stackscope", "--depth", "deep"]).is_err());
    }
}
