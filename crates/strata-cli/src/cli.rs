use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use strata_merge::ArrayMergeMode;

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Strata: structural merge and equality for JSON trees",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deep-merge two or more JSON documents, later files winning
    Merge(MergeArgs),
    /// Check two JSON documents for structural equality
    Equals(EqualsArgs),
    /// Show the kind of a JSON document or of a value inside it
    Classify(ClassifyArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Documents to merge, in order of increasing precedence
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Array merge strategy (index-aligned, replace, concat)
    #[arg(long)]
    pub array_merge: Option<ArrayMergeMode>,
    /// Share unchanged subtrees with the inputs instead of copying them
    #[arg(long)]
    pub no_clone: bool,
    /// Merge settings file (TOML, or JSON with a .json extension)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Print the result on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args)]
pub struct EqualsArgs {
    pub left: PathBuf,
    pub right: PathBuf,
}

#[derive(Args)]
pub struct ClassifyArgs {
    pub file: PathBuf,
    /// JSON pointer to the value to classify, e.g. /server/ports
    #[arg(long)]
    pub pointer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_merge() {
        let cli = Cli::try_parse_from(["strata", "merge", "a.json", "b.json"]).unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.files, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
            assert!(args.array_merge.is_none());
            assert!(!args.no_clone);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_merge_requires_files() {
        assert!(Cli::try_parse_from(["strata", "merge"]).is_err());
    }

    #[test]
    fn parse_merge_strategy() {
        let cli = Cli::try_parse_from([
            "strata", "merge", "--array-merge", "replace", "--no-clone", "a.json", "b.json",
        ])
        .unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.array_merge, Some(ArrayMergeMode::Replace));
            assert!(args.no_clone);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_merge_rejects_unknown_strategy() {
        assert!(Cli::try_parse_from(["strata", "merge", "--array-merge", "zip", "a", "b"]).is_err());
    }

    #[test]
    fn parse_equals() {
        let cli = Cli::try_parse_from(["strata", "equals", "l.json", "r.json"]).unwrap();
        if let Command::Equals(args) = cli.command {
            assert_eq!(args.left, PathBuf::from("l.json"));
            assert_eq!(args.right, PathBuf::from("r.json"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_classify_pointer() {
        let cli = Cli::try_parse_from(["strata", "classify", "doc.json", "--pointer", "/a/0"]).unwrap();
        if let Command::Classify(args) = cli.command {
            assert_eq!(args.pointer, Some("/a/0".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["strata", "--verbose", "equals", "a", "b"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["strata", "--format", "json", "classify", "a"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
