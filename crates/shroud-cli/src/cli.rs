use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use shroud_core::SensitiveCategory;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shroud")]
#[command(about = "Redact personal information from documents", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Redact a document and add a confidentiality banner
    Redact(RedactArgs),

    /// List what would be redacted without changing anything
    Scan(ScanArgs),

    /// Show the active configuration
    Config {
        /// Print only the config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Args)]
pub struct RedactArgs {
    /// Document to redact (.json snapshot or plain text)
    pub input: PathBuf,

    /// Where to write the result (default: <input>.redacted.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Add the confidentiality banner (default from config: true)
    #[arg(long)]
    pub insert_header: Option<bool>,

    /// Record edits as tracked changes (default from config: true)
    #[arg(long)]
    pub enable_tracking: Option<bool>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Copy the summary to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Config file to use instead of the default one
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Document to scan (.json snapshot or plain text)
    pub input: PathBuf,

    /// Restrict the listing to one category (e.g. email, ssn, card)
    #[arg(long)]
    pub only: Option<SensitiveCategory>,

    /// Print findings as JSON
    #[arg(long)]
    pub json: bool,

    /// Config file to use instead of the default one
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_args() {
        let cli = Cli::try_parse_from([
            "shroud",
            "redact",
            "notes.txt",
            "-o",
            "out.txt",
            "--enable-tracking",
            "false",
            "--json",
        ])
        .unwrap();

        let Commands::Redact(args) = cli.command else {
            panic!("expected redact");
        };
        assert_eq!(args.input, PathBuf::from("notes.txt"));
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        assert_eq!(args.enable_tracking, Some(false));
        assert_eq!(args.insert_header, None);
        assert!(args.json);
        assert!(!args.copy);
    }

    #[test]
    fn test_scan_only_category() {
        let cli = Cli::try_parse_from(["shroud", "scan", "doc.json", "--only", "card"]).unwrap();

        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.only, Some(SensitiveCategory::CreditCard));
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(Cli::try_parse_from(["shroud", "scan", "doc.json", "--only", "passport"]).is_err());
    }
}
