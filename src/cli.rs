use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "subbrute",
    version,
    about = "Wordlist-driven subdomain candidate generator",
    long_about = "subbrute runs the brute forcing stage of a subdomain discovery pipeline on its own.\nIt expands root domains, and optionally already-discovered names, into candidate subdomains for a resolver to check."
)]
pub struct Args {
    /// Root domain(s) to brute force
    #[arg(short = 'd', long = "domain", value_name = "DOMAIN")]
    pub domain: Vec<String>,

    /// File containing list of root domains
    #[arg(short = 'l', long = "list", value_name = "FILE")]
    pub domains_file: Option<PathBuf>,

    /// File of already-discovered names to recurse into
    #[arg(short = 'n', long = "names", value_name = "FILE")]
    pub names_file: Option<PathBuf>,

    /// Wordlist file (one word per line)
    #[arg(short = 'w', long = "wordlist", value_name = "FILE")]
    pub wordlist: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,

    /// Enable recursive brute forcing
    #[arg(short = 'r', long = "recursive", conflicts_with = "no_recursive")]
    pub recursive: bool,

    /// Disable recursive brute forcing
    #[arg(long = "no-recursive")]
    pub no_recursive: bool,

    /// Seconds without inbound work before the stage reports idle
    #[arg(long = "idle-timeout", value_name = "SECS")]
    pub idle_timeout: Option<u64>,

    /// Output file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Silent mode (only output candidates)
    #[arg(long = "silent")]
    pub silent: bool,

    /// Verbose mode
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Check if we should read root domains from stdin
    pub fn use_stdin(&self) -> bool {
        self.domain.is_empty() && self.domains_file.is_none() && !atty::is(atty::Stream::Stdin)
    }

    /// Recursion override from the command line, if any.
    pub fn recursion_override(&self) -> Option<bool> {
        if self.recursive {
            Some(true)
        } else if self.no_recursive {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "subbrute", "-d", "example.com", "-d", "example.org", "-w", "words.txt", "-r",
            "--idle-timeout", "2",
        ]);
        assert_eq!(args.domain, vec!["example.com", "example.org"]);
        assert_eq!(args.wordlist, Some(PathBuf::from("words.txt")));
        assert_eq!(args.recursion_override(), Some(true));
        assert_eq!(args.idle_timeout, Some(2));
    }

    #[test]
    fn test_recursion_flags_conflict() {
        let result = Args::try_parse_from(["subbrute", "-r", "--no-recursive"]);
        assert!(result.is_err());

        let args = Args::parse_from(["subbrute", "--no-recursive"]);
        assert_eq!(args.recursion_override(), Some(false));
        assert_eq!(Args::parse_from(["subbrute"]).recursion_override(), None);
    }
}
