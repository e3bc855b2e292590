//! Command-line configuration

use clap::{Parser, ValueEnum};

/// Strategy the custom-allocator runs are bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Stateless, logs every operation
    PassThrough,
    /// Per-instance live counters, checked on teardown
    Counting,
    /// Live counters shared by every copy and rebind
    Shared,
}

/// Container shapes to exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Container {
    /// Node-based, one block per element
    List,
    /// Contiguous, one growable block
    Vec,
    /// Both shapes, list first
    All,
}

impl Container {
    pub const fn includes_list(self) -> bool {
        matches!(self, Self::List | Self::All)
    }

    pub const fn includes_vec(self) -> bool {
        matches!(self, Self::Vec | Self::All)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "alloc-demo",
    version,
    about = "Show the storage traffic of containers bound to custom allocators",
    long_about = "Fills std containers and allocator-bound containers with the same \
                  payload. Payload lifecycle goes to stdout; allocator diagnostics go \
                  to stderr and can be filtered with RUST_LOG."
)]
pub struct Args {
    /// Allocation strategy for the custom runs
    #[arg(long, env = "NEBULA_ALLOC_STRATEGY", value_enum, default_value_t = Strategy::Counting)]
    pub strategy: Strategy,

    /// Container shapes to run
    #[arg(long, env = "NEBULA_ALLOC_CONTAINER", value_enum, default_value_t = Container::All)]
    pub container: Container,

    /// Number of elements inserted per container
    #[arg(long, env = "NEBULA_ALLOC_COUNT", default_value_t = 3)]
    pub count: usize,

    /// Skip the runs on std containers
    #[arg(long)]
    pub skip_baseline: bool,

    /// Also report construct/destroy lines
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Filter used when `RUST_LOG` is not set
    pub const fn default_filter(&self) -> &'static str {
        if self.verbose {
            "warn,nebula_allocator=trace"
        } else {
            "warn,nebula_allocator=debug"
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["alloc-demo"]).unwrap();
        assert_eq!(args.strategy, Strategy::Counting);
        assert_eq!(args.container, Container::All);
        assert_eq!(args.count, 3);
        assert!(!args.skip_baseline);
        assert_eq!(args.default_filter(), "warn,nebula_allocator=debug");
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "alloc-demo",
            "--strategy",
            "pass-through",
            "--container",
            "vec",
            "--count",
            "5",
            "--skip-baseline",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.strategy, Strategy::PassThrough);
        assert!(args.container.includes_vec());
        assert!(!args.container.includes_list());
        assert_eq!(args.count, 5);
        assert!(args.skip_baseline);
        assert_eq!(args.default_filter(), "warn,nebula_allocator=trace");
    }
}
