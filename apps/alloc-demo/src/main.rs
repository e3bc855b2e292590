//! Runs the same payload through std containers and allocator-bound
//! containers, so the storage traffic of each strategy can be compared.
//!
//! Payload lifecycle is printed to stdout. Allocator diagnostics are
//! `tracing` events written to stderr.

mod config;
mod person;

use std::collections::LinkedList;
use std::io;

use anyhow::{Context, Result, anyhow, ensure};
use clap::Parser;
use nebula_allocator::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{Args, Strategy};
use crate::person::Person;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    debug!(
        strategy = ?args.strategy,
        container = ?args.container,
        count = args.count,
        "starting allocator demo"
    );

    if !args.skip_baseline {
        run_baseline(&args);
    }

    match args.strategy {
        Strategy::PassThrough => run_custom(&PassThroughAllocator::<Person>::new(), &args)?,
        Strategy::Counting => run_custom(&CountingAllocator::<Person>::new(), &args)?,
        Strategy::Shared => {
            let alloc = SharedCountingAllocator::<Person>::shared();
            run_custom(&alloc, &args)?;

            let counts = alloc.counts();
            ensure!(
                counts.is_balanced(),
                "shared ledger unbalanced after teardown: {counts:?}"
            );
            println!(
                "Shared ledger: {} live allocation(s), {} live construction(s)",
                counts.allocations, counts.constructions
            );
        }
    }

    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(args.default_filter())
            .with_context(|| format!("invalid log filter: {}", args.default_filter()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_level(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

fn run_baseline(args: &Args) {
    if args.container.includes_list() {
        println!("Normal list memory allocation");
        {
            let mut people = LinkedList::new();
            for _ in 0..args.count {
                people.push_back(Person::new());
            }
        }
        println!();
    }

    if args.container.includes_vec() {
        println!("Normal vector memory allocation");
        {
            let mut people = Vec::new();
            for _ in 0..args.count {
                people.push(Person::new());
            }
        }
        println!();
    }
}

fn run_custom<A>(alloc: &A, args: &Args) -> Result<()>
where
    A: ElementAllocator<Value = Person> + Clone,
{
    if args.container.includes_list() {
        println!("Custom allocator list memory allocation");
        {
            let mut people = AllocList::new_in(alloc.clone());
            for _ in 0..args.count {
                people
                    .push_back(Person::new())
                    .context("failed to grow custom list")?;
            }
        }
        println!();
    }

    if args.container.includes_vec() {
        println!("Custom allocator vector memory allocation");
        {
            let mut people = AllocVec::new_in(alloc.clone());
            for _ in 0..args.count {
                people
                    .push(Person::new())
                    .context("failed to grow custom vector")?;
            }
        }
        println!();
    }

    Ok(())
}
