//! Paging simulator - batch entry point
//!
//! Usage: paging-sim [OPTIONS] <frames_file> <instructions_file>
//!
//! Arguments:
//!   frames_file        - Frame identifiers handed to the job, whitespace separated
//!   instructions_file  - One `index operation page offset` per line
//!
//! Set RUST_LOG=debug to see faults, evictions and write-backs as they happen.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use fifo_paging::instruction::{run_instructions_with, FaultKind};
use fifo_paging::io::{read_frames, read_instructions, render_page_table, render_trace};
use fifo_paging::{PagingConfig, PagingEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ShowTable {
    /// After every instruction
    Every,
    /// Once, after the last instruction
    Final,
    Never,
}

/// Demand paging with FIFO replacement for a single job
#[derive(Debug, Parser)]
#[command(name = "paging-sim", version)]
struct Cli {
    frames_file: PathBuf,

    instructions_file: PathBuf,

    /// Frames handed to the job [default: number of frames in the file]
    #[arg(short, long)]
    budget: Option<usize>,

    /// Page (and frame) size in bytes
    #[arg(long, default_value_t = fifo_paging::constants::PAGE_SIZE)]
    page_size: usize,

    /// Largest job size in bytes
    #[arg(long, default_value_t = fifo_paging::constants::MAX_JOB_SIZE)]
    job_size: usize,

    /// Physical memory size in bytes
    #[arg(long, default_value_t = fifo_paging::constants::MEMORY_SIZE)]
    memory_size: usize,

    #[arg(long, value_enum, default_value_t = ShowTable::Final)]
    show_table: ShowTable,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let frames = read_frames(&cli.frames_file)
        .with_context(|| format!("reading frames from {}", cli.frames_file.display()))?;
    let instructions = read_instructions(&cli.instructions_file).with_context(|| {
        format!("reading instructions from {}", cli.instructions_file.display())
    })?;

    let config = PagingConfig::default()
        .with_page_size(cli.page_size)
        .with_job_size(cli.job_size)
        .with_memory_size(cli.memory_size)
        .with_frame_budget(cli.budget.unwrap_or(frames.len()));
    let mut engine = PagingEngine::new(config, &frames).context("invalid paging configuration")?;

    log::info!(
        "{} instructions, {} pages, frames {:?}",
        instructions.len(),
        config.num_pages(),
        frames
    );

    let report = run_instructions_with(&mut engine, &instructions, |record, engine| {
        if let FaultKind::Replaced { evicted } = record.fault {
            log::debug!("instruction {} evicted page {}", record.instruction.index, evicted);
        }
        if cli.show_table == ShowTable::Every {
            println!("after instruction {}:", record.instruction.index);
            println!("{}", render_page_table(&engine.page_table()));
        }
    });

    print!("{}", render_trace(&report.records));

    if cli.show_table == ShowTable::Final {
        println!();
        print!("{}", render_page_table(&engine.page_table()));
    }

    let stats = engine.stats();
    println!();
    println!(
        "accesses: {}  faults: {}  evictions: {}  write-backs: {}  fault rate: {:.2}",
        stats.accesses,
        stats.faults,
        stats.evictions,
        stats.write_backs,
        stats.fault_rate()
    );

    Ok(())
}
